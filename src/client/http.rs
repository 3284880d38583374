//! HTTP implementation of [`AuthzSource`] backed by reqwest.

use serde::de::DeserializeOwned;
use url::Url;

use crate::authz::types::SessionUser;
use crate::client::source::{AuthzPayload, AuthzSource, CatalogPayload, FetchError};
use crate::config::ApiConfig;

/// Fetches the catalog and snapshot from the hostel API.
#[derive(Debug, Clone)]
pub struct HttpAuthzSource {
    client: reqwest::Client,
    catalog_url: Url,
    authz_url: Url,
    default_token: Option<String>,
}

fn endpoint_url(base_url: &str, path: &str) -> Result<Url, FetchError> {
    // Concatenate instead of Url::join so a base path prefix survives.
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&joined)?)
}

impl HttpAuthzSource {
    /// Create a source for the configured API.
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let catalog_url = endpoint_url(&config.base_url, &config.catalog_path)?;
        let authz_url = endpoint_url(&config.base_url, &config.authz_path)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("hostel-authz/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport {
                endpoint: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            catalog_url,
            authz_url,
            default_token: config.bearer_token.clone(),
        })
    }

    pub fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }

    pub fn authz_url(&self) -> &Url {
        &self.authz_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> Result<T, FetchError> {
        let endpoint = url.to_string();
        tracing::debug!(endpoint = %endpoint, "Fetching authorization data");

        let mut request = self.client.get(url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| FetchError::Transport {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "Authorization endpoint rejected request");
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

impl AuthzSource for HttpAuthzSource {
    async fn fetch_catalog(&self) -> Result<CatalogPayload, FetchError> {
        self.get_json(&self.catalog_url, self.default_token.as_deref())
            .await
    }

    async fn fetch_authz(&self, user: &SessionUser) -> Result<AuthzPayload, FetchError> {
        let token = user.token.as_deref().or(self.default_token.as_deref());
        self.get_json(&self.authz_url, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_endpoint_urls_keep_base_prefix() {
        let source = HttpAuthzSource::new(&api("http://localhost:5000/hms/")).unwrap();
        assert_eq!(
            source.catalog_url().as_str(),
            "http://localhost:5000/hms/api/authz/catalog"
        );
        assert_eq!(source.authz_url().as_str(), "http://localhost:5000/hms/api/authz/me");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpAuthzSource::new(&api("not a url")).unwrap_err();
        assert!(matches!(err, FetchError::Url(_)));
    }
}
