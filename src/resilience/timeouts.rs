//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the joined catalog + snapshot fetch
//! - Cancel the in-flight requests cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities (dropping the future cancels it)
//! - Timeout errors are distinct from other fetch errors
//! - `None` keeps the unbounded behavior for callers that opt out

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::client::source::FetchError;

/// Run `fut` with an optional upper bound.
pub async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match limit {
        Some(limit) => match timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(limit)),
        },
        None => fut.await,
    }
}
