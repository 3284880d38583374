//! End-to-end session tests against a mock hostel API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hostel_authz::config::ApiConfig;
use hostel_authz::{AuthzSession, HttpAuthzSource, LifecycleState, SessionSettings, SessionUser};
use serde_json::json;

mod common;

fn catalog_body() -> String {
    json!({
        "catalog": {
            "routes": [
                {"key": "dashboard", "paths": ["/"]},
                {"key": "rooms.view", "paths": ["/hostels/:name/units/:unit", "/rooms"]},
                {"key": "rooms.unit_a", "paths": ["/rooms/unit-a"]},
                {"key": "rooms.unit", "paths": ["/rooms/:unit"]},
                {"key": "gate.entries", "paths": "/gate"}
            ]
        }
    })
    .to_string()
}

fn source_for(addr: std::net::SocketAddr) -> HttpAuthzSource {
    HttpAuthzSource::new(&ApiConfig {
        base_url: format!("http://{}", addr),
        ..ApiConfig::default()
    })
    .unwrap()
}

fn warden() -> SessionUser {
    SessionUser {
        token: Some("warden-token".into()),
        ..SessionUser::with_role("warden")
    }
}

#[tokio::test]
async fn test_sign_in_over_http() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_api = seen.clone();
    let addr = common::start_programmable_api(move |req| {
        seen_by_api.lock().unwrap().push(req.clone());
        async move {
            match req.path.as_str() {
                "/api/authz/catalog" => (200, catalog_body()),
                "/api/authz/me" => (
                    200,
                    json!({
                        "authz": {
                            "effective": {
                                "role": "warden",
                                "routeAccess": {"rooms.view": true, "rooms.unit": false},
                                "capabilities": {"*": false, "visitors.approve": true},
                                "constraints": {"hostelIds": ["H1"], "maxVisitors": null}
                            },
                            "override": {"denies": ["rooms.unit"]}
                        }
                    })
                    .to_string(),
                ),
                _ => (404, "{}".to_string()),
            }
        }
    })
    .await;

    let session = AuthzSession::new(source_for(addr), SessionSettings::default());
    session.sign_in(warden()).await;

    assert_eq!(session.state(), LifecycleState::Ready);
    assert!(session.error().is_none());

    // Parameterized route granted explicitly.
    assert!(session.can_route_by_path("/hostels/Hostel-A/units/U1"));
    // Exact template outranks the earlier-listed pattern family.
    assert_eq!(
        session.resolve_route_key_by_path("/rooms/unit-a").as_deref(),
        Some("rooms.unit_a")
    );
    assert!(session.can_route_by_path("/rooms/unit-a"));
    assert!(!session.can_route_by_path("/rooms/unit-b"));
    // Malformed entry skipped, so its path is unprotected and denied.
    assert!(!session.can_route_by_path("/gate"));
    assert!(session.can_route("gate.entries"));
    assert_eq!(session.snapshot().rejections.len(), 1);

    assert!(session.can("visitors.approve"));
    assert!(!session.can("rooms.allocate"));
    assert!(session.can("fees.waive"));
    assert_eq!(session.get_constraint("maxVisitors", json!(5)), json!(null));
    assert!(session.override_().is_some());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen
        .iter()
        .all(|r| r.authorization.as_deref() == Some("Bearer warden-token")));
}

#[tokio::test]
async fn test_snapshot_endpoint_failure_uses_role_default() {
    let addr = common::start_programmable_api(|req| async move {
        match req.path.as_str() {
            "/api/authz/catalog" => (200, catalog_body()),
            _ => (500, "{}".to_string()),
        }
    })
    .await;

    let session = AuthzSession::new(source_for(addr), SessionSettings::default());
    session.sign_in(warden()).await;

    assert_eq!(session.state(), LifecycleState::Ready);
    assert!(session.error().unwrap().contains("HTTP 500"));
    assert_eq!(session.effective().role.as_deref(), Some("warden"));
    assert!(session.can("rooms.allocate"));
    assert!(session.can_route("rooms.unit"));
    // Nothing partial is published: the catalog from the failed round is not applied.
    assert!(session.catalog().is_none());
}

#[tokio::test]
async fn test_malformed_snapshot_body_is_a_failure() {
    let addr = common::start_programmable_api(|req| async move {
        match req.path.as_str() {
            "/api/authz/catalog" => (200, catalog_body()),
            _ => (200, "{\"authz\": 42}".to_string()),
        }
    })
    .await;

    let session = AuthzSession::new(source_for(addr), SessionSettings::default());
    session.sign_in(warden()).await;

    assert_eq!(session.state(), LifecycleState::Ready);
    assert!(session.error().unwrap().contains("invalid response"));
}

#[tokio::test]
async fn test_slow_api_times_out_to_ready() {
    let addr = common::start_programmable_api(|_req| async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, catalog_body())
    })
    .await;

    let settings = SessionSettings {
        fetch_timeout: Some(Duration::from_millis(200)),
        ..SessionSettings::default()
    };
    let session = AuthzSession::new(source_for(addr), settings);
    session.sign_in(warden()).await;

    assert_eq!(session.state(), LifecycleState::Ready);
    assert!(session.error().unwrap().contains("timed out"));
    assert!(session.can_route("rooms.view"));
}

#[tokio::test]
async fn test_unreachable_api() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = AuthzSession::new(source_for(addr), SessionSettings::default());
    session.sign_in(warden()).await;

    assert_eq!(session.state(), LifecycleState::Ready);
    assert!(session.error().unwrap().contains("failed"));
}
