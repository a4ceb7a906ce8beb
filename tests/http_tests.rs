//! Router tests driven in-process with `tower::ServiceExt::oneshot`.
//!
//! Most tests swap the database for a scripted probe. The unreachable-database
//! tests use a real lazily connected pool aimed at a closed local port, and one
//! ignored test talks to a live PostgreSQL configured through `DB_*`.
//!
//! Run the live test with: cargo test --test http_tests -- --ignored

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CACHE_CONTROL, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use demo_app::config::DB_ACQUIRE_TIMEOUT_SECS;
use demo_app::{create_pool, create_router, AppConfig, AppState, DatabaseProbe, ProbeError};

/// Probe with a scripted outcome and an artificial round-trip delay.
struct ScriptedProbe {
    failure: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    fn healthy() -> Self {
        Self {
            failure: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::healthy()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DatabaseProbe for ScriptedProbe {
    async fn ping(&self) -> Result<(), ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(message) => Err(ProbeError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

fn test_config(extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = [
        ("DB_HOST", "127.0.0.1"),
        ("DB_USER", "demo"),
        ("DB_PASSWORD", "demo"),
        ("DB_NAME", "demo"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

fn app_with(probe: Arc<dyn DatabaseProbe>, extra: &[(&str, &str)]) -> Router {
    create_router(AppState::new(test_config(extra), probe))
}

/// Router backed by the production pool pointed at a port nothing listens on.
fn app_with_unreachable_db() -> Router {
    let config = test_config(&[("DB_PORT", "1")]);
    let pool = create_pool(&config.database);
    create_router(AppState::new(config, Arc::new(pool)))
}

async fn get(app: Router, path: &str) -> (StatusCode, HeaderMap, Value) {
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

#[tokio::test]
async fn test_info_reports_configured_environment() {
    let app = app_with(Arc::new(ScriptedProbe::healthy()), &[("APP_ENV", "staging")]);
    let (status, _, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Platform Engineering Assessment demo app");
    assert_eq!(body["environment"], "staging");
    let time = body["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok(), "bad timestamp {time}");
    assert!(time.ends_with('Z'));
}

#[tokio::test]
async fn test_info_defaults_to_local_and_skips_database() {
    let probe = Arc::new(ScriptedProbe::failing("down"));
    let app = app_with(probe.clone(), &[]);
    let (status, _, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "local");
    assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_healthz_ok() {
    let app = app_with(Arc::new(ScriptedProbe::healthy()), &[]);
    let (status, _, body) = get(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_readyz_ok() {
    let app = app_with(Arc::new(ScriptedProbe::healthy()), &[]);
    let (status, _, body) = get(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ready"}));
}

#[tokio::test]
async fn test_healthz_failure() {
    let app = app_with(Arc::new(ScriptedProbe::failing("connection refused")), &[]);
    let (status, _, body) = get(app, "/healthz").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({"status": "error", "error": "connection refused"})
    );
}

#[tokio::test]
async fn test_readyz_failure() {
    let app = app_with(Arc::new(ScriptedProbe::failing("connection refused")), &[]);
    let (status, _, body) = get(app, "/readyz").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({"status": "not_ready", "error": "connection refused"})
    );
}

#[tokio::test]
async fn test_liveness_and_readiness_differ_only_in_vocabulary() {
    for failure in [None, Some("password authentication failed")] {
        let make = || match failure {
            Some(message) => Arc::new(ScriptedProbe::failing(message)),
            None => Arc::new(ScriptedProbe::healthy()),
        };
        let (live_status, _, mut live) = get(app_with(make(), &[]), "/healthz").await;
        let (ready_status, _, mut ready) = get(app_with(make(), &[]), "/readyz").await;

        assert_eq!(live_status, ready_status);
        live["status"] = Value::Null;
        ready["status"] = Value::Null;
        assert_eq!(live, ready);
    }
}

#[tokio::test]
async fn test_each_probe_request_hits_database() {
    let probe = Arc::new(ScriptedProbe::healthy());
    let app = app_with(probe.clone(), &[]);

    get(app.clone(), "/healthz").await;
    get(app.clone(), "/healthz").await;
    get(app, "/readyz").await;

    assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_concurrent_probes_do_not_serialize() {
    const REQUESTS: usize = 10;
    let delay = Duration::from_millis(200);
    let probe = Arc::new(ScriptedProbe::healthy().with_delay(delay));
    let app = app_with(probe.clone(), &[]);

    let start = Instant::now();
    let results =
        futures::future::join_all((0..REQUESTS).map(|_| get(app.clone(), "/healthz"))).await;
    let elapsed = start.elapsed();

    assert!(results.iter().all(|(status, _, _)| *status == StatusCode::OK));
    assert_eq!(probe.calls.load(Ordering::SeqCst), REQUESTS);
    assert!(
        elapsed < delay * (REQUESTS as u32) / 2,
        "requests appear serialized: {elapsed:?}"
    );
}

#[tokio::test]
async fn test_responses_are_not_cacheable_and_carry_request_id() {
    let (_, headers, _) = get(app_with(Arc::new(ScriptedProbe::healthy()), &[]), "/readyz").await;
    assert_eq!(headers[CACHE_CONTROL], "no-store");
    let request_id = headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (status, _, _) = get(app_with(Arc::new(ScriptedProbe::healthy()), &[]), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_readyz_unreachable_database() {
    let start = Instant::now();
    let (status, _, body) = get(app_with_unreachable_db(), "/readyz").await;
    let elapsed = start.elapsed();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "not_ready");
    let error = body["error"].as_str().unwrap().to_lowercase();
    assert!(error.contains("refused"), "cause missing: {error}");
    assert!(
        elapsed < Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS + 5),
        "readiness took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_info_with_unreachable_database() {
    let (status, _, body) = get(app_with_unreachable_db(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "local");
}

#[tokio::test]
#[ignore = "requires a reachable PostgreSQL configured via DB_* variables"]
async fn test_healthz_live_database() {
    let config = AppConfig::from_env().expect("DB_* variables must be set");
    let pool = create_pool(&config.database);
    let app = create_router(AppState::new(config, Arc::new(pool.clone())));

    let (status, _, body) = get(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    pool.close().await;
}
