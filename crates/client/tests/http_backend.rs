//! `ConsoleApi` against a local axum stand-in for the backend.

use assert_matches::assert_matches;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use monconsole_client::{
    ApiError, BulkActionSink, ClientConfig, ConsoleApi, IdentityProvider, RecordSource,
};
use monconsole_core::import::ImportRequest;
use monconsole_core::schema::EntityType;
use serde_json::{json, Value};

async fn metric(Path(name): Path<String>) -> Result<Json<Value>, StatusCode> {
    if name != "argo.AMS-Check" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "id": 1,
        "name": "argo.AMS-Check",
        "mtype": "Active",
        "probeversion": "ams-probe (0.1.7)",
        "group": "EGI",
        "parent": null,
        "config": [{"key": "path", "value": "/usr/libexec/argo"}]
    })))
}

async fn session(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != "Bearer user-token" {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "active": true,
        "userdetails": {"username": "alice", "is_superuser": true, "groups": {}}
    })))
}

async fn import(Json(body): Json<Value>) -> Json<Value> {
    let names = body["metrictemplates"].clone();
    Json(json!({"imported": names, "err": []}))
}

async fn spawn_backend() -> ConsoleApi {
    let app = Router::new()
        .route("/api/v2/internal/metric/{name}", get(metric))
        .route(
            "/api/v2/internal/mtypes",
            get(|| async { Json(json!(["Active", "Passive"])) }),
        )
        .route(
            "/api/v2/internal/usergroups",
            get(|| async { Json(json!({"metrics": ["EGI"], "aggregations": []})) }),
        )
        .route(
            "/api/v2/internal/public_tenants",
            get(|| async {
                Json(json!([
                    {"name": "EGI", "domain_url": "egi.example.org", "schema_name": "egi"}
                ]))
            }),
        )
        .route("/api/v2/internal/sessionactive", get(session))
        .route("/api/v2/internal/importmetrics", post(import));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ConsoleApi::new(ClientConfig::new(format!("http://{addr}"))).unwrap()
}

#[tokio::test]
async fn fetch_one_parses_record() {
    let api = spawn_backend().await;
    let record = api
        .fetch_one(EntityType::Metric, "argo.AMS-Check")
        .await
        .unwrap();
    assert_eq!(record.scalar("group"), Some("EGI"));
    assert_eq!(record.pairs("config").unwrap()[0].key, "path");
    assert!(record.get("parent").is_none());
}

#[tokio::test]
async fn fetch_one_reports_backend_404() {
    let api = spawn_backend().await;
    let err = api.fetch_one(EntityType::Metric, "nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn metric_options_combine_types_and_groups() {
    let api = spawn_backend().await;
    let options = api.fetch_options(EntityType::Metric).await.unwrap();
    assert_eq!(options.types, vec!["Active", "Passive"]);
    assert_eq!(options.groups, vec!["EGI"]);
}

#[tokio::test]
async fn public_tenants_ignore_extra_fields() {
    let api = spawn_backend().await;
    let tenants = api.fetch_public_tenants().await.unwrap();
    assert_eq!(tenants[0].domain_url, "egi.example.org");
}

#[tokio::test]
async fn resolve_forwards_the_callers_token() {
    let api = spawn_backend().await;
    let ctx = api.resolve("user-token").await.unwrap();
    assert!(ctx.is_superuser);

    let err = api.resolve("someone-else").await.unwrap_err();
    assert_matches!(err, ApiError::Status { status: 401, .. });
}

#[tokio::test]
async fn import_returns_report() {
    let api = spawn_backend().await;
    let request = ImportRequest::new(vec!["argo.AMS-Check".into()]).unwrap();
    let report = api.submit_selection(&request).await.unwrap();
    assert_eq!(report.imported, vec!["argo.AMS-Check"]);
    assert!(!report.has_errors());
}
