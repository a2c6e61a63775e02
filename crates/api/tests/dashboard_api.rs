//! Integration tests for the landing page.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, ADMIN_TOKEN, USER_TOKEN};

#[tokio::test]
async fn superuser_sees_tenant_grid_without_super_tenant() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/api/v1/dashboard", Some(ADMIN_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    let rows = data["tenant_rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["width"], "100%");
    assert_eq!(rows[0]["cards"].as_array().unwrap().len(), 3);
    assert_eq!(rows[1]["width"], "33.3333%");
    assert_eq!(rows[1]["cards"][0]["name"], "EOSC");

    let names: Vec<_> = rows
        .iter()
        .flat_map(|r| r["cards"].as_array().unwrap())
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"SuperPOEM Tenant"));

    assert_eq!(
        rows[0]["cards"][0]["links"][0]["href"],
        "https://egi.poem.example.org/ui/public_metrics"
    );
    assert_eq!(data["tenant_resources"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn tenant_user_sees_local_resources() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/api/v1/dashboard", Some(USER_TOKEN)).await;

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["tenant_rows"].as_array().unwrap().len(), 0);
    assert_eq!(data["tenant_resources"].as_array().unwrap().len(), 5);
    assert_eq!(data["shared_resources"][0]["href"], "/ui/public_probes");
}

#[tokio::test]
async fn anonymous_visitor_gets_public_layout() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/api/v1/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["tenant_rows"].as_array().unwrap().len(), 0);
    assert_eq!(data["tenant_resources"].as_array().unwrap().len(), 5);
    assert_eq!(data["shared_resources"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn stale_token_on_dashboard_is_401() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/api/v1/dashboard", Some("stale-token")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
