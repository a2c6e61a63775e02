//! Integration tests for version history and revision comparison.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, USER_TOKEN};

const HISTORY: &str = "/api/v1/metric/argo.AMS-Check/history";

#[tokio::test]
async fn history_lists_revisions_newest_first() {
    let (app, _) = common::build_test_app();
    let response = get(app, HISTORY, Some(USER_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["name"], "argo.AMS-Check");

    let versions = data["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], "20200202-101010");
    assert_eq!(versions[0]["comment"], "Changed probeversion and config.");
    assert_eq!(versions[0]["date_created"], "2020-02-02T10:10:10Z");
    assert_eq!(versions[1]["comment"], "Initial version.");

    assert_eq!(data["default_compare"]["before"], "20200101-090000");
    assert_eq!(data["default_compare"]["after"], "20200202-101010");
}

#[tokio::test]
async fn compare_revisions_reports_changed_fields() {
    let (app, _) = common::build_test_app();
    let uri = format!("{HISTORY}/20200101-090000/20200202-101010");
    let response = get(app, &uri, Some(USER_TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["before"]["version"], "20200101-090000");
    assert_eq!(data["after"]["version"], "20200202-101010");

    let changes = data["changes"].as_array().unwrap();
    let fields: Vec<_> = changes.iter().map(|c| c["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["probeversion", "config"]);
    assert_eq!(changes[0]["before"], "ams-probe (0.1.6)");
    assert_eq!(changes[0]["after"], "ams-probe (0.1.7)");
    assert_eq!(changes[1]["after"][0]["value"], "/usr/libexec/argo");
}

#[tokio::test]
async fn comparing_a_revision_with_itself_is_empty() {
    let (app, _) = common::build_test_app();
    let uri = format!("{HISTORY}/20200202-101010/20200202-101010");
    let response = get(app, &uri, Some(USER_TOKEN)).await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["changes"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_revision_is_404() {
    let (app, _) = common::build_test_app();
    let uri = format!("{HISTORY}/20200101-090000/19990101-000000");
    let response = get(app, &uri, Some(USER_TOKEN)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "version argo.AMS-Check@19990101-000000 not found"
    );
}

#[tokio::test]
async fn record_without_history_is_404() {
    let (app, _) = common::build_test_app();
    let response = get(
        app,
        "/api/v1/metric/argo.AMSPublisher-Check/history",
        Some(USER_TOKEN),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
