//! Integration tests for the metric template selection round-trip.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, ADMIN_TOKEN, USER_TOKEN};
use serde_json::json;

const SELECTION: &str = "/api/v1/actions/metrictemplates/selection";

#[tokio::test]
async fn toggling_one_row_gives_mixed_indicator() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        SELECTION,
        Some(ADMIN_TOKEN),
        json!({ "action": { "type": "toggle_row", "id": "argo.AMS-Check" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["selection"], "mixed");
    assert_eq!(data["selected_ids"], json!(["argo.AMS-Check"]));
    assert_eq!(data["selected"]["argo.AMS-Check"], true);
    assert_eq!(data["rows"][0]["selected"], true);
    assert_eq!(data["rows"][1]["selected"], false);
}

#[tokio::test]
async fn toggle_all_selects_only_visible_rows() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        SELECTION,
        Some(ADMIN_TOKEN),
        json!({
            "view": { "filters": { "name": "AMS" } },
            "action": { "type": "toggle_all" }
        }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["selection"], "all_selected");
    assert_eq!(
        json["data"]["selected_ids"],
        json!(["argo.AMS-Check", "argo.AMSPublisher-Check"])
    );
}

#[tokio::test]
async fn toggle_all_on_mixed_deselects_visible_and_keeps_hidden() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        SELECTION,
        Some(ADMIN_TOKEN),
        json!({
            "view": { "filters": { "name": "AMS" } },
            "selected": { "argo.AMS-Check": true, "org.apel.APEL-Pub": true },
            "action": { "type": "toggle_all" }
        }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["selection"], "none_selected");
    assert_eq!(json["data"]["selected_ids"], json!(["org.apel.APEL-Pub"]));
}

#[tokio::test]
async fn refresh_recomputes_indicator_for_new_filter() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        SELECTION,
        Some(ADMIN_TOKEN),
        json!({
            "view": { "filters": { "name": "APEL" } },
            "selected": { "argo.AMS-Check": true, "org.apel.APEL-Pub": true },
            "action": { "type": "refresh" }
        }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["selection"], "all_selected");
    assert_eq!(json["data"]["visible_rows"], 1);
}

#[tokio::test]
async fn unknown_row_is_404() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        SELECTION,
        Some(ADMIN_TOKEN),
        json!({ "action": { "type": "toggle_row", "id": "no.such-template" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_superuser_is_403() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        SELECTION,
        Some(USER_TOKEN),
        json!({ "action": { "type": "toggle_all" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn metric_lists_are_not_selectable() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/actions/metric/selection",
        Some(ADMIN_TOKEN),
        json!({ "action": { "type": "toggle_all" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
