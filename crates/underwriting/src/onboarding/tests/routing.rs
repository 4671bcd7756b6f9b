use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::onboarding::router::onboard_handler;
use crate::onboarding::scoring::ScoringConfig;
use crate::onboarding::{onboarding_router, MerchantOnboardingService};

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializable")))
        .expect("request builds")
}

fn submission_json() -> Value {
    serde_json::to_value(submission()).expect("submission serializes")
}

#[tokio::test]
async fn onboard_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(MerchantOnboardingService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryNotifier::default()),
        ScoringConfig::default(),
    ));

    let response = onboard_handler::<ConflictRepository, MemoryNotifier>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn onboard_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(MerchantOnboardingService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        ScoringConfig::default(),
    ));

    let response = onboard_handler::<UnavailableRepository, MemoryNotifier>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn onboard_route_creates_merchant() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("POST", "/api/v1/merchants", &submission_json()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "approved");
    assert_eq!(payload["latest_score"]["tier"], "Hot");
    assert_eq!(payload["latest_score"]["decision"], "Approve");
    assert_eq!(payload["latest_score"]["limit_suggestion"], "$5,000");
}

#[tokio::test]
async fn onboard_route_creates_merchant_when_notifier_is_offline() {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(MerchantOnboardingService::new(
        repository.clone(),
        Arc::new(OfflineNotifier),
        ScoringConfig::default(),
    ));
    let router = onboarding_router(service);

    let response = router
        .oneshot(json_request("POST", "/api/v1/merchants", &submission_json()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let merchant_id = payload["merchant_id"].as_str().expect("merchant id");
    let records = repository.records.lock().expect("lock");
    assert_eq!(records.len(), 1);
    assert!(records.keys().any(|id| id.0 == merchant_id));
}

#[tokio::test]
async fn onboard_route_rejects_invalid_fico() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let mut body = submission_json();
    body["fico_score"] = json!(200);

    let response = router
        .oneshot(json_request("POST", "/api/v1/merchants", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("fico_score"));
}

#[tokio::test]
async fn onboard_route_rejects_non_numeric_fico() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let mut body = submission_json();
    body["fico_score"] = json!("excellent");

    let response = router
        .oneshot(json_request("POST", "/api/v1/merchants", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn score_route_applies_defaults_for_missing_fields() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);
    let body = json!({
        "name": "Spore Supply",
        "industry": "Psilocybin",
        "annual_income": 95000,
        "fico_score": 720,
    });

    let response = router
        .oneshot(json_request("POST", "/api/v1/score", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["heat_score"], 90);
    assert_eq!(payload["explanation"]["industry_risk_penalty"], 1);
    let tags: Vec<&str> = payload["risk_tags"]
        .as_array()
        .expect("tags array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(tags.contains(&"psilocybin"));
    assert!(tags.contains(&"low_avg_balance"));
    assert!(payload.get("limit_suggestion").is_some());
    assert!(repository.records.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn merchant_route_returns_history() {
    let (service, _, _) = build_service();
    let record = service.onboard(submission()).expect("onboarding succeeds");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get(format!(
                "/api/v1/merchants/{}",
                record.profile.merchant_id.0
            ))
            .body(Body::empty())
            .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["merchant"]["name"], "Northwind Outfitters");
    assert_eq!(payload["scores"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn merchant_route_returns_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/merchants/mer-404")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rescore_route_updates_decision() {
    let (service, _, _) = build_service();
    let record = service.onboard(submission()).expect("onboarding succeeds");
    let router = router_with_service(service);
    let mut body = submission_json();
    body["fico_score"] = json!(560);

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/merchants/{}/rescore", record.profile.merchant_id.0),
            &body,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "rejected");
    assert_eq!(payload["latest_score"]["score"], 0);
}

#[tokio::test]
async fn list_route_honours_paging() {
    let (service, _, _) = build_service();
    for _ in 0..3 {
        service.onboard(submission()).expect("onboarding succeeds");
    }
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/merchants?limit=2&offset=0")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
}
