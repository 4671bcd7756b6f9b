use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{MerchantId, OnboardingSubmission};
use super::repository::{
    DecisionNotifier, MerchantRepository, MerchantSummaryView, RepositoryError,
};
use super::service::{MerchantOnboardingService, OnboardingServiceError};

const DEFAULT_PAGE_SIZE: usize = 100;

/// Router builder exposing HTTP endpoints for onboarding and scoring.
pub fn onboarding_router<R, N>(service: Arc<MerchantOnboardingService<R, N>>) -> Router
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/merchants",
            post(onboard_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route(
            "/api/v1/merchants/:merchant_id",
            get(merchant_handler::<R, N>),
        )
        .route(
            "/api/v1/merchants/:merchant_id/rescore",
            post(rescore_handler::<R, N>),
        )
        .route("/api/v1/score", post(score_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageParams {
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

pub(crate) async fn onboard_handler<R, N>(
    State(service): State<Arc<MerchantOnboardingService<R, N>>>,
    axum::Json(submission): axum::Json<OnboardingSubmission>,
) -> Response
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    match service.onboard(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.summary_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rescore_handler<R, N>(
    State(service): State<Arc<MerchantOnboardingService<R, N>>>,
    Path(merchant_id): Path<String>,
    axum::Json(submission): axum::Json<OnboardingSubmission>,
) -> Response
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    match service.rescore(&MerchantId(merchant_id), submission) {
        Ok(record) => (StatusCode::OK, axum::Json(record.summary_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn merchant_handler<R, N>(
    State(service): State<Arc<MerchantOnboardingService<R, N>>>,
    Path(merchant_id): Path<String>,
) -> Response
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    match service.get(&MerchantId(merchant_id)) {
        Ok(record) => {
            let payload = json!({
                "merchant": record.summary_view(),
                "profile": record.profile,
                "scores": record.scores,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<MerchantOnboardingService<R, N>>>,
    Query(params): Query<PageParams>,
) -> Response
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0);
    match service.list(limit, offset) {
        Ok(records) => {
            let views: Vec<MerchantSummaryView> =
                records.iter().map(|record| record.summary_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<Arc<MerchantOnboardingService<R, N>>>,
    axum::Json(submission): axum::Json<OnboardingSubmission>,
) -> Response
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    match service.quote(&submission) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: OnboardingServiceError) -> Response {
    let status = match &err {
        OnboardingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OnboardingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        OnboardingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        OnboardingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
