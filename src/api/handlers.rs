//! HTTP request handlers for the Distribution Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_from_store, free_capacity_from_store};
use crate::error::EngineError;

use super::request::{CalculationRequest, FreeCapacityQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is serving requests.
    pub status: String,
}

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/profiles/:id/free-capacity", get(free_capacity_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the distribution result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let range = match request.date_range().and_then(|range| {
        range.ensure_within(state.settings().max_query_days)?;
        Ok(range)
    }) {
        Ok(range) => range,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Rejected query range"
            );
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let start_time = Instant::now();
    match calculate_from_store(state.store(), range, request.data_mode, &request.filters) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                start = %range.start(),
                end = %range.end(),
                data_mode = ?request.data_mode,
                profiles_count = result.profiles.len(),
                warnings_count = result.warnings.len(),
                total_wage = %result.global_total.wage,
                duration_us = duration.as_micros(),
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /profiles/{id}/free-capacity endpoint.
async fn free_capacity_handler(
    State(state): State<AppState>,
    profile_id: Result<Path<u64>, PathRejection>,
    query: Result<Query<FreeCapacityQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let Ok(Path(profile_id)) = profile_id else {
        warn!(correlation_id = %correlation_id, "Invalid profile id in path");
        return ApiErrorResponse::bad_request(ApiError::validation_error(
            "Profile id must be a non-negative integer",
        ))
        .into_response();
    };

    info!(
        correlation_id = %correlation_id,
        profile_id,
        "Processing free-capacity request"
    );

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Query string error"
            );
            return ApiErrorResponse::bad_request(ApiError::validation_error(
                rejection.body_text(),
            ))
            .into_response();
        }
    };

    let start_time = Instant::now();
    let result = query.date_range().and_then(|range| {
        range.ensure_within(state.settings().max_query_days)?;
        free_capacity_from_store(state.store(), profile_id, range)
    });

    match result {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                profile_id,
                minimum_free_percentage = %result.minimum_free_percentage,
                total_free_hours = %result.total_free_hours,
                duration_us = start_time.elapsed().as_micros(),
                "Free-capacity calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            match &err {
                EngineError::ProfileNotFound { .. } => {
                    warn!(correlation_id = %correlation_id, profile_id, "Profile not found")
                }
                _ => warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Free-capacity calculation failed"
                ),
            }
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /health endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::models::{
        Allocation, CalculationResult, ContractStatus, FreeCapacityResult, PayrollRecord,
        Profile, Project, RecordKind,
    };
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_test_state() -> AppState {
        let profiles = vec![Profile {
            id: 1,
            name: "Ana Ruiz".to_string(),
            national_id: "12345678Z".to_string(),
        }];
        let records = vec![PayrollRecord {
            id: 1,
            profile_id: 1,
            kind: RecordKind::Actual,
            wage: dec("1000"),
            employer_contribution: dec("300"),
            hours: dec("80"),
            period_start: make_date("2025-01-01"),
            period_end: make_date("2025-01-10"),
            company: "Acme".to_string(),
            lower_multiplier: 1.0,
            upper_multiplier: 1.0,
        }];
        let allocations = vec![Allocation {
            id: 1,
            profile_id: 1,
            project: Project {
                id: 10,
                name: "Atlas".to_string(),
            },
            percentage: dec("50"),
            period_start: make_date("2025-01-01"),
            period_end: make_date("2025-01-05"),
            contract_status: ContractStatus::New,
        }];

        let settings = EngineSettings {
            max_query_days: 366,
            ..Default::default()
        };
        AppState::new(settings, InMemoryStore::new(profiles, records, allocations))
    }

    fn post_calculate(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let router = create_router(create_test_state());
        let body = r#"{"start_date":"2025-01-01","end_date":"2025-01-31","data_mode":"actual"}"#;

        let response = router.oneshot(post_calculate(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: CalculationResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.profiles.len(), 1);
        assert_eq!(result.global_total.wage, dec("250.00"));
        assert_eq!(result.global_total.unassigned_wage, dec("750.00"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(post_calculate("{invalid json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_data_mode_returns_validation_error() {
        let router = create_router(create_test_state());
        let body = r#"{"start_date":"2025-01-01","end_date":"2025-01-31"}"#;

        let response = router.oneshot(post_calculate(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("data_mode"));
    }

    #[tokio::test]
    async fn test_invalid_date_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{"start_date":"2025-13-01","end_date":"2025-01-31","data_mode":"actual"}"#;

        let response = router.oneshot(post_calculate(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INVALID_DATE");
        assert!(error.message.contains("start_date"));
    }

    #[tokio::test]
    async fn test_range_over_limit_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{"start_date":"2024-01-01","end_date":"2025-12-31","data_mode":"blended"}"#;

        let response = router.oneshot(post_calculate(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "RANGE_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_free_capacity_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get_request(
                "/profiles/1/free-capacity?start_date=2025-01-01&end_date=2025-01-10",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result: FreeCapacityResult =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.profile_id, 1);
        assert_eq!(result.minimum_free_percentage, dec("50"));
        assert_eq!(result.total_free_hours, dec("60.00"));
    }

    #[tokio::test]
    async fn test_free_capacity_unknown_profile_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get_request(
                "/profiles/99/free-capacity?start_date=2025-01-01&end_date=2025-01-10",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "PROFILE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_free_capacity_inverted_range_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get_request(
                "/profiles/1/free-capacity?start_date=2025-02-01&end_date=2025-01-10",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_free_capacity_missing_query_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get_request("/profiles/1/free-capacity"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_free_capacity_non_numeric_id_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get_request(
                "/profiles/ana/free-capacity?start_date=2025-01-01&end_date=2025-01-10",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let router = create_router(create_test_state());

        let response = router.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(health.status, "ok");
    }
}
