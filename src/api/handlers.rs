//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints. Handlers
//! only translate between HTTP and [`crate::service::PayrollService`].

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{NewRunItem, PayrollRun};

use super::request::{AddItemRequest, CreateRunRequest, ListRunsQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/compute", post(compute_handler))
        .route("/runs", post(create_run_handler).get(list_runs_handler))
        .route("/runs/:run_id", get(get_run_handler))
        .route("/runs/:run_id/items", post(add_item_handler))
        .route("/runs/:run_id/items/:item_id", delete(remove_item_handler))
        .route("/runs/:run_id/recompute", post(recompute_handler))
        .route("/runs/:run_id/processing", post(begin_processing_handler))
        .route("/runs/:run_id/finalize", post(finalize_handler))
        .route("/runs/:run_id/cancel", post(cancel_handler))
        .route("/runs/:run_id/export", get(export_handler))
        .with_state(state)
}

/// Handler for POST /compute.
///
/// Previews tax and net pay for one employee without touching any run.
async fn compute_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let item: NewRunItem = request.into();
    let amounts = match state.service().compute(&item) {
        Ok(amounts) => amounts,
        Err(err) => return engine_error(correlation_id, err),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %item.employee_id,
        tax = %amounts.tax,
        net_pay = %amounts.net_pay,
        "Computed line item preview"
    );
    json_ok(StatusCode::OK, &amounts)
}

/// Handler for POST /runs.
async fn create_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing create run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    match state.service().create_run(request.into()).await {
        Ok(run) => json_ok(StatusCode::CREATED, &run),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /runs.
async fn list_runs_handler(
    State(state): State<AppState>,
    query: Result<Query<ListRunsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Bad query string");
            return ApiErrorResponse::bad_request(ApiError::validation_error(
                rejection.body_text(),
            ))
            .into_response();
        }
    };

    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(message) => {
            return ApiErrorResponse::bad_request(ApiError::validation_error(message))
                .into_response();
        }
    };
    debug!(correlation_id = %correlation_id, filter = ?filter, "Listing payroll runs");

    match state.service().list_runs(&filter).await {
        Ok(runs) => json_ok(StatusCode::OK, &runs),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /runs/:run_id.
async fn get_run_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => return path_rejection(correlation_id, rejection),
    };
    debug!(correlation_id = %correlation_id, run_id = %run_id, "Fetching payroll run");

    match state.service().get_run(run_id).await {
        Ok(run) => json_ok(StatusCode::OK, &run),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /runs/:run_id/items.
///
/// Responds only after the item is stored and the run totals recomputed.
async fn add_item_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => return path_rejection(correlation_id, rejection),
    };
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        employee_id = %request.employee_id,
        "Processing add item request"
    );
    match state
        .service()
        .add_employee_to_run(run_id, request.into())
        .await
    {
        Ok(item) => json_ok(StatusCode::CREATED, &item),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for DELETE /runs/:run_id/items/:item_id.
async fn remove_item_handler(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (run_id, item_id) = match path {
        Ok(Path(ids)) => ids,
        Err(rejection) => return path_rejection(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        item_id = %item_id,
        "Processing remove item request"
    );

    match state.service().remove_item_from_run(run_id, item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /runs/:run_id/recompute.
async fn recompute_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match extract_run_id(correlation_id, path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing recompute request");

    run_response(correlation_id, state.service().recompute_run_totals(run_id).await)
}

/// Handler for POST /runs/:run_id/processing.
async fn begin_processing_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match extract_run_id(correlation_id, path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing begin request");

    run_response(correlation_id, state.service().begin_processing(run_id).await)
}

/// Handler for POST /runs/:run_id/finalize.
async fn finalize_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match extract_run_id(correlation_id, path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing finalize request");

    run_response(correlation_id, state.service().finalize_run(run_id).await)
}

/// Handler for POST /runs/:run_id/cancel.
async fn cancel_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match extract_run_id(correlation_id, path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing cancel request");

    run_response(correlation_id, state.service().cancel_run(run_id).await)
}

/// Handler for GET /runs/:run_id/export.
async fn export_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let run_id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => return path_rejection(correlation_id, rejection),
    };
    debug!(correlation_id = %correlation_id, run_id = %run_id, "Exporting payroll run");

    match state.service().export_run(run_id).await {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.file_name),
                ),
            ],
            export.content,
        )
            .into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

fn extract_run_id(
    correlation_id: Uuid,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Uuid, Response> {
    path.map(|Path(id)| id)
        .map_err(|rejection| path_rejection(correlation_id, rejection))
}

fn run_response(correlation_id: Uuid, result: EngineResult<PayrollRun>) -> Response {
    match result {
        Ok(run) => json_ok(StatusCode::OK, &run),
        Err(err) => engine_error(correlation_id, err),
    }
}

fn json_ok<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn path_rejection(correlation_id: Uuid, rejection: PathRejection) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %rejection,
        "Invalid path parameter"
    );
    ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
        .into_response()
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
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
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayrollConfig;
    use crate::service::PayrollService;
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let service = PayrollService::new(Arc::new(InMemoryStore::new()), PayrollConfig::default());
        create_router(AppState::new(service))
    }

    async fn send(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_compute_preview() {
        let (status, body) = send(
            create_test_router(),
            "POST",
            "/compute",
            Some(json!({
                "employee_id": "E1",
                "basic_pay": "50000",
                "allowances": "5000",
                "deductions": "2000"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["tax"], "8800.00");
        assert_eq!(json["net_pay"], "44200.00");
    }

    #[tokio::test]
    async fn test_compute_overflow_returns_400() {
        let (status, body) = send(
            create_test_router(),
            "POST",
            "/compute",
            Some(json!({
                "employee_id": "E1",
                "basic_pay": "50000000000000000000000000000",
                "allowances": "50000000000000000000000000000"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_str(&body).unwrap();
        assert_eq!(error.code, "AMOUNT_OUT_OF_RANGE");
    }

    #[tokio::test]
    async fn test_status_routes_reach_lifecycle_operations() {
        let router = create_test_router();
        let (_, body) = send(
            router.clone(),
            "POST",
            "/runs",
            Some(json!({ "period_start": "2026-01-01", "period_end": "2026-01-31" })),
        )
        .await;
        let run_id = serde_json::from_str::<Value>(&body).unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let uri = format!("/runs/{}/processing", run_id);
        let (status, body) = send(router.clone(), "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["status"], "processing");

        let uri = format!("/runs/{}/cancel", run_id);
        let (status, body) = send(router.clone(), "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["status"], "cancelled");

        let uri = format!("/runs/{}/finalize", run_id);
        let (status, body) = send(router, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let error: ApiError = serde_json::from_str(&body).unwrap();
        assert_eq!(error.code, "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_status_route_with_bad_run_id_returns_400() {
        let (status, body) = send(create_test_router(), "POST", "/runs/42/finalize", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_str(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_run_returns_201_draft() {
        let (status, body) = send(
            create_test_router(),
            "POST",
            "/runs",
            Some(json!({ "period_start": "2026-01-01", "period_end": "2026-01-31" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "draft");
        assert_eq!(json["gross_pay"], "0");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/runs")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_period_returns_validation_error() {
        let (status, body) = send(
            create_test_router(),
            "POST",
            "/runs",
            Some(json!({ "period_start": "2026-01-01" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_str(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("missing field"));
    }

    #[tokio::test]
    async fn test_unknown_run_returns_404() {
        let uri = format!("/runs/{}", Uuid::new_v4());
        let (status, body) = send(create_test_router(), "GET", &uri, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ApiError = serde_json::from_str(&body).unwrap();
        assert_eq!(error.code, "RUN_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_run_id_returns_400() {
        let (status, body) = send(create_test_router(), "GET", "/runs/not-a-uuid", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_str(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_status_filter_returns_400() {
        let (status, _) = send(create_test_router(), "GET", "/runs?status=archived", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
