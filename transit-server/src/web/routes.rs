//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, warn};

use crate::feed::FeedError;
use crate::planner::{PlanError, Planner};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/route/plan", get(plan_route))
        .route("/api/stops/search", get(search_stops))
        .route("/api/stops/:id/estimates", get(stop_estimates))
        .route("/api/lines/search", get(search_lines))
        .with_state(state)
}

/// Health check with cache diagnostics.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let estimates_age_secs = state.estimates.age().await.map(|age| age.as_secs());

    Json(HealthResponse {
        status: "ok",
        cached_sequences: state.feed.cache_entry_count(),
        estimates_age_secs,
    })
}

/// Plan a route between two stop ids.
async fn plan_route(
    State(state): State<AppState>,
    Query(req): Query<PlanRouteRequest>,
) -> Result<Json<PlanRouteResponse>, AppError> {
    let (origin, destination) = req
        .validate()
        .map_err(|message| AppError::BadRequest { message })?;

    let planner = Planner::new(state.feed.as_ref(), &state.estimates, &state.config);
    let plan = planner.plan_route(origin, destination).await?;

    Ok(Json(plan.into()))
}

/// Search stops by name, in the feed's ranking order.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<StopSearchResponse>, AppError> {
    let query = req.q.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest {
            message: "query must not be empty".to_string(),
        });
    }

    let limit = req.limit.unwrap_or(10).clamp(1, 50);
    let stops = state.feed.client().search_stops(query, limit).await?;

    Ok(Json(StopSearchResponse { stops }))
}

/// Live estimates at one stop.
async fn stop_estimates(
    State(state): State<AppState>,
    Path(stop_id): Path<String>,
) -> Result<Json<StopEstimatesResponse>, AppError> {
    let stop_id = stop_id.trim().to_string();
    if stop_id.is_empty() {
        return Err(AppError::BadRequest {
            message: "stop id must not be empty".to_string(),
        });
    }

    let estimates = state.feed.client().estimates_by_stop(&stop_id).await?;

    Ok(Json(StopEstimatesResponse { stop_id, estimates }))
}

/// Search lines by label or name.
async fn search_lines(
    State(state): State<AppState>,
    Query(req): Query<LineSearchRequest>,
) -> Result<Json<LineSearchResponse>, AppError> {
    let lines = state
        .feed
        .client()
        .search_lines(req.q.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(LineSearchResponse { lines }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message } => {
                warn!(%status, %message, "rejected request");
                message
            }
            AppError::Upstream { message } => {
                error!(%status, %message, "upstream feed failure");
                message
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedFeedClient};
    use crate::feed::{FeedClient, FeedConfig};
    use crate::planner::PlannerConfig;

    fn offline_state() -> AppState {
        // Unroutable base URL: any request would fail.
        let config = FeedConfig::default().with_base_url("http://127.0.0.1:9");
        let client = FeedClient::new(config).unwrap();
        AppState::new(
            CachedFeedClient::new(client, &CacheConfig::default()),
            PlannerConfig::default(),
        )
    }

    #[tokio::test]
    async fn health_reports_empty_caches() {
        let Json(health) = health(State(offline_state())).await;

        assert_eq!(health.status, "ok");
        assert_eq!(health.cached_sequences, 0);
        assert_eq!(health.estimates_age_secs, None);
    }

    #[tokio::test]
    async fn missing_destination_is_a_json_bad_request() {
        let uri: axum::http::Uri = "/api/route/plan?origin=539".parse().unwrap();
        let query = Query::<PlanRouteRequest>::try_from_uri(&uri).unwrap();

        let err = plan_route(State(offline_state()), query).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("required"));
    }

    #[test]
    fn feed_errors_map_to_bad_gateway() {
        let err = AppError::from(FeedError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn plan_errors_keep_fetch_context() {
        let err = AppError::from(PlanError::Fetch {
            what: "origin stop sequence",
            source: FeedError::Api {
                status: 404,
                message: "gone".to_string(),
            },
        });

        let AppError::Upstream { message } = &err else {
            panic!("expected upstream error, got {err:?}");
        };
        assert!(message.contains("origin stop sequence"));
        assert!(message.contains("404"));
    }

    #[test]
    fn bad_request_status() {
        let err = AppError::BadRequest {
            message: "nope".to_string(),
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
