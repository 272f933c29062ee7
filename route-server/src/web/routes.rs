//! HTTP route handlers.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::planner::{QueryError, QueryOutcome, RouteQuery};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/plan", get(plan_page))
        .route("/api/places", get(list_places))
        .route("/api/routes/plan", post(plan_routes))
        .route("/api/routes/last", get(last_routes))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the planning form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    Html(
        IndexTemplate::new(&state.places, &state.defaults)
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// The named place catalog.
async fn list_places(State(state): State<AppState>) -> Json<PlacesResponse> {
    Json(PlacesResponse::from_places(&state.places))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Run a query and remember the outcome as the last result.
async fn run_query(state: &AppState, query: &RouteQuery) -> Result<Arc<QueryOutcome>, AppError> {
    let outcome = Arc::new(state.planner.plan(query).await?);
    state.last.store(Arc::clone(&outcome)).await;
    Ok(outcome)
}

fn render_results(outcome: &QueryOutcome) -> Result<Response, AppError> {
    let html = ResultsTemplate::from_outcome(outcome)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
    Ok(Html(html).into_response())
}

/// Plan from the HTML form and render the results page.
async fn plan_page(
    State(state): State<AppState>,
    Query(form): Query<PlanFormRequest>,
) -> Response {
    plan_form(&state, &form)
        .await
        .unwrap_or_else(AppError::into_html_response)
}

async fn plan_form(state: &AppState, form: &PlanFormRequest) -> Result<Response, AppError> {
    let query = form.to_query(&state.places, &state.defaults)?;
    let outcome = run_query(state, &query).await?;
    render_results(&outcome)
}

/// Plan from a JSON request.
async fn plan_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let query = req.to_query(&state.places, &state.defaults)?;
    let outcome = run_query(&state, &query).await?;

    if accepts_html(&headers) {
        render_results(&outcome)
    } else {
        Ok(Json(PlanRoutesResponse::from_outcome(&outcome)).into_response())
    }
}

/// Show the last successful result again.
async fn last_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let outcome = state.last.get().await.ok_or_else(|| AppError::NotFound {
        message: "no routes have been planned yet".to_string(),
    })?;

    if accepts_html(&headers) {
        render_results(&outcome)
    } else {
        Ok(Json(PlanRoutesResponse::from_outcome(&outcome)).into_response())
    }
}

/// Turn a handler panic into a JSON 500.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");

    let body = Json(ErrorResponse {
        error: "internal server error".to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        }
    }

    fn log(&self) {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, message = self.message(), "request failed");
        } else {
            warn!(%status, message = self.message(), "request rejected");
        }
    }

    /// Render as the HTML error page, keeping the status code.
    pub fn into_html_response(self) -> Response {
        self.log();

        let status = self.status();
        let title = match &self {
            AppError::BadRequest { .. } => "Invalid request",
            AppError::NotFound { .. } => "No routes",
            AppError::Internal { .. } => "Something went wrong",
        };
        let template = ErrorTemplate {
            title: title.to_string(),
            message: self.message().to_string(),
            details: None,
        };

        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => (status, format!("Template error: {}", e)).into_response(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::IdenticalEndpoints | QueryError::InvalidCoordinate => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            QueryError::NoRoutes => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubs::{india_air_hubs, india_rail_hubs};
    use crate::kpi::ModeModels;
    use crate::places::Places;
    use crate::planner::{Planner, QueryDefaults};
    use crate::providers::{FixtureRoadProvider, RawGeometry, RawPath};
    use axum::http::HeaderValue;

    fn state_with_paths(paths: Vec<RawPath>) -> AppState {
        let planner = Planner::new(
            Arc::new(FixtureRoadProvider::new("fixture", paths)),
            Arc::new(india_rail_hubs()),
            Arc::new(india_air_hubs()),
            ModeModels::default(),
        );
        AppState::new(planner, QueryDefaults::default(), Places::builtin())
    }

    fn road_path(distance_m: f64, duration_s: f64) -> RawPath {
        RawPath {
            distance_m,
            duration_s,
            geometry: RawGeometry::Polyline5("_p~iF~ps|U_ulLnnqC".into()),
            steps: Vec::new(),
            provider: "fixture".into(),
        }
    }

    fn state() -> AppState {
        state_with_paths(vec![road_path(8200.0, 1500.0), road_path(9100.0, 1320.0)])
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn html_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers
    }

    const ROAD_ONLY: &str = r#"{
        "origin": { "place": "Kolkata (Esplanade)" },
        "destination": { "lat": 22.5792, "lon": 88.4317 },
        "modes": ["road"]
    }"#;

    #[tokio::test]
    async fn plan_returns_ranked_routes_and_remembers_them() {
        let state = state();
        let response = plan_routes(
            State(state.clone()),
            HeaderMap::new(),
            Bytes::from_static(ROAD_ONLY.as_bytes()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let routes = json["routes"].as_array().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0]["tag"], "recommended");
        assert_eq!(routes[1]["tag"], "alternative");
        assert!(json["recommended"].is_object());

        assert!(state.last.get().await.is_some());
    }

    #[tokio::test]
    async fn identical_endpoints_are_bad_request() {
        let state = state();
        let body = r#"{
            "origin": { "place": "Kochi" },
            "destination": { "place": "kochi" }
        }"#;
        let err = plan_routes(State(state.clone()), HeaderMap::new(), Bytes::from(body))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "origin and destination are identical; choose different points"
        );
        assert!(state.last.get().await.is_none());
    }

    #[tokio::test]
    async fn no_candidates_is_not_found() {
        let state = state_with_paths(Vec::new());
        let err = plan_routes(
            State(state),
            HeaderMap::new(),
            Bytes::from_static(ROAD_ONLY.as_bytes()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_json_and_unknown_place_are_bad_request() {
        let err = plan_routes(State(state()), HeaderMap::new(), Bytes::from("{not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        let body = r#"{
            "origin": { "place": "Atlantis" },
            "destination": { "place": "Kochi" }
        }"#;
        let err = plan_routes(State(state()), HeaderMap::new(), Bytes::from(body))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest { message } => assert!(message.contains("Atlantis")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn last_result_is_404_until_a_plan_succeeds() {
        let state = state();
        let err = last_routes(State(state.clone()), HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        plan_routes(
            State(state.clone()),
            HeaderMap::new(),
            Bytes::from_static(ROAD_ONLY.as_bytes()),
        )
        .await
        .unwrap();

        let response = last_routes(State(state), html_headers()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Recommended"));
    }

    #[tokio::test]
    async fn form_plan_renders_html() {
        let form = PlanFormRequest {
            origin_place: Some("Kolkata (Esplanade)".into()),
            destination_place: Some("Salt Lake (Sector V)".into()),
            modes: Some("road".into()),
            ..Default::default()
        };
        let response = plan_page(State(state()), Query(form)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<table"));
    }

    #[tokio::test]
    async fn form_errors_render_error_page() {
        let form = PlanFormRequest {
            origin_place: Some("Kochi".into()),
            ..Default::default()
        };
        let response = plan_page(State(state()), Query(form)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Invalid request"));
    }

    #[tokio::test]
    async fn places_lists_catalog() {
        let Json(places) = list_places(State(state())).await;
        assert_eq!(places.places.len(), Places::builtin().len());
        assert_eq!(places.places[0].name, "Kolkata (Esplanade)");
    }

    #[test]
    fn panics_become_json_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn query_errors_map_to_status() {
        assert_eq!(
            AppError::from(QueryError::IdenticalEndpoints).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(QueryError::InvalidCoordinate).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(QueryError::NoRoutes).status(),
            StatusCode::NOT_FOUND
        );
    }
}
