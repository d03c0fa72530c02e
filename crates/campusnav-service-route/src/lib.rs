//! Campus walking-route HTTP microservice.
//!
//! # Endpoints
//!
//! All routing endpoints live under `/api/v1`:
//!
//! - `GET /locations`, `GET /landmarks`, `GET /categories` - Listings
//! - `GET /shortest?start&end` - Dijkstra route
//! - `GET /optimal?start&end` - A* route
//! - `POST /route` - Single route with `{start, end, algorithm}`
//! - `GET /landmarks/{landmark}?start&end` - Routes through a landmark
//! - `GET /top?start&end&count` - Top-K distinct routes
//! - `GET /category/{category}?start&end` - Routes through a category
//! - `GET /search?start&end&term` - Combined search
//! - `GET /traffic?location` - Traffic condition at a location
//! - `GET /summary` - Counts of what is loaded
//!
//! Plus `GET /health/live`, `GET /health/ready` and `GET /metrics` (path
//! configurable through `METRICS_PATH`).
//!
//! Single-route endpoints answer 404 problem details when a name is unknown
//! or no route exists. Multi-route endpoints always answer 200, possibly
//! with an empty list.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use campusnav_lib::{Navigator, Route, RouteAlgorithm, TrafficCondition};
use campusnav_service_shared::{
    AppState, EndpointQuery, MetricsLayer, ProblemDetails, RouteRequest, SearchQuery,
    ServiceResponse, TopRoutesQuery, TrafficQuery, Validate, extract_or_generate_request_id,
    from_lib_error, health_live, health_ready, metrics_handler, record_locations_listed,
    record_route_calculated, record_route_failed, record_route_hops, record_routes_returned,
};

const SERVICE: &str = "route";

/// A route plus its human-readable renderings.
#[derive(Debug, Serialize)]
pub struct RouteView {
    #[serde(flatten)]
    pub route: Route,
    pub formatted_path: String,
    pub formatted_distance: String,
    pub formatted_time: String,
}

impl From<Route> for RouteView {
    fn from(route: Route) -> Self {
        Self {
            formatted_path: route.formatted_path(),
            formatted_distance: route.formatted_distance(),
            formatted_time: route.formatted_time(),
            route,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub count: usize,
    pub routes: Vec<RouteView>,
}

impl RoutesResponse {
    fn new(routes: Vec<Route>) -> Self {
        Self {
            count: routes.len(),
            routes: routes.into_iter().map(RouteView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NamesResponse {
    pub count: usize,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TrafficResponse {
    pub location: String,
    pub condition: TrafficCondition,
    pub multiplier: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub service: String,
    pub version: String,
    pub locations: usize,
    pub connections: usize,
    pub landmarks: usize,
    pub categories: usize,
    pub health: String,
}

/// HTTP response: a payload or an RFC 9457 problem.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

impl<T> Response<T> {
    fn ok(data: T) -> Self {
        Response::Success(ServiceResponse::new(data))
    }
}

/// Build the service router over `state` with metrics on `/metrics`.
pub fn app(state: AppState) -> Router {
    app_with_metrics_path(state, "/metrics")
}

/// Build the service router, mounting the Prometheus endpoint at `metrics_path`.
pub fn app_with_metrics_path(state: AppState, metrics_path: &str) -> Router {
    let api = Router::new()
        .route("/locations", get(locations_handler))
        .route("/landmarks", get(landmarks_handler))
        .route("/categories", get(categories_handler))
        .route("/shortest", get(shortest_handler))
        .route("/optimal", get(optimal_handler))
        .route("/route", post(route_handler))
        .route("/landmarks/{landmark}", get(landmark_routes_handler))
        .route("/top", get(top_routes_handler))
        .route("/category/{category}", get(category_routes_handler))
        .route("/search", get(search_handler))
        .route("/traffic", get(traffic_handler))
        .route("/summary", get(summary_handler));

    Router::new()
        .nest("/api/v1", api)
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(MetricsLayer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn names(listing: &str, names: Vec<String>) -> Response<NamesResponse> {
    record_locations_listed(listing);
    Response::ok(NamesResponse {
        count: names.len(),
        names,
    })
}

async fn locations_handler(State(state): State<AppState>) -> Response<NamesResponse> {
    names("locations", state.navigator().all_locations())
}

async fn landmarks_handler(State(state): State<AppState>) -> Response<NamesResponse> {
    names("landmarks", state.navigator().all_landmarks())
}

async fn categories_handler(State(state): State<AppState>) -> Response<NamesResponse> {
    names("categories", state.navigator().all_categories())
}

/// Resolve both ends and compute one route, mapping failures to problems.
fn single_route(
    navigator: &Navigator,
    start: &str,
    end: &str,
    algorithm: RouteAlgorithm,
    request_id: &str,
) -> Response<RouteView> {
    for name in [start, end] {
        if let Err(e) = navigator.resolve(name) {
            record_route_failed("unknown_location", SERVICE);
            warn!(request_id, location = name, "unknown location");
            return Response::Error(from_lib_error(&e, request_id));
        }
    }

    match navigator.find_route(start, end, algorithm) {
        Some(route) => {
            let slug = algorithm.to_string();
            record_route_calculated(&slug, SERVICE);
            record_route_hops(route.hop_count(), &slug);
            info!(
                request_id,
                start,
                end,
                %algorithm,
                distance_km = route.total_distance,
                minutes = route.estimated_minutes,
                "route computed"
            );
            Response::ok(RouteView::from(route))
        }
        None => {
            record_route_failed("no_route", SERVICE);
            Response::Error(ProblemDetails::route_not_found(start, end, request_id))
        }
    }
}

async fn shortest_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EndpointQuery>,
) -> Response<RouteView> {
    endpoint_route(&state, &headers, &query, RouteAlgorithm::Dijkstra)
}

async fn optimal_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EndpointQuery>,
) -> Response<RouteView> {
    endpoint_route(&state, &headers, &query, RouteAlgorithm::AStar)
}

fn endpoint_route(
    state: &AppState,
    headers: &HeaderMap,
    query: &EndpointQuery,
    algorithm: RouteAlgorithm,
) -> Response<RouteView> {
    let request_id = extract_or_generate_request_id(headers);
    if let Err(problem) = query.validate(request_id.as_str()) {
        record_route_failed("validation_error", SERVICE);
        return Response::Error(*problem);
    }
    single_route(
        &state.navigator(),
        &query.start,
        &query.end,
        algorithm,
        request_id.as_str(),
    )
}

async fn route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RouteRequest>,
) -> Response<RouteView> {
    let request_id = extract_or_generate_request_id(&headers);
    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error", SERVICE);
        return Response::Error(*problem);
    }
    single_route(
        &state.navigator(),
        &request.start,
        &request.end,
        request.route_algorithm(),
        request_id.as_str(),
    )
}

fn routes(query_type: &str, routes: Vec<Route>) -> Response<RoutesResponse> {
    record_routes_returned(routes.len(), query_type);
    Response::ok(RoutesResponse::new(routes))
}

async fn landmark_routes_handler(
    State(state): State<AppState>,
    Path(landmark): Path<String>,
    headers: HeaderMap,
    Query(query): Query<EndpointQuery>,
) -> Response<RoutesResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    if let Err(problem) = query.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }
    let found = state
        .navigator()
        .find_by_landmark(&query.start, &query.end, &landmark);
    routes("landmark", found)
}

async fn top_routes_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TopRoutesQuery>,
) -> Response<RoutesResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    if let Err(problem) = query.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }
    let found = state
        .navigator()
        .find_top(&query.start, &query.end, query.count);
    routes("top", found)
}

async fn category_routes_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
    headers: HeaderMap,
    Query(query): Query<EndpointQuery>,
) -> Response<RoutesResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    if let Err(problem) = query.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }
    let found = state
        .navigator()
        .find_by_category(&query.start, &query.end, &category);
    routes("category", found)
}

async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response<RoutesResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    if let Err(problem) = query.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }
    let found = state
        .navigator()
        .search(&query.start, &query.end, &query.term);
    routes("search", found)
}

async fn traffic_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TrafficQuery>,
) -> Response<TrafficResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    if let Err(problem) = query.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }
    let condition = state.navigator().traffic_condition(&query.location);
    Response::ok(TrafficResponse {
        location: query.location,
        condition,
        multiplier: condition.multiplier(),
    })
}

async fn summary_handler(State(state): State<AppState>) -> Response<SummaryResponse> {
    let navigator = state.navigator();
    Response::ok(SummaryResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        locations: navigator.graph().len(),
        connections: navigator.graph().edge_count(),
        landmarks: navigator.all_landmarks().len(),
        categories: navigator.all_categories().len(),
        health: "/health/ready".to_string(),
    })
}
