use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{Value, json};

use campusnav_service_route::app;
use campusnav_service_shared::MAX_TOP_ROUTES;
use campusnav_service_shared::test_utils::{fixture_locations, test_state};

const CS: &str = fixture_locations::COMPUTER_SCIENCE;
const REGISTRY: &str = fixture_locations::REGISTRY;
const GARDEN: &str = fixture_locations::BOTANICAL_GARDEN;

fn server() -> TestServer {
    TestServer::new(app(test_state())).expect("test server")
}

fn route_distances(body: &Value) -> Vec<f64> {
    body["routes"]
        .as_array()
        .expect("routes array")
        .iter()
        .map(|r| r["total_distance"].as_f64().expect("distance"))
        .collect()
}

fn assert_sorted(distances: &[f64]) {
    assert!(
        distances.windows(2).all(|w| w[0] <= w[1] + 1e-9),
        "not sorted: {:?}",
        distances
    );
}

#[tokio::test]
async fn listings_are_sorted_and_counted() {
    let server = server();

    let response = server.get("/api/v1/locations").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 16);
    assert_eq!(body["content_type"], "application/json");
    let names: Vec<&str> = body["names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let body: Value = server.get("/api/v1/categories").await.json();
    assert_eq!(
        body["names"],
        json!(["academic", "administrative", "facility", "landmark"])
    );

    let body: Value = server.get("/api/v1/landmarks").await.json();
    assert!(body["names"].as_array().unwrap().contains(&json!("Library")));
}

#[tokio::test]
async fn shortest_route_has_presentation_fields() {
    let response = server()
        .get("/api/v1/shortest")
        .add_query_param("start", CS)
        .add_query_param("end", REGISTRY)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["path"], json!([CS, REGISTRY]));
    assert_eq!(body["estimated_minutes"], 6);
    assert_eq!(body["algorithm"], "Dijkstra's Algorithm");
    assert_eq!(body["traffic"], "moderate");
    assert_eq!(body["formatted_distance"], "400 m");
    assert_eq!(body["formatted_time"], "6 min");
}

#[tokio::test]
async fn optimal_never_beats_shortest() {
    let server = server();
    let shortest: Value = server
        .get("/api/v1/shortest")
        .add_query_param("start", CS)
        .add_query_param("end", GARDEN)
        .await
        .json();
    let optimal: Value = server
        .get("/api/v1/optimal")
        .add_query_param("start", CS)
        .add_query_param("end", GARDEN)
        .await
        .json();

    assert_eq!(optimal["algorithm"], "A* Algorithm");
    assert!(
        optimal["total_distance"].as_f64().unwrap()
            >= shortest["total_distance"].as_f64().unwrap() - 1e-9
    );
}

#[tokio::test]
async fn unknown_location_is_a_problem_with_suggestions() {
    let response = server()
        .get("/api/v1/shortest")
        .add_query_param("start", "Registy")
        .add_query_param("end", GARDEN)
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("walk-1"),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["type"], "/problems/unknown-location");
    assert_eq!(body["instance"], "walk-1");
    assert!(body["detail"].as_str().unwrap().contains("Registry"));
}

#[tokio::test]
async fn missing_parameters_are_bad_requests() {
    let server = server();

    let response = server
        .get("/api/v1/shortest")
        .add_query_param("start", CS)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["type"], "/problems/invalid-request");

    let response = server
        .get("/api/v1/top")
        .add_query_param("start", CS)
        .add_query_param("end", GARDEN)
        .add_query_param("count", MAX_TOP_ROUTES + 1)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/traffic").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_route_selects_algorithm() {
    let server = server();

    let response = server
        .post("/api/v1/route")
        .json(&json!({"start": CS, "end": GARDEN, "algorithm": "optimal"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["algorithm"], "A* Algorithm");

    let response = server
        .post("/api/v1/route")
        .json(&json!({"start": CS, "end": GARDEN}))
        .await;
    let body: Value = response.json();
    assert_eq!(body["algorithm"], "Dijkstra's Algorithm");

    let response = server
        .post("/api/v1/route")
        .json(&json!({"start": CS, "end": GARDEN, "algorithm": "teleport"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn top_routes_are_distinct_and_ordered() {
    let response = server()
        .get("/api/v1/top")
        .add_query_param("start", CS)
        .add_query_param("end", GARDEN)
        .add_query_param("count", 4)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let routes = body["routes"].as_array().unwrap();
    assert!(!routes.is_empty() && routes.len() <= 4);
    assert_eq!(routes[0]["algorithm"], "Dijkstra's Algorithm");
    assert_sorted(&route_distances(&body));

    let mut paths: Vec<&Value> = routes.iter().map(|r| &r["path"]).collect();
    paths.dedup();
    assert_eq!(paths.len(), routes.len());
}

#[tokio::test]
async fn landmark_routes_pass_through_landmark() {
    let response = server()
        .get("/api/v1/landmarks/Library")
        .add_query_param("start", CS)
        .add_query_param("end", GARDEN)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let routes = body["routes"].as_array().unwrap();
    assert!(!routes.is_empty());
    for route in routes {
        assert!(route["path"].as_array().unwrap().contains(&json!("Balme Library")));
        assert_eq!(route["description"], "Route passing through Library");
    }
}

#[tokio::test]
async fn category_routes_are_capped() {
    let response = server()
        .get("/api/v1/category/academic")
        .add_query_param("start", REGISTRY)
        .add_query_param("end", GARDEN)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let count = body["count"].as_u64().unwrap();
    assert!(count > 0 && count <= 3);
    assert_sorted(&route_distances(&body));
}

#[tokio::test]
async fn search_with_unknown_names_is_empty() {
    let response = server()
        .get("/api/v1/search")
        .add_query_param("start", "Nowhere")
        .add_query_param("end", GARDEN)
        .add_query_param("term", "bank")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 0);
    assert_eq!(body["routes"], json!([]));
}

#[tokio::test]
async fn search_is_bounded() {
    let response = server()
        .get("/api/v1/search")
        .add_query_param("start", CS)
        .add_query_param("end", GARDEN)
        .add_query_param("term", "lab")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["count"].as_u64().unwrap() <= 5);
    assert_sorted(&route_distances(&body));
}

#[tokio::test]
async fn traffic_reports_condition() {
    let response = server()
        .get("/api/v1/traffic")
        .add_query_param("location", REGISTRY)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["location"], REGISTRY);
    assert_eq!(body["condition"], "moderate");
    assert_eq!(body["multiplier"], 1.2);
}

#[tokio::test]
async fn summary_and_health() {
    let server = server();

    let body: Value = server.get("/api/v1/summary").await.json();
    assert_eq!(body["locations"], 16);
    assert_eq!(body["categories"], 4);
    assert_eq!(body["health"], "/health/ready");

    server.get("/health/live").await.assert_status_ok();
    let ready: Value = server.get("/health/ready").await.json();
    assert_eq!(ready["status"], "ok");
    assert_eq!(ready["locations_loaded"], 16);

    server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn metrics_path_is_configurable() {
    let server = TestServer::new(campusnav_service_route::app_with_metrics_path(
        test_state(),
        "/internal/metrics",
    ))
    .expect("test server");

    server.get("/internal/metrics").await.assert_status_ok();
    server
        .get("/metrics")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
