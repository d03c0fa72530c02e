mod common;

use std::collections::HashSet;

use campusnav_lib::{
    all_pairs_shortest_paths, optimal_path, path_distance, paths_through_landmark, shortest_path,
    top_routes,
};
use common::{campus_graph, diamond_graph, planar_grid};

// The all-pairs matrix sums `d(i,k) + d(k,j)` while `path_distance` sums
// edges left to right, so fractional kilometre weights can differ in the last
// bits. Exact comparisons live on `planar_grid`, whose sums are exact.
const TOLERANCE: f64 = 1e-9;

fn names(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

#[test]
fn identity_routes_have_zero_distance() {
    let graph = campus_graph();
    for name in graph.location_names() {
        let expected = vec![name.to_string()];
        assert_eq!(shortest_path(&graph, name, name), Some(expected.clone()));
        assert_eq!(optimal_path(&graph, name, name), Some(expected.clone()));
        assert_eq!(path_distance(&graph, &expected), 0.0);
    }
}

#[test]
fn dijkstra_is_optimal_on_campus() {
    let graph = campus_graph();
    let matrix = all_pairs_shortest_paths(&graph);

    for from in graph.location_names() {
        for to in graph.location_names() {
            let expected = matrix.get(from, to);
            let path = shortest_path(&graph, from, to).expect("campus is connected");
            let actual = path_distance(&graph, &path);
            assert!(
                (actual - expected).abs() < TOLERANCE,
                "{from} -> {to}: {actual} vs {expected}"
            );
        }
    }
}

#[test]
fn heuristic_search_matches_dijkstra_cost() {
    let graph = campus_graph();
    for from in graph.location_names() {
        for to in graph.location_names() {
            let dijkstra = shortest_path(&graph, from, to).expect("reachable");
            let a_star = optimal_path(&graph, from, to).expect("reachable");
            assert_eq!(a_star.first().map(String::as_str), Some(from));
            assert_eq!(a_star.last().map(String::as_str), Some(to));
            let delta = path_distance(&graph, &dijkstra) - path_distance(&graph, &a_star);
            assert!(delta.abs() < TOLERANCE, "{from} -> {to} differs by {delta}");
        }
    }
}

#[test]
fn dijkstra_is_exactly_optimal_on_planar_grid() {
    let graph = planar_grid(6);
    let matrix = all_pairs_shortest_paths(&graph);

    for from in graph.location_names() {
        for to in graph.location_names() {
            let path = shortest_path(&graph, from, to).expect("grid is connected");
            assert_eq!(path_distance(&graph, &path), matrix.get(from, to), "{from} -> {to}");
        }
    }
}

#[test]
fn heuristic_search_matches_dijkstra_on_planar_grid() {
    let graph = planar_grid(6);
    let matrix = all_pairs_shortest_paths(&graph);

    for from in graph.location_names() {
        for to in graph.location_names() {
            let dijkstra = shortest_path(&graph, from, to).expect("reachable");
            let a_star = optimal_path(&graph, from, to).expect("reachable");
            assert_eq!(a_star.first().map(String::as_str), Some(from));
            assert_eq!(a_star.last().map(String::as_str), Some(to));
            assert_eq!(
                path_distance(&graph, &a_star),
                path_distance(&graph, &dijkstra),
                "{from} -> {to}"
            );
            assert_eq!(path_distance(&graph, &a_star), matrix.get(from, to));
        }
    }
}

#[test]
fn grid_corner_to_corner_cost() {
    let graph = planar_grid(3);
    let matrix = all_pairs_shortest_paths(&graph);
    // Two diagonals from (0,0) through (1,1) to (2,2).
    assert_eq!(matrix.get("r0c0", "r2c2"), 3.0);
    let path = optimal_path(&graph, "r0c0", "r2c2").expect("reachable");
    assert_eq!(path_distance(&graph, &path), 3.0);
}

#[test]
fn unknown_names_degrade_to_empty_results() {
    let graph = campus_graph();
    let known = "Registry";
    for (start, goal) in [("Atlantis", known), (known, "Atlantis"), ("", known)] {
        assert_eq!(shortest_path(&graph, start, goal), None);
        assert_eq!(optimal_path(&graph, start, goal), None);
        assert!(paths_through_landmark(&graph, start, goal, "Library").is_empty());
        assert!(top_routes(&graph, start, goal, 3).is_empty());
    }
}

#[test]
fn all_pairs_matrix_is_symmetric_and_metric() {
    let graph = campus_graph();
    let matrix = all_pairs_shortest_paths(&graph);
    let nodes = matrix.locations();
    assert_eq!(nodes.len(), graph.len());

    for i in nodes {
        assert_eq!(matrix.get(i, i), 0.0);
        for j in nodes {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            for k in nodes {
                assert!(matrix.get(i, k) + matrix.get(k, j) + TOLERANCE >= matrix.get(i, j));
            }
        }
    }
}

#[test]
fn all_pairs_paths_follow_edges() {
    let graph = campus_graph();
    let matrix = all_pairs_shortest_paths(&graph);
    let path = matrix
        .path("Computer Science Department", "Botanical Garden")
        .expect("reachable");
    let distance = path_distance(&graph, &path);
    assert!(
        (distance - matrix.get("Computer Science Department", "Botanical Garden")).abs()
            < TOLERANCE
    );
}

#[test]
fn top_routes_are_bounded_unique_and_sorted() {
    let graph = campus_graph();
    let start = "Computer Science Department";
    let goal = "Botanical Garden";

    for count in [1, 3, 5, 50] {
        let routes = top_routes(&graph, start, goal, count);
        assert!(!routes.is_empty());
        assert!(routes.len() <= count);

        let unique: HashSet<_> = routes.iter().collect();
        assert_eq!(unique.len(), routes.len());

        let distances: Vec<f64> = routes.iter().map(|p| path_distance(&graph, p)).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(routes[0], shortest_path(&graph, start, goal).unwrap());
    }
    assert!(top_routes(&graph, start, goal, 0).is_empty());
}

#[test]
fn diamond_scenario() {
    let graph = diamond_graph();
    let ab = shortest_path(&graph, "A", "B").unwrap();
    assert_eq!(ab, names(&["A", "B"]));
    assert_eq!(path_distance(&graph, &ab), 10.0);

    let ad = shortest_path(&graph, "A", "D").unwrap();
    assert_eq!(ad, names(&["A", "B", "D"]));
    assert_eq!(path_distance(&graph, &ad), 22.0);
}

#[test]
fn unmatched_landmark_falls_back_to_shortest() {
    let graph = campus_graph();
    let start = "Registry";
    let goal = "Cafeteria";
    let routes = paths_through_landmark(&graph, start, goal, "Observatory");
    assert_eq!(routes, vec![shortest_path(&graph, start, goal).unwrap()]);

    let mut isolated = diamond_graph();
    isolated.add_location(campusnav_lib::Location::new("E", 0.0, 0.0));
    assert!(paths_through_landmark(&isolated, "A", "E", "Observatory").is_empty());
}

#[test]
fn landmark_routes_visit_a_matching_location() {
    let graph = campus_graph();
    let routes = paths_through_landmark(&graph, "Registry", "Cafeteria", "Library");
    assert!(!routes.is_empty());
    for route in &routes {
        assert!(route.iter().any(|name| name == "Balme Library"));
        assert_eq!(route.first().map(String::as_str), Some("Registry"));
        assert_eq!(route.last().map(String::as_str), Some("Cafeteria"));
    }
}
