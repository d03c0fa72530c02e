//! Route planning strategies implementing the Strategy pattern.
//!
//! Each planner wraps one search function from [`crate::path`] together with
//! the provenance label and description attached to the routes it produces.

use crate::graph::Graph;
use crate::path::{optimal_path, shortest_path};

use super::{RouteAlgorithm, LABEL_A_STAR, LABEL_DIJKSTRA};

/// Trait for single-route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Provenance label attached to routes from this planner.
    fn label(&self) -> &'static str;

    /// Human-readable description attached to routes from this planner.
    fn description(&self) -> &'static str;

    /// Returns `Some(path)` if a route is found, `None` otherwise.
    fn find_path(&self, graph: &Graph, start: &str, goal: &str) -> Option<Vec<String>>;
}

/// Dijkstra planner: shortest total distance.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn label(&self) -> &'static str {
        LABEL_DIJKSTRA
    }

    fn description(&self) -> &'static str {
        "Shortest distance route using Dijkstra's algorithm"
    }

    fn find_path(&self, graph: &Graph, start: &str, goal: &str) -> Option<Vec<String>> {
        shortest_path(graph, start, goal)
    }
}

/// A* planner guided by straight-line coordinate distance.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn label(&self) -> &'static str {
        LABEL_A_STAR
    }

    fn description(&self) -> &'static str {
        "Optimal route using A* search algorithm"
    }

    fn find_path(&self, graph: &Graph, start: &str, goal: &str) -> Option<Vec<String>> {
        optimal_path(graph, start, goal)
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}
