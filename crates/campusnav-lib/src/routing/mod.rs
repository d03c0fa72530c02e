//! Route composition module for campus pathfinding.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported single-route algorithms (Dijkstra, A*)
//! - [`Route`] - An enriched node sequence with distance, ETA, and landmarks
//! - [`RouteKey`] - Identity of a route, defined by its node sequence only
//! - [`RouteComposer`] - Turns raw paths into [`Route`] values
//!
//! # Strategy Pattern
//!
//! Single-route queries go through the [`RoutePlanner`] trait so the façade
//! can pick an algorithm at runtime without branching on it everywhere.

mod composer;
mod planner;

pub use composer::{deduplicate, rank_by_distance, RouteComposer};
pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::traffic::TrafficCondition;

/// Provenance label for Dijkstra routes.
pub const LABEL_DIJKSTRA: &str = "Dijkstra's Algorithm";
/// Provenance label for A* routes.
pub const LABEL_A_STAR: &str = "A* Algorithm";
pub const LABEL_LANDMARK: &str = "Landmark-based";
pub const LABEL_CATEGORY: &str = "Category-based";
pub const LABEL_SEARCH: &str = "Search-based";
pub const LABEL_ALTERNATIVE: &str = "Alternative Route";

/// Supported single-route algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (shortest distance).
    #[default]
    Dijkstra,
    /// A* search (heuristic guided).
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// Error returned when an algorithm name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown routing algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for RouteAlgorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the algorithm names as well as the `shortest`/`optimal`
    /// aliases used by the route endpoint.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dijkstra" | "shortest" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a_star" | "optimal" => Ok(RouteAlgorithm::AStar),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Identity of a route: two routes are the same when their node sequences
/// are identical, whatever produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(Vec<String>);

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("->"))
    }
}

/// A computed route ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Ordered location names from start to end.
    pub path: Vec<String>,
    /// Total distance in kilometres.
    pub total_distance: f64,
    /// Traffic-adjusted walking time in minutes.
    pub estimated_minutes: u64,
    /// Landmark tags along the way, in order of first encounter.
    pub landmarks: Vec<String>,
    /// Strategy that produced this route.
    pub algorithm: String,
    pub description: String,
    /// Condition at the start location used for the estimate.
    pub traffic: TrafficCondition,
}

impl Route {
    pub fn key(&self) -> RouteKey {
        RouteKey(self.path.clone())
    }

    pub fn start(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn end(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn contains_landmark(&self, landmark: &str) -> bool {
        self.landmarks.iter().any(|tag| tag == landmark)
    }

    pub fn formatted_path(&self) -> String {
        self.path.join(" → ")
    }

    /// `"1 hr 5 min"` or `"42 min"`.
    pub fn formatted_time(&self) -> String {
        let hours = self.estimated_minutes / 60;
        let minutes = self.estimated_minutes % 60;
        if hours > 0 {
            format!("{} hr {} min", hours, minutes)
        } else {
            format!("{} min", minutes)
        }
    }

    /// Kilometres with two decimals from 1 km upwards, whole metres below.
    pub fn formatted_distance(&self) -> String {
        if self.total_distance >= 1.0 {
            format!("{:.2} km", self.total_distance)
        } else {
            format!("{:.0} m", self.total_distance * 1000.0)
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.formatted_path(),
            self.formatted_distance(),
            self.formatted_time(),
            self.algorithm
        )
    }
}
