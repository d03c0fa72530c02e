//! Campus navigation library entry points.
//!
//! This crate loads a campus topology into an in-memory graph, runs the path
//! search algorithms over it, and turns raw paths into annotated routes with
//! traffic-adjusted arrival estimates. Higher-level consumers (CLI, HTTP
//! service) should only depend on the functions exported here instead of
//! reimplementing behavior.

#![deny(warnings)]

pub mod error;
pub mod graph;
pub mod navigator;
pub mod path;
pub mod routing;
pub mod topology;
pub mod traffic;

#[cfg(test)]
mod test_helpers;

pub use error::{Error, Result};
pub use graph::{Coordinates, Edge, Graph, Location};
pub use navigator::{Navigator, NavigatorConfig, CATEGORY_ROUTE_LIMIT, SEARCH_ROUTE_LIMIT};
pub use path::{
    all_pairs_shortest_paths, optimal_path, path_distance, paths_through_category,
    paths_through_landmark, shortest_path, top_routes, Detour, DistanceMatrix,
};
pub use routing::{Route, RouteAlgorithm, RouteComposer, RouteKey};
pub use topology::{build_graph, load_topology, ConnectionSpec, LocationSpec, Topology};
pub use traffic::{
    estimate_walking_minutes, StaticTrafficAdjuster, TrafficAdjuster, TrafficCondition,
    WalkingSpeed,
};
