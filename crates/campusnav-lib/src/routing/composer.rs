use std::collections::HashSet;

use crate::graph::{compare_distance, Graph};
use crate::path::path_distance;
use crate::traffic::{TrafficAdjuster, WalkingSpeed};

use super::{Route, RouteKey};

/// Builds [`Route`] values from raw node sequences.
///
/// Borrows the graph and traffic source for the duration of one query.
pub struct RouteComposer<'a> {
    graph: &'a Graph,
    traffic: &'a dyn TrafficAdjuster,
    speed: WalkingSpeed,
}

impl<'a> RouteComposer<'a> {
    pub fn new(graph: &'a Graph, traffic: &'a dyn TrafficAdjuster, speed: WalkingSpeed) -> Self {
        Self {
            graph,
            traffic,
            speed,
        }
    }

    /// Enrich `path` with distance, traffic-adjusted ETA, and landmarks.
    pub fn build_route(
        &self,
        path: Vec<String>,
        algorithm: impl Into<String>,
        description: impl Into<String>,
    ) -> Route {
        let total_distance = path_distance(self.graph, &path);
        let base_minutes = self.speed.minutes_for(total_distance);
        let traffic = self
            .traffic
            .condition_for(path.first().map(String::as_str).unwrap_or_default());
        let estimated_minutes = self.traffic.adjust(base_minutes, traffic);
        let landmarks = self.landmarks_along(&path);

        Route {
            path,
            total_distance,
            estimated_minutes,
            landmarks,
            algorithm: algorithm.into(),
            description: description.into(),
            traffic,
        }
    }

    /// Landmark tags of every traversed location, first occurrence wins.
    fn landmarks_along(&self, path: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        path.iter()
            .filter_map(|name| self.graph.location(name))
            .flat_map(|location| location.landmarks.iter())
            .filter(|tag| seen.insert(tag.as_str()))
            .cloned()
            .collect()
    }
}

/// Drop routes whose node sequence was already seen, keeping the first.
pub fn deduplicate(routes: Vec<Route>) -> Vec<Route> {
    let mut seen: HashSet<RouteKey> = HashSet::new();
    routes
        .into_iter()
        .filter(|route| seen.insert(route.key()))
        .collect()
}

/// Stable ascending sort by total distance.
pub fn rank_by_distance(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by(|a, b| compare_distance(a.total_distance, b.total_distance));
    routes
}
