//! Query façade composing path search, route composition, and traffic.
//!
//! A [`Navigator`] owns an immutable graph snapshot. Front ends that need to
//! reload topology build a new navigator and swap it in; nothing here mutates
//! after construction, so one navigator can serve concurrent queries.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, Location};
use crate::path::{
    all_pairs_shortest_paths, detours_through, optimal_path, paths_through_category,
    paths_through_landmark, shortest_path, top_routes, DistanceMatrix,
};
use crate::routing::{
    deduplicate, rank_by_distance, select_planner, Route, RouteAlgorithm, RouteComposer,
    LABEL_ALTERNATIVE, LABEL_A_STAR, LABEL_CATEGORY, LABEL_DIJKSTRA, LABEL_LANDMARK, LABEL_SEARCH,
};
use crate::topology::{build_graph, load_topology, Topology};
use crate::traffic::{
    StaticTrafficAdjuster, TrafficAdjuster, TrafficCondition, WalkingSpeed,
    DEFAULT_WALKING_SPEED_KMH,
};

/// Maximum number of routes returned by a category query.
pub const CATEGORY_ROUTE_LIMIT: usize = 3;
/// Maximum number of routes returned by a free-text search.
pub const SEARCH_ROUTE_LIMIT: usize = 5;
/// Maximum number of "did you mean" suggestions for an unknown name.
const SUGGESTION_LIMIT: usize = 3;

/// Environment variable overriding the walking speed.
pub const WALKING_SPEED_ENV: &str = "CAMPUSNAV_WALKING_SPEED_KMH";

/// Tunables for arrival estimates and top-K defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    pub walking_speed_kmh: f64,
    pub top_routes_default: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
            top_routes_default: 3,
        }
    }
}

impl NavigatorConfig {
    /// Read overrides from the environment, falling back to defaults.
    ///
    /// An unparsable speed is reported as [`Error::InvalidWalkingSpeed`]
    /// rather than silently ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(WALKING_SPEED_ENV) {
            config.walking_speed_kmh = raw
                .trim()
                .parse()
                .map_err(|_| Error::InvalidWalkingSpeed { speed: f64::NAN })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        WalkingSpeed::new(self.walking_speed_kmh).map(|_| ())
    }
}

/// Entry point for every campus routing query.
#[derive(Clone)]
pub struct Navigator {
    graph: Arc<Graph>,
    traffic: Arc<dyn TrafficAdjuster>,
    config: NavigatorConfig,
    speed: WalkingSpeed,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("locations", &self.graph.len())
            .field("connections", &self.graph.edge_count())
            .field("config", &self.config)
            .finish()
    }
}

impl Navigator {
    /// Fails fast on a walking speed that could never yield an ETA.
    pub fn new(
        graph: Arc<Graph>,
        traffic: Arc<dyn TrafficAdjuster>,
        config: NavigatorConfig,
    ) -> Result<Self> {
        let speed = WalkingSpeed::new(config.walking_speed_kmh)?;
        Ok(Self {
            graph,
            traffic,
            config,
            speed,
        })
    }

    /// Navigator with default config and uniformly moderate traffic.
    pub fn with_defaults(graph: Graph) -> Self {
        Self {
            graph: Arc::new(graph),
            traffic: Arc::new(StaticTrafficAdjuster::default()),
            config: NavigatorConfig::default(),
            speed: WalkingSpeed::default(),
        }
    }

    pub fn from_topology(
        topology: &Topology,
        traffic: Arc<dyn TrafficAdjuster>,
        config: NavigatorConfig,
    ) -> Result<Self> {
        Self::new(Arc::new(build_graph(topology)), traffic, config)
    }

    /// Load a topology (or the bundled campus) and read config from the
    /// environment.
    pub fn from_env(topology_path: Option<&Path>) -> Result<Self> {
        let topology = load_topology(topology_path)?;
        let config = NavigatorConfig::from_env()?;
        Self::from_topology(
            &topology,
            Arc::new(StaticTrafficAdjuster::from_env()),
            config,
        )
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    fn composer(&self) -> RouteComposer<'_> {
        RouteComposer::new(&self.graph, self.traffic.as_ref(), self.speed)
    }

    /// Shortest route by total distance, `None` when there is none.
    pub fn find_shortest(&self, start: &str, end: &str) -> Option<Route> {
        self.find_route(start, end, RouteAlgorithm::Dijkstra)
    }

    /// Heuristic-guided route, `None` when there is none.
    pub fn find_optimal(&self, start: &str, end: &str) -> Option<Route> {
        self.find_route(start, end, RouteAlgorithm::AStar)
    }

    /// Single route using the requested algorithm.
    pub fn find_route(&self, start: &str, end: &str, algorithm: RouteAlgorithm) -> Option<Route> {
        let planner = select_planner(algorithm);
        let route = planner
            .find_path(&self.graph, start, end)
            .map(|path| {
                self.composer()
                    .build_route(path, planner.label(), planner.description())
            });
        debug!(
            start,
            end,
            %algorithm,
            found = route.is_some(),
            "single route query"
        );
        route
    }

    /// Routes through each location matching `landmark`, shortest first.
    ///
    /// Falls back to the plain shortest route when the landmark matches no
    /// location.
    pub fn find_by_landmark(&self, start: &str, end: &str, landmark: &str) -> Vec<Route> {
        let composer = self.composer();
        let description = format!("Route passing through {}", landmark);
        let routes: Vec<Route> = paths_through_landmark(&self.graph, start, end, landmark)
            .into_iter()
            .map(|path| composer.build_route(path, LABEL_LANDMARK, description.clone()))
            .collect();
        debug!(start, end, landmark, results = routes.len(), "landmark query");
        routes
    }

    /// Up to `count` distinct routes, shortest first.
    pub fn find_top(&self, start: &str, end: &str, count: usize) -> Vec<Route> {
        let paths = top_routes(&self.graph, start, end, count);
        let shortest = shortest_path(&self.graph, start, end);
        let optimal = optimal_path(&self.graph, start, end);

        let composer = self.composer();
        let routes: Vec<Route> = paths
            .into_iter()
            .map(|path| {
                let label = if shortest.as_ref() == Some(&path) {
                    LABEL_DIJKSTRA
                } else if optimal.as_ref() == Some(&path) {
                    LABEL_A_STAR
                } else {
                    LABEL_ALTERNATIVE
                };
                composer.build_route(path, label, "Alternative route option")
            })
            .collect();
        debug!(start, end, count, results = routes.len(), "top routes query");
        routes
    }

    /// Top-K query using the configured default count.
    pub fn find_top_default(&self, start: &str, end: &str) -> Vec<Route> {
        self.find_top(start, end, self.config.top_routes_default)
    }

    /// Up to three routes through locations of `category`, shortest first.
    pub fn find_by_category(&self, start: &str, end: &str, category: &str) -> Vec<Route> {
        let mut routes = self.category_routes(start, end, category);
        routes.truncate(CATEGORY_ROUTE_LIMIT);
        debug!(start, end, category, results = routes.len(), "category query");
        routes
    }

    fn category_routes(&self, start: &str, end: &str, category: &str) -> Vec<Route> {
        let composer = self.composer();
        let routes = paths_through_category(&self.graph, start, end, category)
            .into_iter()
            .map(|detour| {
                let description = format!(
                    "Route passing through {} location: {}",
                    category, detour.via
                );
                composer.build_route(detour.path, LABEL_CATEGORY, description)
            })
            .collect();
        rank_by_distance(routes)
    }

    /// Routes matching `term` as a landmark, a category, or part of a
    /// location name; deduplicated, shortest first, at most five.
    pub fn search(&self, start: &str, end: &str, term: &str) -> Vec<Route> {
        let mut candidates = self.find_by_landmark(start, end, term);

        let mut by_category = self.category_routes(start, end, term);
        by_category.truncate(CATEGORY_ROUTE_LIMIT);
        candidates.extend(by_category);

        let needle = term.trim().to_lowercase();
        if !needle.is_empty() {
            let matching: Vec<&Location> = self
                .graph
                .locations()
                .filter(|location| location.name.to_lowercase().contains(&needle))
                .collect();
            let composer = self.composer();
            candidates.extend(
                detours_through(&self.graph, start, end, &matching)
                    .into_iter()
                    .map(|detour| {
                        let description = format!("Route passing through {}", detour.via);
                        composer.build_route(detour.path, LABEL_SEARCH, description)
                    }),
            );
        }

        let mut routes = rank_by_distance(deduplicate(candidates));
        routes.truncate(SEARCH_ROUTE_LIMIT);
        debug!(start, end, term, results = routes.len(), "search query");
        routes
    }

    /// Described location names, sorted.
    pub fn all_locations(&self) -> Vec<String> {
        self.graph.location_names().map(str::to_string).collect()
    }

    /// Every landmark tag, sorted.
    pub fn all_landmarks(&self) -> Vec<String> {
        self.graph
            .all_landmarks()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct categories, sorted.
    pub fn all_categories(&self) -> Vec<String> {
        self.graph
            .all_categories()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn traffic_condition(&self, location: &str) -> TrafficCondition {
        self.traffic.condition_for(location)
    }

    /// Traffic-adjusted minutes along the shortest route, `0` when there is none.
    pub fn arrival_minutes(&self, start: &str, end: &str) -> u64 {
        self.find_shortest(start, end)
            .map(|route| route.estimated_minutes)
            .unwrap_or(0)
    }

    /// All-pairs shortest distances over the current snapshot.
    pub fn all_pair_distances(&self) -> DistanceMatrix {
        all_pairs_shortest_paths(&self.graph)
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.graph.location(name)
    }

    /// Close location names for an unknown `name`.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        self.graph.fuzzy_matches(name, SUGGESTION_LIMIT)
    }

    /// Look up a location, turning an unknown name into an error that
    /// carries suggestions.
    pub fn resolve(&self, name: &str) -> Result<&Location> {
        self.graph
            .location(name)
            .ok_or_else(|| Error::UnknownLocation {
                name: name.to_string(),
                suggestions: self.suggest(name),
            })
    }
}
