// Test-only helpers for `campusnav-lib` tests
#![allow(dead_code)]
use crate::graph::{Graph, Location};

/// Four locations at the origin joined as A–B:10, A–C:15, B–C:5, B–D:12, C–D:8.
///
/// All coordinates coincide so the heuristic search degrades to Dijkstra.
pub fn diamond_graph() -> Graph {
    let mut graph = Graph::new();
    for name in ["A", "B", "C", "D"] {
        graph.add_location(Location::new(name, 0.0, 0.0));
    }
    graph.add_connection("A", "B", 10.0);
    graph.add_connection("A", "C", 15.0);
    graph.add_connection("B", "C", 5.0);
    graph.add_connection("B", "D", 12.0);
    graph.add_connection("C", "D", 8.0);
    graph
}

/// Builder to create tagged `Location` instances in tests.
pub struct LocationBuilder {
    location: Location,
}

impl LocationBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            location: Location::new(name, 0.0, 0.0),
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.location.position.latitude = latitude;
        self.location.position.longitude = longitude;
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.location.category = category.to_string();
        self
    }

    pub fn landmark(mut self, tag: &str) -> Self {
        self.location.landmarks.insert(tag.to_string());
        self
    }

    pub fn build(self) -> Location {
        self.location
    }
}
