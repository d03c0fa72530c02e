use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Similarity floor for "did you mean" suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Latitude/longitude pair used by the heuristic search.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Straight-line distance in coordinate units.
    ///
    /// This is only a lower bound on walking distance when coordinates are
    /// expressed in the same units as edge weights. Geographic degrees are
    /// not, so the value is a best-effort estimate.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// A named, routable point on campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub position: Coordinates,
    pub category: String,
    pub landmarks: BTreeSet<String>,
    pub description: String,
}

impl Location {
    /// Create a location in the `general` category with no landmarks.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            position: Coordinates::new(latitude, longitude),
            category: "general".to_string(),
            landmarks: BTreeSet::new(),
            description: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_landmark(mut self, landmark: impl Into<String>) -> Self {
        self.landmarks.insert(landmark.into());
        self
    }

    /// Exact landmark tag membership.
    pub fn has_landmark(&self, tag: &str) -> bool {
        self.landmarks.contains(tag)
    }

    /// A location matches a landmark query when it carries the exact tag or
    /// when the tag appears (case-insensitively) in its own name.
    pub fn matches_landmark(&self, tag: &str) -> bool {
        if tag.trim().is_empty() {
            return false;
        }
        self.has_landmark(tag) || contains_ignore_case(&self.name, tag)
    }

    /// Case-insensitive category comparison.
    pub fn is_in_category(&self, category: &str) -> bool {
        !category.trim().is_empty() && self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Weighted connection stored in the adjacency list.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: String,
    pub distance: f64,
}

/// Undirected weighted campus graph.
///
/// Adjacency lists are keyed and sorted by name so every traversal visits
/// neighbours in lexicographic order, which keeps tie-breaking reproducible.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    locations: BTreeMap<String, Location>,
    adjacency: BTreeMap<String, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a location. Existing connections are kept.
    pub fn add_location(&mut self, location: Location) {
        self.adjacency.entry(location.name.clone()).or_default();
        self.locations.insert(location.name.clone(), location);
    }

    /// Insert a symmetric connection, overwriting any previous weight between
    /// the same pair. Endpoints do not need to be described yet.
    pub fn add_connection(&mut self, from: &str, to: &str, distance: f64) {
        if from == to {
            self.adjacency.entry(from.to_string()).or_default();
            return;
        }
        upsert_edge(self.adjacency.entry(from.to_string()).or_default(), to, distance);
        upsert_edge(self.adjacency.entry(to.to_string()).or_default(), from, distance);
    }

    pub fn has_location(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Return the neighbours for a given location, empty when unknown.
    pub fn neighbours(&self, name: &str) -> &[Edge] {
        self.adjacency
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Direct edge weight, `0` for a node to itself and infinity when the two
    /// names are not connected.
    pub fn distance(&self, from: &str, to: &str) -> f64 {
        if from == to && (self.has_location(from) || self.adjacency.contains_key(from)) {
            return 0.0;
        }
        self.neighbours(from)
            .iter()
            .find(|edge| edge.target == to)
            .map(|edge| edge.distance)
            .unwrap_or(f64::INFINITY)
    }

    /// Described locations in name order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn location_names(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of undirected connections.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn locations_by_landmark(&self, tag: &str) -> Vec<&Location> {
        self.locations()
            .filter(|location| location.matches_landmark(tag))
            .collect()
    }

    pub fn locations_by_category(&self, category: &str) -> Vec<&Location> {
        self.locations()
            .filter(|location| location.is_in_category(category))
            .collect()
    }

    /// Union of every landmark tag in the graph.
    pub fn all_landmarks(&self) -> BTreeSet<&str> {
        self.locations()
            .flat_map(|location| location.landmarks.iter().map(String::as_str))
            .collect()
    }

    pub fn all_categories(&self) -> BTreeSet<&str> {
        self.locations()
            .map(|location| location.category.as_str())
            .collect()
    }

    /// Location names that look like `name`, best match first.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .location_names()
            .map(|candidate| {
                let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
                (score, candidate)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

fn upsert_edge(edges: &mut Vec<Edge>, target: &str, distance: f64) {
    match edges.binary_search_by(|edge| edge.target.as_str().cmp(target)) {
        Ok(index) => edges[index].distance = distance,
        Err(index) => edges.insert(
            index,
            Edge {
                target: target.to_string(),
                distance,
            },
        ),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub(crate) fn compare_distance(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Location {
        Location::new("Balme Library", 5.658, -0.1905)
            .with_category("facility")
            .with_landmark("Library")
            .with_landmark("Study Area")
    }

    #[test]
    fn connections_are_symmetric() {
        let mut graph = Graph::new();
        graph.add_connection("A", "B", 4.0);

        assert_eq!(graph.distance("A", "B"), 4.0);
        assert_eq!(graph.distance("B", "A"), 4.0);
    }

    #[test]
    fn repeated_connection_overwrites_weight() {
        let mut graph = Graph::new();
        graph.add_connection("A", "B", 4.0);
        graph.add_connection("B", "A", 7.5);

        assert_eq!(graph.distance("A", "B"), 7.5);
        assert_eq!(graph.neighbours("A").len(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_names_degrade_to_neutral_results() {
        let graph = Graph::new();
        assert!(!graph.has_location("Ghost"));
        assert!(graph.neighbours("Ghost").is_empty());
        assert!(graph.distance("Ghost", "Other").is_infinite());
        assert!(graph.locations_by_landmark("Ghost").is_empty());
    }

    #[test]
    fn self_distance_is_zero_for_known_names() {
        let mut graph = Graph::new();
        graph.add_location(Location::new("A", 0.0, 0.0));
        assert_eq!(graph.distance("A", "A"), 0.0);
        assert!(graph.distance("Z", "Z").is_infinite());
    }

    #[test]
    fn connections_may_precede_location_details() {
        let mut graph = Graph::new();
        graph.add_connection("A", "B", 2.0);
        graph.add_location(Location::new("A", 0.0, 0.0));

        assert!(graph.has_location("A"));
        assert!(!graph.has_location("B"));
        assert_eq!(graph.distance("A", "B"), 2.0);
    }

    #[test]
    fn neighbours_are_sorted_by_name() {
        let mut graph = Graph::new();
        graph.add_connection("Hub", "Zulu", 1.0);
        graph.add_connection("Hub", "Alpha", 1.0);
        graph.add_connection("Hub", "Mike", 1.0);

        let names: Vec<_> = graph
            .neighbours("Hub")
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Mike", "Zulu"]);
    }

    #[test]
    fn landmark_matches_tag_or_name_substring() {
        let location = library();
        assert!(location.matches_landmark("Library"));
        assert!(location.matches_landmark("balme"));
        assert!(!location.matches_landmark("library area"));
        assert!(!location.matches_landmark(""));
        // exact tag match is case-sensitive, the name match is not
        assert!(!location.matches_landmark("STUDY AREA"));
    }

    #[test]
    fn category_match_ignores_case() {
        let location = library();
        assert!(location.is_in_category("Facility"));
        assert!(!location.is_in_category("academic"));
        assert!(!location.is_in_category(" "));
    }

    #[test]
    fn landmark_and_category_sets_are_unions() {
        let mut graph = Graph::new();
        graph.add_location(library());
        graph.add_location(
            Location::new("Registry", 0.0, 0.0)
                .with_category("administrative")
                .with_landmark("Administration"),
        );

        let landmarks: Vec<_> = graph.all_landmarks().into_iter().collect();
        assert_eq!(landmarks, vec!["Administration", "Library", "Study Area"]);

        let categories: Vec<_> = graph.all_categories().into_iter().collect();
        assert_eq!(categories, vec!["administrative", "facility"]);
    }

    #[test]
    fn fuzzy_matches_rank_close_names() {
        let mut graph = Graph::new();
        graph.add_location(library());
        graph.add_location(Location::new("Registry", 0.0, 0.0));

        assert_eq!(graph.fuzzy_matches("Regsitry", 3), vec!["Registry"]);
        assert!(graph.fuzzy_matches("zzzz", 3).is_empty());
    }
}
