use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::graph::{compare_distance, Graph, Location};

/// Shortest path between `start` and `goal` using Dijkstra's algorithm.
///
/// Returns `None` when either endpoint is unknown or empty, or when the goal
/// is unreachable. Each location is settled at most once, so edge weights must
/// be non-negative.
pub fn shortest_path(graph: &Graph, start: &str, goal: &str) -> Option<Vec<String>> {
    if !endpoints_known(graph, start, goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start.to_string()]);
    }

    let mut distances: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    distances.insert(start, 0.0);
    frontier.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = frontier.pop() {
        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }
        if !settled.insert(entry.node) {
            continue;
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target.as_str();
            if settled.contains(next) || !graph.has_location(next) {
                continue;
            }

            let next_cost = entry.cost.0 + edge.distance;
            if next_cost < *distances.get(next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                frontier.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

/// Heuristic-guided shortest path (A*).
///
/// The heuristic is the straight-line distance between coordinates. It is an
/// approximation: it only bounds the true cost when coordinates share units
/// with edge weights. Stale frontier entries are skipped rather than closing
/// nodes, so a location may be re-expanded when a cheaper route to it shows up.
pub fn optimal_path(graph: &Graph, start: &str, goal: &str) -> Option<Vec<String>> {
    if !endpoints_known(graph, start, goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start.to_string()]);
    }

    let goal_position = graph.location(goal).map(|location| location.position);
    let heuristic = |name: &str| -> f64 {
        match (graph.location(name), goal_position) {
            (Some(location), Some(target)) => location.position.distance_to(&target),
            _ => 0.0,
        }
    };

    let mut g_score: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut open = BinaryHeap::new();

    g_score.insert(start, 0.0);
    open.push(AStarEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = open.pop() {
        match g_score.get(entry.node) {
            Some(score) if *score < entry.cost.0 => continue,
            Some(_) => {}
            None => continue,
        }

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target.as_str();
            if !graph.has_location(next) {
                continue;
            }

            let tentative_g = entry.cost.0 + edge.distance;
            if tentative_g < *g_score.get(next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative_g);
                parents.insert(next, entry.node);
                open.push(AStarEntry::new(next, tentative_g, heuristic(next)));
            }
        }
    }

    None
}

/// All-pairs shortest distances over the described locations.
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    names: Vec<String>,
    index: HashMap<String, usize>,
    distances: Vec<f64>,
    next: Vec<Option<usize>>,
}

impl DistanceMatrix {
    /// Shortest distance from `from` to `to`, infinite when unreachable or unknown.
    pub fn get(&self, from: &str, to: &str) -> f64 {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&i), Some(&j)) => self.distances[i * self.names.len() + j],
            _ => f64::INFINITY,
        }
    }

    /// Location names covered by the matrix, in name order.
    pub fn locations(&self) -> &[String] {
        &self.names
    }

    /// Reachable destinations from `from` with their distances.
    pub fn row(&self, from: &str) -> Vec<(&str, f64)> {
        let Some(&i) = self.index.get(from) else {
            return Vec::new();
        };
        let n = self.names.len();
        (0..n)
            .filter(|&j| self.distances[i * n + j].is_finite())
            .map(|j| (self.names[j].as_str(), self.distances[i * n + j]))
            .collect()
    }

    /// Rebuild one shortest path from the next-hop table.
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let (&i, &j) = (self.index.get(from)?, self.index.get(to)?);
        if i == j {
            return Some(vec![self.names[i].clone()]);
        }

        let n = self.names.len();
        let mut current = i;
        let mut path = vec![self.names[i].clone()];
        while current != j {
            current = self.next[current * n + j]?;
            path.push(self.names[current].clone());
        }
        Some(path)
    }
}

/// Floyd–Warshall over every described location.
///
/// Runs in cubic time and quadratic memory, which is fine for a campus of
/// tens to a few hundred locations and nothing larger.
pub fn all_pairs_shortest_paths(graph: &Graph) -> DistanceMatrix {
    let names: Vec<String> = graph.location_names().map(str::to_string).collect();
    let n = names.len();
    let index: HashMap<String, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();

    let mut distances = vec![f64::INFINITY; n * n];
    let mut next = vec![None; n * n];

    for (i, from) in names.iter().enumerate() {
        distances[i * n + i] = 0.0;
        next[i * n + i] = Some(i);
        for edge in graph.neighbours(from) {
            if let Some(&j) = index.get(&edge.target) {
                distances[i * n + j] = edge.distance;
                next[i * n + j] = Some(j);
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            let ik = distances[i * n + k];
            if ik.is_infinite() {
                continue;
            }
            for j in 0..n {
                let candidate = ik + distances[k * n + j];
                if candidate < distances[i * n + j] {
                    distances[i * n + j] = candidate;
                    next[i * n + j] = next[i * n + k];
                }
            }
        }
    }

    DistanceMatrix {
        names,
        index,
        distances,
        next,
    }
}

/// A composite path forced through an intermediate location.
#[derive(Debug, Clone, PartialEq)]
pub struct Detour {
    /// Name of the intermediate location.
    pub via: String,
    pub path: Vec<String>,
}

/// Join `shortest_path(start, via)` and `shortest_path(via, goal)`, dropping
/// the repeated junction.
pub fn path_through(graph: &Graph, start: &str, via: &str, goal: &str) -> Option<Vec<String>> {
    let mut path = shortest_path(graph, start, via)?;
    let tail = shortest_path(graph, via, goal)?;
    path.extend(tail.into_iter().skip(1));
    Some(path)
}

/// One detour per intermediate location, skipping those with a missing leg,
/// sorted by total distance.
pub fn detours_through(
    graph: &Graph,
    start: &str,
    goal: &str,
    waypoints: &[&Location],
) -> Vec<Detour> {
    let mut detours: Vec<Detour> = waypoints
        .iter()
        .filter_map(|waypoint| {
            path_through(graph, start, &waypoint.name, goal).map(|path| Detour {
                via: waypoint.name.clone(),
                path,
            })
        })
        .collect();

    detours.sort_by(|a, b| {
        compare_distance(path_distance(graph, &a.path), path_distance(graph, &b.path))
    });
    detours
}

/// Candidate routes passing through each location that matches `landmark`.
///
/// When nothing matches, falls back to the plain shortest path (or nothing).
pub fn paths_through_landmark(
    graph: &Graph,
    start: &str,
    goal: &str,
    landmark: &str,
) -> Vec<Vec<String>> {
    let waypoints = graph.locations_by_landmark(landmark);
    if waypoints.is_empty() {
        return shortest_path(graph, start, goal).into_iter().collect();
    }

    detours_through(graph, start, goal, &waypoints)
        .into_iter()
        .map(|detour| detour.path)
        .collect()
}

/// Candidate routes passing through each location in `category`.
pub fn paths_through_category(
    graph: &Graph,
    start: &str,
    goal: &str,
    category: &str,
) -> Vec<Detour> {
    let waypoints = graph.locations_by_category(category);
    detours_through(graph, start, goal, &waypoints)
}

/// Up to `count` distinct routes, shortest first.
///
/// The pool is the shortest path, the heuristic path when it differs, and the
/// landmark detours for every landmark tag in the graph. The pool grows with
/// the number of tags, so this is meant for campus-sized tag sets.
pub fn top_routes(graph: &Graph, start: &str, goal: &str, count: usize) -> Vec<Vec<String>> {
    if count == 0 {
        return Vec::new();
    }

    let mut pool = Vec::new();
    let shortest = shortest_path(graph, start, goal);
    if let Some(path) = &shortest {
        pool.push(path.clone());
    }
    if let Some(path) = optimal_path(graph, start, goal) {
        if shortest.as_ref() != Some(&path) {
            pool.push(path);
        }
    }
    for landmark in graph.all_landmarks() {
        pool.extend(paths_through_landmark(graph, start, goal, landmark));
    }

    let mut unique = dedup_paths(pool);
    unique.sort_by(|a, b| compare_distance(path_distance(graph, a), path_distance(graph, b)));
    unique.truncate(count);
    unique
}

/// Sum of consecutive edge weights; `0` for paths shorter than two.
pub fn path_distance(graph: &Graph, path: &[String]) -> f64 {
    path.windows(2)
        .map(|pair| graph.distance(&pair[0], &pair[1]))
        .sum()
}

fn dedup_paths(paths: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

fn endpoints_known(graph: &Graph, start: &str, goal: &str) -> bool {
    !start.is_empty() && !goal.is_empty() && graph.has_location(start) && graph.has_location(goal)
}

fn reconstruct_path(parents: &HashMap<&str, &str>, start: &str, goal: &str) -> Vec<String> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while current != start {
        match parents.get(current) {
            Some(&parent) => {
                path.push(parent.to_string());
                current = parent;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl<'a> AStarEntry<'a> {
    fn new(node: &'a str, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for AStarEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
