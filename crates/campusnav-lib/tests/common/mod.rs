//! Shared fixtures for `campusnav-lib` integration tests.

use std::fs;
use std::path::PathBuf;

use campusnav_lib::{build_graph, Graph, Location, Navigator, Topology};
use tempfile::TempDir;

/// The bundled sample campus as a graph.
#[allow(dead_code)]
pub fn campus_graph() -> Graph {
    let topology = Topology::builtin_campus().expect("bundled campus parses");
    build_graph(&topology)
}

/// Navigator over the bundled campus with default config.
#[allow(dead_code)]
pub fn campus_navigator() -> Navigator {
    Navigator::with_defaults(campus_graph())
}

/// Four locations joined as A–B:10, A–C:15, B–C:5, B–D:12, C–D:8.
#[allow(dead_code)]
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

/// Planar grid of `size` x `size` locations at integer coordinates.
///
/// Every edge weight is at least the straight-line distance between its ends,
/// so the A* heuristic is admissible yet far from zero. Weights are multiples
/// of 0.5, which keeps every path sum exact in `f64`.
#[allow(dead_code)]
pub fn planar_grid(size: usize) -> Graph {
    let name = |row: usize, col: usize| format!("r{row}c{col}");
    let mut graph = Graph::new();
    for row in 0..size {
        for col in 0..size {
            graph.add_location(Location::new(name(row, col), row as f64, col as f64));
        }
    }
    for row in 0..size {
        for col in 0..size {
            let detour = if (row * 7 + col * 3) % 3 == 0 { 2.0 } else { 1.0 };
            if col + 1 < size {
                graph.add_connection(&name(row, col), &name(row, col + 1), detour);
            }
            if row + 1 < size {
                graph.add_connection(&name(row, col), &name(row + 1, col), 3.0 - detour);
            }
            if row + 1 < size && col + 1 < size && (row + col) % 2 == 0 {
                graph.add_connection(&name(row, col), &name(row + 1, col + 1), 1.5);
            }
        }
    }
    graph
}

/// Temporary directory holding a topology JSON file.
#[allow(dead_code)]
pub struct TopologyFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TopologyFixture {
    pub fn new(contents: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("campus.json");
        fs::write(&path, contents).expect("write topology fixture");
        Self { _dir: dir, path }
    }
}
