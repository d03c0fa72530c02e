//! Campus topology documents and graph construction.
//!
//! A topology is a plain list of locations plus a list of weighted
//! connections. It is the only way a [`Graph`] is populated outside tests, so
//! the bundled sample campus and user-supplied JSON files go through the same
//! validation.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{Graph, Location};

const BUILTIN_CAMPUS: &str = include_str!("../data/campus.json");

/// Environment variable naming an alternative topology file.
pub const TOPOLOGY_PATH_ENV: &str = "CAMPUSNAV_TOPOLOGY_PATH";

/// Description of a single location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub landmarks: Vec<String>,
}

fn default_category() -> String {
    "general".to_string()
}

/// Undirected connection; `distance` is in kilometres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub from: String,
    pub to: String,
    pub distance: f64,
}

/// Locations and connections making up one campus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub locations: Vec<LocationSpec>,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

impl Topology {
    /// Parse and validate a JSON topology document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let topology: Topology = serde_json::from_str(json).map_err(|err| Error::TopologyParse {
            message: err.to_string(),
        })?;
        topology.validate()?;
        Ok(topology)
    }

    /// Read a JSON topology file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::TopologyNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents).map_err(|err| match err {
            Error::TopologyParse { message } => Error::TopologyParse {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// The bundled University of Ghana (Legon) sample campus.
    pub fn builtin_campus() -> Result<Self> {
        Self::from_json_str(BUILTIN_CAMPUS)
    }

    /// Reject topologies that could never produce meaningful routes.
    ///
    /// Connections may reference names with no location entry; those become
    /// sparse adjacency entries that routing never traverses.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            if location.name.trim().is_empty() {
                return Err(Error::InvalidLocationName);
            }
            if !seen.insert(location.name.as_str()) {
                return Err(Error::DuplicateLocation {
                    name: location.name.clone(),
                });
            }
        }

        for connection in &self.connections {
            if connection.from.trim().is_empty() || connection.to.trim().is_empty() {
                return Err(Error::InvalidLocationName);
            }
            if !connection.distance.is_finite() || connection.distance < 0.0 {
                return Err(Error::InvalidDistance {
                    from: connection.from.clone(),
                    to: connection.to.clone(),
                    distance: connection.distance,
                });
            }
        }

        Ok(())
    }
}

impl From<&LocationSpec> for Location {
    fn from(spec: &LocationSpec) -> Self {
        let location = Location::new(spec.name.clone(), spec.latitude, spec.longitude)
            .with_category(spec.category.clone())
            .with_description(spec.description.clone());
        spec.landmarks
            .iter()
            .fold(location, |location, tag| location.with_landmark(tag.clone()))
    }
}

/// Build an in-memory graph from a topology.
///
/// Locations are added first, then connections in document order, so a
/// repeated pair keeps the weight of its last occurrence.
pub fn build_graph(topology: &Topology) -> Graph {
    let mut graph = Graph::new();
    for spec in &topology.locations {
        graph.add_location(Location::from(spec));
    }
    for connection in &topology.connections {
        graph.add_connection(&connection.from, &connection.to, connection.distance);
    }
    debug!(
        locations = graph.len(),
        connections = graph.edge_count(),
        "built campus graph"
    );
    graph
}

/// Load the topology at `path`, or the bundled campus when none is given.
pub fn load_topology(path: Option<&Path>) -> Result<Topology> {
    let topology = match path {
        Some(path) => {
            let topology = Topology::from_path(path)?;
            info!(
                path = %path.display(),
                locations = topology.locations.len(),
                connections = topology.connections.len(),
                "loaded campus topology"
            );
            topology
        }
        None => {
            let topology = Topology::builtin_campus()?;
            info!(
                locations = topology.locations.len(),
                connections = topology.connections.len(),
                "using bundled campus topology"
            );
            topology
        }
    };
    Ok(topology)
}
