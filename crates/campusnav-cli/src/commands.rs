//! Subcommands and their handlers.
//!
//! Handlers return the rendered output so they can be exercised without a
//! process boundary; `main` only prints it.

use anyhow::Result;
use clap::{Args, Subcommand};

use campusnav_lib::{Error as LibError, Navigator, Route, RouteAlgorithm};

use crate::output::{
    render_distances, render_names, render_route, render_routes, render_traffic, DistanceEntry,
    OutputFormat,
};
use crate::terminal::ColorPalette;

/// Start and end of a query.
#[derive(Args, Debug, Clone)]
pub struct Endpoints {
    /// Starting location name.
    #[arg(long = "from")]
    pub from: String,
    /// Destination location name.
    #[arg(long = "to")]
    pub to: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List every location name.
    Locations,
    /// List every landmark tag.
    Landmarks,
    /// List every location category.
    Categories,
    /// Shortest route by distance (Dijkstra).
    Shortest(Endpoints),
    /// Heuristic-guided route (A*).
    Optimal(Endpoints),
    /// Routes passing through locations carrying a landmark tag.
    Landmark {
        #[command(flatten)]
        endpoints: Endpoints,
        /// Landmark tag: exact tag match, or a case-insensitive substring of the location name.
        #[arg(long)]
        landmark: String,
    },
    /// Several distinct routes, shortest first.
    Top {
        #[command(flatten)]
        endpoints: Endpoints,
        /// Number of routes; defaults to the configured count.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Routes passing through a location of the given category.
    Category {
        #[command(flatten)]
        endpoints: Endpoints,
        #[arg(long)]
        category: String,
    },
    /// Routes matching a landmark, category or location name.
    Search {
        #[command(flatten)]
        endpoints: Endpoints,
        #[arg(long)]
        term: String,
    },
    /// Traffic condition at a location.
    Traffic {
        #[arg(long)]
        location: String,
    },
    /// Shortest distance from one location to every reachable location.
    Distances {
        #[arg(long = "from")]
        from: String,
    },
}

/// Run `command` against `navigator` and return what should be printed.
pub fn execute(
    command: &Command,
    navigator: &Navigator,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    match command {
        Command::Locations => render_names(&navigator.all_locations(), format),
        Command::Landmarks => render_names(&navigator.all_landmarks(), format),
        Command::Categories => render_names(&navigator.all_categories(), format),
        Command::Shortest(ends) => {
            let route = single_route(navigator, ends, RouteAlgorithm::Dijkstra)?;
            render_route(&route, format, palette)
        }
        Command::Optimal(ends) => {
            let route = single_route(navigator, ends, RouteAlgorithm::AStar)?;
            render_route(&route, format, palette)
        }
        Command::Landmark {
            endpoints,
            landmark,
        } => {
            let routes = navigator.find_by_landmark(&endpoints.from, &endpoints.to, landmark);
            render_routes(&routes, format, palette)
        }
        Command::Top { endpoints, count } => {
            let routes = match count {
                Some(count) => navigator.find_top(&endpoints.from, &endpoints.to, *count),
                None => navigator.find_top_default(&endpoints.from, &endpoints.to),
            };
            render_routes(&routes, format, palette)
        }
        Command::Category {
            endpoints,
            category,
        } => {
            let routes = navigator.find_by_category(&endpoints.from, &endpoints.to, category);
            render_routes(&routes, format, palette)
        }
        Command::Search { endpoints, term } => {
            let routes = navigator.search(&endpoints.from, &endpoints.to, term);
            render_routes(&routes, format, palette)
        }
        Command::Traffic { location } => {
            render_traffic(location, navigator.traffic_condition(location), format)
        }
        Command::Distances { from } => {
            navigator.resolve(from)?;
            let entries = distance_entries(navigator, from);
            render_distances(from, &entries, format, palette)
        }
    }
}

/// Resolve both names first so an unknown one is reported with suggestions
/// instead of as a missing route.
fn single_route(navigator: &Navigator, ends: &Endpoints, algorithm: RouteAlgorithm) -> Result<Route> {
    navigator.resolve(&ends.from)?;
    navigator.resolve(&ends.to)?;
    let route = navigator
        .find_route(&ends.from, &ends.to, algorithm)
        .ok_or_else(|| LibError::RouteNotFound {
            start: ends.from.clone(),
            goal: ends.to.clone(),
        })?;
    Ok(route)
}

fn distance_entries(navigator: &Navigator, origin: &str) -> Vec<DistanceEntry> {
    let matrix = navigator.all_pair_distances();
    let mut entries: Vec<DistanceEntry> = matrix
        .row(origin)
        .into_iter()
        .filter(|(to, _)| *to != origin)
        .map(|(to, distance_km)| DistanceEntry {
            to: to.to_string(),
            distance_km,
            path: matrix.path(origin, to).unwrap_or_default(),
        })
        .collect();
    entries.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then_with(|| a.to.cmp(&b.to)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusnav_lib::{Graph, Location};

    fn line_navigator() -> Navigator {
        let mut graph = Graph::new();
        graph.add_location(Location::new("Gate", 0.0, 0.0).with_landmark("Entrance"));
        graph.add_location(Location::new("Hall", 0.0, 0.0).with_category("academic"));
        graph.add_location(Location::new("Lab", 0.0, 0.0));
        graph.add_location(Location::new("Island", 0.0, 0.0));
        graph.add_connection("Gate", "Hall", 0.5);
        graph.add_connection("Hall", "Lab", 0.25);
        Navigator::with_defaults(graph)
    }

    fn ends(from: &str, to: &str) -> Endpoints {
        Endpoints {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn run(command: Command) -> Result<String> {
        execute(&command, &line_navigator(), OutputFormat::Text, &ColorPalette::plain())
    }

    #[test]
    fn shortest_renders_path() {
        let out = run(Command::Shortest(ends("Gate", "Lab"))).unwrap();
        assert!(out.contains("Gate → Hall → Lab"));
        assert!(out.contains("750 m"));
    }

    #[test]
    fn unknown_location_suggests() {
        let err = run(Command::Shortest(ends("Gat", "Lab"))).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown location: Gat"));
        assert!(message.contains("Did you mean"));
    }

    #[test]
    fn unreachable_is_route_not_found() {
        let err = run(Command::Optimal(ends("Gate", "Island"))).unwrap_err();
        assert_eq!(err.to_string(), "no route found between Gate and Island");
    }

    #[test]
    fn list_queries_tolerate_unknown_names() {
        let out = run(Command::Search {
            endpoints: ends("Nowhere", "Lab"),
            term: "hall".to_string(),
        })
        .unwrap();
        assert_eq!(out, "No routes found.");
    }

    #[test]
    fn distances_skip_origin_and_unreachable() {
        let navigator = line_navigator();
        let entries = distance_entries(&navigator, "Gate");
        let names: Vec<&str> = entries.iter().map(|e| e.to.as_str()).collect();
        assert_eq!(names, vec!["Hall", "Lab"]);
        assert_eq!(entries[1].path, vec!["Gate", "Hall", "Lab"]);
    }

    #[test]
    fn listings_in_json() {
        let out = execute(
            &Command::Categories,
            &line_navigator(),
            OutputFormat::Json,
            &ColorPalette::plain(),
        )
        .unwrap();
        let categories: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(categories, vec!["academic", "general"]);
    }
}
