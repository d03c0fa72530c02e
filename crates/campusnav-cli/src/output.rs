//! Rendering of query results as text or JSON.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use campusnav_lib::{Route, TrafficCondition};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One reachable destination in a distance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceEntry {
    pub to: String,
    pub distance_km: f64,
    pub path: Vec<String>,
}

#[derive(Serialize)]
struct TrafficReport<'a> {
    location: &'a str,
    condition: TrafficCondition,
    multiplier: f64,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a single route.
pub fn render_route(route: &Route, format: OutputFormat, palette: &ColorPalette) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(route),
        OutputFormat::Text => Ok(route_text(route, palette)),
    }
}

/// Render a ranked list of routes; an empty list reads "No routes found."
pub fn render_routes(routes: &[Route], format: OutputFormat, palette: &ColorPalette) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(routes),
        OutputFormat::Text if routes.is_empty() => Ok("No routes found.".to_string()),
        OutputFormat::Text => {
            let blocks: Vec<String> = routes
                .iter()
                .enumerate()
                .map(|(i, route)| format!("{}. {}", i + 1, route_text(route, palette)))
                .collect();
            Ok(blocks.join("\n\n"))
        }
    }
}

fn route_text(route: &Route, p: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}{}", p.cyan, route.algorithm, p.reset);
    if !route.description.is_empty() {
        let _ = writeln!(out, "   {}{}{}", p.gray, route.description, p.reset);
    }
    let _ = writeln!(
        out,
        "   {}{}{}",
        p.white_bold,
        route.formatted_path(),
        p.reset
    );
    let _ = write!(
        out,
        "   Distance: {}{}{}  Time: {}{}{}  Traffic: {}",
        p.green,
        route.formatted_distance(),
        p.reset,
        p.yellow,
        route.formatted_time(),
        p.reset,
        route.traffic
    );
    if !route.landmarks.is_empty() {
        let _ = write!(out, "\n   Landmarks: {}", route.landmarks.join(", "));
    }
    out
}

/// Render a sorted listing of names, one per line.
pub fn render_names(names: &[String], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(names),
        OutputFormat::Text => Ok(names.join("\n")),
    }
}

pub fn render_traffic(location: &str, condition: TrafficCondition, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&TrafficReport {
            location,
            condition,
            multiplier: condition.multiplier(),
        }),
        OutputFormat::Text => Ok(format!(
            "{}: {} traffic (x{:.1})",
            location,
            condition,
            condition.multiplier()
        )),
    }
}

/// Render the shortest distances from one origin.
pub fn render_distances(
    origin: &str,
    entries: &[DistanceEntry],
    format: OutputFormat,
    palette: &ColorPalette,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(entries),
        OutputFormat::Text => {
            let width = entries.iter().map(|e| e.to.chars().count()).max().unwrap_or(0);
            let mut out = format!(
                "Shortest distances from {}{}{}:",
                palette.white_bold, origin, palette.reset
            );
            for entry in entries {
                let _ = write!(
                    out,
                    "\n  {:<width$}  {}{:>6.2} km{}  ({} hops)",
                    entry.to,
                    palette.green,
                    entry.distance_km,
                    palette.reset,
                    entry.path.len().saturating_sub(1),
                    width = width
                );
            }
            Ok(out)
        }
    }
}
