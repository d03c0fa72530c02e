use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the campus navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Routing queries never produce these for unknown names or unreachable
/// destinations; they degrade to empty results instead. The lookup variants
/// exist for front ends that want to turn an empty result into a message.
#[derive(Debug, Error)]
pub enum Error {
    /// Topology file could not be located at the resolved path.
    #[error("topology not found at {path}")]
    TopologyNotFound { path: PathBuf },

    /// Topology document could not be parsed.
    #[error("failed to parse topology: {message}")]
    TopologyParse { message: String },

    /// Raised when two locations in a topology share a name.
    #[error("duplicate location name encountered: {name}")]
    DuplicateLocation { name: String },

    /// Raised when a location or connection uses an empty name.
    #[error("location names must not be empty")]
    InvalidLocationName,

    /// Raised when a connection carries a negative or non-finite distance.
    #[error("invalid distance {distance} between {from} and {to}")]
    InvalidDistance {
        from: String,
        to: String,
        distance: f64,
    },

    /// Raised when the walking speed used for ETA conversion is not positive.
    #[error("walking speed must be a positive number of km/h, got {speed}")]
    InvalidWalkingSpeed { speed: f64 },

    /// Raised by front ends when a location name could not be resolved.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised by front ends when no route connects two known locations.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location_without_suggestions() {
        let err = Error::UnknownLocation {
            name: "Nowhere".to_string(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "unknown location: Nowhere");
    }

    #[test]
    fn unknown_location_lists_suggestions() {
        let err = Error::UnknownLocation {
            name: "Regstry".to_string(),
            suggestions: vec!["Registry".to_string()],
        };
        assert!(err.to_string().ends_with("Did you mean 'Registry'?"));

        let err = Error::UnknownLocation {
            name: "Hall".to_string(),
            suggestions: vec!["Great Hall".to_string(), "Health Center".to_string()],
        };
        assert!(err
            .to_string()
            .contains("Did you mean one of: 'Great Hall', 'Health Center'?"));
    }
}
