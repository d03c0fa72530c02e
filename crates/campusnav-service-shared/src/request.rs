//! Request types and validation for HTTP endpoints.
//!
//! Query-string fields default to empty so that a missing parameter is
//! reported through [`Validate`] as a problem response instead of a bare
//! extractor rejection.

use serde::{Deserialize, Serialize};

use campusnav_lib::RouteAlgorithm;

use crate::ProblemDetails;

/// Upper bound accepted for the `count` parameter of top-K queries.
pub const MAX_TOP_ROUTES: usize = 20;

/// Validation trait for request types.
///
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn require(value: &str, field: &str, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if value.trim().is_empty() {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' field is required and cannot be empty", field),
            request_id,
        )));
    }
    Ok(())
}

/// `start` and `end` query parameters shared by most route endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl Validate for EndpointQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require(&self.start, "start", request_id)?;
        require(&self.end, "end", request_id)
    }
}

/// Query parameters for `GET /top`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopRoutesQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    3
}

impl Validate for TopRoutesQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require(&self.start, "start", request_id)?;
        require(&self.end, "end", request_id)?;

        if self.count == 0 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'count' field must be at least 1",
                request_id,
            )));
        }
        if self.count > MAX_TOP_ROUTES {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'count' field cannot exceed {}", MAX_TOP_ROUTES),
                request_id,
            )));
        }
        Ok(())
    }
}

/// Query parameters for `GET /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub term: String,
}

impl Validate for SearchQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require(&self.start, "start", request_id)?;
        require(&self.end, "end", request_id)?;
        require(&self.term, "term", request_id)
    }
}

/// Query parameters for `GET /traffic`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficQuery {
    #[serde(default)]
    pub location: String,
}

impl Validate for TrafficQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require(&self.location, "location", request_id)
    }
}

/// JSON body for `POST /route`.
///
/// `algorithm` accepts `shortest`/`dijkstra` and `optimal`/`a-star`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: String,
    pub end: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "shortest".to_string()
}

impl RouteRequest {
    /// Parsed algorithm; call after [`Validate::validate`] succeeded.
    pub fn route_algorithm(&self) -> RouteAlgorithm {
        self.algorithm.parse().unwrap_or_default()
    }
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require(&self.start, "start", request_id)?;
        require(&self.end, "end", request_id)?;

        if let Err(err) = self.algorithm.parse::<RouteAlgorithm>() {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'algorithm' field is invalid: {}", err),
                request_id,
            )));
        }
        Ok(())
    }
}
