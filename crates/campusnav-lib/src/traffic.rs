//! Traffic conditions and travel-time adjustment.
//!
//! The routing core asks a [`TrafficAdjuster`] for the condition at the start
//! of a route every time it estimates an arrival time; nothing is cached.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default walking speed used for arrival estimates.
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 5.0;

/// Environment variable naming the campus-wide default traffic condition.
pub const TRAFFIC_DEFAULT_ENV: &str = "CAMPUSNAV_TRAFFIC_DEFAULT";

/// Coarse traffic condition at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrafficCondition {
    Light,
    #[default]
    Moderate,
    Heavy,
}

impl TrafficCondition {
    /// Travel-time multiplier applied for this condition.
    pub fn multiplier(self) -> f64 {
        match self {
            TrafficCondition::Light => 1.0,
            TrafficCondition::Moderate => 1.2,
            TrafficCondition::Heavy => 1.5,
        }
    }

    /// Lenient parse: unrecognised labels are treated as light traffic.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "heavy" => TrafficCondition::Heavy,
            "moderate" => TrafficCondition::Moderate,
            _ => TrafficCondition::Light,
        }
    }
}

impl FromStr for TrafficCondition {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for TrafficCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TrafficCondition::Light => "light",
            TrafficCondition::Moderate => "moderate",
            TrafficCondition::Heavy => "heavy",
        };
        f.write_str(value)
    }
}

/// Source of traffic conditions and the policy for scaling travel time.
///
/// Implementations must answer promptly; a remote-backed adjuster should
/// enforce its own timeout before returning.
pub trait TrafficAdjuster: Send + Sync {
    /// Current condition at `location`.
    fn condition_for(&self, location: &str) -> TrafficCondition;

    /// Scale a base travel time by the condition's multiplier, rounded to
    /// whole minutes.
    fn adjust(&self, base_minutes: u64, condition: TrafficCondition) -> u64 {
        (base_minutes as f64 * condition.multiplier()).round() as u64
    }
}

/// In-process adjuster backed by a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticTrafficAdjuster {
    default: TrafficCondition,
    overrides: HashMap<String, TrafficCondition>,
}

impl StaticTrafficAdjuster {
    pub fn new(default: TrafficCondition) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Read the default condition from [`TRAFFIC_DEFAULT_ENV`].
    pub fn from_env() -> Self {
        let default = std::env::var(TRAFFIC_DEFAULT_ENV)
            .map(|v| TrafficCondition::from_label(&v))
            .unwrap_or_default();
        Self::new(default)
    }

    pub fn with_override(mut self, location: impl Into<String>, condition: TrafficCondition) -> Self {
        self.overrides.insert(location.into(), condition);
        self
    }
}

impl TrafficAdjuster for StaticTrafficAdjuster {
    fn condition_for(&self, location: &str) -> TrafficCondition {
        self.overrides
            .get(location)
            .copied()
            .unwrap_or(self.default)
    }
}

/// Validated walking speed in km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkingSpeed(f64);

impl WalkingSpeed {
    pub fn new(kmh: f64) -> Result<Self> {
        if !kmh.is_finite() || kmh <= 0.0 {
            return Err(Error::InvalidWalkingSpeed { speed: kmh });
        }
        Ok(Self(kmh))
    }

    /// Minutes needed to walk `distance_km`, rounded.
    pub fn minutes_for(self, distance_km: f64) -> u64 {
        (distance_km / self.0 * 60.0).round() as u64
    }
}

impl Default for WalkingSpeed {
    fn default() -> Self {
        Self(DEFAULT_WALKING_SPEED_KMH)
    }
}

/// Minutes to cover `distance_km` at `speed_kmh`.
pub fn estimate_walking_minutes(distance_km: f64, speed_kmh: f64) -> Result<u64> {
    WalkingSpeed::new(speed_kmh).map(|speed| speed.minutes_for(distance_km))
}
