use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::RouteError;

// ---------------------------------------------------------------------------
// Route – one row of the route table
// ---------------------------------------------------------------------------

/// One directed trade relationship between two countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    /// May equal `origin` (self-trade is allowed).
    pub destination: String,
    /// Trade volume in billions of currency units.
    pub volume: f64,
    /// Fractional tariff burden, expected in `[0, 1]`.
    pub tariff_impact: f64,
}

impl Route {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        volume: f64,
        tariff_impact: f64,
    ) -> Self {
        Route {
            origin: origin.into(),
            destination: destination.into(),
            volume,
            tariff_impact,
        }
    }

    /// Check the record against its field domains.
    ///
    /// `index` is only used to label the error.
    pub fn validate(&self, index: usize) -> Result<(), RouteError> {
        if self.origin.trim().is_empty() {
            return Err(RouteError::malformed(index, "empty origin"));
        }
        if self.destination.trim().is_empty() {
            return Err(RouteError::malformed(index, "empty destination"));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(RouteError::malformed(
                index,
                format!("volume {} is not a non-negative number", self.volume),
            ));
        }
        if !(0.0..=1.0).contains(&self.tariff_impact) {
            return Err(RouteError::malformed(
                index,
                format!("tariff impact {} is outside [0, 1]", self.tariff_impact),
            ));
        }
        Ok(())
    }

    /// Hover text shown on the map.
    pub fn tooltip(&self) -> String {
        format!(
            "Route: {self}\nTrade Volume: {}B USD\nTariff Impact: {:.1}%",
            self.volume,
            self.tariff_impact * 100.0
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.origin, self.destination)
    }
}

// ---------------------------------------------------------------------------
// RouteRecord – loosely typed input row
// ---------------------------------------------------------------------------

/// A route as it appears in an input file, before validation.
///
/// Every field is optional so a missing column produces a
/// [`RouteError::MalformedRoute`] naming the field instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteRecord {
    pub origin: Option<String>,
    #[serde(alias = "dest")]
    pub destination: Option<String>,
    pub volume: Option<f64>,
    #[serde(alias = "tariffImpact")]
    pub tariff_impact: Option<f64>,
}

impl RouteRecord {
    pub fn into_route(self, index: usize) -> Result<Route, RouteError> {
        let missing = |field: &str| RouteError::malformed(index, format!("missing `{field}`"));
        let route = Route {
            origin: self.origin.ok_or_else(|| missing("origin"))?,
            destination: self.destination.ok_or_else(|| missing("destination"))?,
            volume: self.volume.ok_or_else(|| missing("volume"))?,
            tariff_impact: self.tariff_impact.ok_or_else(|| missing("tariff_impact"))?,
        };
        route.validate(index)?;
        Ok(route)
    }
}

// ---------------------------------------------------------------------------
// RouteDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full route table with a pre-computed country index.
#[derive(Debug, Clone, Default)]
pub struct RouteDataset {
    /// All routes, in source order.
    pub routes: Vec<Route>,
    /// Sorted set of every origin and destination mentioned.
    pub countries: BTreeSet<String>,
}

impl RouteDataset {
    /// Build the country index from the given routes.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let countries = routes
            .iter()
            .flat_map(|r| [r.origin.clone(), r.destination.clone()])
            .collect();
        RouteDataset { routes, countries }
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Largest finite volume in the table, if any.
    pub fn max_volume(&self) -> Option<f64> {
        self.routes
            .iter()
            .map(|r| r.volume)
            .filter(|v| v.is_finite())
            .max_by(f64::total_cmp)
    }
}

// ---------------------------------------------------------------------------
// FilterThresholds – the two slider values
// ---------------------------------------------------------------------------

/// User-configured bounds applied by [`crate::data::filter::filter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterThresholds {
    /// Routes with `volume < min_volume` are excluded.
    pub min_volume: f64,
    /// Routes with `tariff_impact > max_tariff_impact` are excluded.
    pub max_tariff_impact: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            min_volume: 0.0,
            max_tariff_impact: 1.0,
        }
    }
}

impl FilterThresholds {
    /// Build thresholds from the integer slider positions; the tariff slider
    /// is in percent.
    pub fn from_slider(min_volume: u32, max_tariff_percent: u32) -> Self {
        Self {
            min_volume: f64::from(min_volume),
            max_tariff_impact: f64::from(max_tariff_percent) / 100.0,
        }
    }

    /// Range check. The filter itself never calls this.
    pub fn validate(&self) -> Result<(), RouteError> {
        if !(self.min_volume >= 0.0) {
            return Err(RouteError::InvalidThreshold {
                name: "min_volume",
                value: self.min_volume,
            });
        }
        if !(0.0..=1.0).contains(&self.max_tariff_impact) {
            return Err(RouteError::InvalidThreshold {
                name: "max_tariff_impact",
                value: self.max_tariff_impact,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filter output
// ---------------------------------------------------------------------------

/// Aggregates over a filtered route set. Averages are `None` when no route
/// survived, so callers never show a misleading zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryMetrics {
    pub route_count: usize,
    pub average_volume: Option<f64>,
    pub average_tariff_impact: Option<f64>,
}

/// Placeholder shown for an undefined average.
pub const UNDEFINED_METRIC: &str = "n/a";

impl SummaryMetrics {
    pub fn average_volume_label(&self) -> String {
        self.average_volume
            .map(|v| format!("${v:.1}B"))
            .unwrap_or_else(|| UNDEFINED_METRIC.to_string())
    }

    pub fn average_tariff_label(&self) -> String {
        self.average_tariff_impact
            .map(|t| format!("{:.1}%", t * 100.0))
            .unwrap_or_else(|| UNDEFINED_METRIC.to_string())
    }
}

/// The routes that passed the thresholds plus their summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredResult {
    pub routes: Vec<Route>,
    pub metrics: SummaryMetrics,
}
