use trade_atlas::color::CountryColors;
use trade_atlas::data::filter::{filter, filtered_indices};
use trade_atlas::data::model::{FilterThresholds, FilteredResult, RouteDataset};
use trade_atlas::data::sample::sample_dataset;
use trade_atlas::geo::CountryLocator;

/// Default upper end of the volume slider, in billions.
const MIN_VOLUME_SLIDER_MAX: u32 = 100;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// How route lines are coloured on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    TariffImpact,
    Origin,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TariffImpact => "Tariff impact",
            ColorMode::Origin => "Origin country",
        }
    }
}

/// The full UI state, independent of rendering.
///
/// Everything derived (`result`, `visible_indices`) is recomputed from
/// `dataset` and the slider values whenever either changes.
pub struct AppState {
    /// Active route table.
    pub dataset: RouteDataset,

    /// Where `dataset` came from, shown in the top bar.
    pub source: String,

    /// Slider position: minimum trade volume (billions).
    pub min_volume: u32,

    /// Slider position: maximum tariff impact (percent).
    pub max_tariff_percent: u32,

    /// Routes and metrics passing the current thresholds (cached).
    pub result: FilteredResult,

    /// Dataset indices of the routes in `result`, for the route table.
    pub visible_indices: Vec<usize>,

    /// Country → coordinate table used by the map.
    pub locator: CountryLocator,

    pub color_mode: ColorMode,

    /// Per-origin colours for [`ColorMode::Origin`].
    pub country_colors: CountryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            dataset: RouteDataset::default(),
            source: String::new(),
            min_volume: 0,
            max_tariff_percent: 100,
            result: FilteredResult::default(),
            visible_indices: Vec::new(),
            locator: CountryLocator::builtin(),
            color_mode: ColorMode::default(),
            country_colors: CountryColors::default(),
            status_message: None,
        };
        state.set_dataset(sample_dataset(), "built-in sample");
        state
    }
}

impl AppState {
    /// Ingest a new dataset, reset the sliders and recompute.
    pub fn set_dataset(&mut self, dataset: RouteDataset, source: impl Into<String>) {
        self.country_colors = CountryColors::new(&dataset.countries);
        self.dataset = dataset;
        self.source = source.into();
        self.status_message = None;
        self.reset_filters();
    }

    pub fn thresholds(&self) -> FilterThresholds {
        FilterThresholds::from_slider(self.min_volume, self.max_tariff_percent)
    }

    /// Upper bound of the volume slider: 100, or the largest volume if the
    /// table holds bigger routes.
    pub fn min_volume_slider_max(&self) -> u32 {
        self.dataset
            .max_volume()
            .map(|v| v.ceil().clamp(0.0, f64::from(u32::MAX)) as u32)
            .unwrap_or(0)
            .max(MIN_VOLUME_SLIDER_MAX)
    }

    /// Recompute `result` after a slider or dataset change.
    pub fn refilter(&mut self) {
        let thresholds = self.thresholds();
        self.result = filter(&self.dataset, &thresholds);
        self.visible_indices = filtered_indices(&self.dataset, &thresholds);
        log::debug!(
            "Refiltered with {thresholds:?}: {} of {} routes",
            self.result.metrics.route_count,
            self.dataset.len()
        );
    }

    pub fn set_min_volume(&mut self, value: u32) {
        if value != self.min_volume {
            self.min_volume = value.min(self.min_volume_slider_max());
            self.refilter();
        }
    }

    pub fn set_max_tariff_percent(&mut self, value: u32) {
        if value != self.max_tariff_percent {
            self.max_tariff_percent = value.min(100);
            self.refilter();
        }
    }

    /// Back to identity thresholds.
    pub fn reset_filters(&mut self) {
        self.min_volume = 0;
        self.max_tariff_percent = 100;
        self.refilter();
    }

    /// Number of visible routes the map cannot draw for lack of coordinates.
    pub fn unplotted_count(&self) -> usize {
        self.result
            .routes
            .iter()
            .filter(|r| self.locator.resolve_pair(&r.origin, &r.destination).is_none())
            .count()
    }
}
