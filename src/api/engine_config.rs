use serde::{Deserialize, Serialize};

use crate::core::{DedupePolicy, FitConfig, FitStrategy, MalformedPolicy, ScaleKind, SeriesLayout};
use crate::error::{SeriesError, SeriesResult};

/// Public engine configuration: accessor layout, x-scale typing, ingest
/// policies and fit strategy selection.
///
/// Serializable so host applications can persist/load series setup without
/// inventing their own ad-hoc format. The dedupe policy is a required
/// constructor argument; there is no silent default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub layout: SeriesLayout,
    #[serde(default)]
    pub x_scale: ScaleKind,
    pub dedupe: DedupePolicy,
    #[serde(default)]
    pub malformed: MalformedPolicy,
    #[serde(default)]
    pub fit: FitConfig,
}

impl SeriesConfig {
    /// Creates a minimal config with a single y accessor and no fitting.
    #[must_use]
    pub fn new(spec_id: &str, x_accessor: &str, y_accessor: &str, dedupe: DedupePolicy) -> Self {
        Self {
            layout: SeriesLayout::new(spec_id, x_accessor, y_accessor),
            x_scale: ScaleKind::default(),
            dedupe,
            malformed: MalformedPolicy::default(),
            fit: FitConfig::default(),
        }
    }

    /// Replaces the declared y accessors (one series per accessor).
    #[must_use]
    pub fn with_y_accessors(mut self, y_accessors: Vec<String>) -> Self {
        self.layout.y_accessors = y_accessors;
        self
    }

    /// Declares lower-bound accessors for banded series, parallel to the y
    /// accessors.
    #[must_use]
    pub fn with_y0_accessors(mut self, y0_accessors: Vec<String>) -> Self {
        self.layout.y0_accessors = Some(y0_accessors);
        self
    }

    /// Declares split accessors; declared order is identity order.
    #[must_use]
    pub fn with_split_accessors(mut self, split_accessors: Vec<String>) -> Self {
        self.layout.split_accessors = split_accessors;
        self
    }

    /// Declares the mark accessor.
    #[must_use]
    pub fn with_mark_accessor(mut self, mark_accessor: &str) -> Self {
        self.layout.mark_accessor = Some(mark_accessor.to_owned());
        self
    }

    /// Sets the x-scale typing used by the domain indexer.
    #[must_use]
    pub fn with_x_scale(mut self, x_scale: ScaleKind) -> Self {
        self.x_scale = x_scale;
        self
    }

    /// Sets the malformed-record policy.
    #[must_use]
    pub fn with_malformed_policy(mut self, malformed: MalformedPolicy) -> Self {
        self.malformed = malformed;
        self
    }

    /// Sets the full fit configuration (per-channel overrides included).
    #[must_use]
    pub fn with_fit(mut self, fit: FitConfig) -> Self {
        self.fit = fit;
        self
    }

    /// Sets the default fit strategy for every channel.
    #[must_use]
    pub fn with_fit_function(mut self, strategy: FitStrategy) -> Self {
        self.fit.default = strategy;
        self
    }

    /// Resolves and sets the default fit strategy from an identifier,
    /// failing fast on unknown identifiers before any data is processed.
    pub fn with_fit_function_id(
        mut self,
        id: &str,
        explicit_value: Option<f64>,
    ) -> SeriesResult<Self> {
        self.fit.default = FitStrategy::from_id(id, explicit_value)?;
        Ok(self)
    }

    /// Validates structural invariants the engine relies on.
    pub fn validate(&self) -> SeriesResult<()> {
        if self.layout.spec_id.is_empty() {
            return Err(SeriesError::InvalidConfig("spec id must not be empty".to_owned()));
        }
        if self.layout.x_accessor.is_empty() {
            return Err(SeriesError::InvalidConfig(
                "x accessor must not be empty".to_owned(),
            ));
        }
        if self.layout.y_accessors.is_empty() {
            return Err(SeriesError::InvalidConfig(
                "at least one y accessor is required".to_owned(),
            ));
        }
        if self
            .layout
            .y_accessors
            .iter()
            .any(|accessor| accessor.is_empty())
        {
            return Err(SeriesError::InvalidConfig(
                "y accessors must not be empty".to_owned(),
            ));
        }
        if let Some(y0_accessors) = &self.layout.y0_accessors {
            if y0_accessors.len() != self.layout.y_accessors.len() {
                return Err(SeriesError::InvalidConfig(format!(
                    "y0 accessor count ({}) must match y accessor count ({})",
                    y0_accessors.len(),
                    self.layout.y_accessors.len()
                )));
            }
        }
        if self
            .layout
            .split_accessors
            .iter()
            .any(|accessor| accessor.is_empty())
        {
            return Err(SeriesError::InvalidConfig(
                "split accessors must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> SeriesResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SeriesError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> SeriesResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| SeriesError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}
