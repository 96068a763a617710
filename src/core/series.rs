use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::datum::{DataSeriesDatum, FullDataSeriesDatum, RawDataSeriesDatum, ScalarValue};

/// One series of observations before fitting, grouped by spec identity and
/// split-accessor values. `data` preserves source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataSeries {
    pub spec_id: String,
    pub series_keys: Vec<String>,
    pub y_accessor: String,
    pub split_accessors: IndexMap<String, ScalarValue>,
    pub key: String,
    pub data: Vec<RawDataSeriesDatum>,
}

/// One fitted series, aligned to the unified x-domain.
///
/// Identity metadata carries over unchanged from the raw series; `data` is
/// rebuilt wholesale on each fitting pass. `empty` flags series where no
/// datum survived as a full datum, so renderers can short-circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSeries {
    pub spec_id: String,
    pub series_keys: Vec<String>,
    pub y_accessor: String,
    pub split_accessors: IndexMap<String, ScalarValue>,
    pub key: String,
    pub data: Vec<DataSeriesDatum>,
    pub empty: bool,
}

impl DataSeries {
    /// Datums with x and y1 resolved, carrying their fitting index.
    #[must_use]
    pub fn full_data(&self) -> Vec<FullDataSeriesDatum> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(position, datum)| datum.to_full(position))
            .collect()
    }
}

/// Derives the ordered series identity: split values in declared order, the
/// y accessor when several are declared, falling back to the spec id. The key
/// is the stable `|`-joined serialization, computed once at grouping time.
#[must_use]
pub fn derive_series_keys(
    spec_id: &str,
    y_accessor: &str,
    split_values: &IndexMap<String, ScalarValue>,
    multiple_y_accessors: bool,
) -> (Vec<String>, String) {
    let mut series_keys: Vec<String> = split_values.values().map(ToString::to_string).collect();
    if multiple_y_accessors {
        series_keys.push(y_accessor.to_owned());
    }
    if series_keys.is_empty() {
        series_keys.push(spec_id.to_owned());
    }
    let key = series_keys.join("|");
    (series_keys, key)
}
