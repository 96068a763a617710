//! Accessor extraction over JSON source records.
//!
//! Extraction failures are reported as reasons, not errors; the store decides
//! whether a malformed record is skipped or aborts ingestion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::datum::ScalarValue;

/// Accessor layout of one series spec: which record fields feed which
/// channels, and how series identity is split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayout {
    pub spec_id: String,
    pub x_accessor: String,
    /// One raw series is produced per y accessor.
    pub y_accessors: Vec<String>,
    /// Optional lower-bound accessors for banded series, parallel to
    /// `y_accessors`.
    #[serde(default)]
    pub y0_accessors: Option<Vec<String>>,
    /// Declared order is identity order: split values are serialized into the
    /// series key in this order.
    #[serde(default)]
    pub split_accessors: Vec<String>,
    #[serde(default)]
    pub mark_accessor: Option<String>,
}

impl SeriesLayout {
    #[must_use]
    pub fn new(spec_id: &str, x_accessor: &str, y_accessor: &str) -> Self {
        Self {
            spec_id: spec_id.to_owned(),
            x_accessor: x_accessor.to_owned(),
            y_accessors: vec![y_accessor.to_owned()],
            y0_accessors: None,
            split_accessors: Vec::new(),
            mark_accessor: None,
        }
    }
}

/// Required scalar field (the x accessor). Absence, null and non-scalar
/// values are malformed.
pub(crate) fn scalar_field(record: &Value, accessor: &str) -> Result<ScalarValue, String> {
    match record.get(accessor) {
        None => Err(format!("record is missing accessor `{accessor}`")),
        Some(Value::Null) => Err(format!("accessor `{accessor}` must not be null")),
        Some(Value::Number(number)) => finite_number(number, accessor).map(ScalarValue::Num),
        Some(Value::String(label)) => Ok(ScalarValue::Str(label.clone())),
        Some(_) => Err(format!("accessor `{accessor}` must be a number or string")),
    }
}

/// Optional scalar field (split accessors). Absence and null read as `None`;
/// a present non-scalar value is malformed.
pub(crate) fn optional_scalar_field(
    record: &Value,
    accessor: &str,
) -> Result<Option<ScalarValue>, String> {
    match record.get(accessor) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            finite_number(number, accessor).map(|value| Some(ScalarValue::Num(value)))
        }
        Some(Value::String(label)) => Ok(Some(ScalarValue::Str(label.clone()))),
        Some(_) => Err(format!("accessor `{accessor}` must be a number or string")),
    }
}

/// Required numeric channel (the y accessor). Absence is malformed; null is
/// an explicit null the fit engine may fill.
pub(crate) fn required_number_field(
    record: &Value,
    accessor: &str,
) -> Result<Option<f64>, String> {
    match record.get(accessor) {
        None => Err(format!("record is missing accessor `{accessor}`")),
        Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => finite_number(number, accessor).map(Some),
        Some(_) => Err(format!("accessor `{accessor}` must be a number or null")),
    }
}

/// Optional numeric channel (y0, mark). Absence and null read as `None`; a
/// present non-numeric value is malformed.
pub(crate) fn optional_number_field(
    record: &Value,
    accessor: &str,
) -> Result<Option<f64>, String> {
    match record.get(accessor) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => finite_number(number, accessor).map(Some),
        Some(_) => Err(format!("accessor `{accessor}` must be a number or null")),
    }
}

fn finite_number(number: &serde_json::Number, accessor: &str) -> Result<f64, String> {
    number
        .as_f64()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("accessor `{accessor}` must be a finite number"))
}
