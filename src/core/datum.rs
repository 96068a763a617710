use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number-or-string scalar extracted by an accessor (x values, split values).
///
/// Numeric equality, hashing and ordering go through `OrderedFloat` so the
/// value can key ordered sets and maps deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Num(f64),
    Str(String),
}

impl ScalarValue {
    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    #[must_use]
    pub fn is_num(&self) -> bool {
        matches!(self, Self::Num(_))
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(value) => write!(f, "{value}"),
            Self::Str(label) => f.write_str(label),
        }
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Num(value) => {
                state.write_u8(0);
                OrderedFloat(*value).hash(state);
            }
            Self::Str(label) => {
                state.write_u8(1);
                label.hash(state);
            }
        }
    }
}

impl PartialOrd for ScalarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalarValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Num(_), Self::Str(_)) => Ordering::Less,
            (Self::Str(_), Self::Num(_)) => Ordering::Greater,
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(label: &str) -> Self {
        Self::Str(label.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(label: String) -> Self {
        Self::Str(label)
    }
}

/// One observation before fitting.
///
/// `datum` is the original source record; it never reflects synthesized data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataSeriesDatum {
    pub x: ScalarValue,
    pub y1: Option<f64>,
    pub y0: Option<f64>,
    pub mark: Option<f64>,
    pub datum: Value,
}

impl RawDataSeriesDatum {
    #[must_use]
    pub fn new(x: impl Into<ScalarValue>, y1: Option<f64>) -> Self {
        Self {
            x: x.into(),
            y1,
            y0: None,
            mark: None,
            datum: Value::Null,
        }
    }

    #[must_use]
    pub fn with_y0(mut self, y0: Option<f64>) -> Self {
        self.y0 = y0;
        self
    }

    #[must_use]
    pub fn with_mark(mut self, mark: Option<f64>) -> Self {
        self.mark = mark;
        self
    }

    #[must_use]
    pub fn with_datum(mut self, datum: Value) -> Self {
        self.datum = datum;
        self
    }
}

/// Strategy that synthesized a filled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitKind {
    Zero,
    Carry,
    Lookahead,
    Average,
    Linear,
    Explicit,
}

/// Fill provenance for one synthesized channel value.
///
/// `donor` is the domain position of the nearest original datum whose value
/// was borrowed; constant fills (`zero`, `explicit`) have no donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillMeta {
    pub strategy: FitKind,
    pub donor: Option<usize>,
}

/// Per-channel fill provenance of one fitted datum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledChannels {
    pub y0: Option<FillMeta>,
    pub y1: Option<FillMeta>,
    pub mark: Option<FillMeta>,
}

impl FilledChannels {
    #[must_use]
    pub fn any(&self) -> bool {
        self.y0.is_some() || self.y1.is_some() || self.mark.is_some()
    }
}

/// One datum after fitting.
///
/// `initial_y1`/`initial_y0` are the pre-fit values; a present initial value
/// is never overwritten by fitting. `datum` is the original source record,
/// `None` for positions synthesized from the unified domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSeriesDatum {
    pub x: ScalarValue,
    pub y1: Option<f64>,
    pub y0: Option<f64>,
    pub mark: Option<f64>,
    pub initial_y1: Option<f64>,
    pub initial_y0: Option<f64>,
    pub filled: FilledChannels,
    pub datum: Option<Value>,
}

impl DataSeriesDatum {
    /// A datum is full when both x and y1 are resolved; only full datums are
    /// eligible for rendering and scaling.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.y1.is_some()
    }

    /// Refines this datum into a [`FullDataSeriesDatum`] at the given domain
    /// position, or `None` when y1 is unresolved.
    #[must_use]
    pub fn to_full(&self, position: usize) -> Option<FullDataSeriesDatum> {
        let y1 = self.y1?;
        let fitting_index = self
            .filled
            .y1
            .and_then(|fill| fill.donor)
            .unwrap_or(position);
        Some(FullDataSeriesDatum {
            x: self.x.clone(),
            y1,
            y0: self.y0,
            mark: self.mark,
            initial_y1: self.initial_y1,
            initial_y0: self.initial_y0,
            datum: self.datum.clone(),
            fitting_index,
        })
    }
}

/// Datum refinement with x and y1 guaranteed resolved.
///
/// `fitting_index` is the domain position of the original datum that donated
/// the y1 value, or the datum's own position when the value was not fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullDataSeriesDatum {
    pub x: ScalarValue,
    pub y1: f64,
    pub y0: Option<f64>,
    pub mark: Option<f64>,
    pub initial_y1: Option<f64>,
    pub initial_y0: Option<f64>,
    pub datum: Option<Value>,
    pub fitting_index: usize,
}
