//! Domain indexer: computes the unified ordered x-domain of one comparison
//! group and aligns every series onto it.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::datum::{RawDataSeriesDatum, ScalarValue};
use crate::core::series::RawDataSeries;
use crate::error::{SeriesError, SeriesResult};

/// How the x channel is typed when building the unified domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    /// Infer from the data: all-numeric x is continuous, all-string x is
    /// ordinal, a mix is invalid.
    #[default]
    Auto,
    /// Numeric x only.
    Continuous,
    /// First-seen label order; numeric labels are accepted.
    Ordinal,
}

/// Unified ordered x-domain of one comparison group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XDomain {
    /// Distinct numeric x values, ascending.
    Continuous(Vec<f64>),
    /// Distinct labels in first-seen order across series in input order.
    Ordinal(Vec<ScalarValue>),
}

impl XDomain {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Continuous(values) => values.len(),
            Self::Ordinal(labels) => labels.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn value(&self, position: usize) -> Option<ScalarValue> {
        match self {
            Self::Continuous(values) => values.get(position).copied().map(ScalarValue::Num),
            Self::Ordinal(labels) => labels.get(position).cloned(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ScalarValue> + '_ {
        (0..self.len()).filter_map(|position| self.value(position))
    }
}

/// One domain position of one aligned series.
///
/// An explicit null reported by the source stays an `Observed` slot; `Absent`
/// marks positions the source never reported. Fit strategies may treat the
/// two differently downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    Absent,
    Observed(RawDataSeriesDatum),
}

impl Slot {
    #[must_use]
    pub fn observed(&self) -> Option<&RawDataSeriesDatum> {
        match self {
            Self::Absent => None,
            Self::Observed(datum) => Some(datum),
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// One series reindexed onto the unified domain, one slot per position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub slots: Vec<Slot>,
}

/// Indexer output: the unified domain plus one [`AlignedSeries`] per input
/// series, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainIndex {
    pub domain: XDomain,
    pub aligned: Vec<AlignedSeries>,
}

/// Computes the unified x-domain and aligns every series onto it.
///
/// Deterministic and side-effect free: identical input order yields an
/// identical domain and alignment, with no unordered iteration anywhere.
pub fn index_domain(series: &[RawDataSeries], scale: ScaleKind) -> SeriesResult<DomainIndex> {
    let domain = build_domain(series, scale)?;

    let mut position_of: HashMap<ScalarValue, usize> = HashMap::with_capacity(domain.len());
    for (position, value) in domain.iter().enumerate() {
        position_of.insert(value, position);
    }

    let aligned = series
        .iter()
        .map(|one| align_series(one, &position_of, domain.len()))
        .collect();

    Ok(DomainIndex { domain, aligned })
}

fn build_domain(series: &[RawDataSeries], scale: ScaleKind) -> SeriesResult<XDomain> {
    match scale {
        ScaleKind::Ordinal => Ok(ordinal_domain(series)),
        ScaleKind::Continuous => {
            if let Some((key, label)) = first_string_x(series) {
                return Err(SeriesError::InvalidDomain {
                    detail: format!(
                        "series `{key}` has string x value `{label}` under a continuous x scale"
                    ),
                });
            }
            Ok(continuous_domain(series))
        }
        ScaleKind::Auto => {
            let numeric = first_numeric_x(series);
            let string = first_string_x(series);
            match (numeric, string) {
                (Some((num_key, _)), Some((str_key, label))) => Err(SeriesError::InvalidDomain {
                    detail: format!(
                        "series group mixes numeric x (series `{num_key}`) with string x \
                         `{label}` (series `{str_key}`)"
                    ),
                }),
                (None, Some(_)) => Ok(ordinal_domain(series)),
                _ => Ok(continuous_domain(series)),
            }
        }
    }
}

fn continuous_domain(series: &[RawDataSeries]) -> XDomain {
    let mut values: BTreeSet<OrderedFloat<f64>> = BTreeSet::new();
    for one in series {
        for datum in &one.data {
            if let Some(value) = datum.x.as_num() {
                values.insert(OrderedFloat(value));
            }
        }
    }
    XDomain::Continuous(values.into_iter().map(OrderedFloat::into_inner).collect())
}

fn ordinal_domain(series: &[RawDataSeries]) -> XDomain {
    let mut labels: IndexSet<ScalarValue> = IndexSet::new();
    for one in series {
        for datum in &one.data {
            labels.insert(datum.x.clone());
        }
    }
    XDomain::Ordinal(labels.into_iter().collect())
}

fn align_series(
    series: &RawDataSeries,
    position_of: &HashMap<ScalarValue, usize>,
    domain_len: usize,
) -> AlignedSeries {
    let mut slots = vec![Slot::Absent; domain_len];
    for datum in &series.data {
        if let Some(&position) = position_of.get(&datum.x) {
            slots[position] = Slot::Observed(datum.clone());
        }
    }
    AlignedSeries { slots }
}

fn first_numeric_x(series: &[RawDataSeries]) -> Option<(String, f64)> {
    first_x(series, |x| x.as_num())
}

fn first_string_x(series: &[RawDataSeries]) -> Option<(String, String)> {
    first_x(series, |x| match x {
        ScalarValue::Str(label) => Some(label.clone()),
        ScalarValue::Num(_) => None,
    })
}

fn first_x<T>(
    series: &[RawDataSeries],
    pick: impl Fn(&ScalarValue) -> Option<T>,
) -> Option<(String, T)> {
    for one in series {
        for datum in &one.data {
            if let Some(found) = pick(&datum.x) {
                return Some((one.key.clone(), found));
            }
        }
    }
    None
}
