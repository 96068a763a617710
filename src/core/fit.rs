//! Fit function engine: fills gaps in the y-value channels of a
//! domain-aligned series according to a selected strategy.
//!
//! A gap is a domain position lacking a resolved value, whether the source
//! reported an explicit null or never reported the position at all. Every
//! strategy produces a new sequence and records fill provenance; input is
//! never mutated.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::datum::{FillMeta, FitKind};
use crate::core::domain::{AlignedSeries, Slot};
use crate::error::{SeriesError, SeriesResult};

/// Gap-filling strategy. Closed set; unknown identifiers fail at
/// configuration time, never per datum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FitStrategy {
    /// Leave gaps unfilled; the renderer must skip them.
    None,
    /// Fill gaps with `0`.
    Zero,
    /// Fill with the nearest preceding value; leading gaps stay unfilled.
    Carry,
    /// Fill with the nearest following value; trailing gaps stay unfilled.
    Lookahead,
    /// Fill interior gaps with the arithmetic mean of the bounding values;
    /// edge gaps stay unfilled.
    Average,
    /// Positional interpolation between the bounding values; edge gaps stay
    /// unfilled.
    Linear,
    /// Fill every gap with a caller-supplied constant.
    Explicit { value: f64 },
}

impl FitStrategy {
    /// Resolves a strategy identifier, failing fast before any datum is
    /// touched. `explicit` requires a fill value.
    pub fn from_id(id: &str, explicit_value: Option<f64>) -> SeriesResult<Self> {
        match id {
            "none" => Ok(Self::None),
            "zero" => Ok(Self::Zero),
            "carry" => Ok(Self::Carry),
            "lookahead" => Ok(Self::Lookahead),
            "average" => Ok(Self::Average),
            "linear" => Ok(Self::Linear),
            "explicit" => explicit_value
                .map(|value| Self::Explicit { value })
                .ok_or_else(|| {
                    SeriesError::InvalidConfig(
                        "explicit fit strategy requires a fill value".to_owned(),
                    )
                }),
            unknown => Err(SeriesError::UnknownFitStrategy(unknown.to_owned())),
        }
    }

    #[must_use]
    pub fn kind(self) -> Option<FitKind> {
        match self {
            Self::None => None,
            Self::Zero => Some(FitKind::Zero),
            Self::Carry => Some(FitKind::Carry),
            Self::Lookahead => Some(FitKind::Lookahead),
            Self::Average => Some(FitKind::Average),
            Self::Linear => Some(FitKind::Linear),
            Self::Explicit { .. } => Some(FitKind::Explicit),
        }
    }
}

/// Value accessor channel of a datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Y0,
    Y1,
    Mark,
}

impl Channel {
    pub(crate) fn value_of(self, slot: &Slot) -> Option<f64> {
        let datum = slot.observed()?;
        match self {
            Self::Y0 => datum.y0,
            Self::Y1 => datum.y1,
            Self::Mark => datum.mark,
        }
    }
}

/// Strategy selection with optional per-channel overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    pub default: FitStrategy,
    #[serde(default)]
    pub y0: Option<FitStrategy>,
    #[serde(default)]
    pub y1: Option<FitStrategy>,
    #[serde(default)]
    pub mark: Option<FitStrategy>,
}

impl FitConfig {
    /// Same strategy for every channel.
    #[must_use]
    pub fn uniform(strategy: FitStrategy) -> Self {
        Self {
            default: strategy,
            y0: None,
            y1: None,
            mark: None,
        }
    }

    #[must_use]
    pub fn with_y0(mut self, strategy: FitStrategy) -> Self {
        self.y0 = Some(strategy);
        self
    }

    #[must_use]
    pub fn with_y1(mut self, strategy: FitStrategy) -> Self {
        self.y1 = Some(strategy);
        self
    }

    #[must_use]
    pub fn with_mark(mut self, strategy: FitStrategy) -> Self {
        self.mark = Some(strategy);
        self
    }

    #[must_use]
    pub fn strategy_for(self, channel: Channel) -> FitStrategy {
        let override_for = match channel {
            Channel::Y0 => self.y0,
            Channel::Y1 => self.y1,
            Channel::Mark => self.mark,
        };
        override_for.unwrap_or(self.default)
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::uniform(FitStrategy::None)
    }
}

/// One fitted channel value: the resolved value (if any) and its fill
/// provenance (`None` when the value came from the source).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedValue {
    pub value: Option<f64>,
    pub fill: Option<FillMeta>,
}

impl FittedValue {
    fn present(value: f64) -> Self {
        Self {
            value: Some(value),
            fill: None,
        }
    }

    fn gap() -> Self {
        Self {
            value: None,
            fill: None,
        }
    }

    fn filled(value: f64, strategy: FitKind, donor: Option<usize>) -> Self {
        Self {
            value: Some(value),
            fill: Some(FillMeta { strategy, donor }),
        }
    }
}

/// All three channels of one series after fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFits {
    pub y1: Vec<FittedValue>,
    pub y0: Vec<FittedValue>,
    pub mark: Vec<FittedValue>,
}

/// Fits every channel of one aligned series independently.
#[must_use]
pub fn fit_series(aligned: &AlignedSeries, config: FitConfig) -> ChannelFits {
    ChannelFits {
        y1: fit_channel(
            &channel_values(aligned, Channel::Y1),
            config.strategy_for(Channel::Y1),
        ),
        y0: fit_channel(
            &channel_values(aligned, Channel::Y0),
            config.strategy_for(Channel::Y0),
        ),
        mark: fit_channel(
            &channel_values(aligned, Channel::Mark),
            config.strategy_for(Channel::Mark),
        ),
    }
}

fn channel_values(aligned: &AlignedSeries, channel: Channel) -> Vec<Option<f64>> {
    aligned
        .slots
        .iter()
        .map(|slot| channel.value_of(slot))
        .collect()
}

/// Fills gaps in one channel sequence, producing a new sequence.
///
/// Edge policy is uniform: a strategy that lacks a needed neighbor leaves the
/// position as a gap, never defaulting to zero.
#[must_use]
pub fn fit_channel(values: &[Option<f64>], strategy: FitStrategy) -> Vec<FittedValue> {
    match strategy {
        FitStrategy::None => values
            .iter()
            .map(|value| match value {
                Some(resolved) => FittedValue::present(*resolved),
                None => FittedValue::gap(),
            })
            .collect(),
        FitStrategy::Zero => fill_constant(values, 0.0, FitKind::Zero),
        FitStrategy::Explicit { value } => fill_constant(values, value, FitKind::Explicit),
        FitStrategy::Carry => fill_carry(values),
        FitStrategy::Lookahead => fill_lookahead(values),
        FitStrategy::Average => fill_bounded(values, FitKind::Average, |v0, v1, _, _, _| {
            (v0 + v1) / 2.0
        }),
        FitStrategy::Linear => fill_bounded(values, FitKind::Linear, |v0, v1, i, p, n| {
            v0 + (v1 - v0) * ((i - p) as f64) / ((n - p) as f64)
        }),
    }
}

fn fill_constant(values: &[Option<f64>], constant: f64, kind: FitKind) -> Vec<FittedValue> {
    values
        .iter()
        .map(|value| match value {
            Some(resolved) => FittedValue::present(*resolved),
            None => FittedValue::filled(constant, kind, None),
        })
        .collect()
}

fn fill_carry(values: &[Option<f64>]) -> Vec<FittedValue> {
    let mut out = Vec::with_capacity(values.len());
    let mut last: Option<(usize, f64)> = None;
    for (position, value) in values.iter().enumerate() {
        match value {
            Some(resolved) => {
                last = Some((position, *resolved));
                out.push(FittedValue::present(*resolved));
            }
            None => out.push(match last {
                Some((donor, resolved)) => {
                    FittedValue::filled(resolved, FitKind::Carry, Some(donor))
                }
                None => FittedValue::gap(),
            }),
        }
    }
    out
}

fn fill_lookahead(values: &[Option<f64>]) -> Vec<FittedValue> {
    let mut out = vec![FittedValue::gap(); values.len()];
    let mut next: Option<(usize, f64)> = None;
    for (position, value) in values.iter().enumerate().rev() {
        match value {
            Some(resolved) => {
                next = Some((position, *resolved));
                out[position] = FittedValue::present(*resolved);
            }
            None => {
                if let Some((donor, resolved)) = next {
                    out[position] = FittedValue::filled(resolved, FitKind::Lookahead, Some(donor));
                }
            }
        }
    }
    out
}

fn fill_bounded(
    values: &[Option<f64>],
    kind: FitKind,
    combine: impl Fn(f64, f64, usize, usize, usize) -> f64,
) -> Vec<FittedValue> {
    let preceding = preceding_resolved(values);
    let following = following_resolved(values);

    values
        .iter()
        .enumerate()
        .map(|(position, value)| match value {
            Some(resolved) => FittedValue::present(*resolved),
            None => match (preceding[position], following[position]) {
                (Some((before, v0)), Some((after, v1))) => {
                    let filled = combine(v0, v1, position, before, after);
                    let donor = nearer_donor(position, before, after);
                    FittedValue::filled(filled, kind, Some(donor))
                }
                _ => FittedValue::gap(),
            },
        })
        .collect()
}

/// Nearest resolved `(position, value)` strictly before each position.
fn preceding_resolved(values: &[Option<f64>]) -> Vec<Option<(usize, f64)>> {
    let mut out = Vec::with_capacity(values.len());
    let mut last = None;
    for (position, value) in values.iter().enumerate() {
        out.push(last);
        if let Some(resolved) = value {
            last = Some((position, *resolved));
        }
    }
    out
}

/// Nearest resolved `(position, value)` strictly after each position.
fn following_resolved(values: &[Option<f64>]) -> Vec<Option<(usize, f64)>> {
    let mut out = vec![None; values.len()];
    let mut next = None;
    for (position, value) in values.iter().enumerate().rev() {
        out[position] = next;
        if let Some(resolved) = value {
            next = Some((position, *resolved));
        }
    }
    out
}

/// Picks the nearer of the two bounding donors; the preceding donor wins
/// ties (stable sort keeps its candidate first).
fn nearer_donor(position: usize, preceding: usize, following: usize) -> usize {
    let mut candidates: SmallVec<[(OrderedFloat<f64>, usize); 2]> = SmallVec::new();
    candidates.push((OrderedFloat((position - preceding) as f64), preceding));
    candidates.push((OrderedFloat((following - position) as f64), following));
    candidates.sort_by_key(|(distance, _)| *distance);
    candidates[0].1
}
