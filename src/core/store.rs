//! Raw series store: groups flat source records into [`RawDataSeries`], one
//! per distinct (spec, y accessor, split values) combination.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::accessor::{
    SeriesLayout, optional_number_field, optional_scalar_field, required_number_field,
    scalar_field,
};
use crate::core::datum::{RawDataSeriesDatum, ScalarValue};
use crate::core::series::{RawDataSeries, derive_series_keys};
use crate::error::{SeriesError, SeriesResult};

/// Duplicate-x handling within one series. The policy is a caller decision
/// and has no default; nothing is ever dropped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupePolicy {
    /// Keep the first occurrence's position with the last occurrence's
    /// values; replacements are counted.
    LastWins,
    /// Fail with [`SeriesError::DuplicateDatum`] on the first duplicate.
    Reject,
}

/// Handling of records violating a declared accessor contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Skip the record and count it.
    #[default]
    Skip,
    /// Fail with [`SeriesError::MalformedDatum`] on the first violation.
    Abort,
}

/// Ingestion counters surfaced alongside the grouped series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub records: usize,
    pub malformed_skipped: usize,
    pub duplicates_replaced: usize,
}

/// Channel values of one record, extracted once before grouping.
struct RecordFields {
    x: ScalarValue,
    splits: IndexMap<String, ScalarValue>,
    mark: Option<f64>,
    /// `(y1, y0)` per declared y accessor.
    ys: Vec<(Option<f64>, Option<f64>)>,
}

/// Groups source records into raw series.
///
/// Series appear in first-seen order; within a series, records preserve
/// source order. Pure function of its inputs.
pub fn group_series(
    records: &[Value],
    layout: &SeriesLayout,
    dedupe: DedupePolicy,
    malformed: MalformedPolicy,
) -> SeriesResult<(Vec<RawDataSeries>, IngestStats)> {
    let multiple_y = layout.y_accessors.len() > 1;
    let mut groups: IndexMap<String, (RawDataSeries, HashMap<ScalarValue, usize>)> =
        IndexMap::new();
    let mut stats = IngestStats {
        records: records.len(),
        ..IngestStats::default()
    };

    for (index, record) in records.iter().enumerate() {
        let fields = match extract_record(record, layout) {
            Ok(fields) => fields,
            Err(reason) => match malformed {
                MalformedPolicy::Skip => {
                    stats.malformed_skipped += 1;
                    continue;
                }
                MalformedPolicy::Abort => {
                    return Err(SeriesError::MalformedDatum { index, reason });
                }
            },
        };

        for (slot, y_accessor) in layout.y_accessors.iter().enumerate() {
            let (y1, y0) = fields.ys[slot];
            let datum = RawDataSeriesDatum {
                x: fields.x.clone(),
                y1,
                y0,
                mark: fields.mark,
                datum: record.clone(),
            };

            let (series_keys, key) = derive_series_keys(
                &layout.spec_id,
                y_accessor,
                &fields.splits,
                multiple_y,
            );
            let (series, positions) = groups.entry(key.clone()).or_insert_with(|| {
                (
                    RawDataSeries {
                        spec_id: layout.spec_id.clone(),
                        series_keys,
                        y_accessor: y_accessor.clone(),
                        split_accessors: fields.splits.clone(),
                        key,
                        data: Vec::new(),
                    },
                    HashMap::new(),
                )
            });

            match positions.entry(datum.x.clone()) {
                Entry::Occupied(occupied) => match dedupe {
                    DedupePolicy::LastWins => {
                        series.data[*occupied.get()] = datum;
                        stats.duplicates_replaced += 1;
                    }
                    DedupePolicy::Reject => {
                        return Err(SeriesError::DuplicateDatum {
                            key: series.key.clone(),
                            x: datum.x.to_string(),
                        });
                    }
                },
                Entry::Vacant(vacant) => {
                    vacant.insert(series.data.len());
                    series.data.push(datum);
                }
            }
        }
    }

    let series = groups.into_values().map(|(series, _)| series).collect();
    Ok((series, stats))
}

fn extract_record(record: &Value, layout: &SeriesLayout) -> Result<RecordFields, String> {
    let x = scalar_field(record, &layout.x_accessor)?;

    let mut splits = IndexMap::new();
    for accessor in &layout.split_accessors {
        if let Some(value) = optional_scalar_field(record, accessor)? {
            splits.insert(accessor.clone(), value);
        }
    }

    let mark = match &layout.mark_accessor {
        Some(accessor) => optional_number_field(record, accessor)?,
        None => None,
    };

    let mut ys = Vec::with_capacity(layout.y_accessors.len());
    for (slot, y_accessor) in layout.y_accessors.iter().enumerate() {
        let y1 = required_number_field(record, y_accessor)?;
        let y0 = match layout.y0_accessors.as_ref().and_then(|list| list.get(slot)) {
            Some(accessor) => optional_number_field(record, accessor)?,
            None => None,
        };
        ys.push((y1, y0));
    }

    Ok(RecordFields { x, splits, mark, ys })
}
