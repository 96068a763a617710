//! Datum assembler: merges fitted channels with original values and source
//! records into the final [`DataSeries`].

use crate::core::datum::{DataSeriesDatum, FilledChannels};
use crate::core::domain::{AlignedSeries, XDomain};
use crate::core::fit::ChannelFits;
use crate::core::series::{DataSeries, RawDataSeries};

/// Builds the fitted series from one aligned series and its channel fits.
///
/// `initial_y0`/`initial_y1` are straight copies of the pre-fit values, so a
/// present initial value always equals the fitted one. Identity metadata
/// carries over unchanged; the output owns a brand-new datum sequence.
#[must_use]
pub fn assemble_series(
    raw: &RawDataSeries,
    domain: &XDomain,
    aligned: &AlignedSeries,
    fits: &ChannelFits,
) -> DataSeries {
    let mut data = Vec::with_capacity(aligned.slots.len());
    for (position, (x, slot)) in domain.iter().zip(aligned.slots.iter()).enumerate() {
        let observed = slot.observed();
        let y1 = fits.y1[position];
        let y0 = fits.y0[position];
        let mark = fits.mark[position];
        data.push(DataSeriesDatum {
            x,
            y1: y1.value,
            y0: y0.value,
            mark: mark.value,
            initial_y1: observed.and_then(|datum| datum.y1),
            initial_y0: observed.and_then(|datum| datum.y0),
            filled: FilledChannels {
                y0: y0.fill,
                y1: y1.fill,
                mark: mark.fill,
            },
            datum: observed.map(|datum| datum.datum.clone()),
        });
    }

    let empty = !data.iter().any(DataSeriesDatum::is_full);
    DataSeries {
        spec_id: raw.spec_id.clone(),
        series_keys: raw.series_keys.clone(),
        y_accessor: raw.y_accessor.clone(),
        split_accessors: raw.split_accessors.clone(),
        key: raw.key.clone(),
        data,
        empty,
    }
}
