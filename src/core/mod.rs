pub mod accessor;
pub mod assemble;
pub mod datum;
pub mod domain;
pub mod fit;
pub mod series;
pub mod store;

pub use accessor::SeriesLayout;
pub use assemble::assemble_series;
pub use datum::{
    DataSeriesDatum, FillMeta, FilledChannels, FitKind, FullDataSeriesDatum, RawDataSeriesDatum,
    ScalarValue,
};
pub use domain::{AlignedSeries, DomainIndex, ScaleKind, Slot, XDomain, index_domain};
pub use fit::{Channel, ChannelFits, FitConfig, FitStrategy, FittedValue, fit_channel, fit_series};
pub use series::{DataSeries, RawDataSeries, derive_series_keys};
pub use store::{DedupePolicy, IngestStats, MalformedPolicy, group_series};
