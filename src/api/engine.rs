use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{
    AlignedSeries, DataSeries, DomainIndex, IngestStats, RawDataSeries, XDomain, assemble_series,
    fit_series, group_series, index_domain,
};
use crate::error::SeriesResult;

use super::SeriesConfig;

/// Result of one fitting pass over a series group.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutput {
    pub series: Vec<DataSeries>,
    pub domain: XDomain,
    pub stats: IngestStats,
}

/// One-call facade over the fitting pipeline:
/// grouping -> domain indexing -> channel fitting -> assembly.
///
/// The engine is a pure transform: every run is independent, side-effect
/// free and deterministic for identical input order and configuration.
#[derive(Debug, Clone)]
pub struct SeriesEngine {
    config: SeriesConfig,
}

impl SeriesEngine {
    /// Validates the configuration eagerly; strategy and layout problems
    /// surface here, before any data is processed.
    pub fn new(config: SeriesConfig) -> SeriesResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// Runs the full pipeline over one collection of source records.
    pub fn run(&self, records: &[Value]) -> SeriesResult<FitOutput> {
        let (raw, stats) = group_series(
            records,
            &self.config.layout,
            self.config.dedupe,
            self.config.malformed,
        )?;
        if stats.malformed_skipped > 0 || stats.duplicates_replaced > 0 {
            warn!(
                malformed_skipped = stats.malformed_skipped,
                duplicates_replaced = stats.duplicates_replaced,
                series_count = raw.len(),
                "skipped or replaced records while grouping series"
            );
        }

        let DomainIndex { domain, aligned } = index_domain(&raw, self.config.x_scale)?;
        debug!(
            record_count = records.len(),
            series_count = raw.len(),
            domain_len = domain.len(),
            "indexed series group domain"
        );

        let fit_one = |(raw_series, aligned_series): (&RawDataSeries, &AlignedSeries)| {
            let fits = fit_series(aligned_series, self.config.fit);
            assemble_series(raw_series, &domain, aligned_series, &fits)
        };

        #[cfg(feature = "parallel-fit")]
        let series: Vec<DataSeries> = {
            use rayon::prelude::*;
            raw.par_iter().zip(aligned.par_iter()).map(fit_one).collect()
        };
        #[cfg(not(feature = "parallel-fit"))]
        let series: Vec<DataSeries> = raw.iter().zip(aligned.iter()).map(fit_one).collect();

        debug!(
            series_count = series.len(),
            empty_series = series.iter().filter(|one| one.empty).count(),
            "fitted and assembled series group"
        );
        Ok(FitOutput {
            series,
            domain,
            stats,
        })
    }
}
