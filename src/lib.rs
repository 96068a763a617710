//! series-fit-rs: series fitting and normalization engine for XY chart data.
//!
//! The engine turns raw, possibly incomplete per-series records into a
//! canonical datum sequence safe to scale, stack and render, while keeping
//! enough provenance to reconstruct original values for tooltips and
//! accessibility. Data flows through four pure stages:
//!
//! raw series store -> domain indexer -> fit function engine -> datum assembler

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{FitOutput, SeriesConfig, SeriesEngine};
pub use error::{SeriesError, SeriesResult};
