//! Engine facade: validated configuration plus the one-call fitting
//! pipeline. Stage functions stay public in [`crate::core`] so downstream
//! consumers (scale domains, stacking, tooltips) can drive stages directly.

mod engine;
mod engine_config;

pub use engine::{FitOutput, SeriesEngine};
pub use engine_config::SeriesConfig;
