use thiserror::Error;

pub type SeriesResult<T> = Result<T, SeriesError>;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("malformed datum at record {index}: {reason}")]
    MalformedDatum { index: usize, reason: String },

    #[error("unknown fit strategy `{0}`")]
    UnknownFitStrategy(String),

    #[error("invalid x domain: {detail}")]
    InvalidDomain { detail: String },

    #[error("duplicate x value `{x}` in series `{key}`")]
    DuplicateDatum { key: String, x: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
