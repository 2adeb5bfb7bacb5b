//! Error taxonomy for the session pipeline.
//!
//! Malformed input aborts the whole run; the variants carry the record index
//! and field name so the offending source record can be located.

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    /// Malformed timestamp, coordinate array, or embedded JSON field.
    #[error("malformed {field} in record {row}: {message}")]
    DataFormat {
        row: usize,
        field: &'static str,
        message: String,
    },

    /// A numeric field that could not be coerced to a float.
    #[error("non-numeric {field} in record {row}: {value:?}")]
    TypeConversion {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;
