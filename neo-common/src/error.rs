use std::num::ParseFloatError;

use thiserror::Error;

/// Failures raised while building entities from raw loader fields.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid {field} value {value:?}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}
