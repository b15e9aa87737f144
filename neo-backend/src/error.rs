use std::path::PathBuf;

use neo_common::ModelError;
use thiserror::Error;

pub type NeoResult<T> = Result<T, NeoError>;

#[derive(Debug, Error)]
pub enum NeoError {
    /// A close approach names a designation no loaded NEO carries
    #[error("close approach references unknown designation {0:?}")]
    UnresolvedDesignation(String),

    /// Two loaded NEOs share one designation
    #[error("designation {0:?} is carried by more than one NEO")]
    DuplicateDesignation(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("approach data is missing the {0:?} field")]
    MissingField(String),

    #[error("unsupported output file {0:?}: expected a .csv or .json extension")]
    UnsupportedOutput(PathBuf),

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
