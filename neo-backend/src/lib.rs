//! Near-Earth object database.
//!
//! Loads NEOs (CSV) and their close approaches (JSON), links them, indexes
//! the NEOs by designation and name, and answers filtered approach queries.
//!
//! Control flow is `extract` -> `linker` -> `database` -> `query` -> `write`.

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod linker;
pub mod logging;
pub mod query;
pub mod write;

pub use database::{DatabaseStats, LinkedApproach, NeoDatabase};
pub use error::{NeoError, NeoResult};
pub use linker::{LinkedCatalog, link};
pub use query::{Filter, FilterSet, QueryArgs, limit};
