//! Shared entity model for near-Earth objects and their close approaches.
//!
//! Entities are built from raw loader fields, then cross-linked by the backend
//! through the typed handles [`NeoId`] and [`ApproachId`].

pub mod error;
pub mod record;
pub mod time;
pub mod types;

pub use error::ModelError;
pub use record::{ApproachRecord, ApproachRow, NeoRecord};
pub use time::{format_datetime, parse_cd};
pub use types::{ApproachId, CloseApproach, NearEarthObject, NeoId};
