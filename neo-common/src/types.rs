//! Entity model: near-Earth objects and close approaches.
//!
//! Both entities are constructed from raw loader fields and start unlinked.
//! The link step later binds every [`CloseApproach`] to its owning
//! [`NearEarthObject`] by handle, and records the approach on the NEO.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::error::ModelError;
use crate::record::{ApproachRecord, NeoRecord};
use crate::time::{format_datetime, parse_cd};

/// Designation shown for an NEO whose designation is absent
pub const UNKNOWN_DESIGNATION: &str = "unknown";

/// Placeholder shown in place of a missing IAU name
pub const UNNAMED: &str = "unnamed";

/// Handle of a NEO inside the database's NEO collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(pub usize);

/// Handle of a close approach inside the database's approach collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(pub usize);

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A near-Earth object.
///
/// `diameter` is in kilometers and is NaN when unknown; NaN compares false
/// against everything, so callers must check [`has_known_diameter`] before
/// using it as a bound.
///
/// [`has_known_diameter`]: NearEarthObject::has_known_diameter
#[derive(Debug, Clone)]
pub struct NearEarthObject {
    designation: Option<String>,
    name: Option<String>,
    diameter: f64,
    hazardous: Option<bool>,
    approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    /// Build a NEO from raw loader fields.
    ///
    /// Empty designation and name become absent, and an empty or unparsable
    /// diameter becomes NaN.
    pub fn new(designation: &str, name: &str, diameter: &str, hazardous: Option<bool>) -> Self {
        Self {
            designation: non_empty(designation),
            name: non_empty(name),
            diameter: Self::parse_diameter(diameter),
            hazardous,
            approaches: Vec::new(),
        }
    }

    /// Parse a diameter in kilometers, falling back to NaN.
    pub fn parse_diameter(raw: &str) -> f64 {
        raw.trim().parse::<f64>().unwrap_or(f64::NAN)
    }

    pub fn designation(&self) -> Option<&str> {
        self.designation.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn has_known_diameter(&self) -> bool {
        !self.diameter.is_nan()
    }

    /// Tri-state hazard flag; `None` when the source did not say.
    pub fn hazardous(&self) -> Option<bool> {
        self.hazardous
    }

    /// Hazard flag for display, where unknown reads as not hazardous.
    pub fn is_hazardous(&self) -> bool {
        self.hazardous.unwrap_or(false)
    }

    /// Close approaches of this NEO, in load order.
    pub fn approaches(&self) -> &[ApproachId] {
        &self.approaches
    }

    /// Record a linked approach. Called by the link step only.
    pub fn attach_approach(&mut self, approach: ApproachId) {
        self.approaches.push(approach);
    }

    /// Designation followed by the name, or a placeholder when unnamed.
    pub fn fullname(&self) -> String {
        let designation = self.designation().unwrap_or(UNKNOWN_DESIGNATION);
        format!("{} ({})", designation, self.name().unwrap_or(UNNAMED))
    }

    pub fn serialize(&self) -> NeoRecord {
        NeoRecord {
            designation: self.designation.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            diameter_km: self.diameter,
            potentially_hazardous: self.hazardous,
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NEO {} has ", self.fullname())?;
        if self.has_known_diameter() {
            write!(f, "a diameter of {:.3} km", self.diameter)?;
        } else {
            write!(f, "an unknown diameter")?;
        }
        if self.is_hazardous() {
            write!(f, " and is potentially hazardous.")
        } else {
            write!(f, " and is not potentially hazardous.")
        }
    }
}

/// A close approach to Earth by a NEO.
///
/// `designation` is the raw foreign key from the data set. Once linked,
/// `neo` holds the handle of the NEO carrying that same designation.
#[derive(Debug, Clone)]
pub struct CloseApproach {
    designation: String,
    time: Option<DateTime<Utc>>,
    distance: f64,
    velocity: f64,
    neo: Option<NeoId>,
}

impl CloseApproach {
    /// Build an approach from raw loader fields.
    ///
    /// `time` uses the compact `"YYYY-Mon-DD HH:MM"` format; an unparsable
    /// value is logged and kept as absent. Missing distance and velocity
    /// default to 0.0, but malformed or negative values are rejected.
    pub fn new(
        designation: &str,
        time: Option<&str>,
        distance: Option<&str>,
        velocity: Option<&str>,
    ) -> Result<Self, ModelError> {
        let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => match parse_cd(raw) {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!("Unparsable approach time {:?} for {}: {}", raw, designation, e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            designation: designation.trim().to_string(),
            time,
            distance: parse_measure("distance", distance)?,
            velocity: parse_measure("velocity", velocity)?,
            neo: None,
        })
    }

    /// Foreign key naming the owning NEO.
    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn time(&self) -> Option<&DateTime<Utc>> {
        self.time.as_ref()
    }

    /// Calendar date of the approach, if the time is known.
    pub fn date(&self) -> Option<NaiveDate> {
        self.time.map(|t| t.date_naive())
    }

    /// Approach time as `"YYYY-MM-DD HH:MM"`, or an empty string when unknown.
    pub fn time_str(&self) -> String {
        self.time.as_ref().map(format_datetime).unwrap_or_default()
    }

    /// Nominal approach distance in astronomical units
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Relative approach velocity in km/s
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn neo(&self) -> Option<NeoId> {
        self.neo
    }

    /// Bind this approach to its owning NEO. Called by the link step only.
    pub fn bind(&mut self, neo: NeoId) {
        self.neo = Some(neo);
    }

    /// Flatten this approach together with its NEO into an output record.
    ///
    /// `neo` must be the NEO this approach is bound to; the fields are read
    /// at call time rather than copied at link time.
    pub fn serialize(&self, neo: &NearEarthObject) -> ApproachRecord {
        debug_assert_eq!(neo.designation(), Some(self.designation()));
        ApproachRecord {
            datetime_utc: self.time_str(),
            distance_au: self.distance,
            velocity_km_s: self.velocity,
            neo: neo.serialize(),
        }
    }
}

fn parse_measure(field: &'static str, raw: Option<&str>) -> Result<f64, ModelError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|source| ModelError::InvalidNumber {
            field,
            value: raw.to_string(),
            source,
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::OutOfRange { field, value });
    }
    Ok(value)
}
