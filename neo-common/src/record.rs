//! Output record shapes for serialized NEOs and close approaches.
//!
//! `ApproachRecord` nests the NEO for structured (JSON) output, while
//! `ApproachRow` is the same data flattened for tabular (CSV) output.

use serde::Serialize;

/// Serialized form of a NEO
#[derive(Debug, Clone, Serialize)]
pub struct NeoRecord {
    pub designation: String,
    pub name: String,
    /// NaN when unknown; serde_json writes it as `null`
    pub diameter_km: f64,
    pub potentially_hazardous: Option<bool>,
}

/// Serialized form of a close approach joined with its NEO
#[derive(Debug, Clone, Serialize)]
pub struct ApproachRecord {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub neo: NeoRecord,
}

/// One row of tabular output
#[derive(Debug, Clone, Serialize)]
pub struct ApproachRow {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub designation: String,
    pub name: String,
    pub diameter_km: f64,
    pub potentially_hazardous: Option<bool>,
}

impl ApproachRow {
    /// Column order of tabular output
    pub const HEADER: [&'static str; 7] = [
        "datetime_utc",
        "distance_au",
        "velocity_km_s",
        "designation",
        "name",
        "diameter_km",
        "potentially_hazardous",
    ];
}

impl From<ApproachRecord> for ApproachRow {
    fn from(record: ApproachRecord) -> Self {
        Self {
            datetime_utc: record.datetime_utc,
            distance_au: record.distance_au,
            velocity_km_s: record.velocity_km_s,
            designation: record.neo.designation,
            name: record.neo.name,
            diameter_km: record.neo.diameter_km,
            potentially_hazardous: record.neo.potentially_hazardous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn sample() -> ApproachRecord {
        ApproachRecord {
            datetime_utc: "1900-01-01 00:11".to_string(),
            distance_au: 0.0921,
            velocity_km_s: 16.75,
            neo: NeoRecord {
                designation: "433".to_string(),
                name: "Eros".to_string(),
                diameter_km: f64::NAN,
                potentially_hazardous: Some(false),
            },
        }
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["datetime_utc"], "1900-01-01 00:11");
        assert_eq!(value["distance_au"].as_f64(), Some(0.0921));
        assert_eq!(value["velocity_km_s"].as_f64(), Some(16.75));
        assert_eq!(value["neo"]["designation"], "433");
        assert!(value["neo"]["diameter_km"].is_null());
        assert_eq!(value["neo"]["potentially_hazardous"], false);
    }

    #[test]
    fn test_datetime_pattern() {
        let pattern = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").unwrap();
        assert!(pattern.is_match(&sample().datetime_utc));
    }

    #[test]
    fn test_row_flattens_neo() {
        let row = ApproachRow::from(sample());
        assert_eq!(row.designation, "433");
        assert_eq!(row.name, "Eros");
        assert!(row.diameter_km.is_nan());
        assert_eq!(row.potentially_hazardous, Some(false));
        assert_eq!(ApproachRow::HEADER.len(), 7);
    }
}
