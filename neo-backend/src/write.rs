//! Output serializer for query results.
//!
//! CSV output is one row per approach with the NEO fields flattened in;
//! JSON output is an array of approach objects with the NEO nested.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use neo_common::{ApproachRecord, ApproachRow};
use tracing::info;

use crate::database::LinkedApproach;
use crate::error::{NeoError, NeoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> NeoResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(OutputFormat::Csv),
            Some("json") => Ok(OutputFormat::Json),
            _ => Err(NeoError::UnsupportedOutput(path.to_path_buf())),
        }
    }
}

/// Write results as CSV. The header is written even when there are no rows.
pub fn write_csv<'a, I, W>(results: I, writer: W) -> NeoResult<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(ApproachRow::HEADER)?;

    let mut count = 0;
    for linked in results {
        writer.serialize(ApproachRow::from(linked.serialize()))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write results as a JSON array.
pub fn write_json<'a, I, W>(results: I, writer: W) -> NeoResult<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
    W: Write,
{
    let records: Vec<ApproachRecord> = results.into_iter().map(|l| l.serialize()).collect();
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;
    Ok(records.len())
}

/// Write results to `path`, choosing the format from its extension.
pub fn write_results<'a, I>(results: I, path: impl AsRef<Path>) -> NeoResult<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let file = BufWriter::new(File::create(path)?);

    let count = match format {
        OutputFormat::Csv => write_csv(results, file)?,
        OutputFormat::Json => write_json(results, file)?,
    };

    info!("Wrote {} results to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::NeoDatabase;
    use crate::query::{Filter, FilterSet};
    use neo_common::{CloseApproach, NearEarthObject};
    use tempfile::TempDir;

    fn build() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("433", "Eros", "16.84", Some(false)),
            NearEarthObject::new("2020 AB", "", "", None),
        ];
        let approaches = vec![
            CloseApproach::new("433", Some("1900-Jan-01 00:11"), Some("0.0921"), Some("16.75")).unwrap(),
            CloseApproach::new("2020 AB", Some("2020-Jan-05 10:00"), Some("0.01"), Some("5.5")).unwrap(),
        ];
        NeoDatabase::from_collections(neos, approaches).unwrap()
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")).unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out.JSON")).unwrap(), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::from_path(Path::new("out.txt")),
            Err(NeoError::UnsupportedOutput(_))
        ));
        assert!(OutputFormat::from_path(Path::new("out")).is_err());
    }

    #[test]
    fn test_write_csv() {
        let db = build();
        let mut buffer = Vec::new();
        let count = write_csv(db.approaches(), &mut buffer).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "datetime_utc,distance_au,velocity_km_s,designation,name,diameter_km,potentially_hazardous"
        );
        assert_eq!(lines[1], "1900-01-01 00:11,0.0921,16.75,433,Eros,16.84,false");
        assert_eq!(lines[2], "2020-01-05 10:00,0.01,5.5,2020 AB,,NaN,");
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let db = build();
        let filters = FilterSet::new().with(Filter::DistanceMin(10.0));
        let mut buffer = Vec::new();
        assert_eq!(write_csv(db.query(&filters), &mut buffer).unwrap(), 0);
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_write_json() {
        let db = build();
        let mut buffer = Vec::new();
        write_json(db.approaches(), &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["datetime_utc"], "1900-01-01 00:11");
        assert_eq!(items[0]["distance_au"].as_f64(), Some(0.0921));
        assert_eq!(items[0]["velocity_km_s"].as_f64(), Some(16.75));
        assert_eq!(items[0]["neo"]["name"], "Eros");
        assert_eq!(items[0]["neo"]["potentially_hazardous"], false);
        assert!(items[1]["neo"]["diameter_km"].is_null());
        assert!(items[1]["neo"]["potentially_hazardous"].is_null());
    }

    #[test]
    fn test_write_json_empty() {
        let db = build();
        let filters = FilterSet::new().with(Filter::Hazardous(true));
        let mut buffer = Vec::new();
        write_json(db.query(&filters), &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }

    #[test]
    fn test_write_results_to_file() {
        let db = build();
        let dir = TempDir::new().unwrap();

        let csv_path = dir.path().join("results.csv");
        assert_eq!(write_results(db.approaches(), &csv_path).unwrap(), 2);
        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let distances: Vec<f64> = reader
            .records()
            .map(|r| r.unwrap()[1].parse().unwrap())
            .collect();
        assert_eq!(distances, vec![0.0921, 0.01]);

        let json_path = dir.path().join("results.json");
        assert_eq!(write_results(db.approaches(), &json_path).unwrap(), 2);

        let bad_path = dir.path().join("results.txt");
        assert!(write_results(db.approaches(), &bad_path).is_err());
        assert!(!bad_path.exists());
    }
}
