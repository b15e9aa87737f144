//! Loaders for the two input data sets.
//!
//! - NEOs: CSV with a header row; only `pdes`, `name`, `pha` and `diameter`
//!   are read, every other column is ignored.
//! - Close approaches: JSON object with a `fields` header naming the columns
//!   and a `data` array of rows.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use neo_common::{CloseApproach, NearEarthObject};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{NeoError, NeoResult};

/// Column layout used when an approach file carries no `fields` header
const DEFAULT_CAD_FIELDS: [&str; 11] = [
    "des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", "v_inf", "t_sigma_f", "h",
];

/// One NEO row; unknown columns are ignored by serde
#[derive(Debug, Deserialize)]
struct NeoCsvRow {
    #[serde(default)]
    pdes: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    pha: String,
    #[serde(default)]
    diameter: String,
}

impl NeoCsvRow {
    fn into_neo(self) -> NearEarthObject {
        let hazardous = self.pha.trim() == "Y";
        NearEarthObject::new(&self.pdes, &self.name, &self.diameter, Some(hazardous))
    }
}

#[derive(Debug, Deserialize)]
struct CadFile {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Positions of the approach columns we read
struct CadColumns {
    des: usize,
    cd: usize,
    dist: usize,
    v_rel: usize,
}

impl CadColumns {
    fn resolve(fields: &[String]) -> NeoResult<Self> {
        let find = |name: &str| -> NeoResult<usize> {
            if fields.is_empty() {
                return DEFAULT_CAD_FIELDS
                    .iter()
                    .position(|f| *f == name)
                    .ok_or_else(|| NeoError::MissingField(name.to_string()));
            }
            fields
                .iter()
                .position(|f| f == name)
                .ok_or_else(|| NeoError::MissingField(name.to_string()))
        };
        Ok(Self {
            des: find("des")?,
            cd: find("cd")?,
            dist: find("dist")?,
            v_rel: find("v_rel")?,
        })
    }
}

/// Read a cell as text; JSON null and missing cells are absent
fn cell(row: &[Value], index: usize) -> Option<String> {
    match row.get(index)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse NEO records from CSV content.
pub fn parse_neos<R: Read>(reader: R) -> NeoResult<Vec<NearEarthObject>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut neos = Vec::new();
    for result in reader.deserialize::<NeoCsvRow>() {
        neos.push(result?.into_neo());
    }

    debug!("Parsed {} NEO rows", neos.len());
    Ok(neos)
}

/// Parse close approach records from JSON content.
pub fn parse_approaches<R: Read>(reader: R) -> NeoResult<Vec<CloseApproach>> {
    let cad: CadFile = serde_json::from_reader(reader)?;
    let columns = CadColumns::resolve(&cad.fields)?;

    let mut approaches = Vec::with_capacity(cad.data.len());
    for row in &cad.data {
        let designation = cell(row, columns.des).unwrap_or_default();
        let time = cell(row, columns.cd);
        let distance = cell(row, columns.dist);
        let velocity = cell(row, columns.v_rel);
        approaches.push(CloseApproach::new(
            &designation,
            time.as_deref(),
            distance.as_deref(),
            velocity.as_deref(),
        )?);
    }

    debug!("Parsed {} close approach rows", approaches.len());
    Ok(approaches)
}

/// Load NEOs from a CSV file.
pub fn load_neos(path: impl AsRef<Path>) -> NeoResult<Vec<NearEarthObject>> {
    let path = path.as_ref();
    info!("Loading NEOs from: {}", path.display());
    let neos = parse_neos(BufReader::new(File::open(path)?))?;
    info!("Loaded {} NEOs", neos.len());
    Ok(neos)
}

/// Load close approaches from a JSON file.
pub fn load_approaches(path: impl AsRef<Path>) -> NeoResult<Vec<CloseApproach>> {
    let path = path.as_ref();
    info!("Loading close approaches from: {}", path.display());
    let approaches = parse_approaches(BufReader::new(File::open(path)?))?;
    info!("Loaded {} close approaches", approaches.len());
    Ok(approaches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CSV: &str = "id,spkid,full_name,pdes,name,prefix,neo,pha,H,G,M1,M2,K1,K2,PC,diameter,extent,albedo
a0000433,2000433,\"   433 Eros (A898 PA)\",433,Eros,,Y,N,10.4,0.46,,,,,,16.84,34.4x11.2x11.2,0.25
a0099942,2099942,\"99942 Apophis (2004 MN4)\",99942,Apophis,,Y,Y,19.09,0.24,,,,,,0.37,,0.23
bK20A00B,54000000,\"(2020 AB)\",2020 AB,,,Y,N,25.0,,,,,,,,,";

    const SAMPLE_JSON: &str = r#"{
        "signature": {"version": "1.1", "source": "NASA/JPL SBDB Close Approach Data API"},
        "count": "3",
        "fields": ["des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", "v_inf", "t_sigma_f", "h"],
        "data": [
            ["433", "659", "2415020.507669610", "1900-Jan-01 00:11", "0.0921795123769547", "0.0921732569637501", "0.0921857677901611", "16.7523040362574", "16.7505784933163", "00:01", "10.4"],
            ["99942", "199", "2462240.407091276", "2029-Apr-13 21:46", "0.000254099", "0.000254092", "0.000254106", "7.42249", "5.84135", "< 00:01", "19.09"],
            ["2020 AB", "5", "2458853.91667", "2020-Jan-05 10:00", "0.01", "0.009", "0.011", "5.5", "5.4", null, "25.0"]
        ]
    }"#;

    #[test]
    fn test_parse_neos() {
        let neos = parse_neos(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(neos.len(), 3);

        assert_eq!(neos[0].designation(), Some("433"));
        assert_eq!(neos[0].name(), Some("Eros"));
        assert_eq!(neos[0].diameter(), 16.84);
        assert_eq!(neos[0].hazardous(), Some(false));

        assert_eq!(neos[1].hazardous(), Some(true));

        assert_eq!(neos[2].designation(), Some("2020 AB"));
        assert_eq!(neos[2].name(), None);
        assert!(neos[2].diameter().is_nan());
    }

    #[test]
    fn test_parse_approaches() {
        let approaches = parse_approaches(SAMPLE_JSON.as_bytes()).unwrap();
        assert_eq!(approaches.len(), 3);
        assert_eq!(approaches[0].designation(), "433");
        assert_eq!(approaches[0].time_str(), "1900-01-01 00:11");
        assert_eq!(approaches[0].distance(), 0.0921795123769547);
        assert_eq!(approaches[0].velocity(), 16.7523040362574);
        assert_eq!(approaches[1].time_str(), "2029-04-13 21:46");
    }

    #[test]
    fn test_parse_approaches_reordered_fields() {
        let json = r#"{"fields": ["v_rel", "cd", "des", "dist"],
                       "data": [["16.75", "1900-Jan-01 00:11", "433", "0.0921"]]}"#;
        let approaches = parse_approaches(json.as_bytes()).unwrap();
        assert_eq!(approaches[0].designation(), "433");
        assert_eq!(approaches[0].distance(), 0.0921);
        assert_eq!(approaches[0].velocity(), 16.75);
    }

    #[test]
    fn test_parse_approaches_without_fields_header() {
        let json = r#"{"data": [["433", "659", "2415020.5", "1900-Jan-01 00:11", "0.0921", "0.09", "0.093", "16.75", "16.7", "00:01", "10.4"]]}"#;
        let approaches = parse_approaches(json.as_bytes()).unwrap();
        assert_eq!(approaches[0].distance(), 0.0921);
        assert_eq!(approaches[0].velocity(), 16.75);
    }

    #[test]
    fn test_parse_approaches_missing_field() {
        let json = r#"{"fields": ["des", "cd", "dist"], "data": []}"#;
        let err = parse_approaches(json.as_bytes()).unwrap_err();
        assert!(matches!(err, NeoError::MissingField(f) if f == "v_rel"));
    }

    #[test]
    fn test_parse_approaches_malformed_distance() {
        let json = r#"{"fields": ["des", "cd", "dist", "v_rel"],
                       "data": [["433", "1900-Jan-01 00:11", "close", "16.75"]]}"#;
        let err = parse_approaches(json.as_bytes()).unwrap_err();
        assert!(matches!(err, NeoError::Model(_)));
    }

    #[test]
    fn test_load_from_files() {
        let mut csv_file = NamedTempFile::new().unwrap();
        csv_file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let mut json_file = NamedTempFile::new().unwrap();
        json_file.write_all(SAMPLE_JSON.as_bytes()).unwrap();

        assert_eq!(load_neos(csv_file.path()).unwrap().len(), 3);
        assert_eq!(load_approaches(json_file.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_neos("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, NeoError::Io(_)));
    }
}
