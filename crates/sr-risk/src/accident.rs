//! Accident CSV loader.
//!
//! # CSV format
//!
//! One row per recorded accident.  Columns are located by header name (see
//! [`AccidentColumns`]); any other columns are ignored.
//!
//! ```csv
//! ID,Start_Lat,Start_Lng,conditions,visibility
//! A-1,34.0522,-118.2437,Rain,9.9
//! A-2,34.0610,-118.3000,"Rain, Overcast",4.0
//! A-3,34.0700,-118.2500,Clear,
//! ```
//!
//! | Column      | Required | Missing or blank value                 |
//! |-------------|----------|----------------------------------------|
//! | longitude   | yes      | `RiskError::DataFormat`                |
//! | latitude    | yes      | `RiskError::DataFormat`                |
//! | condition   | yes      | empty label (matches no condition)     |
//! | visibility  | no       | `NaN` (record skipped by visibility weighting) |

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::info;

use sr_core::{AccidentColumns, GeoPoint};

use crate::{RiskError, RiskResult};

/// One historical accident.
#[derive(Clone, Debug, PartialEq)]
pub struct AccidentRecord {
    pub position: GeoPoint,
    /// Weather label exactly as recorded.
    pub condition: String,
    /// Visibility at the time; `NaN` when unknown.
    pub visibility: f64,
}

/// Every record of one accident file.
#[derive(Clone, Debug, Default)]
pub struct AccidentSet {
    pub records: Vec<AccidentRecord>,
    /// Whether the source had a visibility column at all.
    pub has_visibility: bool,
}

impl AccidentSet {
    pub fn new(records: Vec<AccidentRecord>, has_visibility: bool) -> Self {
        Self { records, has_visibility }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest finite visibility in the set, `None` if there is none.
    pub fn max_visibility(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.visibility)
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

/// Load every accident in the CSV file at `path`.
pub fn load_accidents_csv(path: &Path, columns: &AccidentColumns) -> RiskResult<AccidentSet> {
    let file = std::fs::File::open(path)?;
    let set = load_accidents_reader(file, columns)?;
    info!("loaded {} accident records from {}", set.len(), path.display());
    Ok(set)
}

/// Like [`load_accidents_csv`] but accepts any `Read` source.
pub fn load_accidents_reader<R: Read>(reader: R, columns: &AccidentColumns) -> RiskResult<AccidentSet> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let required = |name: &str| {
        find_column(&headers, name)
            .ok_or_else(|| RiskError::DataFormat(format!("missing required column {name:?}")))
    };
    let lon_col = required(&columns.longitude)?;
    let lat_col = required(&columns.latitude)?;
    let cond_col = required(&columns.condition)?;
    let vis_col = find_column(&headers, &columns.visibility);

    let mut records = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.map_err(|e| RiskError::DataFormat(format!("line {line}: {e}")))?;

        let lon = parse_coord(&row, lon_col, &columns.longitude, line, 180.0)?;
        let lat = parse_coord(&row, lat_col, &columns.latitude, line, 90.0)?;
        let condition = row.get(cond_col).unwrap_or_default().to_owned();
        let visibility = vis_col
            .and_then(|c| row.get(c))
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(f64::NAN);

        records.push(AccidentRecord { position: GeoPoint::new(lat, lon), condition, visibility });
    }

    Ok(AccidentSet::new(records, vis_col.is_some()))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

fn parse_coord(row: &StringRecord, col: usize, name: &str, line: usize, limit: f64) -> RiskResult<f64> {
    let raw = row.get(col).unwrap_or_default().trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        _ => Err(RiskError::DataFormat(format!(
            "line {line}: column {name:?} holds {raw:?}, expected a coordinate within ±{limit}"
        ))),
    }
}
