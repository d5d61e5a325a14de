//! On-disk risk tables.
//!
//! # File layout
//!
//! One CSV per condition in a single directory, named after
//! [`WeatherCondition::file_stem`]:
//!
//! ```text
//! risk_maps/
//!   Clear.csv
//!   Rain_Partially_cloudy.csv
//! ```
//!
//! ```csv
//! road_name,risk_score
//! Main Street,1.0
//! Oak Avenue,0.25
//! ```
//!
//! Rows are written by descending score.  Readers do not depend on order.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use sr_core::{RiskTable, RoutingConfig, WeatherCondition};

use crate::{RiskError, RiskResult};

#[derive(Debug, Serialize, Deserialize)]
struct RiskRow<'a> {
    road_name: std::borrow::Cow<'a, str>,
    risk_score: f64,
}

/// Directory of persisted risk tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiskTableStore {
    dir: PathBuf,
}

impl RiskTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.risk_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `condition`'s table, whether or not it exists.
    pub fn path_for(&self, condition: &WeatherCondition) -> PathBuf {
        self.dir.join(format!("{}.csv", condition.file_stem()))
    }

    /// Write `table`, creating the directory if needed.  Overwrites any
    /// previous table for the same condition.
    pub fn save(&self, table: &RiskTable) -> RiskResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(table.condition());
        let file = File::create(&path)?;
        write_table(file, table)?;
        info!("wrote {} roads for {:?} to {}", table.len(), table.condition().label(), path.display());
        Ok(path)
    }

    /// Load `condition`'s table.
    ///
    /// # Errors
    ///
    /// [`RiskError::MissingTable`] if the file does not exist,
    /// [`RiskError::DataFormat`] if a score is not a number in `[0, 1]`.
    pub fn load(&self, condition: &WeatherCondition) -> RiskResult<RiskTable> {
        let path = self.path_for(condition);
        if !path.is_file() {
            return Err(RiskError::MissingTable { condition: condition.clone(), path });
        }
        let table = read_table(File::open(&path)?, condition.clone())?;
        debug!("loaded {} roads for {:?} from {}", table.len(), condition.label(), path.display());
        Ok(table)
    }

    /// Whether a table for `condition` exists on disk.
    pub fn contains(&self, condition: &WeatherCondition) -> bool {
        self.path_for(condition).is_file()
    }
}

/// Serialize `table` as `road_name,risk_score` rows in ranked order.
pub fn write_table<W: Write>(writer: W, table: &RiskTable) -> RiskResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (road, score) in table.ranked() {
        csv_writer.serialize(RiskRow { road_name: road.into(), risk_score: score })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Parse `road_name,risk_score` rows into a table for `condition`.
///
/// Each road may appear once; a repeated name is a format error.
pub fn read_table<R: Read>(reader: R, condition: WeatherCondition) -> RiskResult<RiskTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut first_line: FxHashMap<String, usize> = FxHashMap::default();
    let mut scores = Vec::new();
    for (i, row) in csv_reader.deserialize::<RiskRow<'static>>().enumerate() {
        let line = i + 2;
        let row = row.map_err(|e| RiskError::DataFormat(format!("line {line}: {e}")))?;
        if !(0.0..=1.0).contains(&row.risk_score) {
            return Err(RiskError::DataFormat(format!(
                "line {line}: risk score {} for {:?} is outside [0, 1]",
                row.risk_score, row.road_name
            )));
        }
        let road = row.road_name.into_owned();
        if let Some(&earlier) = first_line.get(&road) {
            return Err(RiskError::DataFormat(format!(
                "line {line}: road {road:?} already scored on line {earlier}"
            )));
        }
        first_line.insert(road.clone(), line);
        scores.push((road, row.risk_score));
    }
    Ok(RiskTable::from_scores(condition, scores))
}
