use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Built-in lookup tables
// ---------------------------------------------------------------------------

pub const DEFAULT_TABLES_DIR: &str = "tables";

/// Week-period file-name tokens and the label injected for each.
pub const WEEK_PERIODS: &[(&str, &str)] = &[
    ("WeekDay", "יום חול"),
    ("Friday", "שישי"),
    ("Saturday", "שבת"),
];

pub const COL_STATION: &str = "שם תחנת הרכבת";
pub const COL_YEAR: &str = "שנה";
pub const COL_MONTH: &str = "חודש";
pub const COL_WEEK_PERIOD: &str = "תקופת שבוע";
pub const COL_RAIL_DIRECTION: &str = "כיוון נסיעת הרכבת";
pub const COL_TRAIN_ID: &str = "מספר הרכבת";
pub const COL_PERCENT_ON_TIME: &str = "אחוז הנסיעות שעמדו בזמנים";
pub const COL_TOTAL_TRIPS: &str = "סך הנסיעות";
pub const COL_ON_TIME_TRIPS: &str = "מספר הנסיעות שעמדו בזמנים";

pub const DIR_TOWARD_TEL_AVIV: &str = "לכיוון תל אביב";
pub const DIR_FROM_TEL_AVIV: &str = "מכיוון תל אביב";

pub const ARRIVALS_FILE: &str = "Arrivel_train_passengers_numbers.csv";
pub const DEPARTURES_FILE: &str = "Departure_train_passengers_numbers.csv";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// Directory holding the monthly extracts.
    pub tables_dir: PathBuf,
    /// Period allow-list (`YYYY-MM`). Empty means every period.
    pub periods: Vec<String>,
    /// File-name token → week-period label.
    pub week_periods: BTreeMap<String, String>,
    pub columns: ColumnNames,
    pub directions: DirectionLiterals,
    pub train_times: TrainTimesFiles,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            tables_dir: PathBuf::from(DEFAULT_TABLES_DIR),
            periods: Vec::new(),
            week_periods: WEEK_PERIODS
                .iter()
                .map(|(token, label)| (token.to_string(), label.to_string()))
                .collect(),
            columns: ColumnNames::default(),
            directions: DirectionLiterals::default(),
            train_times: TrainTimesFiles::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Spreadsheet header for each column role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub station: String,
    pub year: String,
    pub month: String,
    /// Injected by the loader with the file's week-period label.
    pub week_period: String,
    pub direction: String,
    pub train_id: String,
    /// Pre-aggregated on-time percentage.
    pub percent_on_time: String,
    /// Raw observation counts.
    pub total_trips: String,
    pub on_time_trips: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            station: COL_STATION.into(),
            year: COL_YEAR.into(),
            month: COL_MONTH.into(),
            week_period: COL_WEEK_PERIOD.into(),
            direction: COL_RAIL_DIRECTION.into(),
            train_id: COL_TRAIN_ID.into(),
            percent_on_time: COL_PERCENT_ON_TIME.into(),
            total_trips: COL_TOTAL_TRIPS.into(),
            on_time_trips: COL_ON_TIME_TRIPS.into(),
        }
    }
}

impl ColumnNames {
    fn all(&self) -> [(&'static str, &str); 9] {
        [
            ("station", self.station.as_str()),
            ("year", self.year.as_str()),
            ("month", self.month.as_str()),
            ("week_period", self.week_period.as_str()),
            ("direction", self.direction.as_str()),
            ("train_id", self.train_id.as_str()),
            ("percent_on_time", self.percent_on_time.as_str()),
            ("total_trips", self.total_trips.as_str()),
            ("on_time_trips", self.on_time_trips.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Directions + train times
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectionLiterals {
    /// Bus legs feeding trains toward the reference city.
    pub toward: String,
    /// Bus legs leaving trains that come from the reference city.
    pub away: String,
}

impl Default for DirectionLiterals {
    fn default() -> Self {
        Self {
            toward: DIR_TOWARD_TEL_AVIV.into(),
            away: DIR_FROM_TEL_AVIV.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainTimesFiles {
    pub arrivals: String,
    pub departures: String,
}

impl Default for TrainTimesFiles {
    fn default() -> Self {
        Self {
            arrivals: ARRIVALS_FILE.into(),
            departures: DEPARTURES_FILE.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A relative `tables_dir` is resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path).map_err(|e| ReconError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_toml(&input)?;
        if config.tables_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.tables_dir = base.join(&config.tables_dir);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.week_periods.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one week period is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for (token, label) in &self.week_periods {
            if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ReconError::ConfigValidation(format!(
                    "week period token '{token}' must be ASCII letters or digits"
                )));
            }
            if label.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "week period '{token}' has an empty label"
                )));
            }
            if !seen.insert(normalize_token(token)) {
                return Err(ReconError::ConfigValidation(format!(
                    "week period token '{token}' duplicates another token ignoring case"
                )));
            }
        }

        for period in &self.periods {
            if !is_valid_period(period) {
                return Err(ReconError::ConfigValidation(format!(
                    "period '{period}' must look like YYYY-MM"
                )));
            }
        }

        for (role, name) in self.columns.all() {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "column '{role}' has an empty name"
                )));
            }
        }

        let toward = self.directions.toward.trim();
        let away = self.directions.away.trim();
        if toward.is_empty() || away.is_empty() {
            return Err(ReconError::ConfigValidation(
                "direction literals must not be empty".into(),
            ));
        }
        if toward == away {
            return Err(ReconError::ConfigValidation(
                "direction literals must differ".into(),
            ));
        }

        Ok(())
    }

    /// Normalized token → label, used by discovery.
    pub fn week_period_labels(&self) -> HashMap<String, String> {
        self.week_periods
            .iter()
            .map(|(token, label)| (normalize_token(token), label.clone()))
            .collect()
    }
}

/// First letter upper, rest lower: `WEEKDAY` and `weekDay` both become `Weekday`.
pub fn normalize_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

fn is_valid_period(period: &str) -> bool {
    let Some((year, month)) = period.split_once('-') else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 {
        return false;
    }
    if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
        return false;
    }
    matches!(month.parse::<u32>(), Ok(1..=12))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
