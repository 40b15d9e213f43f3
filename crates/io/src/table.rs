// Raw tables: a header row plus typed cells, as read from one worksheet

use serde::ser::{Serialize, Serializer};

/// Text values treated as missing when a CSV cell is inferred.
const NULL_MARKERS: &[&str] = &["#N/A", "N/A", "NA", "NaN", "nan", "NULL", "null", "None"];

/// A single cell value.
///
/// Spreadsheet error cells and empty cells are both `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Infer a typed value from raw CSV text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NULL_MARKERS.contains(&trimmed) {
            return Self::Null;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        match trimmed {
            "True" | "TRUE" | "true" => Self::Bool(true),
            "False" | "FALSE" | "false" => Self::Bool(false),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Trimmed display text. Integral floats render without a fraction,
    /// `Null` renders as the empty string.
    pub fn to_trimmed_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    format!("{f}")
                }
            }
            Self::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        }
    }

    /// Numeric coercion: numbers pass through, text is parsed after trimming.
    /// Booleans, nulls and non-finite values do not coerce.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Int(n) => *n as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Null | Self::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Integer coercion. Fractional values do not coerce.
    pub fn as_i64(&self) -> Option<i64> {
        if let Self::Int(n) = self {
            return Some(*n);
        }
        if let Self::Text(s) = self {
            if let Ok(n) = s.trim().parse::<i64>() {
                return Some(n);
            }
        }
        let f = self.as_f64()?;
        if f.fract() != 0.0 || f.abs() >= 9.0e15 {
            return None;
        }
        Some(f as i64)
    }

    /// JSON value for transport. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Self::Float(_) => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// One worksheet: normalized headers and rectangular rows.
///
/// Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table from a cell grid whose first row is the header row.
    ///
    /// Blank headers become `Unnamed: {index}`, repeated headers get `.1`,
    /// `.2`, ... suffixes, short rows are padded with `Null` and rows with
    /// no values at all are dropped.
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut iter = grid.into_iter();
        let Some(header_row) = iter.next() else {
            return Self::default();
        };
        let data: Vec<Vec<CellValue>> = iter.collect();

        let width = data
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(header_row.len()))
            .max()
            .unwrap_or(0);

        let headers = normalize_headers(&header_row, width);

        let rows = data
            .into_iter()
            .filter(|r| r.iter().any(|c| !c.is_null()))
            .map(|mut r| {
                r.resize(width, CellValue::Null);
                r
            })
            .collect();

        Self { headers, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_headers(header_row: &[CellValue], width: usize) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(width);
    for idx in 0..width {
        let base = header_row
            .get(idx)
            .map(|c| c.to_trimmed_text())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {idx}"));

        let mut name = base.clone();
        let mut suffix = 1;
        while headers.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        headers.push(name);
    }
    headers
}
