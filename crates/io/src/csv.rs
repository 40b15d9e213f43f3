// CSV import

use std::io::Read;
use std::path::Path;

use crate::error::ReadError;
use crate::table::{CellValue, RawTable};

const UTF8_BOM: &str = "\u{feff}";

/// Read a CSV file into a table. The first line is the header row.
pub fn import(path: &Path) -> Result<RawTable, ReadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Lines sampled when guessing the delimiter.
const SNIFF_LINES: usize = 8;

/// Guess the delimiter from the leading lines.
///
/// A candidate must split the header into at least two fields. Its score is
/// the header width times the number of sampled records of that width.
fn sniff_delimiter(content: &str) -> u8 {
    let sample = content
        .lines()
        .take(SNIFF_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let mut best: Option<(u8, usize)> = None;
    for delimiter in DELIMITERS {
        let widths = record_widths(&sample, delimiter);
        let Some(&header) = widths.first() else {
            continue;
        };
        if header < 2 {
            continue;
        }
        let score = header * widths.iter().filter(|&&w| w == header).count();
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((delimiter, score));
        }
    }
    best.map_or(b',', |(delimiter, _)| delimiter)
}

fn record_widths(sample: &str, delimiter: u8) -> Vec<usize> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes())
        .records()
        .map_while(Result::ok)
        .map(|record| record.len())
        .collect()
}

/// Read file as UTF-8, dropping a leading BOM. Files that are not valid
/// UTF-8 are decoded as Windows-1255, the Hebrew code page Excel uses for
/// CSV export.
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReadError> {
    let mut file = std::fs::File::open(path).map_err(|e| ReadError::Open(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ReadError::Open(e.to_string()))?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::WINDOWS_1255.decode(&bytes);
            if had_errors {
                return Err(ReadError::Open(
                    "file is neither UTF-8 nor Windows-1255 text".into(),
                ));
            }
            decoded.into_owned()
        }
    };

    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

/// Parse CSV text. Header cells keep their text; data cells are type-inferred.
pub fn import_from_string(content: &str, delimiter: u8) -> Result<RawTable, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ReadError::Csv(e.to_string()))?;
        let row = if row_idx == 0 {
            record.iter().map(CellValue::from).collect()
        } else {
            record.iter().map(CellValue::infer).collect()
        };
        grid.push(row);
    }

    Ok(RawTable::from_grid(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sniff_prefers_consistent_width() {
        assert_eq!(sniff_delimiter("שנה;חודש;תחנה\n2025;10;לוד\n2025;11;לוד\n"), b';');
        assert_eq!(sniff_delimiter("שנה\tחודש\n2025\t10\n"), b'\t');
        assert_eq!(sniff_delimiter("שנה,חודש,תחנה\n2025,10,לוד\n"), b',');
    }

    #[test]
    fn sniff_ignores_delimiters_inside_quotes() {
        let content = "תחנה;הערה\n\"לוד\";\"איחור, קל\"\n\"חיפה\";\"תקין, בזמן\"\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniff_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("תחנה\nלוד\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_import_infers_data_but_not_headers() {
        let table = import_from_string("שנה,חודש,שם\n2025,11,Savidor\n", b',').unwrap();
        assert_eq!(table.headers, vec!["שנה", "חודש", "שם"]);
        assert_eq!(table.rows[0][0], CellValue::Int(2025));
        assert_eq!(table.rows[0][2], CellValue::Text("Savidor".into()));
    }

    #[test]
    fn test_import_numeric_header_kept_as_text() {
        let table = import_from_string("01,b\n1,2\n", b',').unwrap();
        assert_eq!(table.headers, vec!["01", "b"]);
    }

    #[test]
    fn test_bom_stripped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}שנה,חודש\n2025,10\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers[0], "שנה");
        assert_eq!(table.rows[0][1], CellValue::Int(10));
    }

    #[test]
    fn test_windows_1255_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hebrew.csv");
        // "שנה,תחנה" / "2025,חיפה" in code page 1255
        fs::write(&path, b"\xf9\xf0\xe4,\xfa\xe7\xf0\xe4\n2025,\xe7\xe9\xf4\xe4\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers, vec!["שנה", "תחנה"]);
        assert_eq!(table.rows[0][1], CellValue::Text("חיפה".into()));
    }

    #[test]
    fn test_undecodable_bytes_are_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.csv");
        // 0xFB is unmapped in code page 1255
        fs::write(&path, b"a,b\n\xfb\xfc,1\n").unwrap();

        let err = import(&path).unwrap_err();
        assert!(matches!(err, ReadError::Open(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempdir().unwrap();
        let err = import(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ReadError::Open(_)));
    }
}
