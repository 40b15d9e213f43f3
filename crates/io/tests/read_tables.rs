use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use shiluvim_io::{read_table, CellValue, ReadError};
use tempfile::tempdir;

fn write_xlsx(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "שם תחנת הרכבת").unwrap();
    sheet.write_string(0, 1, "שנה").unwrap();
    sheet.write_string(0, 2, "אחוז").unwrap();
    sheet.write_string(1, 0, "תל אביב סבידור").unwrap();
    sheet.write_number(1, 1, 2025.0).unwrap();
    sheet.write_number(1, 2, 93.4).unwrap();
    sheet.write_string(2, 0, "חיפה").unwrap();
    sheet.write_number(2, 1, 2025.0).unwrap();
    workbook.save(path).unwrap();
}

#[test]
fn reads_first_sheet_of_xlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("WeekDay_rail_bus_convergence_2025-11.xlsx");
    write_xlsx(&path);

    let table = read_table(&path).unwrap();
    assert_eq!(table.headers, vec!["שם תחנת הרכבת", "שנה", "אחוז"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0][0], CellValue::Text("תל אביב סבידור".into()));
    assert_eq!(table.rows[0][1], CellValue::Int(2025));
    assert_eq!(table.rows[0][2], CellValue::Float(93.4));
    // Missing trailing cell is padded
    assert_eq!(table.rows[1][2], CellValue::Null);
}

#[test]
fn reads_csv_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Friday_rail_bus_convergence_2025-10.csv");
    fs::write(&path, "שנה;חודש\n2025;10\n").unwrap();

    let table = read_table(&path).unwrap();
    assert_eq!(table.headers, vec!["שנה", "חודש"]);
    assert_eq!(table.rows[0], vec![CellValue::Int(2025), CellValue::Int(10)]);
}

#[test]
fn corrupt_workbook_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    fs::write(&path, b"this is not a zip archive").unwrap();

    let err = read_table(&path).unwrap_err();
    assert!(matches!(err, ReadError::Open(_)), "got {err:?}");
}

#[test]
fn unsupported_extension_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let err = read_table(&path).unwrap_err();
    assert_eq!(err.to_string(), "unsupported file extension: 'txt'");
}
