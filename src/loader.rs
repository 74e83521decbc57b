use crate::error::{Result, WorkbookError};
use crate::grid::{CellGrid, CellValue};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use std::io::Cursor;
use std::path::Path;

fn open_workbook(bytes: &[u8]) -> Result<Sheets<Cursor<Vec<u8>>>> {
    Ok(open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?)
}

/// Read the first worksheet of an in-memory workbook into a cell grid
///
/// Legacy `.xls`, `.xlsx`, `.xlsb` and `.ods` files are detected from their
/// contents, so the caller does not need to know the original extension.
///
/// # Arguments
/// * `bytes` - Complete workbook file contents
///
/// # Returns
/// * `Result<CellGrid>` - Grid of the first sheet, in absolute sheet coordinates
///
/// # Examples
/// ```no_run
/// use parcel_triage::loader::read_grid;
///
/// let bytes = std::fs::read("在仓问题件.xls").unwrap();
/// let grid = read_grid(&bytes).unwrap();
/// println!("{} rows", grid.len());
/// ```
pub fn read_grid(bytes: &[u8]) -> Result<CellGrid> {
    let mut workbook = open_workbook(bytes)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbookError::NoSheets)??;

    Ok(range_to_grid(&range))
}

/// Read every worksheet of an in-memory workbook, in workbook order
///
/// # Returns
/// * `Result<Vec<(String, CellGrid)>>` - Sheet name and grid for each sheet
pub fn read_sheet_grids(bytes: &[u8]) -> Result<Vec<(String, CellGrid)>> {
    let mut workbook = open_workbook(bytes)?;

    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(WorkbookError::NoSheets);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push((name, range_to_grid(&range)));
    }

    Ok(sheets)
}

/// Read the first worksheet of a workbook on disk
///
/// The whole file is loaded into memory before parsing.
pub fn read_grid_from_path(path: impl AsRef<Path>) -> Result<CellGrid> {
    let bytes = std::fs::read(path)?;
    read_grid(&bytes)
}

// Pad leading empty rows/columns so indices match the sheet's own coordinates
fn range_to_grid(range: &Range<Data>) -> CellGrid {
    let mut grid = CellGrid::new();

    let Some((start_row, start_col)) = range.start() else {
        return grid;
    };

    for _ in 0..start_row {
        grid.push_row(Vec::new());
    }

    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        grid.push_row(cells);
    }

    grid
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        // Dates stay serial numbers, like an unformatted sheet export
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
