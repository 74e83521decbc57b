use crate::carrier::classify;
use crate::grid::{CellGrid, CellValue};
use crate::record::ShipmentRecord;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TRACKING_TOKEN_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

/// Shortest token (in characters) that can still be a tracking number.
const MIN_TRACKING_LEN: usize = 6;

/// Whether a cell's trimmed text could be a tracking number.
pub fn is_tracking_candidate(value: &str) -> bool {
    value.len() >= MIN_TRACKING_LEN && TRACKING_TOKEN_REGEX.is_match(value)
}

/// Label used for a column whose header cell is missing or blank.
pub fn synthesized_column_name(column_index: usize) -> String {
    format!("Column {}", column_index + 1)
}

fn column_name(header: Option<&[CellValue]>, column_index: usize) -> String {
    header
        .and_then(|cells| cells.get(column_index))
        .map(CellValue::render)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| synthesized_column_name(column_index))
}

/// Turn a worksheet grid into shipment records.
///
/// Every cell below the header row is inspected in row-major order. Cells
/// whose trimmed text is a pure alphanumeric token longer than five
/// characters become records, tagged with a carrier guess and the header
/// label of their column. Keys count up from 0 in scan order.
///
/// Malformed rows are skipped, and an empty or header-only grid yields an
/// empty list.
///
/// # Examples
/// ```
/// use parcel_triage::extractor::extract;
/// use parcel_triage::grid::{CellGrid, CellValue};
///
/// let grid = CellGrid::from(vec![
///     vec![CellValue::from("中通"), CellValue::from("备注")],
///     vec![CellValue::from("75761365043766"), CellValue::from("破损")],
/// ]);
///
/// let records = extract(&grid);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].company, "中通");
/// assert_eq!(records[0].column_name, "中通");
/// ```
pub fn extract(grid: &CellGrid) -> Vec<ShipmentRecord> {
    let header = grid.header();
    let mut records = Vec::new();
    let mut key_counter: u64 = 0;

    for (row_index, row) in grid.rows.iter().enumerate().skip(1) {
        let Some(cells) = row.cells() else {
            continue;
        };

        for (column_index, cell) in cells.iter().enumerate() {
            let rendered = cell.render();
            let value = rendered.trim();
            if !is_tracking_candidate(value) {
                continue;
            }

            records.push(ShipmentRecord::new(
                key_counter,
                value,
                classify(value),
                row_index,
                column_index,
                column_name(header, column_index),
            ));
            key_counter += 1;
        }
    }

    log::debug!(
        "Extracted {} shipment records from {} grid rows",
        records.len(),
        grid.len()
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRow;
    use crate::record::Status;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_candidate_rule() {
        assert!(is_tracking_candidate("ABC123"));
        assert!(is_tracking_candidate("75761365043766"));
        assert!(!is_tracking_candidate("ABC12"));
        assert!(!is_tracking_candidate(""));
        assert!(!is_tracking_candidate("YT-894185215852"));
        assert!(!is_tracking_candidate("YT 894185215852"));
        assert!(!is_tracking_candidate("2024-01-15"));
        assert!(!is_tracking_candidate("快递单号快递单号"));
    }

    #[test]
    fn test_extract_scans_row_major_and_skips_header() {
        let grid = CellGrid::from(vec![
            vec![text("中通"), text("申通"), text("YT894185215852")],
            vec![text("75761365043766"), text("77632957076153")],
            vec![text("短"), CellValue::Empty, text(" YT894185215852 ")],
        ]);

        let records = extract(&grid);
        let keys: Vec<u64> = records.iter().map(|r| r.key).collect();
        let positions: Vec<(usize, usize)> = records
            .iter()
            .map(|r| (r.row_index, r.column_index))
            .collect();

        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(positions, vec![(1, 0), (1, 1), (2, 2)]);
        assert_eq!(records[2].tracking_number, "YT894185215852");
        assert_eq!(records[2].company, "圆通");
        assert_eq!(records[2].column_name, "YT894185215852");
        assert!(records.iter().all(|r| r.status == Status::Pending));
        assert!(records.iter().all(|r| r.recipient.is_empty()));
    }

    #[test]
    fn test_numeric_cells_are_candidates() {
        let grid = CellGrid::from(vec![
            vec![text("单号")],
            vec![CellValue::Number(75761365043766.0)],
            vec![CellValue::Number(12345.0)],
            vec![CellValue::Number(0.0)],
        ]);

        let records = extract(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tracking_number, "75761365043766");
        assert_eq!(records[0].company, "中通");
    }

    #[test]
    fn test_column_name_fallbacks() {
        let grid = CellGrid::from(vec![
            vec![text("单号"), text("")],
            vec![text("AAAAAA"), text("BBBBBB"), text("CCCCCC")],
        ]);

        let records = extract(&grid);
        let names: Vec<&str> = records.iter().map(|r| r.column_name.as_str()).collect();
        assert_eq!(names, vec!["单号", "Column 2", "Column 3"]);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let grid = CellGrid {
            rows: vec![
                GridRow::Malformed(serde_json::json!("not a row")),
                GridRow::Malformed(serde_json::json!({"tracking": "YT894185215852"})),
                GridRow::Cells(vec![text("YT894185215852")]),
            ],
        };

        let records = extract(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, 0);
        assert_eq!(records[0].row_index, 2);
        assert_eq!(records[0].column_name, "Column 1");
    }

    #[test]
    fn test_empty_and_header_only_grids() {
        assert!(extract(&CellGrid::new()).is_empty());

        let header_only = CellGrid::from(vec![vec![text("75761365043766"), text("YT894185215852")]]);
        assert!(extract(&header_only).is_empty());
    }
}
