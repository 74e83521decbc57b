use parcel_triage::carrier::{CARRIER_PATTERNS, classify};
use parcel_triage::extractor::extract;
use parcel_triage::grid::{CellGrid, CellValue};
use parcel_triage::loader::{read_grid, read_sheet_grids};
use parcel_triage::sample::{TRACKING_COLUMN, sample_batches, sample_workbook};

// Helper to build a grid from string rows
fn grid_of(rows: &[&[&str]]) -> CellGrid {
    CellGrid::from(
        rows.iter()
            .map(|row| row.iter().map(|s| CellValue::from(*s)).collect())
            .collect::<Vec<Vec<CellValue>>>(),
    )
}

#[test]
fn test_sample_workbook_round_trip() {
    let bytes = sample_workbook().expect("sample workbook should build");
    let sheets = read_sheet_grids(&bytes).expect("sample workbook should read back");
    let batches = sample_batches();

    assert_eq!(sheets.len(), batches.len());

    for ((sheet_name, grid), batch) in sheets.iter().zip(&batches) {
        assert_eq!(sheet_name, batch.name);

        let records = extract(grid);
        let tracked: Vec<(String, String)> = records
            .iter()
            .filter(|r| r.column_index == TRACKING_COLUMN)
            .map(|r| (r.tracking_number.clone(), r.company.clone()))
            .collect();
        let expected: Vec<(String, String)> = batch
            .rows
            .iter()
            .map(|row| (row.tracking_number.to_string(), row.company()))
            .collect();

        assert_eq!(tracked, expected, "batch {}", batch.name);
        assert!(
            records
                .iter()
                .filter(|r| r.column_index == TRACKING_COLUMN)
                .all(|r| r.column_name == "快递单号")
        );

        // The carrier column written to the sheet matches what was re-inferred
        for record in records.iter().filter(|r| r.column_index == TRACKING_COLUMN) {
            let row = grid.rows[record.row_index].cells().unwrap();
            assert_eq!(row[TRACKING_COLUMN + 1].render(), record.company);
        }

        // Phone numbers are the only other alphanumeric cells on a sample sheet
        let others: Vec<usize> = records
            .iter()
            .filter(|r| r.column_index != TRACKING_COLUMN)
            .map(|r| r.column_index)
            .collect();
        assert_eq!(others, vec![9; batch.rows.len()]);

        println!("✓ Batch {} round-trips {} tracking numbers", batch.name, tracked.len());
    }
}

#[test]
fn test_upload_reads_only_first_sheet() {
    let bytes = sample_workbook().unwrap();
    let grid = read_grid(&bytes).unwrap();
    let records = extract(&grid);

    assert_eq!(records.len(), 10);
    assert_eq!(records[0].tracking_number, "75761365043766");
    assert_eq!(records[0].row_index, 1);
    assert_eq!(records[1].tracking_number, "13800138001");
    assert_eq!(records[1].company, "");
}

#[test]
fn test_short_punctuated_and_header_tokens_are_excluded() {
    let grid = grid_of(&[
        &["YT894185215852", "75761365043766"],
        &["ABCDE", "YT-89418521"],
        &["12345", "YT894185215852 "],
        &["a b c d e f", "ZTO1234567890"],
    ]);

    let records = extract(&grid);
    let numbers: Vec<&str> = records.iter().map(|r| r.tracking_number.as_str()).collect();

    assert_eq!(numbers, vec!["YT894185215852", "ZTO1234567890"]);
    assert!(records.iter().all(|r| r.row_index > 0));
    assert_eq!(records[0].column_name, "75761365043766");
}

#[test]
fn test_header_only_grid_yields_nothing() {
    let grid = grid_of(&[&["快递单号", "75761365043766"]]);
    assert!(extract(&grid).is_empty());
    assert!(extract(&CellGrid::new()).is_empty());
}

#[test]
fn test_seven_prefixed_numbers_resolve_by_table_order() {
    // first table entry whose pattern accepts the token wins
    for len in 12..=16 {
        let token = format!("7{}", "5".repeat(len - 1));
        let winner = CARRIER_PATTERNS
            .iter()
            .find(|(_, pattern)| regex::Regex::new(pattern).unwrap().is_match(&token))
            .map(|(name, _)| *name)
            .unwrap();
        assert_eq!(winner, "中通");
        assert_eq!(classify(&token), "中通", "{}", token);
    }
    assert_eq!(classify("75761365043766"), "中通");
}

#[test]
fn test_extraction_is_repeatable_with_fresh_keys() {
    let grid = grid_of(&[&["单号"], &["YT894185215852"], &["YT893990509270"]]);

    let first = extract(&grid);
    let second = extract(&grid);

    assert_eq!(first, second);
    assert_eq!(first.iter().map(|r| r.key).collect::<Vec<_>>(), vec![0, 1]);
}
