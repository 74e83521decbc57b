use serde::{Deserialize, Serialize};

/// A single spreadsheet cell, as read from a workbook or posted as JSON.
///
/// The untagged representation lets a grid travel as a plain JSON array of
/// arrays (`[["快递单号"], ["YT894185215852"], [null, 12.5]]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Nested arrays/objects. Never a tracking number.
    Other(serde_json::Value),
}

impl CellValue {
    /// Render the cell the way a browser would stringify it.
    ///
    /// Falsy values (empty, `false`, `0`, `""`) render as the empty string,
    /// integral numbers render without a fraction, and very large or very
    /// small magnitudes switch to exponent form (`1e+21`, `1e-7`).
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty | CellValue::Other(_) => String::new(),
            CellValue::Bool(false) => String::new(),
            CellValue::Bool(true) => "true".to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n == 0.0 || n.is_nan() {
        return String::new();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 {
        // "1e21" -> "1e+21"
        return format!("{:e}", n).replacen('e', "e+", 1);
    }
    if n.fract() == 0.0 {
        return format!("{:.0}", n);
    }
    if magnitude < 1e-6 {
        return format!("{:e}", n);
    }
    format!("{}", n)
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// One grid row. Anything that is not an array is kept as `Malformed` so
/// that extraction can skip it without rejecting the whole grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridRow {
    Cells(Vec<CellValue>),
    Malformed(serde_json::Value),
}

impl GridRow {
    pub fn cells(&self) -> Option<&[CellValue]> {
        match self {
            GridRow::Cells(cells) => Some(cells),
            GridRow::Malformed(_) => None,
        }
    }
}

/// Row-of-cells view of a worksheet. Row 0 is the header row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellGrid {
    pub rows: Vec<GridRow>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        self.rows.push(GridRow::Cells(cells));
    }

    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.first().and_then(GridRow::cells)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<CellValue>>> for CellGrid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        CellGrid {
            rows: rows.into_iter().map(GridRow::Cells).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numbers_like_a_browser() {
        assert_eq!(CellValue::from(75761365043766.0).render(), "75761365043766");
        assert_eq!(CellValue::from(1.5).render(), "1.5");
        assert_eq!(CellValue::from(0.0).render(), "");
        assert_eq!(CellValue::from(1e21).render(), "1e+21");
        assert_eq!(CellValue::from(1e-7).render(), "1e-7");
        assert_eq!(CellValue::from(-42.0).render(), "-42");
    }

    #[test]
    fn test_render_falsy_cells() {
        assert_eq!(CellValue::Empty.render(), "");
        assert_eq!(CellValue::from(false).render(), "");
        assert_eq!(CellValue::from(true).render(), "true");
        assert_eq!(CellValue::from("").render(), "");
    }

    #[test]
    fn test_grid_from_json_keeps_malformed_rows() {
        let grid: CellGrid =
            serde_json::from_str(r#"[["快递单号"], "oops", [null, 12, "YT894185215852", {"a": 1}]]"#)
                .unwrap();

        assert_eq!(grid.len(), 3);
        assert!(matches!(grid.rows[1], GridRow::Malformed(_)));

        let cells = grid.rows[2].cells().unwrap();
        assert_eq!(cells[0], CellValue::Empty);
        assert_eq!(cells[1], CellValue::Number(12.0));
        assert_eq!(cells[2], CellValue::from("YT894185215852"));
        assert!(matches!(cells[3], CellValue::Other(_)));
    }
}
