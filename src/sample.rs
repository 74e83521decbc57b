use crate::carrier::classify;
use crate::error::Result;
use crate::grid::{CellGrid, CellValue};
use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};

/// Column headers shared by every batch sheet.
pub const SAMPLE_HEADERS: [&str; 11] = [
    "序号",
    "快递批次",
    "快递单号",
    "快递公司",
    "类型",
    "状态",
    "到仓时间",
    "发出时间",
    "收件人",
    "电话号码",
    "家庭住址",
];

/// Column widths in characters, one per header.
pub const COLUMN_WIDTHS: [f64; 11] = [8.0, 15.0, 20.0, 12.0, 10.0, 12.0, 15.0, 15.0, 12.0, 15.0, 30.0];

/// Index of the tracking-number column.
pub const TRACKING_COLUMN: usize = 2;

/// One shipment line of a sample batch.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRow {
    pub sequence: u32,
    pub tracking_number: &'static str,
    pub issue: &'static str,
    pub status: &'static str,
    pub arrived: &'static str,
    pub dispatched: &'static str,
    pub recipient: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
}

impl SampleRow {
    /// Carrier column value, derived from the tracking number so that
    /// re-importing the sheet yields the same carrier.
    pub fn company(&self) -> String {
        classify(self.tracking_number)
    }
}

/// A named group of sample rows, written as one worksheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBatch {
    pub name: &'static str,
    pub rows: Vec<SampleRow>,
}

impl SampleBatch {
    /// Header plus data rows, as they appear on the worksheet.
    pub fn to_grid(&self) -> CellGrid {
        let mut grid = CellGrid::new();
        grid.push_row(SAMPLE_HEADERS.iter().map(|h| CellValue::from(*h)).collect());

        for row in &self.rows {
            grid.push_row(vec![
                CellValue::Number(row.sequence as f64),
                CellValue::from(self.name),
                CellValue::from(row.tracking_number),
                CellValue::from(row.company()),
                CellValue::from(row.issue),
                CellValue::from(row.status),
                CellValue::from(row.arrived),
                CellValue::from(row.dispatched),
                CellValue::from(row.recipient),
                CellValue::from(row.phone),
                CellValue::from(row.address),
            ]);
        }

        grid
    }
}

#[allow(clippy::too_many_arguments)]
fn row(
    sequence: u32,
    tracking_number: &'static str,
    issue: &'static str,
    status: &'static str,
    arrived: &'static str,
    dispatched: &'static str,
    recipient: &'static str,
    phone: &'static str,
    address: &'static str,
) -> SampleRow {
    SampleRow {
        sequence,
        tracking_number,
        issue,
        status,
        arrived,
        dispatched,
        recipient,
        phone,
        address,
    }
}

/// The two onboarding batches shipped in the sample workbook.
pub fn sample_batches() -> Vec<SampleBatch> {
    vec![
        SampleBatch {
            name: "2024-01",
            rows: vec![
                row(1, "75761365043766", "正常", "已发出", "2024-01-15", "2024-01-16", "张三", "13800138001", "北京市朝阳区xxx街道xxx号"),
                row(2, "77632957076153", "名字错误", "滞留仓库", "2024-01-15", "", "李四", "13800138002", "上海市浦东新区xxx路xxx号"),
                row(3, "YT894185215852", "正常", "已送达", "2024-01-16", "2024-01-17", "王五", "13800138003", "广州市天河区xxx大道xxx号"),
                row(4, "46334069260168", "正常", "处理中", "2024-01-16", "", "赵六", "13800138004", "深圳市南山区xxx街xxx号"),
                row(5, "98574940403", "正常", "待处理", "2024-01-17", "", "钱七", "13800138005", "杭州市西湖区xxx路xxx号"),
            ],
        },
        SampleBatch {
            name: "2024-02",
            rows: vec![
                row(1, "75761370314853", "正常", "已发出", "2024-02-01", "2024-02-02", "孙八", "13800138006", "南京市鼓楼区xxx街道xxx号"),
                row(2, "77716951501759", "正常", "已送达", "2024-02-01", "2024-02-03", "周九", "13800138007", "武汉市武昌区xxx路xxx号"),
                row(3, "YT893990509270", "名字错误", "滞留仓库", "2024-02-02", "", "吴十", "13800138008", "成都市锦江区xxx大道xxx号"),
                row(4, "31866359263298", "正常", "已发出", "2024-02-02", "2024-02-04", "郑一", "13800138009", "重庆市渝中区xxx街xxx号"),
                row(5, "9859804263924", "正常", "处理中", "2024-02-03", "", "陈二", "13800138010", "西安市雁塔区xxx路xxx号"),
            ],
        },
    ]
}

/// Build the sample workbook as XLSX bytes
///
/// One worksheet per batch, each starting with [`SAMPLE_HEADERS`] and using
/// [`COLUMN_WIDTHS`]. Sequence numbers are written as numbers, everything
/// else as text; blank fields are left as empty cells.
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```
/// use parcel_triage::sample::sample_workbook;
///
/// let bytes = sample_workbook().unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub fn sample_workbook() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for batch in sample_batches() {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(batch.name)?;

        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        for (r, cells) in batch.to_grid().rows.iter().enumerate() {
            let Some(cells) = cells.cells() else {
                continue;
            };
            for (c, cell) in cells.iter().enumerate() {
                let (row, col) = (r as u32, c as u16);
                match cell {
                    CellValue::Number(n) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    CellValue::Text(s) if !s.is_empty() => {
                        worksheet.write_string(row, col, s)?;
                    }
                    _ => {}
                }
            }
        }

        workbook.push_worksheet(worksheet);
    }

    let buffer = workbook.save_to_buffer()?;
    log::debug!("Generated sample workbook ({} bytes)", buffer.len());

    Ok(buffer)
}

/// Download name for the sample workbook, e.g. `快递数据示例_2024-03-01.xlsx`.
pub fn sample_filename(date: NaiveDate) -> String {
    format!("快递数据示例_{}.xlsx", date.format("%Y-%m-%d"))
}

pub fn sample_filename_today() -> String {
    sample_filename(chrono::Utc::now().date_naive())
}
