use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing status an operator assigns to a held shipment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Done];

    /// Label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "待处理",
            Status::InProgress => "处理中",
            Status::Done => "已完成",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracking number found in a spreadsheet, plus the operator's notes on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    /// Position in the extraction pass that produced this record
    pub key: u64,
    pub tracking_number: String,
    /// Carrier guess; empty when unrecognized
    pub company: String,
    pub recipient: String,
    pub phone: String,
    pub address: String,
    pub status: Status,
    pub row_index: usize,
    pub column_index: usize,
    /// Header label of the source column
    pub column_name: String,
}

impl ShipmentRecord {
    pub fn new(
        key: u64,
        tracking_number: impl Into<String>,
        company: impl Into<String>,
        row_index: usize,
        column_index: usize,
        column_name: impl Into<String>,
    ) -> Self {
        ShipmentRecord {
            key,
            tracking_number: tracking_number.into(),
            company: company.into(),
            recipient: String::new(),
            phone: String::new(),
            address: String::new(),
            status: Status::Pending,
            row_index,
            column_index,
            column_name: column_name.into(),
        }
    }
}
