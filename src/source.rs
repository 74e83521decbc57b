use crate::error::Result;
use crate::extractor::extract;
use crate::loader::read_grid;
use crate::record::ShipmentRecord;
use serde::Serialize;
use std::path::Path;

/// How a batch of records came to be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LoadOutcome {
    /// The default file parsed and held this many tracking numbers
    DefaultFile { count: usize },
    /// The default file parsed but held no tracking numbers
    FallbackEmpty,
    /// The default file could not be read or parsed
    FallbackUnavailable { reason: String },
    /// An uploaded file replaced the current records
    Uploaded { count: usize },
}

/// Severity of a message shown to the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Notice {
            level,
            message: message.into(),
        }
    }
}

impl LoadOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            LoadOutcome::DefaultFile { count } => Notice::new(
                NoticeLevel::Success,
                format!("Loaded default data: {} shipments", count),
            ),
            LoadOutcome::FallbackEmpty => Notice::new(
                NoticeLevel::Info,
                "No tracking numbers found in the default file; showing sample data",
            ),
            LoadOutcome::FallbackUnavailable { .. } => Notice::new(
                NoticeLevel::Warning,
                "Could not load the default file; showing sample data",
            ),
            LoadOutcome::Uploaded { count } => Notice::new(
                NoticeLevel::Success,
                format!("Read {} shipments from the uploaded file", count),
            ),
        }
    }
}

/// Parse an uploaded workbook into records.
///
/// Errors are returned to the caller untouched; the current records must
/// stay as they are when this fails.
pub fn records_from_upload(bytes: &[u8]) -> Result<(Vec<ShipmentRecord>, LoadOutcome)> {
    let grid = read_grid(bytes)?;
    let records = extract(&grid);
    let outcome = LoadOutcome::Uploaded {
        count: records.len(),
    };
    Ok((records, outcome))
}

/// Load the bundled default workbook, falling back to [`fallback_records`].
///
/// This never fails: a missing or unreadable file and a file without any
/// tracking numbers each produce the fallback set with their own outcome.
pub fn load_default(path: impl AsRef<Path>) -> (Vec<ShipmentRecord>, LoadOutcome) {
    let path = path.as_ref();

    match crate::loader::read_grid_from_path(path) {
        Ok(grid) => {
            let records = extract(&grid);
            if records.is_empty() {
                log::info!(
                    "Default file {} contains no tracking numbers, using fallback data",
                    path.display()
                );
                (fallback_records(), LoadOutcome::FallbackEmpty)
            } else {
                log::info!(
                    "Loaded {} shipment records from {}",
                    records.len(),
                    path.display()
                );
                let count = records.len();
                (records, LoadOutcome::DefaultFile { count })
            }
        }
        Err(e) => {
            log::warn!("Failed to load default file {}: {}", path.display(), e);
            (
                fallback_records(),
                LoadOutcome::FallbackUnavailable {
                    reason: e.to_string(),
                },
            )
        }
    }
}

// (tracking number, source column, carrier)
const FALLBACK_SHIPMENTS: &[(&str, &str, &str)] = &[
    ("75761365043766", "中通", "中通"),
    ("75761370314853", "中通", "中通"),
    ("75761778084401", "中通", "中通"),
    ("75701252115546", "中通", "中通"),
    ("77632957076153", "申通", "申通"),
    ("77716951501759", "申通", "申通"),
    ("77718014846666", "申通", "申通"),
    ("77637759935866", "申通", "申通"),
    ("YT894185215852", "圆通", "圆通"),
    ("YT893990509270", "圆通", "圆通"),
    ("YT893963976843", "圆通", "圆通"),
    ("YT894201069876", "圆通", "圆通"),
    ("46334069260168", "韵达", "韵达"),
    ("31866359263298", "韵达", "韵达"),
    ("46287276652932", "韵达", "韵达"),
    ("31843064579230", "韵达", "韵达"),
    ("98574940403", "邮政", ""),
    ("98560526232", "邮政", ""),
    ("98536949291", "邮政", ""),
    ("97296408178", "邮政", ""),
];

/// Hardcoded records shown when the default file is unusable.
///
/// Carriers here are taken from the source column as labelled, not from the
/// classifier, and positions imitate a four-column sheet.
pub fn fallback_records() -> Vec<ShipmentRecord> {
    FALLBACK_SHIPMENTS
        .iter()
        .enumerate()
        .map(|(index, (number, column, company))| {
            ShipmentRecord::new(
                index as u64,
                *number,
                *company,
                index / 4 + 1,
                index % 4,
                *column,
            )
        })
        .collect()
}
