//! Operator-facing triage state: the record set, the visible subset, and the
//! edit panel. Every change goes through [`TriageState::apply`], which takes
//! the current state and an [`Event`] and returns the next state, leaving the
//! original untouched.

use crate::record::{ShipmentRecord, Status};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

lazy_static! {
    static ref MOBILE_REGEX: Regex = Regex::new(r"^1[3-9][0-9]{9}$").unwrap();
}

/// Sentinel that clears a carrier filter.
pub const ALL_CARRIERS: &str = "all";

/// Carrier filter selection.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CarrierFilter {
    All,
    Carrier(String),
}

impl From<String> for CarrierFilter {
    fn from(value: String) -> Self {
        if value == ALL_CARRIERS || value == "全部" {
            CarrierFilter::All
        } else {
            CarrierFilter::Carrier(value)
        }
    }
}

impl From<&str> for CarrierFilter {
    fn from(value: &str) -> Self {
        CarrierFilter::from(value.to_string())
    }
}

/// What currently narrows the visible records. Search and carrier filter
/// replace each other; they never combine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ViewQuery {
    #[default]
    All,
    Search(String),
    Carrier(String),
}

impl ViewQuery {
    pub fn label(&self) -> String {
        match self {
            ViewQuery::All => String::new(),
            ViewQuery::Search(q) => q.clone(),
            ViewQuery::Carrier(c) => format!("Carrier: {}", c),
        }
    }
}

/// Editable fields of a shipment, as submitted from the edit panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: Status,
}

impl EditForm {
    fn from_record(record: &ShipmentRecord) -> Self {
        EditForm {
            recipient: record.recipient.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
            status: record.status,
        }
    }

    /// Check every field, collecting all problems instead of stopping at
    /// the first one.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.recipient.is_empty() {
            errors.push(FieldError::new("recipient", "Recipient name is required"));
        }
        if self.phone.is_empty() {
            errors.push(FieldError::new("phone", "Phone number is required"));
        } else if !MOBILE_REGEX.is_match(&self.phone) {
            errors.push(FieldError::new("phone", "Enter a valid 11-digit mobile number"));
        }
        if self.address.is_empty() {
            errors.push(FieldError::new("address", "Address is required"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_string(),
        }
    }
}

/// The open edit panel: which record, and the values it was opened with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Editor {
    pub key: u64,
    pub draft: EditForm,
}

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("No shipment with key {0}")]
    UnknownKey(u64),

    #[error("No shipment is being edited")]
    EditorClosed,

    #[error("Invalid shipment details")]
    Invalid(Vec<FieldError>),
}

pub enum Event {
    /// A fresh extraction pass replaces everything
    Replace(Vec<ShipmentRecord>),
    Search(String),
    FilterCarrier(CarrierFilter),
    OpenEditor(u64),
    CloseEditor,
    Save(EditForm),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CarrierCount {
    pub company: String,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriageState {
    records: Vec<ShipmentRecord>,
    visible: Vec<u64>,
    query: ViewQuery,
    editor: Option<Editor>,
}

impl TriageState {
    pub fn new(records: Vec<ShipmentRecord>) -> Self {
        let visible = records.iter().map(|r| r.key).collect();
        TriageState {
            records,
            visible,
            query: ViewQuery::All,
            editor: None,
        }
    }

    pub fn apply(&self, event: Event) -> Result<TriageState, TriageError> {
        match event {
            Event::Replace(records) => Ok(TriageState::new(records)),
            Event::Search(query) => Ok(self.search(query)),
            Event::FilterCarrier(filter) => Ok(self.filter_carrier(filter)),
            Event::OpenEditor(key) => self.open_editor(key),
            Event::CloseEditor => Ok(TriageState {
                editor: None,
                ..self.clone()
            }),
            Event::Save(form) => self.save(form),
        }
    }

    fn all_keys(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.key).collect()
    }

    fn search(&self, query: String) -> TriageState {
        if query.is_empty() {
            return TriageState {
                visible: self.all_keys(),
                query: ViewQuery::All,
                ..self.clone()
            };
        }

        let lowered = query.to_lowercase();
        let visible = self
            .records
            .iter()
            .filter(|r| {
                r.tracking_number.to_lowercase().contains(&lowered)
                    || r.company.contains(&query)
                    || r.recipient.contains(&query)
                    || r.phone.contains(&query)
                    || r.address.contains(&query)
            })
            .map(|r| r.key)
            .collect();

        TriageState {
            visible,
            query: ViewQuery::Search(query),
            ..self.clone()
        }
    }

    fn filter_carrier(&self, filter: CarrierFilter) -> TriageState {
        match filter {
            CarrierFilter::All => TriageState {
                visible: self.all_keys(),
                query: ViewQuery::All,
                ..self.clone()
            },
            CarrierFilter::Carrier(company) => {
                let visible = self
                    .records
                    .iter()
                    .filter(|r| r.company == company)
                    .map(|r| r.key)
                    .collect();
                TriageState {
                    visible,
                    query: ViewQuery::Carrier(company),
                    ..self.clone()
                }
            }
        }
    }

    fn open_editor(&self, key: u64) -> Result<TriageState, TriageError> {
        let record = self.record(key).ok_or(TriageError::UnknownKey(key))?;
        Ok(TriageState {
            editor: Some(Editor {
                key,
                draft: EditForm::from_record(record),
            }),
            ..self.clone()
        })
    }

    fn save(&self, form: EditForm) -> Result<TriageState, TriageError> {
        let editor = self.editor.as_ref().ok_or(TriageError::EditorClosed)?;
        form.validate().map_err(TriageError::Invalid)?;

        let mut next = self.clone();
        let record = next
            .records
            .iter_mut()
            .find(|r| r.key == editor.key)
            .ok_or(TriageError::UnknownKey(editor.key))?;

        record.recipient = form.recipient;
        record.phone = form.phone;
        record.address = form.address;
        record.status = form.status;
        // visible keys are left as they were, even if the edit no longer matches the query
        next.editor = None;

        Ok(next)
    }

    pub fn records(&self) -> &[ShipmentRecord] {
        &self.records
    }

    pub fn record(&self, key: u64) -> Option<&ShipmentRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    /// Records currently in view, in extraction order.
    pub fn visible_records(&self) -> Vec<&ShipmentRecord> {
        let visible: HashSet<u64> = self.visible.iter().copied().collect();
        self.records
            .iter()
            .filter(|r| visible.contains(&r.key))
            .collect()
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    /// Number of records per carrier, unrecognized (`""`) included, in the
    /// order each carrier first appears.
    pub fn carrier_stats(&self) -> Vec<CarrierCount> {
        let mut stats: Vec<CarrierCount> = Vec::new();
        for record in &self.records {
            match stats.iter_mut().find(|s| s.company == record.company) {
                Some(entry) => entry.count += 1,
                None => stats.push(CarrierCount {
                    company: record.company.clone(),
                    count: 1,
                }),
            }
        }
        stats
    }
}
