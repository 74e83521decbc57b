/*!
# Held-Parcel Triage

A browser-served tool for triaging courier shipments held in a warehouse.

## Overview

Operators receive spreadsheets listing tracking numbers of parcels stuck in
the warehouse. This crate reads such a workbook, picks out every cell that
looks like a tracking number, guesses the carrier from the number's format,
and serves a small web page where the operator can search, filter by carrier,
and fill in recipient details for each shipment.

## Architecture

### Core
- **Classifier** (`carrier`) - ordered table of ten carrier patterns; first match wins
- **Extractor** (`extractor`) - scans a cell grid row by row and emits shipment records
- **Grid** (`grid`) - cell values and how they render to text

### Data sources
- **Loader** (`loader`) - `.xls` / `.xlsx` bytes to a cell grid via calamine
- **Default source** (`source`) - bundled default workbook with hardcoded fallback records
- **Sample workbook** (`sample`) - multi-batch onboarding template via rust_xlsxwriter

### Interaction
- **Triage state** (`triage`) - search, carrier filter and edit panel as state transitions
- **Web** (`app`, `web` feature) - axum router serving the page and a JSON API
- **Configuration** (`config`) - command-line settings and logging setup

## Design Highlights

- Carrier patterns are a literal ordered list, so overlapping formats resolve
  the same way every time
- Records live only in memory; re-uploading replaces everything, edits included
- Nothing after startup is fatal: failed loads fall back to sample data or
  leave the current records untouched

## REST API Endpoints

- `GET /api/records` - Current view of the records
- `POST /api/upload` - Replace records from an uploaded workbook
- `POST /api/reload` - Reload the default workbook
- `POST /api/search`, `POST /api/filter` - Narrow the view
- `POST /api/records/{key}/edit`, `POST /api/editor/save` - Edit a shipment
- `GET /api/sample` - Download the sample workbook
*/

pub mod carrier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod grid;
pub mod loader;
pub mod record;
pub mod sample;
pub mod source;
pub mod triage;

#[cfg(feature = "web")]
pub mod app;

pub use carrier::classify;
pub use error::WorkbookError;
pub use extractor::extract;
pub use grid::{CellGrid, CellValue};
pub use record::{ShipmentRecord, Status};
