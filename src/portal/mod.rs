//! Portal module: fetching and reading placement result pages
//!
//! This module contains:
//! - HTTP fetching with timeout and failure classification
//! - HTML table extraction into a [`PlacementRecord`]

mod extractor;
mod fetcher;
mod record;

pub use extractor::{apply_row, extract_record, LABEL_FIELDS};
pub use fetcher::{build_http_client, FetchedPage, PortalClient};
pub use record::{PlacementRecord, RecordField};
