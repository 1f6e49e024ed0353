//! Placement table extraction
//!
//! The portal renders the result as a two-column table: a label cell and a
//! value cell per row. Labels are matched by substring so minor wording
//! changes upstream do not break extraction.

use crate::portal::record::{PlacementRecord, RecordField};
use scraper::{ElementRef, Html, Selector};

/// Ordered `(label substring, field)` mapping
///
/// Every entry whose substring occurs in a row's label assigns that row's
/// value. Rows are applied in document order, so when a label repeats the
/// last row wins.
pub const LABEL_FIELDS: &[(&str, RecordField)] = &[
    ("Admission Number", RecordField::AdmissionNumber),
    ("ID No.", RecordField::IdNumber),
    ("Full Name", RecordField::FullName),
    ("Program", RecordField::Program),
    ("Section", RecordField::Section),
    ("Campus Assigned", RecordField::Campus),
    ("Dormitory", RecordField::Dormitory),
    ("Cafeteria", RecordField::Cafeteria),
];

/// Extracts a placement record from a portal page
///
/// Never fails: a page without a table, or without any recognised row,
/// yields an empty record.
///
/// # Example
///
/// ```
/// use placement_bot::portal::extract_record;
///
/// let html = r#"<table><tr><td>Full Name</td><td>Jane Doe</td></tr></table>"#;
/// let record = extract_record(html);
/// assert_eq!(record.full_name.as_deref(), Some("Jane Doe"));
/// ```
pub fn extract_record(html: &str) -> PlacementRecord {
    let document = Html::parse_document(html);
    let mut record = PlacementRecord::default();

    for (label, value) in table_rows(&document) {
        apply_row(&mut record, &label, &value);
    }

    record
}

/// Assigns `value` to every field whose label substring occurs in `label`
pub fn apply_row(record: &mut PlacementRecord, label: &str, value: &str) {
    for (needle, field) in LABEL_FIELDS {
        if label.contains(needle) {
            record.set(*field, value);
        }
    }
}

/// Collects `(label, value)` pairs from the body rows of the first table
fn table_rows(document: &Html) -> Vec<(String, String)> {
    let (Ok(table_selector), Ok(cell_selector)) = (Selector::parse("table"), Selector::parse("td"))
    else {
        return Vec::new();
    };

    let Some(table) = document.select(&table_selector).next() else {
        return Vec::new();
    };

    child_elements(table, "tbody")
        .flat_map(|tbody| child_elements(tbody, "tr"))
        .map(|row| {
            let mut cells = row.select(&cell_selector);
            let label = cells.next().map(cell_text).unwrap_or_default();
            let value = cells.next().map(cell_text).unwrap_or_default();
            (label, value)
        })
        .collect()
}

/// Direct element children of `parent` with the given tag name
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |element| element.value().name() == name)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
