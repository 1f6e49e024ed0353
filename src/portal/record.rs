//! The placement record extracted from a portal page

/// One field of a [`PlacementRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    AdmissionNumber,
    IdNumber,
    FullName,
    Program,
    Section,
    Campus,
    Dormitory,
    Cafeteria,
}

/// Placement result for one student
///
/// Every field is absent until a matching table row populates it. Empty cell
/// values are stored as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementRecord {
    pub admission_number: Option<String>,
    pub id_number: Option<String>,
    pub full_name: Option<String>,
    pub program: Option<String>,
    pub section: Option<String>,
    pub campus: Option<String>,
    /// Whitespace runs collapsed to single spaces
    pub dormitory: Option<String>,
    pub cafeteria: Option<String>,
}

impl PlacementRecord {
    /// A record counts as found only when both name and admission number are present
    pub fn is_found(&self) -> bool {
        self.field(RecordField::FullName).is_some()
            && self.field(RecordField::AdmissionNumber).is_some()
    }

    /// Returns the value of `field`, or `None` when absent or empty
    pub fn field(&self, field: RecordField) -> Option<&str> {
        self.slot(field).as_deref().filter(|v| !v.is_empty())
    }

    /// Overwrites `field` with `value`
    pub fn set(&mut self, field: RecordField, value: &str) {
        let value = match field {
            RecordField::Dormitory => collapse_whitespace(value),
            _ => value.to_string(),
        };
        *self.slot_mut(field) = (!value.is_empty()).then_some(value);
    }

    fn slot(&self, field: RecordField) -> &Option<String> {
        match field {
            RecordField::AdmissionNumber => &self.admission_number,
            RecordField::IdNumber => &self.id_number,
            RecordField::FullName => &self.full_name,
            RecordField::Program => &self.program,
            RecordField::Section => &self.section,
            RecordField::Campus => &self.campus,
            RecordField::Dormitory => &self.dormitory,
            RecordField::Cafeteria => &self.cafeteria,
        }
    }

    fn slot_mut(&mut self, field: RecordField) -> &mut Option<String> {
        match field {
            RecordField::AdmissionNumber => &mut self.admission_number,
            RecordField::IdNumber => &mut self.id_number,
            RecordField::FullName => &mut self.full_name,
            RecordField::Program => &mut self.program,
            RecordField::Section => &mut self.section,
            RecordField::Campus => &mut self.campus,
            RecordField::Dormitory => &mut self.dormitory,
            RecordField::Cafeteria => &mut self.cafeteria,
        }
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
