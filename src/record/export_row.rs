use std::collections::HashMap;

use super::customer::Observed;

/// Number of flattened address groups in the export schema.
pub const ADDRESS_GROUPS: usize = 5;

/// The 35 fixed column headers of the export spreadsheet, in order.
/// This is an external contract; names and order are exact.
pub fn export_headers() -> Vec<String> {
    let mut headers: Vec<String> = [
        "Vespisti ID",
        "First Name",
        "Last Name",
        "Email",
        "Phone",
        "Gender",
        "Date of Birth",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for i in 1..=ADDRESS_GROUPS {
        headers.push(format!("Address {}", i));
        headers.push(format!("Sub district {}", i));
        headers.push(format!("District {}", i));
        headers.push(format!("Province {}", i));
        headers.push(format!("Postcode {}", i));
    }

    headers.extend(["Created At", "Updated At", "Deleted At"].iter().map(|s| s.to_string()));
    headers
}

/// One spreadsheet row keyed by column header. The export channel's raw
/// shape before being lifted into a `CustomerRecord`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    values: HashMap<String, String>,
}

impl ExportRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair a row of cells with the sheet's header row. Extra cells beyond
    /// the headers are dropped; missing trailing cells leave the column
    /// absent (callers distinguish absent columns from empty values).
    pub fn from_cells(headers: &[String], cells: Vec<String>) -> Self {
        let values = headers
            .iter()
            .zip(cells)
            .map(|(h, c)| (h.clone(), c))
            .collect();
        Self { values }
    }

    pub fn set(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.values.insert(header.into(), value.into());
    }

    /// `None` means the column is absent from the sheet, not that the cell
    /// is empty.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.values.contains_key(header)
    }

    pub fn observed(&self, header: &str) -> Observed {
        Observed::from_value(self.get(header))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
