use super::{normalize_gender, require_identity, SourceExtractor};
use crate::error::{MaskCheckError, Result};
use crate::record::{
    export_headers, Address, AddressList, Channel, CustomerRecord, ExportRow, Observed, ValueForm,
    ADDRESS_GROUPS,
};

/// Extractor for rows of the decrypted export spreadsheet.
///
/// Construction verifies the sheet's header row against the fixed export
/// schema; any drift (renamed, missing, reordered columns) fails here
/// rather than producing records with silently absent fields.
#[derive(Debug, Clone)]
pub struct ExportExtractor {
    headers: Vec<String>,
}

impl ExportExtractor {
    pub fn new(sheet_headers: &[String]) -> Result<Self> {
        let expected = export_headers();
        if sheet_headers != expected.as_slice() {
            let missing: Vec<&str> = expected
                .iter()
                .filter(|h| !sheet_headers.contains(h))
                .map(String::as_str)
                .collect();
            let detail = if missing.is_empty() {
                "column order differs from the export schema".to_string()
            } else {
                format!("columns missing from sheet: {}", missing.join(", "))
            };
            return Err(MaskCheckError::missing(Channel::Export, detail));
        }
        Ok(Self { headers: expected })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_from_cells(&self, cells: Vec<String>) -> ExportRow {
        ExportRow::from_cells(&self.headers, cells)
    }
}

impl SourceExtractor for ExportExtractor {
    type Input = ExportRow;

    fn channel(&self) -> Channel {
        Channel::Export
    }

    fn extract(&self, row: &ExportRow) -> Result<CustomerRecord> {
        let record = CustomerRecord {
            channel: Channel::Export,
            form: ValueForm::Raw,
            vespisti_id: row.observed("Vespisti ID"),
            first_name: row.observed("First Name"),
            last_name: row.observed("Last Name"),
            email: row.observed("Email"),
            phone: row.observed("Phone"),
            gender: normalize_gender(row.observed("Gender")),
            date_of_birth: row.observed("Date of Birth"),
            created_at: row.observed("Created At"),
            updated_at: row.observed("Updated At"),
            deleted_at: row.observed("Deleted At"),
            addresses: fold_addresses(row),
        };

        require_identity(&record)?;
        Ok(record)
    }
}

/// The sheet flattens up to five addresses into fixed column groups.
/// Groups are filled left to right; folding stops at the first group
/// whose address line is blank.
fn fold_addresses(row: &ExportRow) -> AddressList {
    let mut addresses = Vec::new();
    for i in 1..=ADDRESS_GROUPS {
        let line = row.observed(&format!("Address {}", i));
        if !line.is_present() {
            break;
        }
        addresses.push(Address {
            line,
            sub_district: row.observed(&format!("Sub district {}", i)),
            district: row.observed(&format!("District {}", i)),
            province: row.observed(&format!("Province {}", i)),
            postcode: row.observed(&format!("Postcode {}", i)),
        });
    }
    AddressList::Known(addresses)
}
