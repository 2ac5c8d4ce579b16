use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx};
use chrono::NaiveDate;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::DecodeError;

/// Compound File Binary magic; an OOXML workbook wrapped in CFB is
/// password-encrypted.
const CFB_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

/// Plain zip magic; an unencrypted workbook is itself a zip container.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// An export artifact opened, decrypted, and loaded into memory.
#[derive(Debug)]
pub struct DecodedExport {
    pub file_name: String,
    /// Spreadsheet member name inside the archive.
    pub member: String,
    /// Hex digest of the archive file as downloaded.
    pub sha256: String,
    headers: Vec<String>,
    range: Range<Data>,
}

impl DecodedExport {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in sheet order, header row excluded. A workbook with
    /// only a header row (or nothing at all) yields no rows.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.range
            .rows()
            .skip(1)
            .map(|row| row.iter().map(cell_text).collect())
    }

    pub fn row_count(&self) -> usize {
        self.range.height().saturating_sub(1)
    }
}

/// Checks a downloaded artifact's file name against the export naming
/// contract: `<prefix>_export_<YYYY-MM-DD>.zip` with a real calendar
/// date.
pub fn validate_artifact_name(name: &str, prefix: &str) -> Result<(), DecodeError> {
    let pattern = format!(r"^{}_export_(\d{{4}}-\d{{2}}-\d{{2}})\.zip$", regex::escape(prefix));
    let re = Regex::new(&pattern).map_err(|e| DecodeError::Archive {
        path: name.to_string(),
        reason: format!("bad name pattern: {}", e),
    })?;

    let caps = re.captures(name).ok_or_else(|| DecodeError::Archive {
        path: name.to_string(),
        reason: format!("file name does not match {}_export_YYYY-MM-DD.zip", prefix),
    })?;

    let date = &caps[1];
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| DecodeError::Archive {
        path: name.to_string(),
        reason: format!("not a calendar date: {}", date),
    })?;
    Ok(())
}

/// Opens the export archive, locates its spreadsheet member, decrypts it
/// with the given passphrase when it is password-protected, and loads
/// the first worksheet.
pub fn decode(path: &Path, passphrase: &str) -> Result<DecodedExport, DecodeError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let sha256 = file_sha256(path)?;
    debug!(file = %file_name, sha256 = %sha256, "opening export archive");

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DecodeError::Archive {
        path: file_name.clone(),
        reason: e.to_string(),
    })?;

    let member = spreadsheet_member(&mut archive, &file_name)?;
    let mut raw = Vec::new();
    archive
        .by_name(&member)
        .map_err(|e| DecodeError::Archive {
            path: file_name.clone(),
            reason: e.to_string(),
        })?
        .read_to_end(&mut raw)?;

    let workbook_bytes = unlock_workbook(&member, raw, passphrase)?;
    let range = first_sheet(&member, workbook_bytes)?;

    let headers = range
        .rows()
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();

    Ok(DecodedExport {
        file_name,
        member,
        sha256,
        headers,
        range,
    })
}

fn spreadsheet_member<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    file_name: &str,
) -> Result<String, DecodeError> {
    let mut member = None;
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| DecodeError::Archive {
            path: file_name.to_string(),
            reason: e.to_string(),
        })?;
        let name = entry.name().to_string();
        if name.contains("..") {
            return Err(DecodeError::PathTraversal(name));
        }
        let lower = name.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            // The export contract is a single workbook per archive.
            if let Some(previous) = &member {
                return Err(DecodeError::Archive {
                    path: file_name.to_string(),
                    reason: format!("multiple spreadsheet members: {} and {}", previous, name),
                });
            }
            member = Some(name);
        }
    }
    member.ok_or_else(|| DecodeError::NoSpreadsheet {
        path: file_name.to_string(),
    })
}

/// A CFB container is decrypted with the passphrase; a plain zip is
/// already an OOXML workbook and passes through. Anything else is not a
/// workbook.
fn unlock_workbook(
    member: &str,
    raw: Vec<u8>,
    passphrase: &str,
) -> Result<Vec<u8>, DecodeError> {
    if raw.len() >= 4 && raw[..4] == CFB_MAGIC {
        // Decryption wants a file path; scope the temp dir to this call.
        let dir = tempfile::tempdir()?;
        let tmp = dir.path().join("workbook.xlsx");
        std::fs::write(&tmp, &raw)?;
        return office_crypto::decrypt_from_file(tmp, passphrase).map_err(|e| {
            DecodeError::PassphraseRejected {
                member: member.to_string(),
                reason: format!("{:?}", e),
            }
        });
    }
    if raw.len() >= 4 && raw[..4] == ZIP_MAGIC {
        return Ok(raw);
    }
    Err(DecodeError::Spreadsheet {
        member: member.to_string(),
        reason: "unrecognized workbook container".to_string(),
    })
}

fn first_sheet(member: &str, bytes: Vec<u8>) -> Result<Range<Data>, DecodeError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).map_err(|e| DecodeError::Spreadsheet {
        member: member.to_string(),
        reason: e.to_string(),
    })?;
    match workbook.worksheet_range_at(0) {
        None => Err(DecodeError::Spreadsheet {
            member: member.to_string(),
            reason: "workbook has no sheets".to_string(),
        }),
        Some(range) => range.map_err(|e| DecodeError::Spreadsheet {
            member: member.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn file_sha256(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Cells compare as text. Numeric cells that hold integral values (Excel
/// stores everything as floats) render without a trailing `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
