use thiserror::Error;

/// Failures while opening the export archive or the workbook inside it.
///
/// Absence of data is not a decode error: a workbook with no populated
/// range decodes to an empty row sequence. Malformed structure is.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid archive {path}: {reason}")]
    Archive { path: String, reason: String },

    #[error("no spreadsheet member in archive {path}")]
    NoSpreadsheet { path: String },

    #[error("path traversal detected in archive member: {0}")]
    PathTraversal(String),

    #[error("passphrase rejected for {member}: {reason}")]
    PassphraseRejected { member: String, reason: String },

    #[error("unreadable spreadsheet {member}: {reason}")]
    Spreadsheet { member: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
