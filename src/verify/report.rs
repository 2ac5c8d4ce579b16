use thiserror::Error;

use crate::record::{Channel, FieldKind};

/// Two channels disagree on a field, or a single channel violates a
/// record-level policy (e.g. a deleted account retaining personal data).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("{field} disagrees between {left_channel} and {right_channel}: {left} vs {right}")]
    FieldMismatch {
        field: FieldKind,
        left_channel: Channel,
        right_channel: Channel,
        left: String,
        right: String,
    },

    #[error("policy violation on {channel}: {field} {reason} (value: {value})")]
    PolicyViolation {
        field: FieldKind,
        channel: Channel,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Agree,
    Mismatch,
    /// A field present in one source and legitimately absent or hidden in
    /// the other. Intentionally not a failure: the UI hides some blank
    /// fields that the export still emits as `-`.
    Inconclusive,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Agree => write!(f, "agree"),
            CheckStatus::Mismatch => write!(f, "mismatch"),
            CheckStatus::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// Outcome of one per-field comparison.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    pub field: FieldKind,
    pub status: CheckStatus,
    pub left: String,
    pub right: String,
    pub note: Option<String>,
}

impl FieldCheck {
    pub fn agree(field: FieldKind, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            field,
            status: CheckStatus::Agree,
            left: left.into(),
            right: right.into(),
            note: None,
        }
    }

    pub fn mismatch(field: FieldKind, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            field,
            status: CheckStatus::Mismatch,
            left: left.into(),
            right: right.into(),
            note: None,
        }
    }

    pub fn inconclusive(
        field: FieldKind,
        left: impl Into<String>,
        right: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            field,
            status: CheckStatus::Inconclusive,
            left: left.into(),
            right: right.into(),
            note: Some(note.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// All per-field checks from one comparison pass between two channels.
///
/// Comparison fails fast per field but continues across independent
/// fields, so a report can carry several mismatches; `into_result`
/// surfaces the first one.
#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    pub left_channel: Channel,
    pub right_channel: Channel,
    pub checks: Vec<FieldCheck>,
}

impl ConsistencyReport {
    pub fn new(left_channel: Channel, right_channel: Channel) -> Self {
        Self {
            left_channel,
            right_channel,
            checks: Vec::new(),
        }
    }

    pub fn add(&mut self, check: FieldCheck) {
        self.checks.push(check);
    }

    pub fn is_consistent(&self) -> bool {
        self.checks.iter().all(|c| c.status != CheckStatus::Mismatch)
    }

    pub fn agree_count(&self) -> usize {
        self.count(CheckStatus::Agree)
    }

    pub fn mismatch_count(&self) -> usize {
        self.count(CheckStatus::Mismatch)
    }

    pub fn inconclusive_count(&self) -> usize {
        self.count(CheckStatus::Inconclusive)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &FieldCheck> {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Mismatch)
    }

    pub fn first_mismatch(&self) -> Option<&FieldCheck> {
        self.mismatches().next()
    }

    /// The first offending field as a `ConsistencyError`, with both values
    /// and both channel identifiers.
    pub fn into_result(self) -> Result<(), ConsistencyError> {
        match self.first_mismatch() {
            None => Ok(()),
            Some(check) => Err(ConsistencyError::FieldMismatch {
                field: check.field,
                left_channel: self.left_channel,
                right_channel: self.right_channel,
                left: check.left.clone(),
                right: check.right.clone(),
            }),
        }
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }
}

/// A single value failing its expected masked or raw shape.
#[derive(Debug, Clone)]
pub struct FormatViolation {
    pub field: FieldKind,
    pub value: String,
    pub reason: String,
}
