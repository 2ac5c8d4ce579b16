pub mod archive;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod policy;
pub mod record;
pub mod verify;

pub use archive::{decode, validate_artifact_name, DecodedExport};
pub use config::{DownloadSettings, VerifyProfile};
pub use download::{DownloadConfig, DownloadDriver, DownloadOutcome, DownloadState, Downloader};
pub use error::{DecodeError, MaskCheckError, Result};
pub use extract::{ApiExtractor, ExportExtractor, SourceExtractor, UiAddressCard, UiExtractor, UiSnapshot};
pub use policy::{is_valid_masking, mask, mode_for, MaskMode, MaskedField, POLICY};
pub use record::{
    export_headers, Address, AddressList, Channel, CustomerRecord, ExportRow, FieldKind, Gender,
    Observed, ValueForm, ADDRESS_GROUPS,
};
pub use verify::{
    validate_formats, verify_contact_presence, verify_erasure, CheckStatus, ConsistencyError,
    ConsistencyReport, FieldCheck, FormatViolation, Verifier,
};
