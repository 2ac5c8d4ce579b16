mod api;
mod export;
mod ui;

pub use api::ApiExtractor;
pub use export::ExportExtractor;
pub use ui::{UiAddressCard, UiExtractor, UiSnapshot};

use crate::error::{MaskCheckError, Result};
use crate::record::{Channel, CustomerRecord, Observed};

/// Lifts a channel-specific raw shape into a `CustomerRecord`.
///
/// Extractors normalize representation (dates, gender casing) but never
/// interpret masking; that is the verifier's job.
pub trait SourceExtractor {
    type Input;

    fn channel(&self) -> Channel;

    fn extract(&self, input: &Self::Input) -> Result<CustomerRecord>;
}

/// Every channel must surface the record's identity and lifecycle
/// timestamps; a source that cannot produce them is unusable as a
/// comparison side.
pub(crate) fn require_identity(record: &CustomerRecord) -> Result<()> {
    for (key, observed) in [
        ("vespisti_id", &record.vespisti_id),
        ("created_at", &record.created_at),
        ("updated_at", &record.updated_at),
    ] {
        if !observed.is_present() {
            return Err(MaskCheckError::missing(record.channel, key));
        }
    }
    Ok(())
}

/// Gender compares case-insensitively across channels; canonicalize once
/// at extraction so the verifier can use exact comparison.
pub(crate) fn normalize_gender(observed: Observed) -> Observed {
    match observed {
        Observed::Present(v) => Observed::Present(v.trim().to_ascii_lowercase()),
        other => other,
    }
}
