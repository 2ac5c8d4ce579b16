use super::{normalize_gender, require_identity, SourceExtractor};
use crate::error::Result;
use crate::record::{Address, AddressList, Channel, CustomerRecord, Observed, ValueForm};

/// Text scraped from the customer detail page. Each field is the inner
/// text of its container, or `None` when the container was not rendered
/// at all. A rendered container holding `""` or `-` is a blank value,
/// which is a different observation from a missing container.
#[derive(Debug, Clone, Default)]
pub struct UiSnapshot {
    pub vespisti_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub deleted_at: Option<String>,
    /// `None` when the address section itself was not rendered.
    pub addresses: Option<Vec<UiAddressCard>>,
}

/// One address card in the detail page's address section.
#[derive(Debug, Clone, Default)]
pub struct UiAddressCard {
    pub line: Option<String>,
    pub sub_district: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postcode: Option<String>,
}

/// Extractor for the masked UI channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiExtractor;

impl SourceExtractor for UiExtractor {
    type Input = UiSnapshot;

    fn channel(&self) -> Channel {
        Channel::Ui
    }

    fn extract(&self, snapshot: &UiSnapshot) -> Result<CustomerRecord> {
        let addresses = match &snapshot.addresses {
            None => AddressList::Hidden,
            Some(cards) => AddressList::Known(cards.iter().map(card_to_address).collect()),
        };

        let record = CustomerRecord {
            channel: Channel::Ui,
            form: ValueForm::Masked,
            vespisti_id: rendered(&snapshot.vespisti_id),
            first_name: rendered(&snapshot.first_name),
            last_name: rendered(&snapshot.last_name),
            email: rendered(&snapshot.email),
            phone: rendered(&snapshot.phone),
            gender: normalize_gender(rendered(&snapshot.gender)),
            date_of_birth: rendered(&snapshot.date_of_birth),
            created_at: rendered(&snapshot.created_at),
            updated_at: rendered(&snapshot.updated_at),
            deleted_at: rendered(&snapshot.deleted_at),
            addresses,
        };

        require_identity(&record)?;
        Ok(record)
    }
}

fn rendered(text: &Option<String>) -> Observed {
    Observed::from_rendered(text.as_deref())
}

fn card_to_address(card: &UiAddressCard) -> Address {
    Address {
        line: rendered(&card.line),
        sub_district: rendered(&card.sub_district),
        district: rendered(&card.district),
        province: rendered(&card.province),
        postcode: rendered(&card.postcode),
    }
}
