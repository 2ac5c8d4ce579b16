use serde::{Deserialize, Serialize};

/// One of the three independent sources producing a view of the same
/// customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Ui,
    Api,
    Export,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Ui => write!(f, "ui"),
            Channel::Api => write!(f, "api"),
            Channel::Export => write!(f, "export"),
        }
    }
}

/// Whether a channel carries masked renderings or ground-truth raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForm {
    Masked,
    Raw,
}

impl Channel {
    /// The UI renders masked text; the intercepted API payload and the
    /// decrypted export carry raw values.
    pub fn value_form(self) -> ValueForm {
        match self {
            Channel::Ui => ValueForm::Masked,
            Channel::Api | Channel::Export => ValueForm::Raw,
        }
    }
}

/// Logical customer fields covered by the masking policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    VespistiId,
    FirstName,
    LastName,
    Email,
    Phone,
    Gender,
    DateOfBirth,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    AddressLine,
    SubDistrict,
    District,
    Province,
    Postcode,
    AddressCount,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::VespistiId => "Vespisti ID",
            FieldKind::FirstName => "First Name",
            FieldKind::LastName => "Last Name",
            FieldKind::Email => "Email",
            FieldKind::Phone => "Phone",
            FieldKind::Gender => "Gender",
            FieldKind::DateOfBirth => "Date of Birth",
            FieldKind::CreatedAt => "Created At",
            FieldKind::UpdatedAt => "Updated At",
            FieldKind::DeletedAt => "Deleted At",
            FieldKind::AddressLine => "Address",
            FieldKind::SubDistrict => "Sub district",
            FieldKind::District => "District",
            FieldKind::Province => "Province",
            FieldKind::Postcode => "Postcode",
            FieldKind::AddressCount => "Address count",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "vespisti_id" => Ok(FieldKind::VespistiId),
            "first_name" => Ok(FieldKind::FirstName),
            "last_name" => Ok(FieldKind::LastName),
            "email" => Ok(FieldKind::Email),
            "phone" => Ok(FieldKind::Phone),
            "gender" => Ok(FieldKind::Gender),
            "date_of_birth" | "dob" => Ok(FieldKind::DateOfBirth),
            "created_at" => Ok(FieldKind::CreatedAt),
            "updated_at" => Ok(FieldKind::UpdatedAt),
            "deleted_at" => Ok(FieldKind::DeletedAt),
            "address" | "address_line" => Ok(FieldKind::AddressLine),
            "sub_district" => Ok(FieldKind::SubDistrict),
            "district" => Ok(FieldKind::District),
            "province" => Ok(FieldKind::Province),
            "postcode" => Ok(FieldKind::Postcode),
            other => Err(format!("unknown field kind: {}", other)),
        }
    }
}

/// How a field was observed on a channel.
///
/// `Hidden` (no container rendered at all) and `Blank` (rendered as empty
/// or `-`) are distinct states: the verifier treats both as inconclusive,
/// but extractors must never collapse one into the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Present(String),
    Blank,
    Hidden,
}

impl Observed {
    /// Lift text scraped from a rendered container. `None` means the
    /// container itself was not present.
    pub fn from_rendered(text: Option<&str>) -> Self {
        match text {
            None => Observed::Hidden,
            Some(t) => Self::from_value(Some(t)),
        }
    }

    /// Lift a value from a channel where absence renders as empty or `-`.
    pub fn from_value(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            None | Some("") | Some("-") => Observed::Blank,
            Some(t) => Observed::Present(t.to_string()),
        }
    }

    pub fn as_present(&self) -> Option<&str> {
        match self {
            Observed::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Observed::Present(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Observed::Blank)
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Observed::Hidden)
    }

    /// Rendering used in reports and error context.
    pub fn describe(&self) -> String {
        match self {
            Observed::Present(v) => format!("{:?}", v),
            Observed::Blank => "<blank>".to_string(),
            Observed::Hidden => "<hidden>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Gender> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "unknown" => Some(Gender::Unknown),
            _ => None,
        }
    }
}

/// Sub-entity owned by its record, ordered by display/export index 1..5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub line: Observed,
    pub sub_district: Observed,
    pub district: Observed,
    pub province: Observed,
    pub postcode: Observed,
}

/// Address section as observed: the UI may not render the section at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressList {
    Known(Vec<Address>),
    Hidden,
}

impl AddressList {
    pub fn known(&self) -> Option<&[Address]> {
        match self {
            AddressList::Known(v) => Some(v),
            AddressList::Hidden => None,
        }
    }
}

/// Canonical entity representing one customer as observed through some
/// channel. Read-only reconstruction for a single verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub channel: Channel,
    pub form: ValueForm,
    pub vespisti_id: Observed,
    pub first_name: Observed,
    pub last_name: Observed,
    pub email: Observed,
    pub phone: Observed,
    pub gender: Observed,
    pub date_of_birth: Observed,
    pub created_at: Observed,
    pub updated_at: Observed,
    pub deleted_at: Observed,
    pub addresses: AddressList,
}

impl CustomerRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_present()
    }

    /// Scalar field access for uniform per-field iteration. Address
    /// sub-fields are reached through `addresses`.
    pub fn field(&self, kind: FieldKind) -> Option<&Observed> {
        match kind {
            FieldKind::VespistiId => Some(&self.vespisti_id),
            FieldKind::FirstName => Some(&self.first_name),
            FieldKind::LastName => Some(&self.last_name),
            FieldKind::Email => Some(&self.email),
            FieldKind::Phone => Some(&self.phone),
            FieldKind::Gender => Some(&self.gender),
            FieldKind::DateOfBirth => Some(&self.date_of_birth),
            FieldKind::CreatedAt => Some(&self.created_at),
            FieldKind::UpdatedAt => Some(&self.updated_at),
            FieldKind::DeletedAt => Some(&self.deleted_at),
            _ => None,
        }
    }

    /// The scalar fields every record exposes, in display order.
    pub const SCALAR_FIELDS: [FieldKind; 10] = [
        FieldKind::VespistiId,
        FieldKind::FirstName,
        FieldKind::LastName,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Gender,
        FieldKind::DateOfBirth,
        FieldKind::CreatedAt,
        FieldKind::UpdatedAt,
        FieldKind::DeletedAt,
    ];

    /// Fields that must be erased entirely (not merely masked) once an
    /// account is deleted.
    pub const PERSONAL_FIELDS: [FieldKind; 6] = [
        FieldKind::FirstName,
        FieldKind::LastName,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Gender,
        FieldKind::DateOfBirth,
    ];

    /// Fields that survive deletion.
    pub const LIFECYCLE_FIELDS: [FieldKind; 4] = [
        FieldKind::VespistiId,
        FieldKind::CreatedAt,
        FieldKind::UpdatedAt,
        FieldKind::DeletedAt,
    ];
}
