use crate::record::FieldKind;

/// Deterministic masking transform applied to a field for display/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Shown in full; must never contain a masking character.
    Full,
    /// First `n` characters shown verbatim, remainder replaced by
    /// one-or-more `*`. Masked length may differ from raw length.
    PrefixReveal(usize),
    /// Local part prefix-revealed with `n` characters; domain shown in
    /// full and unmasked.
    PrefixRevealLocal(usize),
    /// First `n` digits shown, remaining digits each replaced by `*`.
    /// Non-digit formatting characters are ignored.
    PrefixRevealDigits(usize),
    /// Day component replaced by `**`; month and year shown as two and
    /// four digits.
    DayMask,
    /// `VP` followed by exactly 8 digits; never masked.
    Identifier,
    /// dd/mm/yyyy, common-era year no later than the current year.
    Date,
    /// Exactly 5 digits; never masked.
    Postcode,
}

/// The mode-per-field policy table. Data, not conditionals: new field
/// types slot in here without touching comparison logic.
pub const POLICY: &[(FieldKind, MaskMode)] = &[
    (FieldKind::VespistiId, MaskMode::Identifier),
    (FieldKind::FirstName, MaskMode::Full),
    (FieldKind::LastName, MaskMode::PrefixReveal(3)),
    (FieldKind::Email, MaskMode::PrefixRevealLocal(3)),
    (FieldKind::Phone, MaskMode::PrefixRevealDigits(6)),
    (FieldKind::Gender, MaskMode::Full),
    (FieldKind::DateOfBirth, MaskMode::DayMask),
    (FieldKind::CreatedAt, MaskMode::Date),
    (FieldKind::UpdatedAt, MaskMode::Date),
    (FieldKind::DeletedAt, MaskMode::Date),
    (FieldKind::AddressLine, MaskMode::Full),
    (FieldKind::SubDistrict, MaskMode::Full),
    (FieldKind::District, MaskMode::Full),
    (FieldKind::Province, MaskMode::Full),
    (FieldKind::Postcode, MaskMode::Postcode),
];

pub fn mode_for(field: FieldKind) -> MaskMode {
    POLICY
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, m)| *m)
        .unwrap_or(MaskMode::Full)
}
