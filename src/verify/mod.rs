mod report;

use tracing::debug;

pub use report::{CheckStatus, ConsistencyError, ConsistencyReport, FieldCheck, FormatViolation};

use crate::policy::{
    day_mask_parts, digits, is_valid_masking, mask, mode_for, visible_prefix, MaskMode,
};
use crate::record::{Address, CustomerRecord, FieldKind, Gender, Observed, ValueForm};

/// Cross-channel consistency verifier.
///
/// Compares two records field by field under the comparison rule implied
/// by each field's masking mode and each side's value form. Written once
/// against the record abstraction; it never branches on which channel
/// produced a value beyond masked/raw orientation.
pub struct Verifier;

impl Verifier {
    pub fn compare(left: &CustomerRecord, right: &CustomerRecord) -> ConsistencyReport {
        let mut report = ConsistencyReport::new(left.channel, right.channel);

        let pairs: [(FieldKind, &Observed, &Observed); 10] = [
            (FieldKind::VespistiId, &left.vespisti_id, &right.vespisti_id),
            (FieldKind::FirstName, &left.first_name, &right.first_name),
            (FieldKind::LastName, &left.last_name, &right.last_name),
            (FieldKind::Email, &left.email, &right.email),
            (FieldKind::Phone, &left.phone, &right.phone),
            (FieldKind::Gender, &left.gender, &right.gender),
            (FieldKind::DateOfBirth, &left.date_of_birth, &right.date_of_birth),
            (FieldKind::CreatedAt, &left.created_at, &right.created_at),
            (FieldKind::UpdatedAt, &left.updated_at, &right.updated_at),
            (FieldKind::DeletedAt, &left.deleted_at, &right.deleted_at),
        ];

        for (kind, l, r) in pairs {
            report.add(compare_field(kind, l, left.form, r, right.form));
        }

        compare_addresses(&mut report, left, right);

        debug!(
            left = %left.channel,
            right = %right.channel,
            agree = report.agree_count(),
            mismatch = report.mismatch_count(),
            inconclusive = report.inconclusive_count(),
            "comparison pass complete"
        );
        report
    }
}

fn compare_field(
    kind: FieldKind,
    left: &Observed,
    left_form: ValueForm,
    right: &Observed,
    right_form: ValueForm,
) -> FieldCheck {
    match (left, right) {
        (Observed::Hidden, _) | (_, Observed::Hidden) => FieldCheck::inconclusive(
            kind,
            left.describe(),
            right.describe(),
            "field container not rendered on one channel",
        ),
        (Observed::Blank, Observed::Blank) => {
            FieldCheck::agree(kind, left.describe(), right.describe())
        }
        (Observed::Present(_), Observed::Blank) | (Observed::Blank, Observed::Present(_)) => {
            FieldCheck::inconclusive(
                kind,
                left.describe(),
                right.describe(),
                "value present on one channel only",
            )
        }
        (Observed::Present(lv), Observed::Present(rv)) => {
            match compare_present(kind, lv, left_form, rv, right_form) {
                Some(true) => FieldCheck::agree(kind, left.describe(), right.describe()),
                Some(false) => FieldCheck::mismatch(kind, left.describe(), right.describe()),
                None => FieldCheck::inconclusive(
                    kind,
                    left.describe(),
                    right.describe(),
                    "no comparison rule across these value forms",
                ),
            }
        }
    }
}

/// `None` means no rule exists for this pairing of forms (address lines
/// carry an unspecified display mask and cannot be checked against raw).
fn compare_present(
    kind: FieldKind,
    lv: &str,
    lf: ValueForm,
    rv: &str,
    rf: ValueForm,
) -> Option<bool> {
    let mode = mode_for(kind);
    match (lf, rf) {
        (ValueForm::Raw, ValueForm::Raw) => Some(raw_eq(mode, lv, rv)),
        (ValueForm::Masked, ValueForm::Masked) => Some(masked_eq(mode, lv, rv)),
        (ValueForm::Masked, ValueForm::Raw) => cross_eq(kind, mode, lv, rv),
        (ValueForm::Raw, ValueForm::Masked) => cross_eq(kind, mode, rv, lv),
    }
}

fn raw_eq(mode: MaskMode, a: &str, b: &str) -> bool {
    match mode {
        MaskMode::PrefixRevealDigits(_) => digits(a) == digits(b),
        MaskMode::PrefixReveal(_) | MaskMode::PrefixRevealLocal(_) => {
            a.trim().to_lowercase() == b.trim().to_lowercase()
        }
        _ => a.trim() == b.trim(),
    }
}

/// Two masked renderings of the same raw value may differ in masking
/// character count; only the visible structure is compared.
fn masked_eq(mode: MaskMode, a: &str, b: &str) -> bool {
    match mode {
        MaskMode::PrefixReveal(_) => {
            visible_prefix(a).to_lowercase() == visible_prefix(b).to_lowercase()
        }
        MaskMode::PrefixRevealLocal(_) => match (a.split_once('@'), b.split_once('@')) {
            (Some((al, ad)), Some((bl, bd))) => {
                ad.to_lowercase() == bd.to_lowercase()
                    && visible_prefix(al).to_lowercase() == visible_prefix(bl).to_lowercase()
            }
            _ => false,
        },
        MaskMode::PrefixRevealDigits(_) => {
            digits(visible_prefix(a)) == digits(visible_prefix(b))
        }
        MaskMode::DayMask => day_mask_parts(a) == day_mask_parts(b),
        _ => a.trim() == b.trim(),
    }
}

fn cross_eq(kind: FieldKind, mode: MaskMode, masked: &str, raw: &str) -> Option<bool> {
    if kind == FieldKind::AddressLine {
        return None;
    }
    Some(is_valid_masking(masked, mode, Some(raw)))
}

fn compare_addresses(report: &mut ConsistencyReport, left: &CustomerRecord, right: &CustomerRecord) {
    let (la, ra) = match (left.addresses.known(), right.addresses.known()) {
        (Some(la), Some(ra)) => (la, ra),
        _ => {
            report.add(FieldCheck::inconclusive(
                FieldKind::AddressCount,
                "<hidden>",
                "<hidden>",
                "address section not rendered on one channel",
            ));
            return;
        }
    };

    // Cardinality must agree before any per-element comparison.
    if la.len() != ra.len() {
        report.add(FieldCheck::mismatch(
            FieldKind::AddressCount,
            la.len().to_string(),
            ra.len().to_string(),
        ));
        return;
    }
    report.add(FieldCheck::agree(
        FieldKind::AddressCount,
        la.len().to_string(),
        ra.len().to_string(),
    ));

    for (i, (l, r)) in la.iter().zip(ra.iter()).enumerate() {
        for check in compare_address(l, left.form, r, right.form) {
            let annotated = match check.status {
                CheckStatus::Agree => check,
                _ => check.with_note(format!("address {}", i + 1)),
            };
            report.add(annotated);
        }
    }
}

fn compare_address(
    left: &Address,
    left_form: ValueForm,
    right: &Address,
    right_form: ValueForm,
) -> Vec<FieldCheck> {
    vec![
        compare_field(FieldKind::AddressLine, &left.line, left_form, &right.line, right_form),
        compare_field(
            FieldKind::SubDistrict,
            &left.sub_district,
            left_form,
            &right.sub_district,
            right_form,
        ),
        compare_field(FieldKind::District, &left.district, left_form, &right.district, right_form),
        compare_field(FieldKind::Province, &left.province, left_form, &right.province, right_form),
        compare_field(FieldKind::Postcode, &left.postcode, left_form, &right.postcode, right_form),
    ]
}

/// Deleted accounts must have personal data erased entirely, not merely
/// masked, and must keep their lifecycle fields populated.
pub fn verify_erasure(record: &CustomerRecord) -> Result<(), ConsistencyError> {
    if !record.is_deleted() {
        return Ok(());
    }

    for kind in CustomerRecord::PERSONAL_FIELDS {
        if let Some(Observed::Present(value)) = record.field(kind) {
            return Err(ConsistencyError::PolicyViolation {
                field: kind,
                channel: record.channel,
                value: value.clone(),
                reason: "must be erased for a deleted account".to_string(),
            });
        }
    }

    if let Some(addresses) = record.addresses.known() {
        for address in addresses {
            let parts = [
                (FieldKind::AddressLine, &address.line),
                (FieldKind::SubDistrict, &address.sub_district),
                (FieldKind::District, &address.district),
                (FieldKind::Province, &address.province),
                (FieldKind::Postcode, &address.postcode),
            ];
            for (kind, observed) in parts {
                if let Observed::Present(value) = observed {
                    return Err(ConsistencyError::PolicyViolation {
                        field: kind,
                        channel: record.channel,
                        value: value.clone(),
                        reason: "must be erased for a deleted account".to_string(),
                    });
                }
            }
        }
    }

    for kind in CustomerRecord::LIFECYCLE_FIELDS {
        if let Some(observed) = record.field(kind) {
            if observed.is_blank() {
                return Err(ConsistencyError::PolicyViolation {
                    field: kind,
                    channel: record.channel,
                    value: String::new(),
                    reason: "lifecycle field must survive deletion".to_string(),
                });
            }
        }
    }

    Ok(())
}

/// An active account carries at least one of email/phone. A hidden
/// container's value is unknowable on this channel, so any `Hidden`
/// among the pair makes the check inconclusive rather than a violation.
pub fn verify_contact_presence(record: &CustomerRecord) -> Result<(), ConsistencyError> {
    if record.is_deleted() {
        return Ok(());
    }
    if record.email.is_present() || record.phone.is_present() {
        return Ok(());
    }
    if record.email.is_hidden() || record.phone.is_hidden() {
        return Ok(());
    }
    Err(ConsistencyError::PolicyViolation {
        field: FieldKind::Email,
        channel: record.channel,
        value: String::new(),
        reason: "active account must have at least one of email/phone".to_string(),
    })
}

/// Structural validation of every present value in a record against the
/// policy table: masked channels must carry well-formed masks, raw
/// channels must satisfy the raw preconditions.
pub fn validate_formats(record: &CustomerRecord) -> Vec<FormatViolation> {
    let mut violations = Vec::new();

    for kind in CustomerRecord::SCALAR_FIELDS {
        let Some(Observed::Present(value)) = record.field(kind) else {
            continue;
        };
        check_format(&mut violations, kind, value, record.form);
        if kind == FieldKind::Gender && Gender::parse(value).is_none() {
            violations.push(FormatViolation {
                field: kind,
                value: value.clone(),
                reason: "not a recognized gender".to_string(),
            });
        }
    }

    if let Some(addresses) = record.addresses.known() {
        for address in addresses {
            let parts = [
                (FieldKind::AddressLine, &address.line),
                (FieldKind::SubDistrict, &address.sub_district),
                (FieldKind::District, &address.district),
                (FieldKind::Province, &address.province),
                (FieldKind::Postcode, &address.postcode),
            ];
            for (kind, observed) in parts {
                if let Observed::Present(value) = observed {
                    // The display mask for address lines is unspecified;
                    // only raw-side shape is checked.
                    if kind == FieldKind::AddressLine && record.form == ValueForm::Masked {
                        continue;
                    }
                    check_format(&mut violations, kind, value, record.form);
                }
            }
        }
    }

    violations
}

fn check_format(
    violations: &mut Vec<FormatViolation>,
    kind: FieldKind,
    value: &str,
    form: ValueForm,
) {
    let mode = mode_for(kind);
    match form {
        ValueForm::Masked => {
            if !is_valid_masking(value, mode, None) {
                violations.push(FormatViolation {
                    field: kind,
                    value: value.to_string(),
                    reason: format!("not a well-formed {:?} masking", mode),
                });
            }
        }
        ValueForm::Raw => {
            if let Err(err) = mask(value, mode) {
                violations.push(FormatViolation {
                    field: kind,
                    value: value.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}
