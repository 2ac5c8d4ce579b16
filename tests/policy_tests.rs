use maskcheck::{is_valid_masking, mask, mode_for, FieldKind, MaskMode};

#[test]
fn test_last_name_masks_to_three_visible_chars() {
    let mode = mode_for(FieldKind::LastName);
    assert_eq!(mask("Anderson", mode).unwrap(), "And*****");
    assert_eq!(mask("Lee", mode).unwrap(), "Lee*");
    assert_eq!(mask("Ng", mode).unwrap(), "Ng*");
}

#[test]
fn test_email_masks_local_part_and_keeps_domain() {
    let mode = mode_for(FieldKind::Email);
    assert_eq!(mask("jane.a@corp.example", mode).unwrap(), "jan***@corp.example");
    assert!(mask("not-an-email", mode).is_err());
}

#[test]
fn test_phone_reveals_six_digits() {
    let mode = mode_for(FieldKind::Phone);
    assert_eq!(mask("0812345678", mode).unwrap(), "081234****");
    // Formatting characters are stripped before masking.
    assert_eq!(mask("081-234-5678", mode).unwrap(), "081234****");
}

#[test]
fn test_dob_masks_day_only() {
    let mode = mode_for(FieldKind::DateOfBirth);
    assert_eq!(mask("25/03/1991", mode).unwrap(), "**/03/1991");
    assert!(mask("1991-03-25", mode).is_err());
}

#[test]
fn test_identifier_and_date_modes_validate_not_mask() {
    assert_eq!(mask("VP00000001", mode_for(FieldKind::VespistiId)).unwrap(), "VP00000001");
    assert!(mask("XX00000001", mode_for(FieldKind::VespistiId)).is_err());

    assert_eq!(mask("15/01/2024", mode_for(FieldKind::CreatedAt)).unwrap(), "15/01/2024");
    assert!(mask("32/01/2024", mode_for(FieldKind::CreatedAt)).is_err());
}

#[test]
fn test_masked_shape_validation_without_raw() {
    assert!(is_valid_masking("And*****", mode_for(FieldKind::LastName), None));
    assert!(!is_valid_masking("Anderson", mode_for(FieldKind::LastName), None));
    assert!(!is_valid_masking("Ander***", mode_for(FieldKind::LastName), None));
    assert!(!is_valid_masking("jane.***@corp.example", mode_for(FieldKind::Email), None));
    assert!(is_valid_masking("**/03/1991", mode_for(FieldKind::DateOfBirth), None));
    assert!(!is_valid_masking("**/13/1991", mode_for(FieldKind::DateOfBirth), None));
}

#[test]
fn test_masked_validation_against_raw_value() {
    let mode = mode_for(FieldKind::LastName);
    assert!(is_valid_masking("And*****", mode, Some("Anderson")));
    assert!(is_valid_masking("and*****", mode, Some("ANDERSON")));
    assert!(!is_valid_masking("Bnd*****", mode, Some("Anderson")));

    let phone = mode_for(FieldKind::Phone);
    assert!(is_valid_masking("081234****", phone, Some("0812345678")));
    assert!(is_valid_masking("081234****", phone, Some("081-234-5678")));
    assert!(!is_valid_masking("081299****", phone, Some("0812345678")));
}

#[test]
fn test_unmasked_fields_pass_through_verbatim() {
    assert_eq!(mode_for(FieldKind::FirstName), MaskMode::Full);
    assert_eq!(mask("Jane", MaskMode::Full).unwrap(), "Jane");
    // A supposedly unmasked value carrying masking characters is drift.
    assert!(mask("Ja**", MaskMode::Full).is_err());
}
