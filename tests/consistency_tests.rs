use serde_json::json;

use maskcheck::{
    export_headers, verify_contact_presence, verify_erasure, ApiExtractor, Channel,
    ConsistencyError, CustomerRecord, ExportExtractor, ExportRow, FieldKind, SourceExtractor,
    UiAddressCard, UiExtractor, UiSnapshot, Verifier,
};

fn ui_snapshot() -> UiSnapshot {
    UiSnapshot {
        vespisti_id: Some("VP00000001".to_string()),
        first_name: Some("Jane".to_string()),
        last_name: Some("And*****".to_string()),
        email: Some("jan***@corp.example".to_string()),
        phone: Some("081234****".to_string()),
        gender: Some("Female".to_string()),
        date_of_birth: Some("**/03/1991".to_string()),
        created_at: Some("15/01/2024".to_string()),
        updated_at: Some("20/01/2024".to_string()),
        deleted_at: Some("-".to_string()),
        addresses: Some(vec![UiAddressCard {
            line: Some("1 M*** Rd".to_string()),
            sub_district: Some("Bang Rak".to_string()),
            district: Some("Bang Rak".to_string()),
            province: Some("Bangkok".to_string()),
            postcode: Some("10500".to_string()),
        }]),
    }
}

fn api_payload() -> serde_json::Value {
    json!({
        "vespistiId": "VP00000001",
        "firstName": "Jane",
        "lastName": "Anderson",
        "email": "jane.a@corp.example",
        "phoneNumber": "0812345678",
        "gender": "female",
        "dateOfBirth": "1991-03-25",
        "createdAt": "2024-01-15T08:30:00Z",
        "updatedAt": "2024-01-20",
        "deletedAt": null,
        "addresses": [{
            "addressLine": "1 Main Rd",
            "subDistrict": "Bang Rak",
            "district": "Bang Rak",
            "province": "Bangkok",
            "postalCode": "10500"
        }]
    })
}

fn export_record() -> CustomerRecord {
    let extractor = ExportExtractor::new(&export_headers()).unwrap();
    let mut row = ExportRow::new();
    row.set("Vespisti ID", "VP00000001");
    row.set("First Name", "Jane");
    row.set("Last Name", "Anderson");
    row.set("Email", "jane.a@corp.example");
    row.set("Phone", "0812345678");
    row.set("Gender", "Female");
    row.set("Date of Birth", "25/03/1991");
    row.set("Address 1", "1 Main Rd");
    row.set("Sub district 1", "Bang Rak");
    row.set("District 1", "Bang Rak");
    row.set("Province 1", "Bangkok");
    row.set("Postcode 1", "10500");
    row.set("Created At", "15/01/2024");
    row.set("Updated At", "20/01/2024");
    row.set("Deleted At", "-");
    extractor.extract(&row).unwrap()
}

#[test]
fn test_three_channels_agree_for_a_consistent_customer() {
    let ui = UiExtractor.extract(&ui_snapshot()).unwrap();
    let api = ApiExtractor.extract(&api_payload()).unwrap();
    let export = export_record();

    for (left, right) in [(&ui, &api), (&ui, &export), (&api, &export)] {
        let report = Verifier::compare(left, right);
        assert!(
            report.is_consistent(),
            "{} vs {}: {:?}",
            left.channel,
            right.channel,
            report.mismatches().collect::<Vec<_>>()
        );
        report.clone().into_result().unwrap();
    }
}

#[test]
fn test_tampered_raw_email_is_caught_against_the_masked_ui() {
    let ui = UiExtractor.extract(&ui_snapshot()).unwrap();
    let mut payload = api_payload();
    payload["email"] = json!("jane.a@evil.example");
    let api = ApiExtractor.extract(&payload).unwrap();

    let err = Verifier::compare(&ui, &api).into_result().unwrap_err();
    match err {
        ConsistencyError::FieldMismatch {
            field,
            left_channel,
            right_channel,
            ..
        } => {
            assert_eq!(field, FieldKind::Email);
            assert_eq!(left_channel, Channel::Ui);
            assert_eq!(right_channel, Channel::Api);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_raw_channels_compare_exactly() {
    let api = ApiExtractor.extract(&api_payload()).unwrap();
    let mut payload = api_payload();
    payload["lastName"] = json!("Andersen");
    let altered = ApiExtractor.extract(&payload).unwrap();

    // Pretend the altered payload came from the export side.
    let mut export = export_record();
    export.last_name = altered.last_name;

    let report = Verifier::compare(&api, &export);
    assert_eq!(
        report.first_mismatch().map(|c| c.field),
        Some(FieldKind::LastName)
    );
}

#[test]
fn test_missing_address_on_one_channel_is_a_mismatch() {
    let api = ApiExtractor.extract(&api_payload()).unwrap();
    let mut payload = api_payload();
    payload["addresses"] = json!([]);
    let fewer = ApiExtractor.extract(&payload).unwrap();

    let report = Verifier::compare(&api, &fewer);
    assert_eq!(
        report.first_mismatch().map(|c| c.field),
        Some(FieldKind::AddressCount)
    );
}

#[test]
fn test_deleted_account_is_checked_for_erasure() {
    let extractor = ExportExtractor::new(&export_headers()).unwrap();
    let mut row = ExportRow::new();
    row.set("Vespisti ID", "VP00000009");
    row.set("Created At", "01/01/2024");
    row.set("Updated At", "01/02/2024");
    row.set("Deleted At", "01/02/2024");
    let clean = extractor.extract(&row).unwrap();
    verify_erasure(&clean).unwrap();
    verify_contact_presence(&clean).unwrap();

    row.set("Email", "ghost@corp.example");
    let dirty = extractor.extract(&row).unwrap();
    let err = verify_erasure(&dirty).unwrap_err();
    assert!(matches!(
        err,
        ConsistencyError::PolicyViolation {
            field: FieldKind::Email,
            ..
        }
    ));
}

#[test]
fn test_active_account_needs_a_contact_point() {
    let mut record = export_record();
    record.email = maskcheck::Observed::Blank;
    record.phone = maskcheck::Observed::Blank;
    assert!(verify_contact_presence(&record).is_err());
}
