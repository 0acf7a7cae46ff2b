use hydrodash_model::{is_valid_email, UpdateValidator, MAX_ADDRESS_LEN};
use hydrodash_types::{DeviceStatus, DeviceUpdate, RecordUpdate, UserUpdate};

fn make_user_update() -> UserUpdate {
    UserUpdate {
        first_name: "Jane".to_string(),
        last_name: "Smith".to_string(),
        email: "jane@example.com".to_string(),
        address: Some("12 Greenhouse Lane".to_string()),
    }
}

// ── User updates ────────────────────────────────────────────────

#[test]
fn valid_user_update_passes() {
    assert!(make_user_update().validate().is_ok());
}

#[test]
fn blank_names_are_required() {
    let update = UserUpdate {
        first_name: "  ".to_string(),
        last_name: String::new(),
        ..make_user_update()
    };
    let errors = update.validate().unwrap_err();
    assert_eq!(errors["first_name"], "The first name field is required.");
    assert_eq!(errors["last_name"], "The last name field is required.");
    assert!(!errors.contains_key("email"));
}

#[test]
fn overlong_name_is_rejected() {
    let update = UserUpdate {
        first_name: "x".repeat(256),
        ..make_user_update()
    };
    let errors = update.validate().unwrap_err();
    assert!(errors["first_name"].contains("255"));
}

#[test]
fn malformed_email_is_rejected() {
    let update = UserUpdate {
        email: "not-an-email".to_string(),
        ..make_user_update()
    };
    let errors = update.validate().unwrap_err();
    assert_eq!(errors["email"], "The email field must be a valid email address.");
}

#[test]
fn address_is_optional_but_bounded() {
    let none = UserUpdate {
        address: None,
        ..make_user_update()
    };
    assert!(none.validate().is_ok());

    let long = UserUpdate {
        address: Some("a".repeat(MAX_ADDRESS_LEN + 1)),
        ..make_user_update()
    };
    assert!(long.validate().unwrap_err().contains_key("address"));
}

// ── Device updates ──────────────────────────────────────────────

#[test]
fn device_name_is_required() {
    let update = DeviceUpdate::new("").with_status(DeviceStatus::Connected);
    let errors = update.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("name"));
}

#[test]
fn device_status_outside_vocabulary_is_a_field_error() {
    let update = DeviceUpdate {
        name: "Tower".to_string(),
        status: Some("broken".to_string()),
    };
    let errors = update.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["status"], "The selected status is invalid.");
}

#[test]
fn device_status_tokens_are_accepted() {
    for token in ["connected", "not connected", ""] {
        let update = DeviceUpdate {
            name: "Tower".to_string(),
            status: Some(token.to_string()),
        };
        assert!(update.validate().is_ok(), "{token}");
    }
}

#[test]
fn record_update_dispatches_to_inner_validator() {
    let update = RecordUpdate::Device(DeviceUpdate {
        name: "Tower".to_string(),
        status: None,
    });
    assert!(update.validate().is_ok());
}

// ── Email shape ─────────────────────────────────────────────────

#[test]
fn email_shapes() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email("first.last+tag@farm.example.org"));
    assert!(!is_valid_email("@b.co"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a@@b.co"));
    assert!(!is_valid_email("a b@c.co"));
    assert!(!is_valid_email("a@b..co"));
}
