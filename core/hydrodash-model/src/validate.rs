use hydrodash_types::{DeviceUpdate, FieldErrors, RecordUpdate, UserUpdate};

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 255;
/// Longest accepted postal address, in characters.
pub const MAX_ADDRESS_LEN: usize = 500;

/// Field-level validation run before an admin edit reaches the store.
///
/// Uniqueness checks need the store and are reported separately by it.
pub trait UpdateValidator {
    /// Returns every failing field at once, keyed by field name.
    fn validate(&self) -> Result<(), FieldErrors>;
}

impl UpdateValidator for UserUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        required_text(&mut errors, "first_name", "first name", &self.first_name, MAX_NAME_LEN);
        required_text(&mut errors, "last_name", "last name", &self.last_name, MAX_NAME_LEN);
        if self.email.trim().is_empty() {
            errors.insert("email".into(), "The email field is required.".into());
        } else if !is_valid_email(self.email.trim()) {
            errors.insert(
                "email".into(),
                "The email field must be a valid email address.".into(),
            );
        }
        if let Some(address) = &self.address
            && address.chars().count() > MAX_ADDRESS_LEN
        {
            errors.insert(
                "address".into(),
                format!("The address field must not be greater than {MAX_ADDRESS_LEN} characters."),
            );
        }
        finish(errors)
    }
}

impl UpdateValidator for DeviceUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        required_text(&mut errors, "name", "name", &self.name, MAX_NAME_LEN);
        if self.parsed_status().is_err() {
            errors.insert("status".into(), "The selected status is invalid.".into());
        }
        finish(errors)
    }
}

impl UpdateValidator for RecordUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        match self {
            Self::User(u) => u.validate(),
            Self::Device(d) => d.validate(),
        }
    }
}

fn required_text(errors: &mut FieldErrors, field: &str, label: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.insert(field.into(), format!("The {label} field is required."));
    } else if value.chars().count() > max {
        errors.insert(
            field.into(),
            format!("The {label} field must not be greater than {max} characters."),
        );
    }
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain without empty labels. No whitespace anywhere.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}
