//! Input validation for user fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(&'static str),
    /// Value too long for its column.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Value contains characters the field does not allow.
    InvalidCharacters(&'static str),
    /// Malformed email address.
    InvalidEmail(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidCharacters(field) => {
                write!(f, "{} contains whitespace or control characters", field)
            }
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for usernames.
pub const MAX_USERNAME_LENGTH: usize = 80;

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Validate a username: non-empty, bounded, no whitespace or control characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Empty("username"));
    }

    let actual = username.chars().count();
    if actual > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LENGTH,
            actual,
        });
    }

    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidCharacters("username"));
    }

    Ok(())
}

/// Validate an email address (`local@domain.tld`, one `@`, bounded length).
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Empty("email"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail("missing @".to_string()));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must be local@domain".to_string(),
        ));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(ValidationError::InvalidEmail(format!(
            "bad domain '{}'",
            domain
        )));
    }

    Ok(())
}
