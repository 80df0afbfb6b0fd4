// crates/sirsi-core/src/validate.rs
//
// Field-level checks shared by entity drafts and patches.

use crate::error::AdminError;

/// Require a non-blank string field.
pub fn non_empty(field: &str, value: &str) -> Result<(), AdminError> {
    if value.trim().is_empty() {
        return Err(AdminError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain.
pub fn email(field: &str, value: &str) -> Result<(), AdminError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AdminError::Validation(format!(
            "{} is not a valid email address: {}",
            field, value
        )));
    }
    Ok(())
}

/// Tenant slug: 1-63 chars of `[a-z0-9-]`, no leading or trailing `-`.
pub fn slug(value: &str) -> Result<(), AdminError> {
    let valid = !value.is_empty()
        && value.len() <= 63
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if !valid {
        return Err(AdminError::Validation(format!("Invalid slug: {:?}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(email("email", "alice@wonderland.com").is_ok());
        assert!(email("email", "alice").is_err());
        assert!(email("email", "@wonderland.com").is_err());
        assert!(email("email", "alice@localhost").is_err());
        assert!(email("email", "a b@c.com").is_err());
        assert!(email("email", "a@b@c.com").is_err());
    }

    #[test]
    fn test_slug() {
        assert!(slug("finalwishes").is_ok());
        assert!(slug("final-wishes-2").is_ok());
        assert!(slug("").is_err());
        assert!(slug("-lead").is_err());
        assert!(slug("trail-").is_err());
        assert!(slug("Upper").is_err());
        assert!(slug(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(non_empty("name", "x").is_ok());
        assert!(non_empty("name", "   ").is_err());
    }
}
