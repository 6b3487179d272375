use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
pub(crate) const MAX_USERNAME_LEN: usize = 50;

pub(crate) fn validate_username(username: &str) -> Result<(), ApiError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid username format".to_string()))
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    let valid = !local.is_empty() && domain.contains('.') && !domain.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid email address".to_string()))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

pub(crate) fn validate_hours_worked(hours: f64) -> Result<(), ApiError> {
    if hours.is_finite() && (0.0..=24.0).contains(&hours) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Hours worked must be between 0 and 24".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("ada_l-42").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn password_length() {
        assert!(validate_password_len("long-enough").is_ok());
        assert!(validate_password_len("short").is_err());
    }

    #[test]
    fn hours_bounds() {
        assert!(validate_hours_worked(8.0).is_ok());
        assert!(validate_hours_worked(-1.0).is_err());
        assert!(validate_hours_worked(25.0).is_err());
        assert!(validate_hours_worked(f64::NAN).is_err());
    }
}
