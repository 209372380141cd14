//! Request shapes and field validation for registration and login

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

use crate::constants::{EMAIL_MAX_LEN, NAME_MAX_LEN, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN};
use crate::error::{FieldError, GatehouseError, Result};

/// Registration body as received. Every field is optional here so that a
/// missing field is reported alongside the other field errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration that passed validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birth_date: NaiveDate,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Emails are compared case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Simple email validation.
///
/// Checks for basic email format: something@something.something
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain must have at least one dot and no empty labels
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Parses `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
///
/// The offset the client sent is kept, so `date_naive()` yields the calendar
/// day as written rather than the UTC day.
pub fn parse_birth_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().fixed_offset())
}

fn required_name(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<String>,
    label: &str,
) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", label)));
    } else if value.chars().count() > NAME_MAX_LEN {
        errors.push(FieldError::new(field, format!("{} is too long", label)));
    }
    value
}

fn check_password(errors: &mut Vec<FieldError>, password: &str) {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {} characters", PASSWORD_MIN_LEN),
        ));
    } else if len > PASSWORD_MAX_LEN {
        errors.push(FieldError::new("password", "Password is too long"));
    }
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email"));
    } else if email.chars().count() > EMAIL_MAX_LEN {
        errors.push(FieldError::new("email", "Email is too long"));
    }
}

impl RegisterRequest {
    /// Validate every field against `now`, collecting all failures
    pub fn validate(self, now: DateTime<Utc>) -> Result<Registration> {
        let mut errors = Vec::new();

        let first_name = required_name(&mut errors, "firstName", self.first_name, "First name");
        let last_name = required_name(&mut errors, "lastName", self.last_name, "Last name");

        let middle_name = self
            .middle_name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if middle_name
            .as_ref()
            .map_or(false, |v| v.chars().count() > NAME_MAX_LEN)
        {
            errors.push(FieldError::new("middleName", "Middle name is too long"));
        }

        let birth_date = match self.birth_date.as_deref().and_then(parse_birth_date) {
            Some(instant) if instant.with_timezone(&Utc) < now => Some(instant.date_naive()),
            _ => {
                errors.push(FieldError::new(
                    "birthDate",
                    "Invalid birth date (must be in the past)",
                ));
                None
            }
        };

        let email = normalize_email(self.email.as_deref().unwrap_or_default());
        check_email(&mut errors, &email);

        let password = self.password.unwrap_or_default();
        check_password(&mut errors, &password);

        match birth_date {
            Some(birth_date) if errors.is_empty() => Ok(Registration {
                first_name,
                last_name,
                middle_name,
                birth_date,
                email,
                password,
            }),
            _ => Err(GatehouseError::Validation(errors)),
        }
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials> {
        let mut errors = Vec::new();

        let email = normalize_email(self.email.as_deref().unwrap_or_default());
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Invalid email"));
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        if errors.is_empty() {
            Ok(Credentials { email, password })
        } else {
            Err(GatehouseError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Ivan".to_string()),
            last_name: Some("Petrov".to_string()),
            middle_name: None,
            birth_date: Some("1990-04-15".to_string()),
            email: Some("Ivan@Example.com".to_string()),
            password: Some("hunter22".to_string()),
        }
    }

    fn fields(err: GatehouseError) -> Vec<String> {
        err.field_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.clone())
            .collect()
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a@x..com"));
        assert!(!is_valid_email("a@@x.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_birth_date_formats() {
        assert!(parse_birth_date("1990-04-15").is_some());
        assert!(parse_birth_date("1990-04-15T10:30:00Z").is_some());
        assert!(parse_birth_date("1990-04-15T10:30:00+03:00").is_some());
        assert!(parse_birth_date("15/04/1990").is_none());
        assert!(parse_birth_date("1990-02-30").is_none());
    }

    #[test]
    fn test_offset_birth_date_keeps_local_day() {
        let parsed = parse_birth_date("1990-04-15T01:00:00+03:00").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(1990, 4, 15).unwrap());

        let mut req = valid_request();
        req.birth_date = Some("1990-04-15T01:00:00+03:00".to_string());
        let reg = req.validate(Utc::now()).unwrap();
        assert_eq!(reg.birth_date, NaiveDate::from_ymd_opt(1990, 4, 15).unwrap());

        let mut req = valid_request();
        req.birth_date = Some("1990-04-15T23:30:00-05:00".to_string());
        let reg = req.validate(Utc::now()).unwrap();
        assert_eq!(reg.birth_date, NaiveDate::from_ymd_opt(1990, 4, 15).unwrap());
    }

    #[test]
    fn test_valid_registration_normalizes() {
        let reg = valid_request().validate(Utc::now()).unwrap();
        assert_eq!(reg.email, "ivan@example.com");
        assert_eq!(reg.birth_date, NaiveDate::from_ymd_opt(1990, 4, 15).unwrap());
        assert_eq!(reg.middle_name, None);
    }

    #[test]
    fn test_blank_middle_name_is_none() {
        let mut req = valid_request();
        req.middle_name = Some("   ".to_string());
        assert_eq!(req.validate(Utc::now()).unwrap().middle_name, None);
    }

    #[test]
    fn test_collects_every_field_error() {
        let err = RegisterRequest::default().validate(Utc::now()).unwrap_err();
        assert_eq!(
            fields(err),
            vec!["firstName", "lastName", "birthDate", "email", "password"]
        );
    }

    #[test]
    fn test_length_bounds() {
        let mut req = valid_request();
        req.first_name = Some("x".repeat(NAME_MAX_LEN + 1));
        req.middle_name = Some("y".repeat(NAME_MAX_LEN + 1));
        req.password = Some("12345".to_string());
        let err = req.validate(Utc::now()).unwrap_err();
        assert_eq!(fields(err), vec!["firstName", "middleName", "password"]);

        let mut req = valid_request();
        req.first_name = Some("x".repeat(NAME_MAX_LEN));
        req.password = Some("p".repeat(PASSWORD_MAX_LEN));
        assert!(req.validate(Utc::now()).is_ok());

        let mut req = valid_request();
        req.password = Some("p".repeat(PASSWORD_MAX_LEN + 1));
        assert_eq!(fields(req.validate(Utc::now()).unwrap_err()), vec!["password"]);

        let mut req = valid_request();
        req.email = Some(format!("{}@example.com", "e".repeat(EMAIL_MAX_LEN)));
        assert_eq!(fields(req.validate(Utc::now()).unwrap_err()), vec!["email"]);
    }

    #[test]
    fn test_birth_date_must_be_in_past() {
        let now = Utc::now();
        let mut req = valid_request();
        req.birth_date = Some((now + chrono::Duration::days(1)).format("%Y-%m-%d").to_string());
        assert_eq!(fields(req.validate(now).unwrap_err()), vec!["birthDate"]);

        let mut req = valid_request();
        req.birth_date = Some("not a date".to_string());
        assert_eq!(fields(req.validate(now).unwrap_err()), vec!["birthDate"]);
    }

    #[test]
    fn test_login_validation() {
        let creds = LoginRequest {
            email: Some(" A@X.com ".to_string()),
            password: Some("x".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.email, "a@x.com");

        let err = LoginRequest::default().validate().unwrap_err();
        assert_eq!(fields(err), vec!["email", "password"]);
    }
}
