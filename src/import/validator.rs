//! Per-row validation for the import pipeline.
//!
//! Pure checks over one raw row: required fields first, then field shape.
//! The same shape checks back the create/update payload validation on the
//! HTTP side so a record is held to one set of rules regardless of how it
//! arrives.

use crate::import::outcome::FailureKind;
use crate::import::rows::RawRow;
use crate::models::{NewEmployee, UpdateEmployee};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 15;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_POSITION_LEN: usize = 100;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MISSING_REQUIRED_REASON: &str = "Name and email are required";
pub const DUPLICATE_EMAIL_REASON: &str = "Email already exists";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Why a row cannot become an employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub kind: FailureKind,
    pub reason: String,
}

/// Validate one raw row, producing a normalized candidate or a rejection.
///
/// `name` and `email` must be present and non-empty; without them no other
/// check runs. Shape violations are all collected and concatenated into a
/// single reason string. Blank optional cells become `None`.
pub fn validate_row(row: &RawRow) -> Result<NewEmployee, RowRejection> {
    let name = cell(row, "name");
    let email = cell(row, "email");

    let (Some(name), Some(email)) = (name, email) else {
        return Err(RowRejection {
            kind: FailureKind::MissingRequiredField,
            reason: MISSING_REQUIRED_REASON.to_string(),
        });
    };

    let mut violations = Vec::new();

    let date_of_birth = match cell(row, "dateOfBirth") {
        Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                violations.push(format!(
                    "dateOfBirth '{raw}' is not a valid date (expected YYYY-MM-DD)"
                ));
                None
            }
        },
        None => None,
    };

    let candidate = NewEmployee {
        name,
        email,
        phone_number: cell(row, "phoneNumber"),
        address: cell(row, "address"),
        date_of_birth,
        position: cell(row, "position"),
    };

    violations.extend(field_violations(&candidate));

    if violations.is_empty() {
        Ok(candidate)
    } else {
        Err(RowRejection {
            kind: FailureKind::ConstraintViolation,
            reason: violations.join("; "),
        })
    }
}

/// Shape checks shared by the import validator and the create endpoint.
/// Assumes `name` and `email` are already known to be non-empty.
pub fn field_violations(candidate: &NewEmployee) -> Vec<String> {
    let mut violations = Vec::new();

    if candidate.name.chars().count() > MAX_NAME_LEN {
        violations.push(format!("name must be at most {MAX_NAME_LEN} characters"));
    }

    if candidate.email.chars().count() > MAX_EMAIL_LEN {
        violations.push(format!("email must be at most {MAX_EMAIL_LEN} characters"));
    } else if !email_regex().is_match(&candidate.email) {
        violations.push("email is not a valid email address".to_string());
    }

    if let Some(phone) = &candidate.phone_number {
        if phone.chars().count() > MAX_PHONE_LEN {
            violations.push(format!(
                "phoneNumber must be at most {MAX_PHONE_LEN} characters"
            ));
        }
    }

    if let Some(address) = &candidate.address {
        if address.chars().count() > MAX_ADDRESS_LEN {
            violations.push(format!(
                "address must be at most {MAX_ADDRESS_LEN} characters"
            ));
        }
    }

    if let Some(position) = &candidate.position {
        if position.chars().count() > MAX_POSITION_LEN {
            violations.push(format!(
                "position must be at most {MAX_POSITION_LEN} characters"
            ));
        }
    }

    violations
}

/// Shape checks for a partial update: only supplied fields are examined.
pub fn update_violations(changes: &UpdateEmployee) -> Vec<String> {
    let mut violations = Vec::new();

    if let Some(name) = &changes.name {
        if name.is_empty() {
            violations.push("name must not be empty".to_string());
        } else if name.chars().count() > MAX_NAME_LEN {
            violations.push(format!("name must be at most {MAX_NAME_LEN} characters"));
        }
    }

    if let Some(email) = &changes.email {
        if email.is_empty() {
            violations.push("email must not be empty".to_string());
        } else if email.chars().count() > MAX_EMAIL_LEN {
            violations.push(format!("email must be at most {MAX_EMAIL_LEN} characters"));
        } else if !email_regex().is_match(email) {
            violations.push("email is not a valid email address".to_string());
        }
    }

    if let Some(phone) = &changes.phone_number {
        if phone.chars().count() > MAX_PHONE_LEN {
            violations.push(format!(
                "phoneNumber must be at most {MAX_PHONE_LEN} characters"
            ));
        }
    }

    if let Some(address) = &changes.address {
        if address.chars().count() > MAX_ADDRESS_LEN {
            violations.push(format!(
                "address must be at most {MAX_ADDRESS_LEN} characters"
            ));
        }
    }

    if let Some(position) = &changes.position {
        if position.chars().count() > MAX_POSITION_LEN {
            violations.push(format!(
                "position must be at most {MAX_POSITION_LEN} characters"
            ));
        }
    }

    violations
}

fn cell(row: &RawRow, key: &str) -> Option<String> {
    row.get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
