// --- File: crates/slotwise_scheduling/src/eligibility.rs ---
//! Roster-backed eligibility checks.
//!
//! The roster is the sole authority on who may book. Everything here is a
//! read: normalize the caller's phone number, look it up, and report what
//! the roster says. Phone numbers are matched on their last ten digits so
//! that `+91` prefixes, spaces and punctuation never cause a false miss.

use crate::error::SchedulingError;
use serde::{Deserialize, Serialize};
use slotwise_db::{RosterRepository, RosterStudent, SqlRosterRepository};
use tracing::debug;

/// Request body for the eligibility probe.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize)]
pub struct EligibilityRequest {
    pub phone: String,
}

/// What the roster says about a phone number.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Reduce a phone number to its last ten digits.
///
/// Returns `None` when fewer than ten digits remain, which callers treat as
/// a validation failure rather than an unauthorized lookup.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 10 {
        return None;
    }
    Some(digits[digits.len() - 10..].to_string())
}

/// Look up the roster entry behind a phone number.
///
/// # Errors
///
/// `Validation` when the phone has fewer than ten digits; `Database` when
/// the lookup itself fails. An absent entry is `Ok(None)`, not an error.
pub async fn resolve_student(
    roster: &SqlRosterRepository,
    phone: &str,
) -> Result<Option<RosterStudent>, SchedulingError> {
    let Some(normalized) = normalize_phone(phone) else {
        return Err(SchedulingError::Validation(
            "phone number must contain at least ten digits".to_string(),
        ));
    };
    Ok(roster.find_by_phone(&normalized).await?)
}

/// Answer the public "may I book?" probe.
pub async fn check_eligibility(
    roster: &SqlRosterRepository,
    request: &EligibilityRequest,
) -> Result<EligibilityResponse, SchedulingError> {
    match resolve_student(roster, &request.phone).await? {
        Some(student) => {
            debug!("Eligibility confirmed for roster entry {}", student.id);
            Ok(EligibilityResponse {
                authorized: true,
                name: Some(student.name),
                department: Some(student.department),
            })
        }
        None => Ok(EligibilityResponse {
            authorized: false,
            name: None,
            department: None,
        }),
    }
}
