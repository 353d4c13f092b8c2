use crate::error::ClaimError;

use super::payload::{TokenPayload, REQUIRED_CLAIMS};

/// Checks presence (not type) of every required claim, collecting every
/// missing name before failing so callers see the complete list.
pub fn validate_required_claims(payload: &TokenPayload) -> Result<(), ClaimError> {
    let missing: Vec<String> = REQUIRED_CLAIMS
        .iter()
        .filter(|name| !payload.has_claim(name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClaimError::MissingClaims(missing))
    }
}

/// Fails when `now >= exp`. An `exp` that is absent or not numeric cannot
/// prove the token unexpired and fails the same way.
pub fn validate_expiry(payload: &TokenPayload, now: u64) -> Result<(), ClaimError> {
    match payload.exp.as_parsed() {
        Some(&exp) if now < exp => Ok(()),
        _ => Err(ClaimError::Expired),
    }
}
