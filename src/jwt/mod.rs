mod claims;
mod payload;
mod verifier;

pub use claims::{validate_expiry, validate_required_claims};
pub use payload::{TokenPayload, TryParse, REQUIRED_CLAIMS};
pub use verifier::verify;
