#![forbid(unsafe_code)]

//! Bearer-token authentication against trusted JWT issuers and pre-shared
//! static tokens.
//!
//! A declarative trust document is loaded once into an immutable
//! [`TrustConfig`] (issuer registry + static token table). Per request, the
//! [`AuthenticationEngine`] extracts the bearer credential, tries the static
//! token table first, and otherwise verifies the credential as a JWT:
//! unverified issuer peek to pick the site, signature check under the
//! site's configured algorithm, then required-claim and expiry validation.
//! The result is a [`Principal`] or a specific [`RejectionReason`]; nothing
//! escapes as a panic.

mod engine;
mod error;
mod jwt;
mod registry;
mod settings;
mod strategy;
mod token;

pub use engine::{AuthenticationEngine, Outcome, Principal};
pub use error::{ClaimError, ConfigError, ParseError, RejectionReason, RouteError, VerifyError};
pub use jwt::{
    validate_expiry, validate_required_claims, verify, TokenPayload, TryParse, REQUIRED_CLAIMS,
};
pub use registry::{
    key_family, KeyFamily, SiteConfig, SiteRegistry, StaticTokenRecord, StaticTokenTable,
    TrustConfig, TrustConfigHandle, SUPPORTED_ALGORITHMS,
};
pub use settings::{Settings, DEFAULT_STATIC_TOKEN_USER};
pub use strategy::{AuthenticationStrategy, JwtAuthenticator, StaticTokenAuthenticator};
pub use token::{bearer_token, peek_issuer};
