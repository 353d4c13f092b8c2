use log::info;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::RejectionReason;
use crate::registry::TrustConfig;
use crate::strategy::{AuthenticationStrategy, JwtAuthenticator, StaticTokenAuthenticator};
use crate::token::bearer_token;

/// The authenticated identity produced on success. Ephemeral, per-request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

/// Result of one authentication decision.
///
/// `Declined` means no bearer credential was presented, so this engine does
/// not apply and the caller decides what unauthenticated access means
/// (401-class). `Rejected` means a credential was presented and failed
/// (403-class), with the specific reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Declined,
    Authenticated(Principal),
    Rejected(RejectionReason),
}

impl Outcome {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Outcome::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}

/// Turns a raw Authorization header value into one authentication decision.
///
/// Static tokens are tried first and take precedence even when the same
/// string would parse as a syntactically valid JWT; a pre-shared secret
/// must not be accidentally JWT-decoded just because it contains dots.
pub struct AuthenticationEngine {
    static_tokens: StaticTokenAuthenticator,
    jwt: JwtAuthenticator,
}

impl AuthenticationEngine {
    pub fn new(config: Arc<TrustConfig>) -> Self {
        Self {
            static_tokens: StaticTokenAuthenticator::new(Arc::clone(&config)),
            jwt: JwtAuthenticator::new(config),
        }
    }

    /// Runs the decision state machine over the presented header value.
    ///
    /// The raw credential is extracted exactly once and shared by both
    /// strategies.
    pub fn authenticate(&self, authorization: Option<&str>) -> Outcome {
        let Some(raw_token) = bearer_token(authorization) else {
            info!("authorization header missing or not a bearer credential");
            return Outcome::Declined;
        };
        match self.static_tokens.authenticate_raw(raw_token) {
            Outcome::Declined => self.jwt.authenticate_raw(raw_token),
            outcome => outcome,
        }
    }
}

impl AuthenticationStrategy for AuthenticationEngine {
    fn supports(&self, authorization: Option<&str>) -> bool {
        bearer_token(authorization).is_some()
    }

    fn authenticate(&self, authorization: Option<&str>) -> Outcome {
        AuthenticationEngine::authenticate(self, authorization)
    }
}
