use log::debug;
use std::sync::Arc;

use crate::engine::{Outcome, Principal};
use crate::error::{RouteError, VerifyError};
use crate::jwt::{validate_expiry, validate_required_claims, verify, TokenPayload, TryParse};
use crate::registry::TrustConfig;
use crate::token::{bearer_token, peek_issuer};

/// One way of turning a bearer credential into a principal.
///
/// Implementations share the same extraction helper and are composed in
/// order by the surrounding system; `supports` is the cheap pre-check,
/// `authenticate` the full decision.
pub trait AuthenticationStrategy {
    fn supports(&self, authorization: Option<&str>) -> bool;
    fn authenticate(&self, authorization: Option<&str>) -> Outcome;
}

/// Matches the raw credential against the pre-shared static token table.
pub struct StaticTokenAuthenticator {
    config: Arc<TrustConfig>,
}

impl StaticTokenAuthenticator {
    pub fn new(config: Arc<TrustConfig>) -> Self {
        Self { config }
    }

    pub(crate) fn authenticate_raw(&self, raw_token: &str) -> Outcome {
        match self.config.static_tokens.matcher(raw_token) {
            Some(record) => Outcome::Authenticated(Principal {
                subject: record.subject.clone(),
                roles: record.roles.clone(),
            }),
            None => Outcome::Declined,
        }
    }
}

impl AuthenticationStrategy for StaticTokenAuthenticator {
    fn supports(&self, authorization: Option<&str>) -> bool {
        bearer_token(authorization)
            .is_some_and(|token| self.config.static_tokens.matcher(token).is_some())
    }

    fn authenticate(&self, authorization: Option<&str>) -> Outcome {
        match bearer_token(authorization) {
            Some(raw_token) => self.authenticate_raw(raw_token),
            None => Outcome::Declined,
        }
    }
}

/// Verifies the credential as a JWT against the trusted-site registry.
pub struct JwtAuthenticator {
    config: Arc<TrustConfig>,
}

impl JwtAuthenticator {
    pub fn new(config: Arc<TrustConfig>) -> Self {
        Self { config }
    }

    pub(crate) fn authenticate_raw(&self, raw_token: &str) -> Outcome {
        let issuer = match peek_issuer(raw_token) {
            Ok(issuer) => issuer,
            Err(err) => {
                debug!("malformed token received");
                return Outcome::Rejected(err.into());
            }
        };
        let Some(site) = self.config.sites.lookup(&issuer) else {
            return Outcome::Rejected(RouteError::UnknownIssuer(issuer).into());
        };
        if site.is_default() {
            debug!("using default site");
        } else {
            debug!("using site for issuer {issuer}");
        }

        let payload = match verify(raw_token, site) {
            Ok(payload) => payload,
            Err(err) => return Outcome::Rejected(err.into()),
        };
        if let Err(err) = validate_required_claims(&payload) {
            return Outcome::Rejected(err.into());
        }
        let now = jsonwebtoken::get_current_timestamp();
        if let Err(err) = validate_expiry(&payload, now) {
            return Outcome::Rejected(err.into());
        }
        principal_from_payload(&payload)
    }
}

impl AuthenticationStrategy for JwtAuthenticator {
    fn supports(&self, authorization: Option<&str>) -> bool {
        bearer_token(authorization).is_some()
    }

    fn authenticate(&self, authorization: Option<&str>) -> Outcome {
        match bearer_token(authorization) {
            Some(raw_token) => self.authenticate_raw(raw_token),
            None => Outcome::Declined,
        }
    }
}

/// A `sub` or `roles` claim that is present but not of the expected shape
/// passed the presence check yet cannot produce a principal; that counts as
/// a malformed token, not a missing claim.
fn principal_from_payload(payload: &TokenPayload) -> Outcome {
    let TryParse::Parsed(subject) = &payload.sub else {
        return Outcome::Rejected(VerifyError::Malformed.into());
    };
    let TryParse::Parsed(roles) = &payload.roles else {
        return Outcome::Rejected(VerifyError::Malformed.into());
    };
    Outcome::Authenticated(Principal {
        subject: subject.clone(),
        roles: roles.iter().cloned().collect(),
    })
}
