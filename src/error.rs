use std::path::PathBuf;

/// Errors raised while loading and validating a trust document.
///
/// Loading is strict: the first invalid entry aborts the whole load, so a
/// process never starts with partially valid trust material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("trust document is malformed: {0}")]
    MalformedDocument(String),
    #[error("site `{0}`: inline key text and key file path are mutually exclusive, supply exactly one")]
    AmbiguousKeySource(String),
    #[error("site `{site}`: unsupported algorithm `{algorithm}`")]
    UnsupportedAlgorithm { site: String, algorithm: String },
    #[error("site `{0}`: invalid key encoding")]
    InvalidEncoding(String),
    #[error("site `{0}`: invalid key material")]
    InvalidKey(String),
    #[error("site entry {0} has no issuer url and is not marked default")]
    MissingIssuerUrl(usize),
    #[error("there can be only one default site (duplicate at entry {0})")]
    DuplicateDefault(usize),
    #[error("static token entry {0} has an empty secret")]
    EmptyStaticToken(usize),
    #[error("site `{site}`: key file `{path}` does not exist")]
    MissingKeyFile { site: String, path: PathBuf },
}

/// Errors raised when a credential cannot be read as a token at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("token does not have the expected three-segment structure")]
    MalformedStructure,
}

/// Errors raised while checking a token signature against a resolved site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("token signature does not match the configured key")]
    BadSignature,
    #[error("token algorithm `{0}` is not the algorithm configured for this site")]
    UnsupportedAlgorithm(String),
    #[error("token is malformed")]
    Malformed,
}

/// Errors raised while validating the decoded claim set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("token missing claim(s): {}", .0.join(", "))]
    MissingClaims(Vec<String>),
    #[error("token is expired")]
    Expired,
}

/// Errors raised while resolving the verification site for a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("unknown issuer `{0}` and no default site configured")]
    UnknownIssuer(String),
}

/// The specific reason a presented credential was rejected.
///
/// Every per-request failure folds into one of these; none escape the
/// engine as panics or opaque faults. Display strings never echo key
/// material or signature bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error(transparent)]
    Claims(#[from] ClaimError),
}
