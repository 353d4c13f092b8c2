use jsonwebtoken::{Algorithm, DecodingKey};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Algorithms a site may be configured with.
pub const SUPPORTED_ALGORITHMS: &[Algorithm] = &[
    Algorithm::HS256,
    Algorithm::HS384,
    Algorithm::HS512,
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
];

/// Key family implied by a site's algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Hmac,
    Rsa,
}

/// Returns the key family for a supported algorithm, or `None` for
/// algorithms outside the supported set.
pub fn key_family(algorithm: Algorithm) -> Option<KeyFamily> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Some(KeyFamily::Hmac),
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => Some(KeyFamily::Rsa),
        _ => None,
    }
}

/// One trusted issuer: its verification key, the only algorithm tokens from
/// it may use, and whether it is the fallback for unrecognized issuers.
#[derive(Clone)]
pub struct SiteConfig {
    issuer: Option<String>,
    algorithm: Algorithm,
    family: KeyFamily,
    key: DecodingKey,
    is_default: bool,
}

impl SiteConfig {
    pub(crate) fn new(
        issuer: Option<String>,
        algorithm: Algorithm,
        family: KeyFamily,
        key: DecodingKey,
        is_default: bool,
    ) -> Self {
        Self {
            issuer,
            algorithm,
            family,
            key,
            is_default,
        }
    }

    /// The issuer url this site is registered under; `None` for the default site.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn key_family(&self) -> KeyFamily {
        self.family
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

// Key material stays out of Debug output.
impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("family", &self.family)
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}

/// Immutable issuer → [`SiteConfig`] lookup with at most one default
/// fallback. Built once by the settings loader and never mutated in place;
/// a reload builds a whole new registry.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: HashMap<String, SiteConfig>,
    default: Option<SiteConfig>,
}

impl SiteRegistry {
    pub(crate) fn insert(&mut self, site: SiteConfig) {
        if site.is_default {
            self.default = Some(site);
        } else if let Some(issuer) = site.issuer.clone() {
            self.sites.insert(issuer, site);
        }
    }

    /// Exact match by issuer, falling back to the default site when one is
    /// configured.
    pub fn lookup(&self, issuer: &str) -> Option<&SiteConfig> {
        self.sites.get(issuer).or(self.default.as_ref())
    }

    pub fn default_site(&self) -> Option<&SiteConfig> {
        self.default.as_ref()
    }

    pub fn len(&self) -> usize {
        self.sites.len() + usize::from(self.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A pre-shared secret mapped directly to an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTokenRecord {
    pub secret: String,
    pub subject: String,
    pub roles: BTreeSet<String>,
}

/// Immutable secret → [`StaticTokenRecord`] lookup, same lifecycle as
/// [`SiteRegistry`].
#[derive(Debug, Clone, Default)]
pub struct StaticTokenTable {
    tokens: HashMap<String, StaticTokenRecord>,
}

impl StaticTokenTable {
    pub(crate) fn insert(&mut self, record: StaticTokenRecord) {
        self.tokens.insert(record.secret.clone(), record);
    }

    /// Exact string equality against table keys. This is an ordinary map
    /// lookup, not a constant-time comparison.
    pub fn matcher(&self, raw_token: &str) -> Option<&StaticTokenRecord> {
        self.tokens.get(raw_token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One consistent generation of trust material.
#[derive(Debug, Clone, Default)]
pub struct TrustConfig {
    pub sites: SiteRegistry,
    pub static_tokens: StaticTokenTable,
}

/// Shared handle to the current [`TrustConfig`] generation.
///
/// Request handlers call [`current`](Self::current) and keep the returned
/// `Arc` for the life of the request. An administrative reload builds a
/// complete new config off the serving path and publishes it with
/// [`replace`](Self::replace); the write lock is held only for the pointer
/// swap, so in-flight requests always see one consistent generation.
#[derive(Debug)]
pub struct TrustConfigHandle {
    inner: RwLock<Arc<TrustConfig>>,
}

impl TrustConfigHandle {
    pub fn new(config: TrustConfig) -> Self {
        Self {
            inner: RwLock::new(Arc::new(config)),
        }
    }

    pub fn current(&self) -> Arc<TrustConfig> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, config: TrustConfig) {
        let config = Arc::new(config);
        match self.inner.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}
