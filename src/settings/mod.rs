mod document;

use base64::engine::general_purpose::STANDARD as BASE64_STD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey};
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::registry::{
    key_family, KeyFamily, SiteConfig, SiteRegistry, StaticTokenRecord, StaticTokenTable,
    TrustConfig, SUPPORTED_ALGORITHMS,
};

use document::{RawDocument, RawSite, RawToken};

/// Identity assigned to static tokens that carry no explicit `user`.
pub const DEFAULT_STATIC_TOKEN_USER: &str = "admin";

const TRUST_DOCUMENT_VERSION: &str = "1";

/// Validated trust configuration, ready to serve.
///
/// Parsing is strict: any single invalid entry aborts the whole load with
/// the specific [`ConfigError`] rather than silently skipping it, so a
/// misconfigured trust document blocks startup instead of degrading.
#[derive(Debug, Clone)]
pub struct Settings {
    sites: SiteRegistry,
    static_tokens: StaticTokenTable,
}

impl Settings {
    /// Parses and validates a trust document.
    ///
    /// Site entries with an external key `path` are resolved relative to the
    /// process working directory; use [`from_path`](Self::from_path) when the
    /// document itself lives on disk.
    pub fn parse(document: &str) -> Result<Self, ConfigError> {
        let raw: RawDocument = toml::from_str(document)
            .map_err(|err| ConfigError::MalformedDocument(err.to_string()))?;

        match raw.version.as_deref() {
            Some(TRUST_DOCUMENT_VERSION) => {}
            Some(other) => {
                return Err(ConfigError::MalformedDocument(format!(
                    "unsupported trust document version `{other}`"
                )))
            }
            None => {
                return Err(ConfigError::MalformedDocument(
                    "missing `version` marker".to_string(),
                ))
            }
        }

        let mut sites = SiteRegistry::default();
        let mut default_seen = false;
        for (index, site) in raw.sites.iter().enumerate() {
            let site = parse_site(site, index)?;
            if site.is_default() {
                if default_seen {
                    return Err(ConfigError::DuplicateDefault(index));
                }
                default_seen = true;
            }
            sites.insert(site);
        }

        let mut static_tokens = StaticTokenTable::default();
        for (index, token) in raw.tokens.iter().enumerate() {
            static_tokens.insert(parse_token(token, index)?);
        }

        debug!(
            "loaded trust document: {} site(s), {} static token(s)",
            sites.len(),
            static_tokens.len()
        );
        Ok(Self {
            sites,
            static_tokens,
        })
    }

    /// Reads a trust document from disk and parses it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|err| {
            ConfigError::MalformedDocument(format!(
                "cannot read trust document `{}`: {err}",
                path.display()
            ))
        })?;
        Self::parse(&document)
    }

    pub fn sites(&self) -> &SiteRegistry {
        &self.sites
    }

    pub fn static_tokens(&self) -> &StaticTokenTable {
        &self.static_tokens
    }

    pub fn into_trust_config(self) -> TrustConfig {
        TrustConfig {
            sites: self.sites,
            static_tokens: self.static_tokens,
        }
    }
}

fn site_label(site: &RawSite, index: usize) -> String {
    if site.default {
        "default".to_string()
    } else {
        match site.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("site {index}"),
        }
    }
}

fn parse_site(site: &RawSite, index: usize) -> Result<SiteConfig, ConfigError> {
    let label = site_label(site, index);

    let issuer = match site.url.as_deref() {
        Some(url) if !url.is_empty() => Some(url.to_string()),
        _ => None,
    };
    if issuer.is_none() && !site.default {
        return Err(ConfigError::MissingIssuerUrl(index));
    }

    let algorithm = parse_algorithm(site.algorithm.as_deref(), &label)?;
    let family = key_family(algorithm).ok_or_else(|| ConfigError::UnsupportedAlgorithm {
        site: label.clone(),
        algorithm: site.algorithm.clone().unwrap_or_default(),
    })?;

    let key_text = site_key_text(site, &label)?;
    let key = match family {
        KeyFamily::Hmac => hmac_decoding_key(site.encoding.as_deref(), &key_text, &label)?,
        KeyFamily::Rsa => rsa_decoding_key(site.encoding.as_deref(), &key_text, &label)?,
    };

    // The default site is keyed by the default marker alone; an issuer url
    // on a default entry is not used for routing.
    let issuer = if site.default { None } else { issuer };
    Ok(SiteConfig::new(issuer, algorithm, family, key, site.default))
}

fn parse_algorithm(name: Option<&str>, label: &str) -> Result<Algorithm, ConfigError> {
    let name = name.unwrap_or_default();
    let unsupported = || ConfigError::UnsupportedAlgorithm {
        site: label.to_string(),
        algorithm: name.to_string(),
    };
    let algorithm = Algorithm::from_str(name).map_err(|_| unsupported())?;
    if !SUPPORTED_ALGORITHMS.contains(&algorithm) {
        return Err(unsupported());
    }
    Ok(algorithm)
}

/// Resolves the site's key material: exactly one of inline key text or an
/// external key file, with inline text trimmed of surrounding whitespace.
fn site_key_text(site: &RawSite, label: &str) -> Result<String, ConfigError> {
    let inline = site
        .key
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    let path = site
        .path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());

    match (inline, path) {
        (Some(text), None) => Ok(text.to_string()),
        (None, Some(path)) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::MissingKeyFile {
                    site: label.to_string(),
                    path,
                });
            }
            fs::read_to_string(&path)
                .map(|text| text.trim().to_string())
                .map_err(|_| ConfigError::InvalidKey(label.to_string()))
        }
        _ => Err(ConfigError::AmbiguousKeySource(label.to_string())),
    }
}

fn hmac_decoding_key(
    encoding: Option<&str>,
    key_text: &str,
    label: &str,
) -> Result<DecodingKey, ConfigError> {
    let secret = match encoding {
        Some("plain") => key_text.as_bytes().to_vec(),
        Some("base64") => BASE64_STD
            .decode(key_text)
            .map_err(|_| ConfigError::InvalidEncoding(label.to_string()))?,
        _ => return Err(ConfigError::InvalidEncoding(label.to_string())),
    };
    Ok(DecodingKey::from_secret(&secret))
}

fn rsa_decoding_key(
    encoding: Option<&str>,
    key_text: &str,
    label: &str,
) -> Result<DecodingKey, ConfigError> {
    if encoding != Some("PEM") {
        return Err(ConfigError::InvalidEncoding(label.to_string()));
    }
    DecodingKey::from_rsa_pem(key_text.as_bytes())
        .map_err(|_| ConfigError::InvalidKey(label.to_string()))
}

fn parse_token(token: &RawToken, index: usize) -> Result<StaticTokenRecord, ConfigError> {
    let secret = token.secret.as_deref().map(str::trim).unwrap_or_default();
    if secret.is_empty() {
        return Err(ConfigError::EmptyStaticToken(index));
    }

    let subject = match token.user.as_deref() {
        Some(user) => user.to_string(),
        None => DEFAULT_STATIC_TOKEN_USER.to_string(),
    };
    let roles: BTreeSet<String> = token
        .roles
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect();

    Ok(StaticTokenRecord {
        secret: secret.to_string(),
        subject,
        roles,
    })
}
