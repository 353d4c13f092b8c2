use serde::Deserialize;

/// Raw shape of the trust document, before any validation. Unknown fields
/// are tolerated so configs can carry extra material forward-compatibly;
/// every rule lives in the loader, not in serde attributes.
#[derive(Debug, Deserialize)]
pub(super) struct RawDocument {
    pub version: Option<String>,
    #[serde(default, rename = "site")]
    pub sites: Vec<RawSite>,
    #[serde(default, rename = "token")]
    pub tokens: Vec<RawToken>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSite {
    pub url: Option<String>,
    pub algorithm: Option<String>,
    pub encoding: Option<String>,
    pub key: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawToken {
    pub secret: Option<String>,
    pub user: Option<String>,
    pub roles: Option<String>,
}
