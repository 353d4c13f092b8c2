mod bearer;
mod peek;

pub use bearer::bearer_token;
pub use peek::peek_issuer;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::ParseError;

/// Borrowed view of the three dot-separated segments of a JWT.
pub(crate) struct Segments<'a> {
    pub(crate) header: &'a str,
    pub(crate) payload: &'a str,
    #[allow(dead_code)]
    pub(crate) signature: &'a str,
}

/// Splits a raw token into exactly three segments; any other shape is
/// malformed.
pub(crate) fn split_token(raw_token: &str) -> Result<Segments<'_>, ParseError> {
    let mut iter = raw_token.split('.');
    let header = iter.next().ok_or(ParseError::MalformedStructure)?;
    let payload = iter.next().ok_or(ParseError::MalformedStructure)?;
    let signature = iter.next().ok_or(ParseError::MalformedStructure)?;
    if iter.next().is_some() {
        return Err(ParseError::MalformedStructure);
    }
    Ok(Segments {
        header,
        payload,
        signature,
    })
}

pub(crate) fn base64_url_decode(data: &str) -> Result<Vec<u8>, ParseError> {
    URL_SAFE_NO_PAD
        .decode(data)
        .map_err(|_| ParseError::MalformedStructure)
}
