use log::debug;
use serde_json::Value;

use super::{base64_url_decode, split_token};
use crate::error::ParseError;

/// Reads the claimed issuer out of a JWT without verifying it.
///
/// The token must have exactly three dot-separated base64url segments and a
/// JSON-object payload; an absent or non-string `iss` reads as the empty
/// string. This performs no signature check and must only ever be used to
/// pick verification key material, never to authenticate by itself.
pub fn peek_issuer(raw_token: &str) -> Result<String, ParseError> {
    let segments = split_token(raw_token)?;
    let payload = base64_url_decode(segments.payload)?;
    let value: Value =
        serde_json::from_slice(&payload).map_err(|_| ParseError::MalformedStructure)?;
    let Value::Object(claims) = value else {
        debug!("token payload is not a json object");
        return Err(ParseError::MalformedStructure);
    };
    Ok(claims
        .get("iss")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::peek_issuer;
    use crate::error::ParseError;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use serde_json::json;

    fn payload_segment(claims: serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(claims.to_string())
    }

    #[test]
    fn peek_issuer_reads_iss_without_verifying() {
        let token = format!("aGVhZGVy.{}.c2ln", payload_segment(json!({"iss": "https://foo.example.com"})));
        assert_eq!(peek_issuer(&token).expect("issuer"), "https://foo.example.com");
    }

    #[test]
    fn peek_issuer_missing_iss_reads_as_empty() {
        let token = format!("aGVhZGVy.{}.c2ln", payload_segment(json!({"sub": "charlie"})));
        assert_eq!(peek_issuer(&token).expect("issuer"), "");
    }

    #[test]
    fn peek_issuer_non_string_iss_reads_as_empty() {
        let token = format!("aGVhZGVy.{}.c2ln", payload_segment(json!({"iss": 42})));
        assert_eq!(peek_issuer(&token).expect("issuer"), "");
    }

    #[test]
    fn peek_issuer_rejects_wrong_segment_count() {
        let payload = payload_segment(json!({"iss": "x"}));
        let two = format!("aGVhZGVy.{payload}");
        let four = format!("aGVhZGVy.{payload}.c2ln.ZXh0cmE");
        assert_eq!(peek_issuer(&two), Err(ParseError::MalformedStructure));
        assert_eq!(peek_issuer(&four), Err(ParseError::MalformedStructure));
    }

    #[test]
    fn peek_issuer_rejects_bad_base64_and_bad_json() {
        assert_eq!(
            peek_issuer("aGVhZGVy.!!!.c2ln"),
            Err(ParseError::MalformedStructure)
        );
        let not_json = URL_SAFE_NO_PAD.encode("not json");
        assert_eq!(
            peek_issuer(&format!("aGVhZGVy.{not_json}.c2ln")),
            Err(ParseError::MalformedStructure)
        );
        let not_object = URL_SAFE_NO_PAD.encode("[1,2]");
        assert_eq!(
            peek_issuer(&format!("aGVhZGVy.{not_object}.c2ln")),
            Err(ParseError::MalformedStructure)
        );
    }
}
