use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde_json::Value;
use std::str::FromStr;

use crate::error::VerifyError;
use crate::registry::SiteConfig;
use crate::token::{base64_url_decode, split_token};

use super::payload::TokenPayload;

/// Checks the token signature against the resolved site and returns the
/// decoded claims.
///
/// The header-declared algorithm must equal the site's configured algorithm
/// exactly, before any signature work; a token signed under a different
/// algorithm is rejected even when some other configured key would validate
/// it. Claim completeness and expiry are validated separately — success
/// here returns the claims unconditionally.
pub fn verify(raw_token: &str, site: &SiteConfig) -> Result<TokenPayload, VerifyError> {
    let header_alg = peek_header_algorithm(raw_token)?;
    let algorithm =
        Algorithm::from_str(&header_alg).map_err(|_| VerifyError::UnsupportedAlgorithm(header_alg.clone()))?;
    if algorithm != site.algorithm() {
        return Err(VerifyError::UnsupportedAlgorithm(header_alg));
    }

    // Signature check only: completeness and expiry have their own
    // validators with their own rejection reasons.
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<TokenPayload>(raw_token, site.decoding_key(), &validation)
        .map_err(|err| match err.kind() {
            ErrorKind::InvalidSignature => VerifyError::BadSignature,
            _ => VerifyError::Malformed,
        })?;
    Ok(data.claims)
}

/// Decodes only the header segment and reads its `alg` field.
fn peek_header_algorithm(raw_token: &str) -> Result<String, VerifyError> {
    let segments = split_token(raw_token).map_err(|_| VerifyError::Malformed)?;
    let header = base64_url_decode(segments.header).map_err(|_| VerifyError::Malformed)?;
    let header: Value = serde_json::from_slice(&header).map_err(|_| VerifyError::Malformed)?;
    header
        .get("alg")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(VerifyError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::verify;
    use crate::error::VerifyError;
    use crate::registry::{key_family, SiteConfig};
    use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
    use serde_json::json;

    fn hmac_site(algorithm: Algorithm, secret: &[u8]) -> SiteConfig {
        SiteConfig::new(
            Some("https://foo.example.com".to_string()),
            algorithm,
            key_family(algorithm).expect("supported algorithm"),
            DecodingKey::from_secret(secret),
            false,
        )
    }

    fn hs256_token(secret: &[u8], claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("token")
    }

    #[test]
    fn verify_accepts_valid_signature_and_returns_claims() {
        let claims = json!({"iss": "https://foo.example.com", "sub": "charlie"});
        let token = hs256_token(b"secret", &claims);
        let payload = verify(&token, &hmac_site(Algorithm::HS256, b"secret")).expect("verified");
        assert_eq!(payload.sub.as_parsed().map(String::as_str), Some("charlie"));
    }

    #[test]
    fn verify_does_not_check_expiry() {
        let claims = json!({"sub": "charlie", "exp": 1});
        let token = hs256_token(b"secret", &claims);
        verify(&token, &hmac_site(Algorithm::HS256, b"secret")).expect("expired is fine here");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = hs256_token(b"secret", &json!({"sub": "charlie"}));
        let err = verify(&token, &hmac_site(Algorithm::HS256, b"other")).expect_err("should reject");
        assert_eq!(err, VerifyError::BadSignature);
    }

    #[test]
    fn verify_rejects_header_algorithm_mismatch() {
        // HS256-signed token against a site configured for HS384: rejected on
        // the header alone, even though the shared secret is the same.
        let token = hs256_token(b"secret", &json!({"sub": "charlie"}));
        let err = verify(&token, &hmac_site(Algorithm::HS384, b"secret")).expect_err("should reject");
        assert_eq!(err, VerifyError::UnsupportedAlgorithm("HS256".to_string()));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let token = hs256_token(b"secret", &json!({"sub": "charlie"}));
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            json!({"sub": "mallory"}).to_string(),
        );
        parts[1] = &forged;
        let tampered = parts.join(".");
        let err =
            verify(&tampered, &hmac_site(Algorithm::HS256, b"secret")).expect_err("should reject");
        assert_eq!(err, VerifyError::BadSignature);
    }

    #[test]
    fn verify_rejects_garbage_token() {
        let err = verify("not-a-jwt", &hmac_site(Algorithm::HS256, b"secret"))
            .expect_err("should reject");
        assert_eq!(err, VerifyError::Malformed);

        let err = verify("a.b.c", &hmac_site(Algorithm::HS256, b"secret"))
            .expect_err("should reject");
        assert_eq!(err, VerifyError::Malformed);
    }
}
