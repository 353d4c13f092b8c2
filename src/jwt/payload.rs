use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// Claims every accepted JWT must carry, in the order they are reported
/// when missing.
pub const REQUIRED_CLAIMS: &[&str] = &["webid", "iss", "sub", "roles", "iat", "exp"];

/// Three-state parse cell: distinguishes a claim that parsed, one that was
/// present but had an unexpected shape, and one that was absent entirely.
/// Presence checks must not be fooled by type mismatches.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TryParse<T> {
    Parsed(T),
    FailedToParse,
    #[default]
    NotPresent,
}

impl<T> TryParse<T> {
    pub fn is_present(&self) -> bool {
        !matches!(self, TryParse::NotPresent)
    }

    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            TryParse::Parsed(value) => Some(value),
            _ => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TryParse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer) {
            Ok(Some(value)) => TryParse::Parsed(value),
            Ok(None) => TryParse::NotPresent,
            Err(_) => TryParse::FailedToParse,
        })
    }
}

/// Decoded claim set of a verified token: the six required claims as typed
/// cells, everything else passed through opaque in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenPayload {
    #[serde(default)]
    pub webid: TryParse<Value>,
    #[serde(default)]
    pub iss: TryParse<String>,
    #[serde(default)]
    pub sub: TryParse<String>,
    #[serde(default)]
    pub roles: TryParse<Vec<String>>,
    #[serde(default, deserialize_with = "numeric_claim")]
    pub iat: TryParse<u64>,
    #[serde(default, deserialize_with = "numeric_claim")]
    pub exp: TryParse<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenPayload {
    /// Presence (not type) of one of the [`REQUIRED_CLAIMS`] by name.
    pub(crate) fn has_claim(&self, name: &str) -> bool {
        match name {
            "webid" => self.webid.is_present(),
            "iss" => self.iss.is_present(),
            "sub" => self.sub.is_present(),
            "roles" => self.roles.is_present(),
            "iat" => self.iat.is_present(),
            "exp" => self.exp.is_present(),
            _ => self.extra.contains_key(name),
        }
    }
}

/// Accepts integer or finite non-negative float timestamps; anything else
/// present is `FailedToParse`.
fn numeric_claim<'de, D>(deserializer: D) -> Result<TryParse<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumericClaim;

    impl<'de> serde::de::Visitor<'de> for NumericClaim {
        type Value = TryParse<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a numeric value representable as u64")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.is_finite() && value >= 0.0 && value < (u64::MAX as f64) {
                Ok(TryParse::Parsed(value.round() as u64))
            } else {
                Err(serde::de::Error::custom(
                    "numeric value must be representable as u64",
                ))
            }
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(TryParse::Parsed(value))
        }
    }

    match deserializer.deserialize_any(NumericClaim) {
        Ok(parsed) => Ok(parsed),
        Err(_) => Ok(TryParse::FailedToParse),
    }
}

#[cfg(test)]
mod tests {
    use super::{TokenPayload, TryParse};
    use serde_json::json;

    #[test]
    fn payload_keeps_extra_claims_opaque() {
        let payload: TokenPayload = serde_json::from_value(json!({
            "webid": 1,
            "iss": "https://foo.example.com",
            "sub": "charlie",
            "roles": ["bartender"],
            "iat": 1,
            "exp": 2,
            "azp": "some-client",
            "nested": {"a": [1, 2]},
        }))
        .expect("payload");

        assert_eq!(payload.sub.as_parsed().map(String::as_str), Some("charlie"));
        assert_eq!(payload.extra.get("azp"), Some(&json!("some-client")));
        assert_eq!(payload.extra.get("nested"), Some(&json!({"a": [1, 2]})));
        assert!(!payload.extra.contains_key("sub"));
    }

    #[test]
    fn payload_distinguishes_absent_from_unparsable() {
        let payload: TokenPayload = serde_json::from_value(json!({
            "roles": "not-a-list",
            "exp": "soon",
        }))
        .expect("payload");

        assert_eq!(payload.roles, TryParse::FailedToParse);
        assert_eq!(payload.exp, TryParse::FailedToParse);
        assert_eq!(payload.sub, TryParse::NotPresent);
        assert!(payload.roles.is_present());
        assert!(!payload.sub.is_present());
    }

    #[test]
    fn payload_accepts_float_timestamps() {
        let payload: TokenPayload = serde_json::from_value(json!({"exp": 1700000000.7}))
            .expect("payload");
        assert_eq!(payload.exp, TryParse::Parsed(1700000001));
    }
}
