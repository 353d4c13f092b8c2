const BEARER_PREFIX: &str = "bearer ";

/// Pulls the raw credential out of an Authorization header value.
///
/// The value must be present and start, case-insensitively, with
/// `"bearer "`; the remainder is returned as-is. Absence or a different
/// scheme yields `None` rather than an error so the caller can decline and
/// let other credential strategies run.
pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    let value = header_value?;
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    Some(&value[BEARER_PREFIX.len()..])
}

#[cfg(test)]
mod tests {
    use super::bearer_token;

    #[test]
    fn bearer_token_strips_prefix() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_prefix_is_case_insensitive() {
        assert_eq!(bearer_token(Some("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("BEARER abc")), Some("abc"));
        assert_eq!(bearer_token(Some("bEaReR abc")), Some("abc"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token(Some("foo")), None);
        assert_eq!(bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(Some("bearer")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn bearer_token_keeps_remainder_verbatim() {
        // No trimming: whatever follows the scheme is the credential.
        assert_eq!(bearer_token(Some("bearer  two-spaces")), Some(" two-spaces"));
        assert_eq!(bearer_token(Some("bearer ")), Some(""));
    }
}
