use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An access token together with the refresh token that renews it.
///
/// The token is serializable so that callers can persist it between runs and
/// hand it back to [`crate::session::OAuthSession::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiry: Option<OffsetDateTime>,
}

impl Token {
    pub fn value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    pub fn valid(&self) -> bool {
        !self.access_token.is_empty() && !self.expired()
    }

    fn expired(&self) -> bool {
        match self.expiry {
            None => false,
            Some(s) => match s.checked_sub(time::Duration::seconds(10)) {
                Some(exp) => OffsetDateTime::now_utc() > exp,
                None => true,
            },
        }
    }
}

/// The successful token endpoint response body.
#[derive(Clone, Deserialize)]
pub(crate) struct InternalToken {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
}

fn bearer() -> String {
    "Bearer".to_string()
}

impl InternalToken {
    pub(crate) fn to_token(&self, now: OffsetDateTime) -> Token {
        Token {
            access_token: self.access_token.clone(),
            token_type: self.token_type.clone(),
            refresh_token: self.refresh_token.clone(),
            scope: self.scope.clone(),
            // a lifetime beyond the representable range never expires
            expiry: self
                .expires_in
                .and_then(|s| now.checked_add(time::Duration::seconds(s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expiry: Option<OffsetDateTime>) -> Token {
        Token {
            access_token: "abc".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            scope: None,
            expiry,
        }
    }

    #[test]
    fn test_value() {
        assert_eq!(token(None).value(), "Bearer abc");
    }

    #[test]
    fn test_valid() {
        let now = OffsetDateTime::now_utc();
        assert!(token(None).valid());
        assert!(token(Some(now + time::Duration::hours(1))).valid());
        assert!(!token(Some(now - time::Duration::seconds(1))).valid());
        // expires within the 10 seconds margin
        assert!(!token(Some(now + time::Duration::seconds(5))).valid());

        let mut empty = token(None);
        empty.access_token.clear();
        assert!(!empty.valid());
    }

    #[test]
    fn test_to_token() {
        let body = r#"{
            "token_type": "Bearer",
            "scope": "Files.ReadWrite.All",
            "expires_in": 3600,
            "access_token": "EwBwA8l6BAAU",
            "refresh_token": "M.R3_BAY"
        }"#;
        let it: InternalToken = serde_json::from_str(body).unwrap();
        let now = OffsetDateTime::now_utc();
        let token = it.to_token(now);
        assert_eq!(token.access_token, "EwBwA8l6BAAU");
        assert_eq!(token.refresh_token.as_deref(), Some("M.R3_BAY"));
        assert_eq!(token.scope.as_deref(), Some("Files.ReadWrite.All"));
        assert_eq!(token.expiry, Some(now + time::Duration::seconds(3600)));
    }

    #[test]
    fn test_expiry_at_minimum_date() {
        let min = time::PrimitiveDateTime::MIN.assume_utc();
        assert!(!token(Some(min)).valid());
        let max = time::PrimitiveDateTime::MAX.assume_utc();
        assert!(token(Some(max)).valid());
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let it: InternalToken = serde_json::from_str(r#"{"access_token": "a"}"#).unwrap();
        let token = it.to_token(OffsetDateTime::now_utc());
        assert_eq!(token.value(), "Bearer a");
        assert_eq!(token.expiry, None);
    }

    #[test]
    fn test_persist_roundtrip() {
        let now = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        let mut original = token(Some(now));
        original.refresh_token = Some("refresh".to_string());
        let json = serde_json::to_string(&original).unwrap();
        let restored: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
