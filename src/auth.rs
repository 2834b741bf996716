use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use crate::config::ACCESS_TOKEN_REAUTHENTICATE_WITHIN;

/// Email and password used to log in to Homepass
#[derive(Clone)]
pub struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token issued by the login endpoint.
///
/// `expire_at` sits [`ACCESS_TOKEN_REAUTHENTICATE_WITHIN`] seconds before the
/// expiry reported by the server, so the token is treated as expired slightly
/// before the service would start rejecting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    id: String,
    user_id: String,
    expire_at: DateTime<FixedOffset>,
}

impl AccessToken {
    pub fn new(id: String, user_id: String, expire_at: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            user_id,
            expire_at,
        }
    }

    /// Build a token from the server-reported expiry, applying the refresh margin
    pub fn from_expiry(
        id: String,
        user_id: String,
        server_expire_at: DateTime<FixedOffset>,
    ) -> Self {
        let expire_at = server_expire_at - Duration::seconds(ACCESS_TOKEN_REAUTHENTICATE_WITHIN);
        Self::new(id, user_id, expire_at)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn expire_at(&self) -> DateTime<FixedOffset> {
        self.expire_at
    }

    /// Whether the token is expired at `now`, compared in the expiry's own offset
    pub fn is_expired_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.with_timezone(&self.expire_at.timezone()) >= self.expire_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(&Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_expiry_margin_is_applied() {
        let token = AccessToken::from_expiry(
            "tok1".to_string(),
            "u1".to_string(),
            parse("2024-01-01T00:00:10Z"),
        );

        assert_eq!(token.expire_at(), parse("2024-01-01T00:00:00Z"));
        assert_eq!(token.id(), "tok1");
        assert_eq!(token.user_id(), "u1");
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let token = AccessToken::from_expiry(
            "tok1".to_string(),
            "u1".to_string(),
            parse("2024-01-01T00:00:10Z"),
        );

        assert!(!token.is_expired_at(&parse("2023-12-31T23:59:59Z")));
        assert!(token.is_expired_at(&parse("2024-01-01T00:00:00Z")));
        assert!(token.is_expired_at(&parse("2024-01-01T00:00:05Z")));
    }

    #[test]
    fn test_is_expired_at_across_offsets() {
        // 01:00:00+01:00 is the same instant as 00:00:00Z
        let token = AccessToken::new(
            "tok1".to_string(),
            "u1".to_string(),
            parse("2024-01-01T01:00:00+01:00"),
        );

        let utc_before = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let utc_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!token.is_expired_at(&utc_before));
        assert!(token.is_expired_at(&utc_at));
    }

    #[test]
    fn test_is_expired_uses_current_time() {
        let past = AccessToken::new(
            "old".to_string(),
            "u1".to_string(),
            parse("2000-01-01T00:00:00Z"),
        );
        let future = AccessToken::new(
            "new".to_string(),
            "u1".to_string(),
            (Utc::now() + Duration::hours(1)).fixed_offset(),
        );

        assert!(past.is_expired());
        assert!(!future.is_expired());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("test@example.com", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("test@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
