//! Admin sessions: one shared password, exchanged for a signed expiring token.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;

const SESSION_SUBJECT: &str = "admin";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("admin login is disabled because no password is configured")]
    Disabled,
    #[error("invalid admin password")]
    InvalidPassword,
    #[error("session token rejected")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign session token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

pub struct AdminSessionService {
    password: Option<String>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl AdminSessionService {
    pub fn new(password: Option<String>, secret: &[u8], ttl: Duration) -> Self {
        Self {
            password,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn login_enabled(&self) -> bool {
        self.password.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Compare the submitted password in constant time and issue a session on match.
    pub fn login(&self, password: &str) -> Result<IssuedSession, SessionError> {
        let expected = self.password.as_deref().ok_or(SessionError::Disabled)?;
        if !bool::from(expected.as_bytes().ct_eq(password.as_bytes())) {
            return Err(SessionError::InvalidPassword);
        }
        self.issue(OffsetDateTime::now_utc())
    }

    pub fn issue(&self, now: OffsetDateTime) -> Result<IssuedSession, SessionError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: SESSION_SUBJECT.to_string(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SessionError::Signing)?;
        Ok(IssuedSession { token, expires_at })
    }

    /// Accept only unexpired tokens signed with this service's secret.
    pub fn verify(&self, token: &str) -> Result<(), SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.sub = Some(SESSION_SUBJECT.to_string());
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|_| ())
            .map_err(SessionError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AdminSessionService {
        AdminSessionService::new(
            Some("lift-heavy".to_string()),
            b"test-secret",
            Duration::from_secs(24 * 3600),
        )
    }

    #[test]
    fn correct_password_yields_verifiable_token() {
        let sessions = service();
        let issued = sessions.login("lift-heavy").expect("login succeeds");
        assert!(issued.expires_at > OffsetDateTime::now_utc());
        sessions.verify(&issued.token).expect("token verifies");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let sessions = service();
        assert!(matches!(
            sessions.login("lift-light"),
            Err(SessionError::InvalidPassword)
        ));
        assert!(matches!(
            sessions.login(""),
            Err(SessionError::InvalidPassword)
        ));
    }

    #[test]
    fn login_is_disabled_without_password() {
        let sessions = AdminSessionService::new(None, b"secret", Duration::from_secs(60));
        assert!(!sessions.login_enabled());
        assert!(matches!(
            sessions.login("anything"),
            Err(SessionError::Disabled)
        ));
    }

    #[test]
    fn expired_tokens_fail_verification() {
        let sessions = service();
        let issued = sessions
            .issue(OffsetDateTime::now_utc() - time::Duration::days(2))
            .expect("issues");
        assert!(matches!(
            sessions.verify(&issued.token),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let other = AdminSessionService::new(
            Some("lift-heavy".to_string()),
            b"other-secret",
            Duration::from_secs(3600),
        );
        let issued = other.login("lift-heavy").expect("login succeeds");
        assert!(service().verify(&issued.token).is_err());
        assert!(service().verify("adminAuth=true").is_err());
    }
}
