//! The collaborators an `Authenticator` consults: where credentials come from, who remembers
//! nonces, and what time it is.
//!
//! Each is a single-method trait.  Plain closures can be used through the `CredentialsFn`
//! and `NonceFn` adapters.

use crate::credentials::Credentials;
use std::time::{SystemTime, UNIX_EPOCH};

/// Looks up credentials by Hawk id.
///
/// An unknown id should be reported as an error; it reaches the caller of `authenticate`
/// unchanged inside `Error::Credentials`.
pub trait CredentialsProvider {
    fn load_credentials_by_id(&self, id: &str) -> Result<Credentials, failure::Error>;
}

/// Decides whether a nonce is fresh, and records it.
///
/// Implementations shared between threads must check and record atomically, or two
/// concurrent requests carrying the same nonce can both be accepted.
pub trait NonceValidator {
    fn validate(&self, nonce: &str, ts: i64) -> Result<bool, failure::Error>;
}

/// Supplies the current time in seconds since the epoch.
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> i64;
}

/// Adapts a closure into a `CredentialsProvider`.
///
/// ```
/// use hawk_server::{Credentials, CredentialsFn, CredentialsProvider, Key, SHA256};
///
/// let provider = CredentialsFn(|id: &str| -> Result<Credentials, failure::Error> {
///     Ok(Credentials::new(id, Key::new("secret", SHA256)?))
/// });
/// assert_eq!(provider.load_credentials_by_id("me").unwrap().id, "me");
/// ```
#[derive(Debug, Clone)]
pub struct CredentialsFn<F>(pub F);

impl<F> CredentialsProvider for CredentialsFn<F>
where
    F: Fn(&str) -> Result<Credentials, failure::Error>,
{
    fn load_credentials_by_id(&self, id: &str) -> Result<Credentials, failure::Error> {
        (self.0)(id)
    }
}

/// Adapts a closure into a `NonceValidator`.
#[derive(Debug, Clone)]
pub struct NonceFn<F>(pub F);

impl<F> NonceValidator for NonceFn<F>
where
    F: Fn(&str, i64) -> Result<bool, failure::Error>,
{
    fn validate(&self, nonce: &str, ts: i64) -> Result<bool, failure::Error> {
        (self.0)(nonce, ts)
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeProvider for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

/// A clock stopped at the given time, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl TimeProvider for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
