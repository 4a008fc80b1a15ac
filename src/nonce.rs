use crate::provider::{NonceValidator, SystemClock, TimeProvider};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::sync::Mutex;
use std::time::Duration;

/// An in-process nonce validator.
///
/// Each nonce is remembered for `ttl` after it is first seen, and a second use inside that
/// window is refused.  The check and the insert happen under one lock, so the store can be
/// shared between threads.  The `ttl` should be at least twice the authenticator's
/// timestamp skew, so a nonce cannot be forgotten while a request carrying it could still
/// pass the skew check.
///
/// This suits a single process; deployments with several servers need a shared store.
pub struct MemoryNonceStore {
    ttl: i64,
    clock: Box<dyn TimeProvider>,
    seen: Mutex<HashMap<String, i64>>,
}

impl MemoryNonceStore {
    pub fn new(ttl: Duration) -> Self {
        MemoryNonceStore::with_clock(ttl, SystemClock)
    }

    pub fn with_clock<T: TimeProvider + 'static>(ttl: Duration, clock: T) -> Self {
        MemoryNonceStore {
            ttl: i64::try_from(ttl.as_secs()).unwrap_or(i64::max_value()),
            clock: Box::new(clock),
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Number of nonces currently remembered.
    pub fn len(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NonceValidator for MemoryNonceStore {
    fn validate(&self, nonce: &str, _ts: i64) -> Result<bool, failure::Error> {
        let now = self.clock.now();
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| failure::err_msg("nonce store lock poisoned"))?;

        let horizon = now.saturating_sub(self.ttl);
        seen.retain(|_, first_seen| *first_seen > horizon);

        if seen.contains_key(nonce) {
            return Ok(false);
        }
        seen.insert(nonce.to_string(), now);
        Ok(true)
    }
}
