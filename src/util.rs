use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Create a random alphanumeric nonce of `len` characters.
pub(crate) fn random_nonce(len: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(len).collect()
}
