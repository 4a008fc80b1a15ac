//! `hawk-server` must perform certain cryptographic operations in order to function,
//! and applications may need control over which library is used for these.
//!
//! This module can be used for that purpose. If you do not care, the `ring`
//! backend is installed automatically by the default `use_ring` feature.
//!
//! Note that the trait methods are `Result`s so that backends built on libraries
//! with fallible APIs can report errors instead of panicking.

use crate::DigestAlgorithm;
use failure::Fail;

mod holder;
pub(crate) use holder::get_crypographer;
pub use holder::{set_boxed_cryptographer, set_cryptographer, SetCryptographerError};

#[cfg(feature = "use_ring")]
mod ring;

#[cfg(feature = "use_ring")]
pub use self::ring::RingCryptographer;

#[derive(Debug, Fail)]
pub enum CryptoError {
    /// The cryptographer does not implement the requested digest.
    #[fail(display = "Digest algorithm {:?} is unsupported by this Cryptographer", _0)]
    UnsupportedDigest(DigestAlgorithm),

    /// Any other backend failure.
    #[fail(display = "{}", _0)]
    Other(#[fail(cause)] failure::Error),
}

/// An HMAC key bound to a digest algorithm.
pub trait HmacKey: Send + Sync + 'static {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// An incremental (plain, unkeyed) digest.
pub trait Hasher: Send + Sync + 'static {
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;
    fn finish(&mut self) -> Result<Vec<u8>, CryptoError>;
}

/// The set of operations the crate needs from a crypto library.
pub trait Cryptographer: Send + Sync + 'static {
    fn new_key(
        &self,
        algorithm: DigestAlgorithm,
        key: &[u8],
    ) -> Result<Box<dyn HmacKey>, CryptoError>;
    fn new_hasher(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Hasher>, CryptoError>;
    /// Compare two byte strings in time that does not depend on where they differ.
    fn constant_time_compare(&self, a: &[u8], b: &[u8]) -> bool;
}
