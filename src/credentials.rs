use crate::crypto::{self, HmacKey};
use crate::error::*;
use std::fmt;
use std::str::FromStr;

/// Hawk key.
///
/// While any sequence of bytes can be specified as a key, note that each digest algorithm has
/// a suggested key length, and that passwords should *not* be used as keys.  Keys of incorrect
/// length are handled according to the digest's implementation.
pub struct Key {
    algorithm: DigestAlgorithm,
    inner: Box<dyn HmacKey>,
}

impl Key {
    /// Create a new key.  An empty key is a configuration error and is rejected here, so
    /// a `Key` that exists can always sign.
    pub fn new<B>(key: B, algorithm: DigestAlgorithm) -> Result<Key>
    where
        B: AsRef<[u8]>,
    {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(Error::InvalidArgument("Hawk key must not be empty".into()));
        }
        Ok(Key {
            algorithm,
            inner: crypto::get_crypographer().new_key(algorithm, key)?,
        })
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.inner.sign(data)?)
    }

    /// The digest algorithm this key signs with; payload hashes use the same one.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;
    fn from_str(s: &str) -> Result<DigestAlgorithm> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::InvalidArgument(format!(
                "unsupported Hawk algorithm {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hawk credentials: an ID and a key associated with that ID.  The digest algorithm
/// must be agreed between the server and the client, and the length of the key is
/// specific to that algorithm.
///
/// `user` is opaque metadata the credentials provider may attach; it is handed back
/// untouched in a successful `Response`.
#[derive(Debug)]
pub struct Credentials {
    pub id: String,
    pub key: Key,
    pub user: Option<String>,
}

impl Credentials {
    pub fn new<S>(id: S, key: Key) -> Credentials
    where
        S: Into<String>,
    {
        Credentials {
            id: id.into(),
            key,
            user: None,
        }
    }

    /// Build credentials from the loosely-typed shape most stores keep: a string key and
    /// an algorithm name.
    pub fn from_parts<S, B>(id: S, key: B, algorithm: &str) -> Result<Credentials>
    where
        S: Into<String>,
        B: AsRef<[u8]>,
    {
        let algorithm = DigestAlgorithm::from_str(algorithm)?;
        Ok(Credentials::new(id, Key::new(key, algorithm)?))
    }

    pub fn with_user<S: Into<String>>(mut self, user: S) -> Credentials {
        self.user = Some(user.into());
        self
    }
}
