use crate::crypto::CryptoError;
use failure::Fail;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Fail, Debug)]
pub enum Error {
    /// The request or bewit failed authentication.
    #[fail(display = "Unauthorized: {}", _0)]
    Unauthorized(#[fail(cause)] Unauthorized),

    /// The caller passed something unusable: an empty key, an unknown algorithm, a
    /// reserved character in a header value.  This indicates a deployment mistake, not
    /// an attack.
    #[fail(display = "Invalid argument: {}", _0)]
    InvalidArgument(String),

    /// The credentials provider failed.  Its error is carried as-is and can be
    /// recovered with `downcast`.
    #[fail(display = "{}", _0)]
    Credentials(#[fail(cause)] failure::Error),

    #[fail(display = "Unparseable Hawk header: {}", _0)]
    HeaderParseError(String),

    #[fail(display = "Crypto error: {}", _0)]
    Crypto(#[fail(cause)] CryptoError),
}

/// Every reason a request or bewit can be rejected.  The `Display` form of each variant
/// is the reason string; it never includes attacker-supplied values.
#[derive(Fail, Debug, PartialEq)]
pub enum Unauthorized {
    #[fail(display = "missing authorization header")]
    MissingHeader,
    #[fail(display = "invalid authorization header")]
    InvalidHeader,
    #[fail(display = "missing attributes")]
    MissingAttributes,
    #[fail(display = "bad MAC")]
    BadMac,
    #[fail(display = "missing required payload hash")]
    MissingPayloadHash,
    #[fail(display = "bad payload hash")]
    BadPayloadHash,
    #[fail(display = "invalid nonce")]
    InvalidNonce,
    /// The client clock is too far from ours.  `ts` is the server time and `tsm` its
    /// MAC, so the client can resynchronize without another round trip.
    #[fail(display = "stale timestamp")]
    StaleTimestamp { ts: i64, tsm: String },
    #[fail(display = "malformed resource or missing bewit")]
    MalformedResource,
    #[fail(display = "invalid bewit: {}", _0)]
    InvalidBewit(InvalidBewit),
    #[fail(display = "access expired")]
    AccessExpired,
}

#[derive(Fail, Debug, PartialEq)]
pub enum InvalidBewit {
    #[fail(display = "multiple bewits in resource")]
    Multiple,
    #[fail(display = "bad encoding")]
    Encoding,
    #[fail(display = "bad structure")]
    Format,
    #[fail(display = "bad id")]
    Id,
    #[fail(display = "bad exp")]
    Exp,
    #[fail(display = "bad mac")]
    Mac,
    #[fail(display = "bad ext")]
    Ext,
}

impl Error {
    /// The rejection, if this error is an authentication failure.
    pub fn unauthorized(&self) -> Option<&Unauthorized> {
        match self {
            Error::Unauthorized(u) => Some(u),
            _ => None,
        }
    }
}

impl From<Unauthorized> for Error {
    fn from(e: Unauthorized) -> Self {
        Error::Unauthorized(e)
    }
}

impl From<InvalidBewit> for Error {
    fn from(e: InvalidBewit) -> Self {
        Error::Unauthorized(Unauthorized::InvalidBewit(e))
    }
}

impl From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        Error::Crypto(e)
    }
}
