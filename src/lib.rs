//! This crate provides server-side support for Hawk authentication: verifying the
//! `Authorization` header of incoming requests, verifying bewits in GET request URLs, and
//! signing responses.  It can also sign requests, which is mostly useful for testing
//! servers.
//!
//! An `Authenticator` is built from two collaborators: a `CredentialsProvider` that looks up
//! credentials by Hawk id, and a `NonceValidator` that refuses replayed nonces.  Closures
//! can be used for either through `CredentialsFn` and `NonceFn`.
//!
//! # Examples
//!
//! ## Authenticating a Request
//!
//! ```
//! use hawk_server::{
//!     Authenticator, Credentials, CredentialsFn, Key, MemoryNonceStore, RequestBuilder,
//!     RequestState, ResponseOptions, SHA256,
//! };
//! use std::time::{Duration, SystemTime, UNIX_EPOCH};
//!
//! fn lookup(id: &str) -> Result<Credentials, failure::Error> {
//!     match id {
//!         "test-client" => Ok(Credentials::new(id, Key::new("no-secret", SHA256)?)),
//!         _ => Err(failure::err_msg("unknown client")),
//!     }
//! }
//!
//! let authenticator = Authenticator::builder(
//!     CredentialsFn(lookup),
//!     MemoryNonceStore::new(Duration::from_secs(120)),
//! )
//! .build()
//! .unwrap();
//!
//! // a client would send this header
//! let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
//! let request = RequestBuilder::new("GET", "localhost", 8000, "/resource").request();
//! let credentials = lookup("test-client").unwrap();
//! let header = request
//!     .make_header(&credentials, &RequestState::new(now))
//!     .unwrap()
//!     .to_string();
//!
//! // the server checks it against what it received
//! let response = authenticator.authenticate(&request, Some(&header)).unwrap();
//! assert_eq!(response.credentials.id, "test-client");
//!
//! // and signs its reply
//! let server_auth = authenticator
//!     .create_header(
//!         &response.credentials,
//!         &response.artifacts,
//!         &ResponseOptions::new().payload("hello").content_type("text/plain"),
//!     )
//!     .unwrap();
//! assert!(server_auth.to_string().starts_with("Hawk mac="));
//! ```
//!
//! ## Rejections
//!
//! Authentication failures are `Error::Unauthorized`; the reason can be rendered as a
//! `WWW-Authenticate` header with `Authenticator::challenge`.
//!
//! ```
//! use hawk_server::{Authenticator, Credentials, CredentialsFn, Error, NonceFn, RequestBuilder};
//!
//! let authenticator = Authenticator::builder(
//!     CredentialsFn(|_: &str| -> Result<Credentials, failure::Error> {
//!         Err(failure::err_msg("no clients"))
//!     }),
//!     NonceFn(|_: &str, _: i64| -> Result<bool, failure::Error> { Ok(true) }),
//! )
//! .build()
//! .unwrap();
//!
//! let request = RequestBuilder::new("GET", "localhost", 8000, "/resource").request();
//! match authenticator.authenticate(&request, None) {
//!     Err(Error::Unauthorized(reason)) => {
//!         let challenge = authenticator.challenge(&reason).unwrap();
//!         assert_eq!(challenge.to_string(), "Hawk error=\"missing authorization header\"");
//!     }
//!     _ => panic!("expected a rejection"),
//! }
//! ```
//!
//! ## Bewits
//!
//! ```
//! use hawk_server::{Authenticator, Credentials, CredentialsFn, FixedClock, Key,
//!                   MemoryNonceStore, RequestBuilder, SHA256};
//! use std::time::Duration;
//!
//! fn lookup(id: &str) -> Result<Credentials, failure::Error> {
//!     Ok(Credentials::new(id, Key::new("tok", SHA256)?))
//! }
//!
//! let authenticator = Authenticator::builder(
//!     CredentialsFn(lookup),
//!     MemoryNonceStore::new(Duration::from_secs(120)),
//! )
//! .time_provider(FixedClock(1353832234))
//! .build()
//! .unwrap();
//!
//! let bewit = RequestBuilder::new("GET", "example.com", 443, "/files/1")
//!     .request()
//!     .make_bewit(&lookup("me").unwrap(), 1353832834)
//!     .unwrap();
//! let resource = format!("/files/1?bewit={}", bewit.to_str());
//! let response = authenticator
//!     .authenticate_bewit("example.com", 443, &resource)
//!     .unwrap();
//! assert_eq!(response.artifacts.resource(), "/files/1");
//! ```
//!
//! ## Features
//!
//! By default, the `use_ring` feature is enabled, which means that this crate will use
//! `ring` for all cryptographic operations.  Without it, install an implementation of
//! `crypto::Cryptographer` with `crypto::set_cryptographer` before authenticating anything.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod artifacts;
mod authenticator;
mod b64;
mod bewit;
mod credentials;
pub mod crypto;
mod error;
mod header;
pub mod mac;
mod nonce;
mod payload;
mod provider;
mod request;
mod response;
mod util;

pub use crate::artifacts::{Artifacts, ArtifactsBuilder};
pub use crate::authenticator::{authenticate_payload, Authenticator, AuthenticatorBuilder};
pub use crate::bewit::Bewit;
pub use crate::credentials::{Credentials, DigestAlgorithm, Key};
pub use crate::error::*;
pub use crate::header::Header;
pub use crate::nonce::MemoryNonceStore;
pub use crate::payload::{calculate_payload_hash, PayloadHasher};
pub use crate::provider::{
    CredentialsFn, CredentialsProvider, FixedClock, NonceFn, NonceValidator, SystemClock,
    TimeProvider,
};
pub use crate::request::{Request, RequestBuilder, RequestState};
pub use crate::response::{create_header, Response, ResponseOptions};

pub const SHA1: DigestAlgorithm = DigestAlgorithm::Sha1;
pub const SHA256: DigestAlgorithm = DigestAlgorithm::Sha256;
pub const SHA384: DigestAlgorithm = DigestAlgorithm::Sha384;
pub const SHA512: DigestAlgorithm = DigestAlgorithm::Sha512;
