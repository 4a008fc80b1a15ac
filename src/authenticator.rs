use crate::artifacts::{Artifacts, ArtifactsBuilder};
use crate::bewit::Bewit;
use crate::credentials::Credentials;
use crate::error::*;
use crate::header::Header;
use crate::mac::{calculate_mac, calculate_ts_mac, fixed_time_eq, MacType};
use crate::payload::calculate_payload_hash;
use crate::provider::{CredentialsProvider, NonceValidator, SystemClock, TimeProvider};
use crate::request::Request;
use crate::response::{self, Response, ResponseOptions};
use log::{debug, trace, warn};
use std::str::FromStr;
use std::time::Duration;

const ATTRIBUTES: &[&str] = &["id", "ts", "nonce", "hash", "ext", "mac", "app", "dlg"];

/// Authenticates incoming requests, either by their `Authorization` header or by a bewit in
/// the query string.
///
/// An authenticator is built once with `Authenticator::builder` and shared between
/// requests.  It holds no per-request state of its own; replay protection lives in the
/// nonce validator.
pub struct Authenticator<C, N> {
    credentials: C,
    nonces: N,
    time: Box<dyn TimeProvider>,
    skew: i64,
    offset: i64,
    scheme: String,
}

pub struct AuthenticatorBuilder<C, N> {
    credentials: C,
    nonces: N,
    time: Box<dyn TimeProvider>,
    skew: Duration,
    offset: i64,
    scheme: String,
}

impl<C, N> AuthenticatorBuilder<C, N>
where
    C: CredentialsProvider,
    N: NonceValidator,
{
    /// How far a request's timestamp may be from the server's time, in either direction.
    /// Defaults to 60 seconds.
    pub fn timestamp_skew(mut self, skew: Duration) -> Self {
        self.skew = skew;
        self
    }

    /// Seconds added to the time provider's clock.  Defaults to 0.
    pub fn local_time_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// The authentication scheme expected in request headers and used in generated
    /// headers.  Defaults to `Hawk`.
    pub fn scheme<S: Into<String>>(mut self, scheme: S) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn time_provider<T: TimeProvider + 'static>(mut self, time: T) -> Self {
        self.time = Box::new(time);
        self
    }

    pub fn build(self) -> Result<Authenticator<C, N>> {
        // a scheme that cannot start a header is a configuration mistake
        Header::new(self.scheme.as_str())?;
        let skew = self.skew.as_secs();
        if skew > i64::max_value() as u64 {
            return Err(Error::InvalidArgument(format!(
                "timestamp skew {:?} is too large",
                self.skew
            )));
        }
        Ok(Authenticator {
            credentials: self.credentials,
            nonces: self.nonces,
            time: self.time,
            skew: skew as i64,
            offset: self.offset,
            scheme: self.scheme,
        })
    }
}

impl<C, N> Authenticator<C, N>
where
    C: CredentialsProvider,
    N: NonceValidator,
{
    pub fn builder(credentials: C, nonces: N) -> AuthenticatorBuilder<C, N> {
        AuthenticatorBuilder {
            credentials,
            nonces,
            time: Box::new(SystemClock),
            skew: Duration::from_secs(60),
            offset: 0,
            scheme: "Hawk".to_string(),
        }
    }

    /// Authenticate a request given the raw value of its `Authorization` header, if it had
    /// one.
    ///
    /// The request supplies the method, host, port and resource the server actually
    /// received, and its payload if the payload should be verified.
    pub fn authenticate(&self, request: &Request, authorization: Option<&str>) -> Result<Response> {
        let result = match authorization {
            None => Err(Unauthorized::MissingHeader.into()),
            Some(raw) => match Header::parse(&self.scheme, raw) {
                Ok(header) => self.verify_header(request, &header),
                Err(_) => Err(Unauthorized::InvalidHeader.into()),
            },
        };
        log_outcome("header", result)
    }

    /// Authenticate a request whose `Authorization` header has already been split into
    /// attributes.
    pub fn authenticate_header(&self, request: &Request, header: &Header) -> Result<Response> {
        log_outcome("header", self.verify_header(request, header))
    }

    /// Authenticate a GET request by the `bewit` parameter in its resource.
    ///
    /// On success, the artifacts hold the resource with the bewit removed.
    pub fn authenticate_bewit(&self, host: &str, port: u16, resource: &str) -> Result<Response> {
        log_outcome("bewit", self.verify_bewit(host, port, resource))
    }

    /// Create a `Server-Authorization` header for the response to an authenticated request.
    pub fn create_header(
        &self,
        credentials: &Credentials,
        artifacts: &Artifacts,
        options: &ResponseOptions,
    ) -> Result<Header> {
        response::create_header(&self.scheme, credentials, artifacts, options)
    }

    /// Render a rejection as a `WWW-Authenticate` header.  A stale timestamp carries the
    /// server time and its MAC so that the client can correct its clock.
    pub fn challenge(&self, reason: &Unauthorized) -> Result<Header> {
        let mut header = Header::new(self.scheme.as_str())?;
        if let Unauthorized::StaleTimestamp { ts, tsm } = reason {
            header.insert("ts", ts.to_string())?;
            header.insert("tsm", tsm.as_str())?;
        }
        header.insert("error", reason.to_string())?;
        Ok(header)
    }

    fn now(&self) -> i64 {
        self.time.now().saturating_add(self.offset)
    }

    fn verify_header(&self, request: &Request, header: &Header) -> Result<Response> {
        check_port(request.port())?;
        if !header.scheme().eq_ignore_ascii_case(&self.scheme) {
            return Err(Unauthorized::InvalidHeader.into());
        }
        if header.iter().any(|(name, _)| !ATTRIBUTES.contains(&name)) {
            return Err(Unauthorized::InvalidHeader.into());
        }
        let ts = match header.get("ts").filter(|ts| !ts.is_empty()) {
            Some(ts) => Some(i64::from_str(ts).map_err(|_| Unauthorized::InvalidHeader)?),
            None => None,
        };

        let now = self.now();

        let present = |name: &str| header.get(name).filter(|v| !v.is_empty());
        let (id, ts, nonce, mac) = match (
            header.get("id").filter(|id| !id.trim().is_empty()),
            ts,
            present("nonce"),
            present("mac"),
        ) {
            (Some(id), Some(ts), Some(nonce), Some(mac)) => (id, ts, nonce, mac),
            _ => return Err(Unauthorized::MissingAttributes.into()),
        };

        let artifacts = request
            .artifacts_builder()
            .ts(ts)
            .nonce(nonce)
            .hash(present("hash"))
            .ext(present("ext"))
            .app(present("app"))
            .dlg(present("dlg"))
            .artifacts();

        let credentials = self.load_credentials(id)?;

        let expected = calculate_mac(MacType::Header, &credentials.key, &artifacts)?;
        if !fixed_time_eq(expected.as_bytes(), mac.as_bytes()) {
            return Err(Unauthorized::BadMac.into());
        }

        if let Some((content_type, payload)) = request.payload() {
            let hash = artifacts.hash().ok_or(Unauthorized::MissingPayloadHash)?;
            if !authenticate_payload(&credentials, payload, content_type, hash) {
                return Err(Unauthorized::BadPayloadHash.into());
            }
        }

        // the nonce is recorded even if the timestamp then turns out to be stale
        match self.nonces.validate(nonce, ts) {
            Ok(true) => {}
            Ok(false) => return Err(Unauthorized::InvalidNonce.into()),
            Err(e) => {
                warn!("nonce validation failed: {}", e);
                return Err(Unauthorized::InvalidNonce.into());
            }
        }

        // an unrepresentable difference is as stale as any other
        let stale = ts
            .checked_sub(now)
            .and_then(i64::checked_abs)
            .map_or(true, |skew| skew > self.skew);
        if stale {
            let ts = self.now();
            let tsm = calculate_ts_mac(ts, &credentials.key)?;
            return Err(Unauthorized::StaleTimestamp { ts, tsm }.into());
        }

        Ok(Response {
            credentials,
            artifacts,
        })
    }

    fn verify_bewit(&self, host: &str, port: u16, resource: &str) -> Result<Response> {
        let now = self.now();
        check_port(port)?;

        let (bewit, resource) = Bewit::from_resource(resource)?;
        if bewit.exp() < now {
            return Err(Unauthorized::AccessExpired.into());
        }

        let artifacts = ArtifactsBuilder::new("GET", host, port, resource)
            .ts(bewit.exp())
            .ext(bewit.ext())
            .artifacts();

        let credentials = self.load_credentials(bewit.id())?;
        let expected = calculate_mac(MacType::Bewit, &credentials.key, &artifacts)?;
        if !fixed_time_eq(expected.as_bytes(), bewit.mac().as_bytes()) {
            return Err(Unauthorized::BadMac.into());
        }

        Ok(Response {
            credentials,
            artifacts,
        })
    }

    fn load_credentials(&self, id: &str) -> Result<Credentials> {
        self.credentials
            .load_credentials_by_id(id)
            .map_err(Error::Credentials)
    }
}

/// Check a payload against the `hash` a client sent, for servers that verify the payload
/// separately from the header (for example after streaming the body).
pub fn authenticate_payload<B: AsRef<[u8]>>(
    credentials: &Credentials,
    payload: B,
    content_type: &str,
    hash: &str,
) -> bool {
    match calculate_payload_hash(payload, credentials.key.algorithm(), content_type) {
        Ok(expected) => fixed_time_eq(expected.as_bytes(), hash.as_bytes()),
        Err(_) => false,
    }
}

fn check_port(port: u16) -> Result<()> {
    if port == 0 {
        return Err(Error::InvalidArgument("port must be between 1 and 65535".into()));
    }
    Ok(())
}

fn log_outcome(kind: &str, result: Result<Response>) -> Result<Response> {
    match &result {
        Ok(response) => trace!("{} authenticated for id {}", kind, response.credentials.id),
        Err(Error::Unauthorized(reason)) => debug!("{} rejected: {}", kind, reason),
        Err(e) => debug!("{} authentication failed: {}", kind, e),
    }
    result
}
