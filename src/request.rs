use crate::artifacts::ArtifactsBuilder;
use crate::bewit::Bewit;
use crate::credentials::Credentials;
use crate::error::*;
use crate::header::Header;
use crate::mac::{calculate_mac, MacType};
use crate::payload::calculate_payload_hash;
use crate::util::random_nonce;
use url::Url;

/// Request represents a single HTTP request.
///
/// A server hands one to `Authenticator::authenticate` to describe what it received; a
/// client uses one to produce an `Authorization` header or a bewit.
///
/// The structure is created using (RequestBuilder)[struct.RequestBuilder.html].  Most uses
/// of this library will hold several of the fields in this structure fixed.  Cloning the
/// structure with these fields applied is a convenient way to avoid repeating those fields.
/// Most fields are references, since in common use the values already exist and will
/// outlive the request.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    method: &'a str,
    host: &'a str,
    port: u16,
    resource: &'a str,
    payload: Option<(&'a str, &'a [u8])>,
    hash: Option<&'a str>,
    ext: Option<&'a str>,
    app: Option<&'a str>,
    dlg: Option<&'a str>,
}

/// The per-request values a client chooses: the timestamp and the nonce.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    pub ts: i64,
    pub nonce: String,
}

impl RequestState {
    /// A state for the given timestamp with a fresh random nonce.
    pub fn new(ts: i64) -> Self {
        RequestState {
            ts,
            nonce: random_nonce(6),
        }
    }

    pub fn with_nonce<S: Into<String>>(ts: i64, nonce: S) -> Self {
        RequestState {
            ts,
            nonce: nonce.into(),
        }
    }
}

impl<'a> Request<'a> {
    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn host(&self) -> &'a str {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn resource(&self) -> &'a str {
        self.resource
    }

    /// The content type and body, when the request has a payload.
    pub fn payload(&self) -> Option<(&'a str, &'a [u8])> {
        self.payload
    }

    /// Create an `Authorization` header for this request, using the timestamp and nonce
    /// from `state`.
    ///
    /// If the request has a payload but no explicit hash, the hash is computed.
    pub fn make_header(&self, credentials: &Credentials, state: &RequestState) -> Result<Header> {
        let hash = match (self.hash, self.payload) {
            (Some(hash), _) => Some(hash.to_string()),
            (None, Some((content_type, payload))) => Some(calculate_payload_hash(
                payload,
                credentials.key.algorithm(),
                content_type,
            )?),
            (None, None) => None,
        };

        let artifacts = self
            .artifacts_builder()
            .ts(state.ts)
            .nonce(state.nonce.as_str())
            .hash(hash.as_deref())
            .artifacts();
        let mac = calculate_mac(MacType::Header, &credentials.key, &artifacts)?;

        let mut header = Header::new("Hawk")?;
        header.insert("id", credentials.id.as_str())?;
        header.insert("ts", state.ts.to_string())?;
        header.insert("nonce", state.nonce.as_str())?;
        header.insert("mac", mac)?;
        for (name, value) in vec![
            ("hash", artifacts.hash()),
            ("ext", artifacts.ext()),
            ("app", artifacts.app()),
            ("dlg", artifacts.dlg()),
        ] {
            if let Some(value) = value {
                header.insert(name, value)?;
            }
        }
        Ok(header)
    }

    /// Make a "bewit" that can be attached to a GET request to authenticate it until `exp`
    /// (seconds since the epoch).
    pub fn make_bewit(&self, credentials: &Credentials, exp: i64) -> Result<Bewit> {
        if credentials.id.contains('\\') {
            return Err(Error::InvalidArgument(
                "bewit credentials id cannot contain `\\`".into(),
            ));
        }
        if self.ext.map_or(false, |ext| ext.contains('\\')) {
            return Err(Error::InvalidArgument("bewit ext cannot contain `\\`".into()));
        }
        let artifacts = ArtifactsBuilder::new("GET", self.host, self.port, self.resource)
            .ts(exp)
            .ext(self.ext)
            .artifacts();
        let mac = calculate_mac(MacType::Bewit, &credentials.key, &artifacts)?;
        Ok(Bewit::new(credentials.id.as_str(), exp, mac, self.ext))
    }

    /// Artifacts describing this request.  A server overwrites the header-derived fields
    /// with what the client sent.
    pub(crate) fn artifacts_builder(&self) -> ArtifactsBuilder {
        ArtifactsBuilder::new(self.method, self.host, self.port, self.resource)
            .payload(self.payload)
            .ext(self.ext)
            .app(self.app)
            .dlg(self.dlg)
    }
}

#[derive(Debug, Clone)]
pub struct RequestBuilder<'a>(Request<'a>);

impl<'a> RequestBuilder<'a> {
    /// Create a new request with the given method, host, port, and resource (path and
    /// query).
    pub fn new(method: &'a str, host: &'a str, port: u16, resource: &'a str) -> Self {
        RequestBuilder(Request {
            method,
            host,
            port,
            resource,
            payload: None,
            hash: None,
            ext: None,
            app: None,
            dlg: None,
        })
    }

    /// Create a new request with the host, port, and resource determined from the URL.
    pub fn from_url(method: &'a str, url: &'a Url) -> Result<Self> {
        let (host, port, resource) = RequestBuilder::parse_url(url)?;
        Ok(RequestBuilder::new(method, host, port, resource))
    }

    /// Set the request payload and its content type.  Clients hash it into the header;
    /// servers check it against the header's `hash`.
    pub fn payload<B>(mut self, content_type: &'a str, payload: &'a B) -> Self
    where
        B: AsRef<[u8]> + ?Sized,
    {
        self.0.payload = Some((content_type, payload.as_ref()));
        self
    }

    /// Set an explicit base64 payload hash, e.g. one computed with a streaming
    /// `PayloadHasher`.
    pub fn hash<H: Into<Option<&'a str>>>(mut self, hash: H) -> Self {
        self.0.hash = hash.into();
        self
    }

    /// Set the request's `ext` field.
    pub fn ext<S: Into<Option<&'a str>>>(mut self, ext: S) -> Self {
        self.0.ext = ext.into();
        self
    }

    /// Set the request's `app` field.
    pub fn app<S: Into<Option<&'a str>>>(mut self, app: S) -> Self {
        self.0.app = app.into();
        self
    }

    /// Set the request's `dlg` field.
    pub fn dlg<S: Into<Option<&'a str>>>(mut self, dlg: S) -> Self {
        self.0.dlg = dlg.into();
        self
    }

    /// Get the request from this builder
    pub fn request(self) -> Request<'a> {
        self.0
    }

    fn parse_url(url: &'a Url) -> Result<(&'a str, u16, &'a str)> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidArgument(format!("url {} has no host", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::InvalidArgument(format!("url {} has no port", url)))?;
        let path = &url[url::Position::BeforePath..url::Position::AfterQuery];
        Ok((host, port, path))
    }
}
