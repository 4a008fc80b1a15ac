/// The fields of a request (or response, or bewit) that participate in its MAC.
///
/// Artifacts are built once with an `ArtifactsBuilder` and never change afterward.
/// A payload always comes with its content type, which may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    method: String,
    host: String,
    port: u16,
    resource: String,
    ts: i64,
    nonce: String,
    ext: Option<String>,
    payload: Option<Vec<u8>>,
    content_type: Option<String>,
    hash: Option<String>,
    app: Option<String>,
    dlg: Option<String>,
}

impl Artifacts {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path and query, without scheme or host.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Seconds since the epoch; for bewits this is the expiration time.
    pub fn ts(&self) -> i64 {
        self.ts
    }

    /// The nonce; always empty for bewits.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn ext(&self) -> Option<&str> {
        self.ext.as_deref()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The base64 payload hash exactly as it appears in the header.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn dlg(&self) -> Option<&str> {
        self.dlg.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactsBuilder(Artifacts);

impl ArtifactsBuilder {
    pub fn new<S1, S2, S3>(method: S1, host: S2, port: u16, resource: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        ArtifactsBuilder(Artifacts {
            method: method.into(),
            host: host.into(),
            port,
            resource: resource.into(),
            ts: 0,
            nonce: String::new(),
            ext: None,
            payload: None,
            content_type: None,
            hash: None,
            app: None,
            dlg: None,
        })
    }

    /// Start from an existing set of artifacts, e.g. to derive response artifacts from a
    /// request.
    pub fn from_artifacts(artifacts: &Artifacts) -> Self {
        ArtifactsBuilder(artifacts.clone())
    }

    pub fn ts(mut self, ts: i64) -> Self {
        self.0.ts = ts;
        self
    }

    pub fn nonce<S: Into<String>>(mut self, nonce: S) -> Self {
        self.0.nonce = nonce.into();
        self
    }

    pub fn ext<S: Into<String>>(mut self, ext: Option<S>) -> Self {
        self.0.ext = ext.map(Into::into);
        self
    }

    /// Set the payload together with its content type.  `None` clears both.
    pub fn payload<S, B>(mut self, payload: Option<(S, B)>) -> Self
    where
        S: Into<String>,
        B: Into<Vec<u8>>,
    {
        match payload {
            Some((content_type, body)) => {
                self.0.content_type = Some(content_type.into());
                self.0.payload = Some(body.into());
            }
            None => {
                self.0.content_type = None;
                self.0.payload = None;
            }
        }
        self
    }

    pub fn hash<S: Into<String>>(mut self, hash: Option<S>) -> Self {
        self.0.hash = hash.map(Into::into);
        self
    }

    pub fn app<S: Into<String>>(mut self, app: Option<S>) -> Self {
        self.0.app = app.map(Into::into);
        self
    }

    pub fn dlg<S: Into<String>>(mut self, dlg: Option<S>) -> Self {
        self.0.dlg = dlg.map(Into::into);
        self
    }

    pub fn artifacts(self) -> Artifacts {
        self.0
    }
}
