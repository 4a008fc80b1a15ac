use crate::artifacts::{Artifacts, ArtifactsBuilder};
use crate::credentials::Credentials;
use crate::error::*;
use crate::header::Header;
use crate::mac::{calculate_mac, MacType};
use crate::payload::calculate_payload_hash;

/// A successfully authenticated request: the credentials that signed it and the artifacts
/// that were verified.
///
/// Keep the artifacts around to sign the response with `create_header`.
#[derive(Debug)]
pub struct Response {
    pub credentials: Credentials,
    pub artifacts: Artifacts,
}

/// What a server wants to say about its response in the `Server-Authorization` header.
///
/// The content type is only used when a payload is given; a payload without a content
/// type is hashed with an empty one.
#[derive(Debug, Clone, Default)]
pub struct ResponseOptions<'a> {
    payload: Option<&'a [u8]>,
    content_type: Option<&'a str>,
    ext: Option<&'a str>,
}

impl<'a> ResponseOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include a hash of this response body.
    pub fn payload<B: AsRef<[u8]> + ?Sized>(mut self, payload: &'a B) -> Self {
        self.payload = Some(payload.as_ref());
        self
    }

    pub fn content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn ext(mut self, ext: &'a str) -> Self {
        self.ext = Some(ext);
        self
    }
}

/// Create a `Server-Authorization` header for a response to the request described by
/// `artifacts`.
///
/// The header carries `mac`, then `hash` and `ext` when present.
pub fn create_header(
    scheme: &str,
    credentials: &Credentials,
    artifacts: &Artifacts,
    options: &ResponseOptions,
) -> Result<Header> {
    let algorithm = credentials.key.algorithm();
    let content_type = options.content_type.unwrap_or("");

    let hash = match options.payload {
        Some(payload) => Some(calculate_payload_hash(payload, algorithm, content_type)?),
        None => None,
    };

    let response_artifacts = ArtifactsBuilder::from_artifacts(artifacts)
        .payload(options.payload.map(|p| (content_type, p)))
        .hash(hash.as_deref())
        .ext(options.ext)
        .artifacts();

    let mac = calculate_mac(MacType::Response, &credentials.key, &response_artifacts)?;

    let mut header = Header::new(scheme)?;
    header.insert("mac", mac)?;
    if let Some(hash) = response_artifacts.hash() {
        header.insert("hash", hash)?;
    }
    if let Some(ext) = response_artifacts.ext() {
        header.insert("ext", ext)?;
    }
    Ok(header)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::credentials::Key;
    use crate::SHA256;

    fn credentials() -> Credentials {
        Credentials::new(
            "123456",
            Key::new("werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn", SHA256).unwrap(),
        )
    }

    fn request_artifacts() -> Artifacts {
        ArtifactsBuilder::new("POST", "example.com", 8080, "/resource/4?filter=a")
            .ts(1398546787)
            .nonce("xUwusx")
            .ext(Some("some-app-data"))
            .artifacts()
    }

    #[test]
    fn header_with_payload() {
        let options = ResponseOptions::new()
            .payload("some reply")
            .content_type("text/plain")
            .ext("response-specific");
        let header = create_header("Hawk", &credentials(), &request_artifacts(), &options).unwrap();
        assert_eq!(
            header.to_string(),
            "Hawk mac=\"n14wVJK4cOxAytPUMc5bPezQzuJGl5n7MYXhFQgEKsE=\", \
             hash=\"f9cDF/TDm7TkYRLnGwRMfeDzT6LixQVLvrIKhh0vgmM=\", \
             ext=\"response-specific\""
        );
    }

    #[test]
    fn header_without_payload_or_ext() {
        let header = create_header(
            "Hawk",
            &credentials(),
            &request_artifacts(),
            &ResponseOptions::new(),
        )
        .unwrap();
        assert_eq!(header.len(), 1);
        assert_eq!(header.get("hash"), None);
        // the request's ext is not carried into the response
        assert_eq!(header.get("ext"), None);
        assert_eq!(
            header.get("mac"),
            Some("3lfolNIi4oeF6SIyXlGUY939AMfJlMq0XP6Dx+lgY6g=")
        );
    }

    #[test]
    fn content_type_ignored_without_payload() {
        let with_ct = create_header(
            "Hawk",
            &credentials(),
            &request_artifacts(),
            &ResponseOptions::new().content_type("text/plain"),
        )
        .unwrap();
        let without = create_header(
            "Hawk",
            &credentials(),
            &request_artifacts(),
            &ResponseOptions::new(),
        )
        .unwrap();
        assert_eq!(with_ct, without);
    }

    #[test]
    fn reserved_characters_in_ext() {
        let options = ResponseOptions::new().ext("quote\"d");
        match create_header("Hawk", &credentials(), &request_artifacts(), &options) {
            Err(Error::InvalidArgument(_)) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }
}
