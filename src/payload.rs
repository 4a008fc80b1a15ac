use crate::b64::STANDARD_CONFIG;
use crate::credentials::DigestAlgorithm;
use crate::crypto::{self, Hasher};
use crate::error::*;

/// A utility for hashing payloads. Feed your entity body to this, then pass the `finish`
/// result to a request or response.
pub struct PayloadHasher {
    hasher: Box<dyn Hasher>,
}

impl PayloadHasher {
    /// Create a new PayloadHasher. The digest is assumed to be the same as the digest used
    /// for the credentials in the request.
    ///
    /// The content type is normalized first: parameters are dropped and the media type is
    /// lowercased, so `Text/Plain; charset=utf-8` hashes as `text/plain`.
    pub fn new(content_type: &str, algorithm: DigestAlgorithm) -> Result<Self> {
        let mut hasher = PayloadHasher {
            hasher: crypto::get_crypographer().new_hasher(algorithm)?,
        };
        hasher.update("hawk.1.payload\n")?;
        hasher.update(normalize_content_type(content_type))?;
        hasher.update("\n")?;
        Ok(hasher)
    }

    /// Hash a single value and return it
    pub fn hash<B>(content_type: &str, algorithm: DigestAlgorithm, payload: B) -> Result<Vec<u8>>
    where
        B: AsRef<[u8]>,
    {
        let mut hasher = PayloadHasher::new(content_type, algorithm)?;
        hasher.update(payload)?;
        hasher.finish()
    }

    /// Update the hash with new data.
    pub fn update<B>(&mut self, data: B) -> Result<()>
    where
        B: AsRef<[u8]>,
    {
        Ok(self.hasher.update(data.as_ref())?)
    }

    /// Finish hashing and return the result
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.hasher.update(b"\n")?;
        Ok(self.hasher.finish()?)
    }
}

/// Calculate the base64 payload hash carried in the `hash` attribute.
pub fn calculate_payload_hash<B>(
    payload: B,
    algorithm: DigestAlgorithm,
    content_type: &str,
) -> Result<String>
where
    B: AsRef<[u8]>,
{
    let hash = PayloadHasher::hash(content_type, algorithm, payload)?;
    Ok(base64::encode_config(&hash, STANDARD_CONFIG))
}

fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
