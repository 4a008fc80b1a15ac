//! This module contains basic base64 functionality as used in Hawk.

/// MACs and payload hashes use the standard alphabet with padding.
pub(crate) const STANDARD_CONFIG: base64::Config = base64::STANDARD;

/// Bewits use the url-safe alphabet with no padding.
pub(crate) const BEWIT_CONFIG: base64::Config = base64::URL_SAFE_NO_PAD;

/// Decode a bewit token.  Trailing padding is tolerated, since some clients send it.
pub(crate) fn decode_bewit(token: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::decode_config(token.trim_end_matches('='), BEWIT_CONFIG)
}

pub(crate) fn encode_bewit<T: AsRef<[u8]>>(raw: T) -> String {
    base64::encode_config(raw, BEWIT_CONFIG)
}
