//! The canonicalization and MAC engine.
//!
//! Every MAC Hawk computes is an HMAC, under the credentials' key, of a newline-delimited
//! "normalized string".  The layout of that string must match other Hawk implementations
//! byte for byte.

use crate::artifacts::Artifacts;
use crate::b64::STANDARD_CONFIG;
use crate::credentials::Key;
use crate::crypto;
use crate::error::*;

/// The purposes a MAC can be computed for.  Each gets its own header line, so a MAC
/// made for one purpose never verifies for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacType {
    Header,
    Response,
    Bewit,
}

impl MacType {
    fn purpose(self) -> &'static str {
        match self {
            MacType::Header => "header",
            MacType::Response => "response",
            MacType::Bewit => "bewit",
        }
    }
}

/// Build the normalized string for `artifacts`.
///
/// The `app` and `dlg` lines appear only when `app` is present.
pub fn normalized_string(mac_type: MacType, artifacts: &Artifacts) -> String {
    let mut lines = vec![
        format!("hawk.1.{}", mac_type.purpose()),
        artifacts.ts().to_string(),
        artifacts.nonce().to_string(),
        artifacts.method().to_ascii_uppercase(),
        artifacts.resource().to_string(),
        artifacts.host().to_string(),
        artifacts.port().to_string(),
        artifacts.hash().unwrap_or("").to_string(),
        artifacts.ext().unwrap_or("").to_string(),
    ];

    if let Some(app) = artifacts.app() {
        lines.push(app.to_string());
        lines.push(artifacts.dlg().unwrap_or("").to_string());
    }

    let mut normalized = lines.join("\n");
    normalized.push('\n');
    normalized
}

/// Calculate the base64-encoded MAC of `artifacts` for the given purpose.
pub fn calculate_mac(mac_type: MacType, key: &Key, artifacts: &Artifacts) -> Result<String> {
    let normalized = normalized_string(mac_type, artifacts);
    Ok(base64::encode_config(&key.sign(normalized.as_bytes())?, STANDARD_CONFIG))
}

/// Calculate the base64-encoded MAC of a bare timestamp, sent to clients whose clocks have
/// drifted so they can trust the server time we send them.
pub fn calculate_ts_mac(ts: i64, key: &Key) -> Result<String> {
    let normalized = format!("hawk.1.ts\n{}\n", ts);
    Ok(base64::encode_config(&key.sign(normalized.as_bytes())?, STANDARD_CONFIG))
}

/// Compare two secrets in time independent of the position of the first difference.
/// Inputs of different lengths compare unequal.
pub fn fixed_time_eq(a: &[u8], b: &[u8]) -> bool {
    crypto::get_crypographer().constant_time_compare(a, b)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::artifacts::ArtifactsBuilder;
    use crate::credentials::{DigestAlgorithm, Key};

    fn key() -> Key {
        Key::new(
            vec![
                11u8, 19, 228, 209, 79, 189, 200, 59, 166, 47, 86, 254, 235, 184, 120, 197, 75,
                152, 201, 79, 115, 61, 111, 242, 219, 187, 173, 14, 227, 108, 60, 232,
            ],
            DigestAlgorithm::Sha256,
        )
        .unwrap()
    }

    fn builder() -> ArtifactsBuilder {
        ArtifactsBuilder::new("POST", "mysite.com", 443, "/v1/api")
            .ts(1000)
            .nonce("nonny")
    }

    #[test]
    fn test_normalized_string() {
        let a = builder().ext(Some("ext-data")).artifacts();
        assert_eq!(
            normalized_string(MacType::Header, &a),
            "hawk.1.header\n1000\nnonny\nPOST\n/v1/api\nmysite.com\n443\n\next-data\n"
        );
    }

    #[test]
    fn test_normalized_string_app_dlg() {
        let a = builder().app(Some("my-app")).artifacts();
        assert_eq!(
            normalized_string(MacType::Response, &a),
            "hawk.1.response\n1000\nnonny\nPOST\n/v1/api\nmysite.com\n443\n\n\nmy-app\n\n"
        );

        // dlg without app is not part of the string
        let a = builder().dlg(Some("my-dlg")).artifacts();
        assert_eq!(
            normalized_string(MacType::Bewit, &a),
            "hawk.1.bewit\n1000\nnonny\nPOST\n/v1/api\nmysite.com\n443\n\n\n"
        );
    }

    #[test]
    fn test_normalized_string_uppercases_method() {
        let a = ArtifactsBuilder::new("get", "h", 80, "/").artifacts();
        assert!(normalized_string(MacType::Header, &a).contains("\nGET\n"));
    }

    #[test]
    fn test_make_mac() {
        let mac = calculate_mac(MacType::Header, &key(), &builder().artifacts()).unwrap();
        assert_eq!(mac, "wOPreZ25xU+91uuLCehjN0MeRACWu8DuFcjRa/Wf87I=");
    }

    #[test]
    fn test_make_mac_hash() {
        let a = builder().hash(Some("AQIDBAU=")).artifacts();
        let mac = calculate_mac(MacType::Header, &key(), &a).unwrap();
        assert_eq!(mac, "PYDQ/ViHvsQBRZnBfATDVyZgtSJB6jqdr6+Rlz0AOQU=");
    }

    #[test]
    fn test_make_mac_ext() {
        let a = builder().ext(Some("ext-data")).artifacts();
        let mac = calculate_mac(MacType::Header, &key(), &a).unwrap();
        assert_eq!(mac, "u2juZKhwJUS7jaibscFxADJpfyQYdcj7isdsDml76nc=");
    }

    #[test]
    fn test_mac_types_differ() {
        let a = builder().artifacts();
        let header = calculate_mac(MacType::Header, &key(), &a).unwrap();
        let response = calculate_mac(MacType::Response, &key(), &a).unwrap();
        let bewit = calculate_mac(MacType::Bewit, &key(), &a).unwrap();
        assert_ne!(header, response);
        assert_ne!(header, bewit);
        assert_ne!(response, bewit);
    }

    #[test]
    fn test_any_field_change_breaks_mac() {
        let k = key();
        let full = |method: &str, host: &str, port: u16, path: &str| {
            ArtifactsBuilder::new(method, host, port, path)
                .ts(1000)
                .nonce("nonny")
                .ext(Some("e"))
                .hash(Some("h"))
                .app(Some("a"))
                .dlg(Some("d"))
        };
        let base = full("POST", "mysite.com", 443, "/v1/api").artifacts();
        let mac = calculate_mac(MacType::Header, &k, &base).unwrap();

        let variants = vec![
            ArtifactsBuilder::from_artifacts(&base).ts(1001),
            ArtifactsBuilder::from_artifacts(&base).nonce("nonnz"),
            ArtifactsBuilder::from_artifacts(&base).ext(Some("f")),
            ArtifactsBuilder::from_artifacts(&base).hash(Some("i")),
            ArtifactsBuilder::from_artifacts(&base).app(Some("b")),
            ArtifactsBuilder::from_artifacts(&base).dlg(Some("e")),
            full("PUT", "mysite.com", 443, "/v1/api"),
            full("POST", "mysite.org", 443, "/v1/api"),
            full("POST", "mysite.com", 444, "/v1/api"),
            full("POST", "mysite.com", 443, "/v1/apj"),
        ];
        for v in variants {
            let other = calculate_mac(MacType::Header, &k, &v.artifacts()).unwrap();
            assert!(!fixed_time_eq(mac.as_bytes(), other.as_bytes()));
        }
    }

    #[test]
    fn test_ts_mac() {
        let k = Key::new("werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn", DigestAlgorithm::Sha256)
            .unwrap();
        assert_eq!(
            calculate_ts_mac(1398546787, &k).unwrap(),
            "xgnNmgOHC7uJpdkEbNZXKUF8eunfc7DvJGPCpDv0i30="
        );
    }

    #[test]
    fn test_fixed_time_eq() {
        assert!(fixed_time_eq(b"abc", b"abc"));
        assert!(fixed_time_eq(b"", b""));
        assert!(!fixed_time_eq(b"abc", b"abd"));
        assert!(!fixed_time_eq(b"abc", b"xbc"));
        assert!(!fixed_time_eq(b"abc", b"abcd"));
        assert!(!fixed_time_eq(b"abcd", b"abc"));
    }
}
