use crate::error::*;
use std::fmt;

/// An ordered set of `name="value"` attributes under an authentication scheme, as found in
/// `Authorization`, `Server-Authorization` and `WWW-Authenticate` headers.
///
/// Attribute names are case-sensitive and occur at most once.  A header that repeats an
/// attribute fails to parse.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    scheme: String,
    attributes: Vec<(String, String)>,
}

impl Header {
    /// Create an empty header for the given scheme (usually `Hawk`).
    pub fn new<S: Into<String>>(scheme: S) -> Result<Header> {
        let scheme = scheme.into();
        if !is_token(&scheme) {
            return Err(Error::InvalidArgument(format!(
                "invalid authentication scheme {:?}",
                scheme
            )));
        }
        Ok(Header {
            scheme,
            attributes: vec![],
        })
    }

    /// Build a header from attributes that have already been split out of the raw header
    /// value by some other layer.
    pub fn from_attributes<S, I, K, V>(scheme: S, attributes: I) -> Result<Header>
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut header = Header::new(scheme)?;
        for (name, value) in attributes {
            let name = name.into();
            if header.get(&name).is_some() {
                return Err(Error::HeaderParseError(format!(
                    "duplicate attribute {:?}",
                    name
                )));
            }
            header.insert(name, value)?;
        }
        Ok(header)
    }

    /// Parse a raw header value such as `Hawk id="abc", ts="1353832234", mac="..."`.
    ///
    /// The scheme is matched case-insensitively.  Values must be double-quoted and cannot
    /// contain a double quote; there is no escaping.
    pub fn parse(scheme: &str, raw: &str) -> Result<Header> {
        let raw = raw.trim_start();
        let (given_scheme, mut p) = match raw.find(char::is_whitespace) {
            Some(i) => (&raw[..i], &raw[i..]),
            None => (raw, ""),
        };
        if !given_scheme.eq_ignore_ascii_case(scheme) {
            return Err(Error::HeaderParseError("unsupported scheme".into()));
        }

        let mut attributes: Vec<(String, String)> = vec![];
        loop {
            // Skip whitespace and commas used as separators
            p = p.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
            if p.is_empty() {
                break;
            }

            // Find first '=' which delimits attribute name from value
            let eq = p
                .find('=')
                .ok_or_else(|| Error::HeaderParseError("expected `=`".into()))?;
            let name = p[..eq].trim();
            if !is_token(name) {
                return Err(Error::HeaderParseError("invalid attribute name".into()));
            }

            p = p[eq + 1..].trim_start();
            if !p.starts_with('"') {
                return Err(Error::HeaderParseError("unquoted attribute value".into()));
            }
            p = &p[1..];
            let end = p
                .find('"')
                .ok_or_else(|| Error::HeaderParseError("unterminated attribute value".into()))?;
            let value = &p[..end];
            p = &p[end + 1..];

            match p.chars().next() {
                Some(c) if c != ',' && !c.is_whitespace() => {
                    return Err(Error::HeaderParseError(
                        "expected `,` after attribute".into(),
                    ));
                }
                _ => {}
            }

            if attributes.iter().any(|(n, _)| n == name) {
                return Err(Error::HeaderParseError(format!(
                    "duplicate attribute {:?}",
                    name
                )));
            }
            attributes.push((name.to_string(), value.to_string()));
        }

        if attributes.is_empty() {
            return Err(Error::HeaderParseError("no attributes".into()));
        }

        Ok(Header {
            scheme: given_scheme.to_string(),
            attributes,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value in place.  Names must be tokens and
    /// values cannot contain `"` or `\`.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        if !is_token(&name) {
            return Err(Error::InvalidArgument(format!(
                "invalid attribute name {:?}",
                name
            )));
        }
        if value.contains(|c| c == '"' || c == '\\') {
            return Err(Error::InvalidArgument(format!(
                "Hawk header attribute {} cannot contain `\"` or `\\`",
                name
            )));
        }
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
        Ok(())
    }

    /// Iterate over the attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Serializes as `Scheme name="value", name="value"`, omitting empty values.
impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.scheme)?;
        let mut sep = " ";
        for (name, value) in self.iter().filter(|(_, v)| !v.is_empty()) {
            write!(f, "{}{}=\"{}\"", sep, name, value)?;
            sep = ", ";
        }
        Ok(())
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod test {
    use super::Header;
    use crate::error::Error;

    #[test]
    fn from_str() {
        let s = Header::parse(
            "Hawk",
            "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", \
             nonce=\"j4h3g2\", ext=\"some-app-ext-data\", \
             mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\", \
             hash=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\", \
             app=\"my-app\", dlg=\"my-authority\"",
        )
        .unwrap();
        assert_eq!(s.scheme(), "Hawk");
        assert_eq!(s.len(), 8);
        assert_eq!(s.get("id"), Some("dh37fgj492je"));
        assert_eq!(s.get("ts"), Some("1353832234"));
        assert_eq!(s.get("nonce"), Some("j4h3g2"));
        assert_eq!(
            s.get("mac"),
            Some("6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=")
        );
        assert_eq!(s.get("ext"), Some("some-app-ext-data"));
        assert_eq!(s.get("app"), Some("my-app"));
        assert_eq!(s.get("dlg"), Some("my-authority"));
        assert_eq!(s.get("missing"), None);
    }

    #[test]
    fn from_str_minimal() {
        let s = Header::parse("Hawk", "Hawk id=\"xyz\"").unwrap();
        assert_eq!(s.get("id"), Some("xyz"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn from_str_messy() {
        let s = Header::parse(
            "Hawk",
            "hawk , id  =  \"dh37fgj492je\", ts=\"1353832234\", \
             nonce=\"j4h3g2\"  , , ext=\"some-app-ext-data\", \
             mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\"",
        )
        .unwrap();
        assert_eq!(s.get("id"), Some("dh37fgj492je"));
        assert_eq!(s.get("nonce"), Some("j4h3g2"));
        assert_eq!(s.get("ext"), Some("some-app-ext-data"));
        assert_eq!(s.get("app"), None);
    }

    #[test]
    fn from_str_keeps_empty_values() {
        let s = Header::parse("Hawk", "Hawk id=\"a\", ext=\"\"").unwrap();
        assert_eq!(s.get("ext"), Some(""));
    }

    #[test]
    fn from_str_errors() {
        let bad = vec![
            "Basic id=\"a\"",
            "Hawk",
            "Hawk   ",
            "Hawkid=\"a\"",
            "Hawk id",
            "Hawk id=a",
            "Hawk id=\"a",
            "Hawk id=\"a\"x, ts=\"1\"",
            "Hawk =\"a\"",
            "Hawk i d=\"a\"",
            "Hawk id=\"a\", id=\"b\"",
        ];
        for raw in bad {
            match Header::parse("Hawk", raw) {
                Err(Error::HeaderParseError(_)) => {}
                other => panic!("{:?} parsed as {:?}", raw, other),
            }
        }
    }

    #[test]
    fn from_attributes() {
        let h = Header::from_attributes("Hawk", vec![("id", "a"), ("ts", "1")]).unwrap();
        assert_eq!(h.get("ts"), Some("1"));
        assert!(Header::from_attributes("Hawk", vec![("id", "a"), ("id", "b")]).is_err());
        assert!(Header::from_attributes("Hawk", vec![("id", "a\"b")]).is_err());
    }

    #[test]
    fn to_str_minimal() {
        let mut h = Header::new("Hawk").unwrap();
        h.insert("mac", "CCO2lSpvIcATFl4rdrBBRVYEnLhVa/nyrMhC0Tk/JlM=")
            .unwrap();
        assert_eq!(
            h.to_string(),
            "Hawk mac=\"CCO2lSpvIcATFl4rdrBBRVYEnLhVa/nyrMhC0Tk/JlM=\""
        );
    }

    #[test]
    fn to_str_skips_empty_and_keeps_order() {
        let mut h = Header::new("Hawk").unwrap();
        h.insert("mac", "m").unwrap();
        h.insert("hash", "").unwrap();
        h.insert("ext", "my-ext-value").unwrap();
        assert_eq!(h.to_string(), "Hawk mac=\"m\", ext=\"my-ext-value\"");

        h.insert("mac", "n").unwrap();
        assert_eq!(h.to_string(), "Hawk mac=\"n\", ext=\"my-ext-value\"");
    }

    #[test]
    fn illegal_values() {
        let mut h = Header::new("Hawk").unwrap();
        assert!(h.insert("ext", "ex\"t").is_err());
        assert!(h.insert("ext", "ex\\t").is_err());
        assert!(h.insert("e t", "ext").is_err());
        assert!(h.is_empty());
        assert!(Header::new("").is_err());
        assert!(Header::new("Ha wk").is_err());
    }

    #[test]
    fn round_trip() {
        let mut h = Header::new("Hawk").unwrap();
        h.insert("id", "dh37fgj492je").unwrap();
        h.insert("ts", "1353832234").unwrap();
        h.insert("nonce", "j4h3g2").unwrap();
        h.insert("mac", "CCO2lSpvIcATFl4rdrBBRVYEnLhVa/nyrMhC0Tk/JlM=")
            .unwrap();
        h.insert("app", "my-app").unwrap();
        let parsed = Header::parse("Hawk", &h.to_string()).unwrap();
        assert_eq!(parsed, h);
    }
}
