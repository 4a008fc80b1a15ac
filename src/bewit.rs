use crate::b64;
use crate::error::*;
use std::str;
use std::str::FromStr;

/// A Bewit is a piece of data attached to a GET request that functions in place of a Hawk
/// Authentication header.  It contains an id, an expiration time, a MAC, and an optional
/// `ext` value.  These are available using accessor functions.
#[derive(Clone, Debug, PartialEq)]
pub struct Bewit {
    id: String,
    exp: i64,
    mac: String,
    ext: Option<String>,
}

const PREFIX: &str = "bewit=";

impl Bewit {
    /// Create a new Bewit with the given values.  `mac` is the base64 bewit MAC.
    ///
    /// See Request.make_bewit for an easier way to make a Bewit
    pub fn new<S1, S2>(id: S1, exp: i64, mac: S2, ext: Option<&str>) -> Bewit
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Bewit {
            id: id.into(),
            exp,
            mac: mac.into(),
            ext: ext.map(str::to_string),
        }
    }

    /// Extract the `bewit` query parameter from a resource (path and query).
    ///
    /// On success, returns the bewit and the resource with the bewit parameter removed;
    /// parameters before and after it are kept in order.  The resource must start with
    /// `/` and carry exactly one non-empty bewit parameter.  Parameters follow the first
    /// `?`, or the first `&` when there is no `?`; that separator is kept.
    pub fn from_resource(resource: &str) -> Result<(Bewit, String)> {
        if !resource.starts_with('/') {
            return Err(Unauthorized::MalformedResource.into());
        }
        let (path, separator, query) = match resource.find('?').or_else(|| resource.find('&')) {
            Some(i) => (&resource[..i], &resource[i..=i], &resource[i + 1..]),
            None => return Err(Unauthorized::MalformedResource.into()),
        };

        let params: Vec<&str> = query.split('&').collect();
        let mut bewits = params
            .iter()
            .enumerate()
            .filter(|(_, param)| param.starts_with(PREFIX));
        let (index, param) = bewits.next().ok_or(Unauthorized::MalformedResource)?;
        if bewits.next().is_some() {
            return Err(InvalidBewit::Multiple.into());
        }

        let token = &param[PREFIX.len()..];
        if token.is_empty() {
            return Err(Unauthorized::MalformedResource.into());
        }
        let bewit = Bewit::from_str(token)?;

        let rest: Vec<&str> = params[..index]
            .iter()
            .chain(params[index + 1..].iter())
            .copied()
            .collect();
        let stripped = if rest.is_empty() {
            path.to_string()
        } else {
            format!("{}{}{}", path, separator, rest.join("&"))
        };

        Ok((bewit, stripped))
    }

    /// Generate the fully-encoded string for this Bewit
    pub fn to_str(&self) -> String {
        let raw = format!(
            "{}\\{}\\{}\\{}",
            self.id,
            self.exp,
            self.mac,
            self.ext.as_deref().unwrap_or("")
        );
        b64::encode_bewit(raw)
    }

    /// Get the Bewit's client identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the expiration time of the bewit, in seconds since the epoch
    pub fn exp(&self) -> i64 {
        self.exp
    }

    /// Get the base64 MAC included in the Bewit
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Get the Bewit's `ext` field.
    pub fn ext(&self) -> Option<&str> {
        self.ext.as_deref()
    }
}

const BACKSLASH: u8 = b'\\';

impl FromStr for Bewit {
    type Err = Error;
    fn from_str(bewit: &str) -> Result<Bewit> {
        let bewit = b64::decode_bewit(bewit).map_err(|_| InvalidBewit::Encoding)?;

        let parts: Vec<&[u8]> = bewit.split(|c| *c == BACKSLASH).collect();
        if parts.len() != 4 {
            return Err(InvalidBewit::Format.into());
        }

        let id = str::from_utf8(parts[0]).map_err(|_| InvalidBewit::Id)?;
        if id.is_empty() {
            return Err(InvalidBewit::Id.into());
        }

        let exp = str::from_utf8(parts[1]).map_err(|_| InvalidBewit::Exp)?;
        let exp = i64::from_str(exp).map_err(|_| InvalidBewit::Exp)?;

        let mac = str::from_utf8(parts[2]).map_err(|_| InvalidBewit::Mac)?;
        if mac.is_empty() {
            return Err(InvalidBewit::Mac.into());
        }

        let ext = match parts[3].len() {
            0 => None,
            _ => Some(str::from_utf8(parts[3]).map_err(|_| InvalidBewit::Ext)?),
        };

        Ok(Bewit::new(id, exp, mac, ext))
    }
}
