//! Cookie storage modeled on `document.cookie`.
//!
//! Values are percent-encoded on write and decoded on read. JSON cookies are
//! serialized first, then encoded.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// `SameSite` policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSite {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        }
    }
}

/// Attributes written alongside a cookie value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub max_age_secs: u64,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            max_age_secs: 60 * 60 * 24 * 365,
            path: "/".to_string(),
            same_site: SameSite::Lax,
            secure: false,
        }
    }
}

/// Cookies visible to the client, keyed by name, holding encoded values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header (`a=1; b=2`). Malformed pairs are skipped.
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { cookies }
    }

    /// Render as a `Cookie` request header.
    #[must_use]
    pub fn header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Decoded value. A value that fails to decode is returned raw.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let raw = self.cookies.get(name)?;
        Some(
            urlencoding::decode(raw)
                .map_or_else(|_| raw.clone(), std::borrow::Cow::into_owned),
        )
    }

    /// Store `value` and return the `Set-Cookie` line that would be sent.
    pub fn set(&mut self, name: &str, value: &str, options: &CookieOptions) -> String {
        let encoded = urlencoding::encode(value).into_owned();
        let line = set_cookie_line(name, &encoded, options.max_age_secs, options);
        self.cookies.insert(name.to_string(), encoded);
        line
    }

    /// Expire a cookie. Returns the `Set-Cookie` line.
    pub fn remove(&mut self, name: &str, options: &CookieOptions) -> String {
        self.cookies.remove(name);
        set_cookie_line(name, "", 0, options)
    }

    /// Parse a JSON cookie. Absent or unparseable values are `None`.
    #[must_use]
    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let raw = self.get(name)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!(cookie = name, %error, "ignoring unparseable cookie");
                None
            }
        }
    }

    /// Serialize `value` as JSON and store it.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if `value` cannot be serialized.
    pub fn set_json<T: Serialize>(
        &mut self,
        name: &str,
        value: &T,
        options: &CookieOptions,
    ) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(value)?;
        Ok(self.set(name, &json, options))
    }
}

/// Encoded size of a JSON cookie value, as it would be stored.
///
/// # Errors
///
/// Returns `serde_json::Error` if `value` cannot be serialized.
pub fn encoded_json_len<T: Serialize>(value: &T) -> Result<usize, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(urlencoding::encode(&json).len())
}

fn set_cookie_line(name: &str, encoded: &str, max_age: u64, options: &CookieOptions) -> String {
    let mut line = format!(
        "{name}={encoded}; Max-Age={max_age}; Path={}; SameSite={}",
        options.path,
        options.same_site.as_str()
    );
    if options.secure {
        line.push_str("; Secure");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn header_round_trip() {
        let jar = CookieJar::from_header("a=1; theme=dark;junk; =x");
        assert_eq!(jar.get("a").as_deref(), Some("1"));
        assert_eq!(jar.get("theme").as_deref(), Some("dark"));
        assert_eq!(jar.header(), "a=1; theme=dark");
    }

    #[test]
    fn set_encodes_and_reports_attributes() {
        let mut jar = CookieJar::new();
        let line = jar.set(
            "prefs",
            "a b;c",
            &CookieOptions {
                secure: true,
                ..CookieOptions::default()
            },
        );
        assert_eq!(
            line,
            "prefs=a%20b%3Bc; Max-Age=31536000; Path=/; SameSite=Lax; Secure"
        );
        assert_eq!(jar.get("prefs").as_deref(), Some("a b;c"));
    }

    #[test]
    fn remove_expires_cookie() {
        let mut jar = CookieJar::from_header("prefs=1");
        let line = jar.remove("prefs", &CookieOptions::default());
        assert!(line.starts_with("prefs=; Max-Age=0;"));
        assert_eq!(jar.get("prefs"), None);
    }

    #[test]
    fn json_cookie_round_trip() {
        let mut jar = CookieJar::new();
        jar.set_json("prefs", &json!({"v": 1, "ids": ["a"]}), &CookieOptions::default())
            .unwrap();
        let value: serde_json::Value = jar.get_json("prefs").unwrap();
        assert_eq!(value, json!({"v": 1, "ids": ["a"]}));
    }

    #[test]
    fn corrupt_json_cookie_is_none() {
        let jar = CookieJar::from_header("prefs=%7Bnot-json");
        assert_eq!(jar.get_json::<serde_json::Value>("prefs"), None);
        let jar = CookieJar::from_header("prefs=%E0%A4%A");
        assert_eq!(jar.get("prefs").as_deref(), Some("%E0%A4%A"));
    }
}
