//! S3 bucket configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct S3Config {
    /// Bucket holding the guest list objects.
    #[serde(default)]
    pub bucket: String,

    /// Key prefix inside the bucket. Leading and trailing slashes are ignored.
    #[serde(default)]
    pub prefix: String,

    /// AWS region, e.g. `us-east-1`.
    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    /// Custom endpoint for S3-compatible stores. Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
}

impl S3Config {
    /// Environment variable names of required fields that are unset.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("WEDDING_S3__ACCESS_KEY_ID", &self.access_key_id),
            ("WEDDING_S3__SECRET_ACCESS_KEY", &self.secret_access_key),
            ("WEDDING_S3__REGION", &self.region),
            ("WEDDING_S3__BUCKET", &self.bucket),
            ("WEDDING_S3__PREFIX", &self.prefix),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether a bucket is set. Requests cannot be served without one.
    #[must_use]
    pub fn has_bucket(&self) -> bool {
        !self.bucket.trim().is_empty()
    }

    /// The configured prefix without leading or trailing slashes.
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        self.prefix.trim().trim_matches('/')
    }

    /// `key_prefix()` followed by `/`, or empty when there is no prefix.
    #[must_use]
    pub fn key_prefix_with_slash(&self) -> String {
        match self.key_prefix() {
            "" => String::new(),
            prefix => format!("{prefix}/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reports_every_field_missing() {
        let config = S3Config::default();
        assert_eq!(config.missing_fields().len(), 5);
        assert!(!config.has_bucket());
    }

    #[test]
    fn prefix_slashes_are_trimmed() {
        let config = S3Config {
            prefix: "//wedding/site//".into(),
            ..Default::default()
        };
        assert_eq!(config.key_prefix(), "wedding/site");
        assert_eq!(config.key_prefix_with_slash(), "wedding/site/");
    }

    #[test]
    fn empty_prefix_has_no_slash() {
        let config = S3Config {
            prefix: " / ".into(),
            ..Default::default()
        };
        assert_eq!(config.key_prefix_with_slash(), "");
    }

    #[test]
    fn only_unset_fields_are_missing() {
        let config = S3Config {
            bucket: "b".into(),
            region: "us-east-1".into(),
            access_key_id: "k".into(),
            secret_access_key: "s".into(),
            ..Default::default()
        };
        assert_eq!(config.missing_fields(), vec!["WEDDING_S3__PREFIX"]);
    }
}
