//! Object key layout under the configured prefix.

const LEGACY_KEY: &str = "guest-list.json";
const INDEX_KEY: &str = "guest-list/index.json";
const HOUSEHOLDS_DIR: &str = "guest-list/households/";
const OBJECT_SUFFIX: &str = ".json";

/// Maps household ids to object keys and back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreLayout {
    prefix: String,
}

impl StoreLayout {
    /// `prefix` is either empty or ends in `/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn legacy_key(&self) -> String {
        format!("{}{LEGACY_KEY}", self.prefix)
    }

    #[must_use]
    pub fn index_key(&self) -> String {
        format!("{}{INDEX_KEY}", self.prefix)
    }

    #[must_use]
    pub fn households_prefix(&self) -> String {
        format!("{}{HOUSEHOLDS_DIR}", self.prefix)
    }

    /// Key for one household. The id is percent-encoded so any string is safe.
    #[must_use]
    pub fn household_key(&self, id: &str) -> String {
        format!(
            "{}{}{OBJECT_SUFFIX}",
            self.households_prefix(),
            urlencoding::encode(id)
        )
    }

    /// Recover the household id from a listed key.
    ///
    /// Returns `None` for keys outside the households directory or without
    /// the `.json` suffix. A segment that fails to decode is returned raw.
    #[must_use]
    pub fn household_id_from_key(&self, key: &str) -> Option<String> {
        let encoded = key
            .strip_prefix(&self.households_prefix())?
            .strip_suffix(OBJECT_SUFFIX)?;
        if encoded.is_empty() || encoded.contains('/') {
            return None;
        }
        Some(
            urlencoding::decode(encoded)
                .map_or_else(|_| encoded.to_string(), |id| id.into_owned()),
        )
    }
}
