//! Persisted table view state: filters, sort, expanded rows, seating view.
//!
//! The cookie is the primary copy and is size-capped, so it is written with
//! the first [`EncodingStrategy`] whose output fits [`COOKIE_BYTE_BUDGET`].
//! When none fits the cookie is deleted. Local storage keeps an uncapped
//! mirror that is read only when the cookie is missing or unreadable.
//!
//! Decoding never trusts stored values: every field that is malformed or
//! outside its known set falls back to its default on its own.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use guest_core::{InvitedBy, RsvpStatus};

use crate::clock::Debouncer;
use crate::cookies::{CookieJar, CookieOptions, encoded_json_len};
use crate::error::ClientError;
use crate::local_store::{LocalStore, VIEW_PREFS_KEY};

pub const VIEW_PREFS_COOKIE: &str = "oliverikaGuestListViewPrefs";
/// Maximum percent-encoded cookie value size.
pub const COOKIE_BYTE_BUDGET: usize = 3800;
pub const FORMAT_VERSION: u64 = 1;
pub const SAVE_DELAY: Duration = Duration::from_millis(200);

const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Filters and sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    /// `None` shows every side.
    pub invited_by: Option<InvitedBy>,
    /// `None` shows every reply.
    pub rsvp_status: Option<RsvpStatus>,
}

impl Filters {
    fn to_value(&self) -> Value {
        json!({
            "search": self.search,
            "invitedBy": self.invited_by.map_or(ALL, InvitedBy::as_str),
            "rsvpStatus": self.rsvp_status.map_or(ALL, RsvpStatus::as_str),
        })
    }

    fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str);
        Self {
            search: field("search").unwrap_or_default().to_string(),
            invited_by: field("invitedBy").and_then(InvitedBy::parse),
            rsvp_status: field("rsvpStatus").and_then(RsvpStatus::parse),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    EnvelopeName,
    InvitedBy,
    RsvpStatus,
    Table,
    GuestCount,
}

impl SortKey {
    pub const ALL: [Self; 5] = [
        Self::EnvelopeName,
        Self::InvitedBy,
        Self::RsvpStatus,
        Self::Table,
        Self::GuestCount,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnvelopeName => "envelopeName",
            Self::InvitedBy => "invitedBy",
            Self::RsvpStatus => "rsvpStatus",
            Self::Table => "table",
            Self::GuestCount => "guestCount",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    fn to_value(self) -> Value {
        json!({"key": self.key.as_str(), "direction": self.direction.as_str()})
    }

    /// An unknown key discards the whole sort; an unknown direction only
    /// resets the direction.
    fn from_value(value: &Value) -> Self {
        let Some(key) = value.get("key").and_then(Value::as_str).and_then(SortKey::parse) else {
            return Self::default();
        };
        let direction = value
            .get("direction")
            .and_then(Value::as_str)
            .and_then(SortDirection::parse)
            .unwrap_or_default();
        Self { key, direction }
    }
}

// ---------------------------------------------------------------------------
// Expanded rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandedMode {
    /// Every household expanded except `ids`.
    #[default]
    All,
    /// No household expanded except `ids`.
    None,
}

/// Compact form of the expanded-household set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedPrefs {
    pub mode: ExpandedMode,
    pub ids: Vec<String>,
}

impl ExpandedPrefs {
    /// Encode `expanded` relative to `all_ids`, listing whichever of the
    /// expanded or collapsed ids is shorter.
    #[must_use]
    pub fn encode(expanded: &HashSet<String>, all_ids: &[String]) -> Self {
        let (open, closed): (Vec<String>, Vec<String>) = all_ids
            .iter()
            .cloned()
            .partition(|id| expanded.contains(id));
        if closed.len() < open.len() {
            Self {
                mode: ExpandedMode::All,
                ids: closed,
            }
        } else {
            Self {
                mode: ExpandedMode::None,
                ids: open,
            }
        }
    }

    /// Expand back to a set of ids, ignoring ids no longer in `all_ids`.
    #[must_use]
    pub fn decode(&self, all_ids: &[String]) -> HashSet<String> {
        let listed: HashSet<&str> = self.ids.iter().map(String::as_str).collect();
        all_ids
            .iter()
            .filter(|id| match self.mode {
                ExpandedMode::All => !listed.contains(id.as_str()),
                ExpandedMode::None => listed.contains(id.as_str()),
            })
            .cloned()
            .collect()
    }

    fn from_value(value: &Value) -> Self {
        let mode = match value.get("mode").and_then(Value::as_str) {
            Some("none") => ExpandedMode::None,
            _ => ExpandedMode::All,
        };
        let ids = value
            .get("ids")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .filter(|id| !id.trim().is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self { mode, ids }
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPrefs {
    pub filters: Filters,
    pub sort_config: SortConfig,
    pub expanded: ExpandedPrefs,
    pub show_seating_view: bool,
}

impl ViewPrefs {
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "v": FORMAT_VERSION,
            "filters": self.filters.to_value(),
            "sortConfig": self.sort_config.to_value(),
            "expanded": self.expanded,
            "showSeatingView": self.show_seating_view,
        })
    }

    /// Decode a stored payload.
    ///
    /// Returns `None` when the payload is not an object of the current
    /// version. Inside a valid payload, bad fields become defaults.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.get("v").and_then(Value::as_u64) != Some(FORMAT_VERSION) {
            return None;
        }
        let null = Value::Null;
        let field = |name: &str| value.get(name).unwrap_or(&null);
        Some(Self {
            filters: Filters::from_value(field("filters")),
            sort_config: SortConfig::from_value(field("sortConfig")),
            expanded: ExpandedPrefs::from_value(field("expanded")),
            show_seating_view: field("showSeatingView").as_bool().unwrap_or(false),
        })
    }

    /// Parse a raw stored string; anything unparseable is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str::<Value>(raw)
            .ok()
            .as_ref()
            .and_then(Self::from_value)
    }
}

/// Ways to shrink the payload, tried in [`EncodingStrategy::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingStrategy {
    Full,
    /// Keep the expanded mode, drop its id list.
    WithoutExpandedIds,
}

impl EncodingStrategy {
    pub const ORDER: [Self; 2] = [Self::Full, Self::WithoutExpandedIds];

    #[must_use]
    pub fn apply(self, prefs: &ViewPrefs) -> ViewPrefs {
        match self {
            Self::Full => prefs.clone(),
            Self::WithoutExpandedIds => ViewPrefs {
                expanded: ExpandedPrefs {
                    mode: prefs.expanded.mode,
                    ids: Vec::new(),
                },
                ..prefs.clone()
            },
        }
    }

    /// First strategy whose encoded payload fits `budget` bytes.
    #[must_use]
    pub fn select(prefs: &ViewPrefs, budget: usize) -> Option<(Self, Value)> {
        Self::ORDER.into_iter().find_map(|strategy| {
            let value = strategy.apply(prefs).to_value();
            let len = encoded_json_len(&value).ok()?;
            (len <= budget).then_some((strategy, value))
        })
    }
}

/// Reads and debounced writes of [`ViewPrefs`].
pub struct ViewPrefsStore {
    jar: CookieJar,
    local: Arc<dyn LocalStore>,
    options: CookieOptions,
    budget: usize,
    debounce: Debouncer,
    pending: Option<ViewPrefs>,
}

impl ViewPrefsStore {
    pub fn new(jar: CookieJar, local: Arc<dyn LocalStore>) -> Self {
        Self {
            jar,
            local,
            options: CookieOptions::default(),
            budget: COOKIE_BYTE_BUDGET,
            debounce: Debouncer::new(SAVE_DELAY),
            pending: None,
        }
    }

    #[must_use]
    pub fn with_cookie_options(mut self, options: CookieOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub const fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Cookie first, then the local mirror, then defaults.
    #[must_use]
    pub fn load(&self) -> ViewPrefs {
        if let Some(prefs) = self
            .jar
            .get_json::<Value>(VIEW_PREFS_COOKIE)
            .as_ref()
            .and_then(ViewPrefs::from_value)
        {
            return prefs;
        }
        self.local
            .get(VIEW_PREFS_KEY)
            .as_deref()
            .and_then(ViewPrefs::parse)
            .unwrap_or_default()
    }

    /// Write both copies now.
    ///
    /// Returns the strategy used for the cookie, or `None` when nothing fit
    /// and the cookie was deleted.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the local mirror cannot be written.
    pub fn save(&mut self, prefs: &ViewPrefs) -> Result<Option<EncodingStrategy>, ClientError> {
        let strategy = match EncodingStrategy::select(prefs, self.budget) {
            Some((strategy, value)) => {
                self.jar.set_json(VIEW_PREFS_COOKIE, &value, &self.options)?;
                Some(strategy)
            }
            None => {
                tracing::debug!("view prefs exceed cookie budget, deleting cookie");
                self.jar.remove(VIEW_PREFS_COOKIE, &self.options);
                None
            }
        };
        self.local
            .set(VIEW_PREFS_KEY, &serde_json::to_string(&prefs.to_value())?)?;
        Ok(strategy)
    }

    /// Queue `prefs` for writing after the quiet period.
    pub fn schedule(&mut self, prefs: ViewPrefs, now: Duration) {
        self.pending = Some(prefs);
        self.debounce.touch(now);
    }

    /// Write the queued prefs if the quiet period has passed.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the local mirror cannot be written.
    pub fn tick(&mut self, now: Duration) -> Result<bool, ClientError> {
        if !self.debounce.fire(now) {
            return Ok(false);
        }
        match self.pending.take() {
            Some(prefs) => self.save(&prefs).map(|_| true),
            None => Ok(false),
        }
    }
}
