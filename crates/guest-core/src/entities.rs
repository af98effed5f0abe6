//! Guest list records.
//!
//! Field names serialize in `camelCase` to match the JSON stored in the
//! bucket and in the browser cache. All fields deserialize leniently: a
//! missing, null or wrongly typed value becomes the field default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GuestType, InvitedBy, RsvpStatus, TischRsvp};
use crate::lenient;

/// Postal address of a household. All free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "lenient::text")]
    pub line1: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: String,
}

/// Addressable address fields, for single-field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Line1,
    City,
    State,
    PostalCode,
    Country,
}

impl Address {
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let slot = match field {
            AddressField::Line1 => &mut self.line1,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::Country => &mut self.country,
        };
        *slot = value.into();
    }
}

/// One person within a household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Unique within the owning household.
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: String,
    #[serde(rename = "type", default)]
    pub guest_type: GuestType,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub tisch_rsvp: TischRsvp,
    #[serde(default, deserialize_with = "lenient::text")]
    pub dietary: String,
}

/// One invitation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    /// Storage shard key. Immutable once created.
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub envelope_name: String,
    /// URL-safe RSVP link token. Recomputed by `ensure_derived_fields`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: String,
    /// User override for `slug`. `None` only on records that predate it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub custom_slug: Option<String>,
    #[serde(default)]
    pub invited_by: InvitedBy,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub address: Address,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub save_the_date_sent: bool,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub invitation_sent: bool,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub tisch_invited: bool,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub plus_one_allowed: bool,
    /// Only meaningful while `plus_one_allowed` is set.
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub plus_one_accepted: bool,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    /// Advisory: the UI stops guest RSVP edits, the server does not.
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub rsvp_locked: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub table: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub dietary_restrictions: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    /// Display order is significant.
    #[serde(default, deserialize_with = "lenient::records")]
    pub guests: Vec<Guest>,
}

impl Household {
    #[must_use]
    pub fn guest(&self, guest_id: &str) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == guest_id)
    }

    #[must_use]
    pub fn has_plus_one_guest(&self) -> bool {
        self.guests.iter().any(|g| g.guest_type == GuestType::PlusOne)
    }

    /// Parse a JSON array of households, skipping entries that are not objects.
    /// Anything other than an array yields an empty list.
    #[must_use]
    pub fn list_from_value(value: serde_json::Value) -> Vec<Self> {
        lenient::records_from_value(value)
    }
}

/// Manifest of the sharded household objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdIndex {
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub household_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub updated_at: Option<String>,
}

impl HouseholdIndex {
    /// Add `upserted` and drop `deleted`, keeping first-seen order and no duplicates.
    #[must_use]
    pub fn reconcile<'a>(
        ids: impl IntoIterator<Item = String>,
        upserted: impl IntoIterator<Item = &'a str>,
        deleted: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let deleted: std::collections::HashSet<&str> = deleted.into_iter().collect();
        let mut seen = std::collections::HashSet::new();
        ids.into_iter()
            .chain(upserted.into_iter().map(String::from))
            .filter(|id| !deleted.contains(id.as_str()))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}

/// The full household list plus the time it was last written.
///
/// This is both the `GET /guest-list` response and the legacy single-blob
/// storage format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestListSnapshot {
    #[serde(default, deserialize_with = "lenient::records")]
    pub households: Vec<Household>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub updated_at: Option<String>,
}

impl GuestListSnapshot {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            households: Vec::new(),
            updated_at: None,
        }
    }
}
