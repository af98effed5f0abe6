//! Status and category enums for households and guests.
//!
//! Every enum serializes to the display string the guest list has always
//! stored (`"Awaiting response"`, `"plus-one"`, ...). Deserialization is total:
//! unknown or legacy values are mapped through `normalize` instead of failing,
//! so a record written by an older client never breaks a load.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::lenient;

macro_rules! lenient_deserialize {
    ($ty:ty) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = lenient::text(deserializer)?;
                Ok(Self::normalize(&raw))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fn key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// InvitedBy
// ---------------------------------------------------------------------------

/// Which side of the couple sent the invitation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum InvitedBy {
    Bride,
    Groom,
    #[default]
    Both,
}

impl InvitedBy {
    pub const ALL: [Self; 3] = [Self::Bride, Self::Groom, Self::Both];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bride => "Bride",
            Self::Groom => "Groom",
            Self::Both => "Both",
        }
    }

    /// Map any input to a variant. Unknown values become `Both`.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match key(raw).as_str() {
            "bride" => Self::Bride,
            "groom" => Self::Groom,
            _ => Self::Both,
        }
    }

    /// Strict parse used for persisted UI filters, where unknown means "discard".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == raw)
    }
}

lenient_deserialize!(InvitedBy);

// ---------------------------------------------------------------------------
// GuestType
// ---------------------------------------------------------------------------

/// Informational guest category; drives creation defaults and seating badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum GuestType {
    #[default]
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "plus-one")]
    PlusOne,
    #[serde(rename = "child")]
    Child,
}

impl GuestType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::PlusOne => "plus-one",
            Self::Child => "child",
        }
    }

    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match key(raw).as_str() {
            "plus-one" | "plus_one" | "plusone" | "plus one" => Self::PlusOne,
            "child" => Self::Child,
            _ => Self::Primary,
        }
    }
}

lenient_deserialize!(GuestType);

// ---------------------------------------------------------------------------
// RsvpStatus
// ---------------------------------------------------------------------------

/// Household or guest reply to the wedding invitation.
///
/// Legacy values fold into the current set:
/// ```text
/// Accepted               → Both events
/// Declined               → Not attending
/// Tentative, Not offered → Awaiting response
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum RsvpStatus {
    #[default]
    #[serde(rename = "Awaiting response")]
    AwaitingResponse,
    #[serde(rename = "Both events")]
    BothEvents,
    #[serde(rename = "Ceremony only")]
    CeremonyOnly,
    #[serde(rename = "Reception only")]
    ReceptionOnly,
    #[serde(rename = "Not attending")]
    NotAttending,
}

impl RsvpStatus {
    pub const ALL: [Self; 5] = [
        Self::AwaitingResponse,
        Self::BothEvents,
        Self::CeremonyOnly,
        Self::ReceptionOnly,
        Self::NotAttending,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingResponse => "Awaiting response",
            Self::BothEvents => "Both events",
            Self::CeremonyOnly => "Ceremony only",
            Self::ReceptionOnly => "Reception only",
            Self::NotAttending => "Not attending",
        }
    }

    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match key(raw).as_str() {
            "both events" | "accepted" => Self::BothEvents,
            "ceremony only" => Self::CeremonyOnly,
            "reception only" => Self::ReceptionOnly,
            "not attending" | "declined" => Self::NotAttending,
            _ => Self::AwaitingResponse,
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == raw)
    }

    /// Whether the guest is coming to at least one event.
    #[must_use]
    pub const fn is_attending(self) -> bool {
        matches!(
            self,
            Self::BothEvents | Self::CeremonyOnly | Self::ReceptionOnly
        )
    }
}

lenient_deserialize!(RsvpStatus);

// ---------------------------------------------------------------------------
// TischRsvp
// ---------------------------------------------------------------------------

/// Per-guest reply to the tisch, which only some households are invited to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum TischRsvp {
    #[default]
    #[serde(rename = "Not invited")]
    NotInvited,
    #[serde(rename = "Awaiting response")]
    AwaitingResponse,
    #[serde(rename = "Attending")]
    Attending,
    #[serde(rename = "Not attending")]
    NotAttending,
}

impl TischRsvp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotInvited => "Not invited",
            Self::AwaitingResponse => "Awaiting response",
            Self::Attending => "Attending",
            Self::NotAttending => "Not attending",
        }
    }

    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match key(raw).as_str() {
            "awaiting response" => Self::AwaitingResponse,
            "attending" | "accepted" => Self::Attending,
            "not attending" | "declined" => Self::NotAttending,
            _ => Self::NotInvited,
        }
    }

    /// Apply the household's tisch invitation to this reply.
    ///
    /// Uninvited households always read `Not invited`; invited households
    /// never do, falling back to `Awaiting response`.
    #[must_use]
    pub const fn for_household(self, tisch_invited: bool) -> Self {
        match (tisch_invited, self) {
            (false, _) => Self::NotInvited,
            (true, Self::NotInvited) => Self::AwaitingResponse,
            (true, active) => active,
        }
    }
}

lenient_deserialize!(TischRsvp);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Accepted", RsvpStatus::BothEvents)]
    #[case("Declined", RsvpStatus::NotAttending)]
    #[case("Tentative", RsvpStatus::AwaitingResponse)]
    #[case("Not offered", RsvpStatus::AwaitingResponse)]
    #[case("Ceremony only", RsvpStatus::CeremonyOnly)]
    #[case("  reception ONLY ", RsvpStatus::ReceptionOnly)]
    #[case("", RsvpStatus::AwaitingResponse)]
    #[case("maybe later", RsvpStatus::AwaitingResponse)]
    fn rsvp_normalizes_legacy_values(#[case] raw: &str, #[case] expected: RsvpStatus) {
        assert_eq!(RsvpStatus::normalize(raw), expected);
    }

    #[rstest]
    #[case(false, TischRsvp::Attending, TischRsvp::NotInvited)]
    #[case(false, TischRsvp::AwaitingResponse, TischRsvp::NotInvited)]
    #[case(true, TischRsvp::NotInvited, TischRsvp::AwaitingResponse)]
    #[case(true, TischRsvp::NotAttending, TischRsvp::NotAttending)]
    fn tisch_follows_household(
        #[case] invited: bool,
        #[case] input: TischRsvp,
        #[case] expected: TischRsvp,
    ) {
        assert_eq!(input.for_household(invited), expected);
    }

    #[test]
    fn deserialize_never_fails_on_unknown_values() {
        let status: RsvpStatus = serde_json::from_str("42").unwrap();
        assert_eq!(status, RsvpStatus::AwaitingResponse);
        let kind: GuestType = serde_json::from_str("null").unwrap();
        assert_eq!(kind, GuestType::Primary);
        let side: InvitedBy = serde_json::from_str("\"groom\"").unwrap();
        assert_eq!(side, InvitedBy::Groom);
    }

    #[test]
    fn serializes_display_strings() {
        assert_eq!(
            serde_json::to_string(&GuestType::PlusOne).unwrap(),
            "\"plus-one\""
        );
        assert_eq!(
            serde_json::to_string(&RsvpStatus::NotAttending).unwrap(),
            "\"Not attending\""
        );
        assert_eq!(TischRsvp::NotInvited.to_string(), "Not invited");
    }

    #[test]
    fn strict_parse_rejects_legacy() {
        assert_eq!(RsvpStatus::parse("Accepted"), None);
        assert_eq!(RsvpStatus::parse("Both events"), Some(RsvpStatus::BothEvents));
        assert_eq!(InvitedBy::parse("bride"), None);
    }
}
