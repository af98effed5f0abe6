//! Derived-field recomputation.
//!
//! Every household passes through [`ensure_derived_fields`] before it is
//! treated as canonical, whatever its source: seed data, the local cache, a
//! remote fetch, or a freshly created draft. The function is idempotent.

use crate::entities::{Guest, Household};
use crate::slug::{random_slug, slug_base};

/// Default dietary value for guests with none recorded.
pub const DEFAULT_DIETARY: &str = "None";

/// Recompute the derived fields of a household.
///
/// Slug resolution, first match wins:
/// 1. a non-empty normalized `custom_slug`;
/// 2. on records that predate `custom_slug`, a stored slug that differs from
///    the name-derived one (it was set by hand, so it is promoted to
///    `custom_slug`);
/// 3. the slug derived from `envelope_name`;
/// 4. when the name has no slug-able characters, the stored slug, or a new
///    random token if there is none.
///
/// Guests get their tisch reply forced by `tisch_invited` and an empty
/// dietary value replaced by `"None"`. Enum and boolean coercion already
/// happened during deserialization.
#[must_use]
pub fn ensure_derived_fields(mut household: Household) -> Household {
    resolve_slug(&mut household);

    let tisch_invited = household.tisch_invited;
    for guest in &mut household.guests {
        normalize_guest(guest, tisch_invited);
    }
    household
}

impl Household {
    /// In-place form of [`ensure_derived_fields`].
    pub fn normalize(&mut self) {
        *self = ensure_derived_fields(std::mem::take(self));
    }
}

pub(crate) fn normalize_guest(guest: &mut Guest, tisch_invited: bool) {
    guest.tisch_rsvp = guest.tisch_rsvp.for_household(tisch_invited);
    if guest.dietary.trim().is_empty() {
        guest.dietary = DEFAULT_DIETARY.to_string();
    }
}

fn resolve_slug(household: &mut Household) {
    let custom = household
        .custom_slug
        .as_deref()
        .map(slug_base)
        .unwrap_or_default();
    if !custom.is_empty() {
        household.slug = custom;
        return;
    }

    let derived = slug_base(&household.envelope_name);
    let stored = slug_base(&household.slug);
    let predates_custom = household.custom_slug.is_none();
    household.custom_slug.get_or_insert_with(String::new);

    if predates_custom && !derived.is_empty() && !stored.is_empty() && stored != derived {
        household.custom_slug = Some(stored.clone());
        household.slug = stored;
    } else if !derived.is_empty() {
        household.slug = derived;
    } else if !stored.is_empty() {
        household.slug = stored;
    } else {
        household.slug = random_slug();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{RsvpStatus, TischRsvp};
    use pretty_assertions::assert_eq;

    fn household(name: &str) -> Household {
        Household {
            id: "h1".into(),
            envelope_name: name.into(),
            custom_slug: Some(String::new()),
            guests: vec![Guest {
                id: "g1".into(),
                name: "Guest".into(),
                tisch_rsvp: TischRsvp::Attending,
                ..Guest::default()
            }],
            ..Household::default()
        }
    }

    #[test]
    fn custom_slug_takes_precedence() {
        let mut h = household("The Rivera Family");
        h.custom_slug = Some("Riveras 2026!".into());
        let h = ensure_derived_fields(h);
        assert_eq!(h.slug, "riveras_2026");
    }

    #[test]
    fn clearing_custom_slug_reverts_to_name() {
        let mut h = household("The Rivera Family");
        h.custom_slug = Some("riveras".into());
        let mut h = ensure_derived_fields(h);
        assert_eq!(h.slug, "riveras");

        h.custom_slug = Some(String::new());
        let h = ensure_derived_fields(h);
        assert_eq!(h.slug, "the_rivera_family");
    }

    #[test]
    fn rename_rederives_slug() {
        let h = ensure_derived_fields(household("New household"));
        assert_eq!(h.slug, "new_household");
        let mut h = h;
        h.envelope_name = "The Morgans".into();
        assert_eq!(ensure_derived_fields(h).slug, "the_morgans");
    }

    #[test]
    fn legacy_hand_set_slug_is_promoted() {
        let mut h = household("The Rivera Family");
        h.custom_slug = None;
        h.slug = "riveras".into();
        let h = ensure_derived_fields(h);
        assert_eq!(h.slug, "riveras");
        assert_eq!(h.custom_slug.as_deref(), Some("riveras"));
    }

    #[test]
    fn legacy_derived_slug_is_not_promoted() {
        let mut h = household("The Rivera Family");
        h.custom_slug = None;
        h.slug = "the_rivera_family".into();
        let h = ensure_derived_fields(h);
        assert_eq!(h.slug, "the_rivera_family");
        assert_eq!(h.custom_slug.as_deref(), Some(""));
    }

    #[test]
    fn random_fallback_is_stable() {
        let once = ensure_derived_fields(household("&&"));
        assert!(once.slug.starts_with("invite_"));
        let twice = ensure_derived_fields(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn uninvited_tisch_forces_not_invited() {
        let h = ensure_derived_fields(household("Any"));
        assert!(!h.tisch_invited);
        assert!(h.guests.iter().all(|g| g.tisch_rsvp == TischRsvp::NotInvited));
    }

    #[test]
    fn invited_tisch_normalizes_to_active_state() {
        let mut h = household("Any");
        h.tisch_invited = true;
        h.guests[0].tisch_rsvp = TischRsvp::NotInvited;
        let h = ensure_derived_fields(h);
        assert_eq!(h.guests[0].tisch_rsvp, TischRsvp::AwaitingResponse);
    }

    #[test]
    fn guest_defaults_filled() {
        let h = ensure_derived_fields(household("Any"));
        assert_eq!(h.guests[0].dietary, "None");
        assert_eq!(h.guests[0].rsvp_status, RsvpStatus::AwaitingResponse);
    }

    #[test]
    fn idempotent_on_arbitrary_record() {
        let mut h = household("Alex & Jordan");
        h.custom_slug = None;
        h.slug = String::new();
        h.tisch_invited = true;
        let once = ensure_derived_fields(h);
        assert_eq!(ensure_derived_fields(once.clone()), once);
    }
}
