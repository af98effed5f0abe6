//! Partial update builders for households and guests.
//!
//! Applying an update keeps the household invariants:
//! - turning `plus_one_allowed` off clears `plus_one_accepted`;
//! - guest tisch replies follow `tisch_invited`;
//! - derived fields are recomputed.

use serde::Serialize;

use crate::derive::ensure_derived_fields;
use crate::entities::{Address, Guest, Household};
use crate::enums::{GuestType, InvitedBy, RsvpStatus, TischRsvp};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HouseholdUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envelope_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<InvitedBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_the_date_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tisch_invited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plus_one_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plus_one_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HouseholdUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the update and return the normalized household.
    #[must_use]
    pub fn apply(self, mut household: Household) -> Household {
        if let Some(v) = self.envelope_name {
            household.envelope_name = v;
        }
        if let Some(v) = self.custom_slug {
            household.custom_slug = Some(v);
        }
        if let Some(v) = self.invited_by {
            household.invited_by = v;
        }
        if let Some(v) = self.address {
            household.address = v;
        }
        if let Some(v) = self.email {
            household.email = v;
        }
        if let Some(v) = self.phone {
            household.phone = v;
        }
        if let Some(v) = self.save_the_date_sent {
            household.save_the_date_sent = v;
        }
        if let Some(v) = self.invitation_sent {
            household.invitation_sent = v;
        }
        if let Some(v) = self.tisch_invited {
            household.tisch_invited = v;
        }
        if let Some(v) = self.plus_one_accepted {
            household.plus_one_accepted = v;
        }
        if let Some(v) = self.plus_one_allowed {
            household.plus_one_allowed = v;
            if !v {
                household.plus_one_accepted = false;
            }
        }
        if let Some(v) = self.rsvp_status {
            household.rsvp_status = v;
        }
        if let Some(v) = self.rsvp_locked {
            household.rsvp_locked = v;
        }
        if let Some(v) = self.table {
            household.table = v;
        }
        if let Some(v) = self.dietary_restrictions {
            household.dietary_restrictions = v;
        }
        if let Some(v) = self.notes {
            household.notes = v;
        }
        ensure_derived_fields(household)
    }
}

pub struct HouseholdUpdateBuilder(HouseholdUpdate);

impl HouseholdUpdateBuilder {
    pub fn new() -> Self {
        Self(HouseholdUpdate::default())
    }

    pub fn envelope_name(mut self, val: impl Into<String>) -> Self {
        self.0.envelope_name = Some(val.into());
        self
    }

    pub fn custom_slug(mut self, val: impl Into<String>) -> Self {
        self.0.custom_slug = Some(val.into());
        self
    }

    pub fn invited_by(mut self, val: InvitedBy) -> Self {
        self.0.invited_by = Some(val);
        self
    }

    pub fn address(mut self, val: Address) -> Self {
        self.0.address = Some(val);
        self
    }

    pub fn email(mut self, val: impl Into<String>) -> Self {
        self.0.email = Some(val.into());
        self
    }

    pub fn phone(mut self, val: impl Into<String>) -> Self {
        self.0.phone = Some(val.into());
        self
    }

    pub fn save_the_date_sent(mut self, val: bool) -> Self {
        self.0.save_the_date_sent = Some(val);
        self
    }

    pub fn invitation_sent(mut self, val: bool) -> Self {
        self.0.invitation_sent = Some(val);
        self
    }

    pub fn tisch_invited(mut self, val: bool) -> Self {
        self.0.tisch_invited = Some(val);
        self
    }

    pub fn plus_one_allowed(mut self, val: bool) -> Self {
        self.0.plus_one_allowed = Some(val);
        self
    }

    pub fn plus_one_accepted(mut self, val: bool) -> Self {
        self.0.plus_one_accepted = Some(val);
        self
    }

    pub fn rsvp_status(mut self, val: RsvpStatus) -> Self {
        self.0.rsvp_status = Some(val);
        self
    }

    pub fn rsvp_locked(mut self, val: bool) -> Self {
        self.0.rsvp_locked = Some(val);
        self
    }

    pub fn table(mut self, val: impl Into<String>) -> Self {
        self.0.table = Some(val.into());
        self
    }

    pub fn dietary_restrictions(mut self, val: impl Into<String>) -> Self {
        self.0.dietary_restrictions = Some(val.into());
        self
    }

    pub fn notes(mut self, val: impl Into<String>) -> Self {
        self.0.notes = Some(val.into());
        self
    }

    pub fn build(self) -> HouseholdUpdate {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_type: Option<GuestType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tisch_rsvp: Option<TischRsvp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary: Option<String>,
}

impl GuestUpdate {
    /// Apply to the guest `guest_id` of `household`.
    ///
    /// Returns the household unchanged (but normalized) when no guest matches.
    #[must_use]
    pub fn apply(self, mut household: Household, guest_id: &str) -> Household {
        if let Some(guest) = household.guests.iter_mut().find(|g| g.id == guest_id) {
            self.apply_to(guest);
        }
        ensure_derived_fields(household)
    }

    fn apply_to(self, guest: &mut Guest) {
        if let Some(v) = self.name {
            guest.name = v;
        }
        if let Some(v) = self.role {
            guest.role = v;
        }
        if let Some(v) = self.guest_type {
            guest.guest_type = v;
        }
        if let Some(v) = self.rsvp_status {
            guest.rsvp_status = v;
        }
        if let Some(v) = self.tisch_rsvp {
            guest.tisch_rsvp = v;
        }
        if let Some(v) = self.dietary {
            guest.dietary = v;
        }
    }
}

pub struct GuestUpdateBuilder(GuestUpdate);

impl GuestUpdateBuilder {
    pub fn new() -> Self {
        Self(GuestUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn role(mut self, val: impl Into<String>) -> Self {
        self.0.role = Some(val.into());
        self
    }

    pub fn guest_type(mut self, val: GuestType) -> Self {
        self.0.guest_type = Some(val);
        self
    }

    pub fn rsvp_status(mut self, val: RsvpStatus) -> Self {
        self.0.rsvp_status = Some(val);
        self
    }

    pub fn tisch_rsvp(mut self, val: TischRsvp) -> Self {
        self.0.tisch_rsvp = Some(val);
        self
    }

    pub fn dietary(mut self, val: impl Into<String>) -> Self {
        self.0.dietary = Some(val.into());
        self
    }

    pub fn build(self) -> GuestUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::blank_household;

    #[test]
    fn disallowing_plus_one_clears_acceptance() {
        let h = HouseholdUpdateBuilder::new()
            .plus_one_allowed(true)
            .plus_one_accepted(true)
            .build()
            .apply(blank_household());
        assert!(h.plus_one_accepted);

        let h = HouseholdUpdateBuilder::new()
            .plus_one_allowed(false)
            .build()
            .apply(h);
        assert!(!h.plus_one_allowed);
        assert!(!h.plus_one_accepted);
    }

    #[test]
    fn allowing_plus_one_keeps_prior_acceptance() {
        let h = blank_household();
        assert!(!h.plus_one_accepted);
        let h = HouseholdUpdateBuilder::new()
            .plus_one_allowed(true)
            .build()
            .apply(h);
        assert!(h.plus_one_allowed);
        assert!(!h.plus_one_accepted);
    }

    #[test]
    fn accepted_and_disallowed_in_one_update_ends_disallowed() {
        let h = HouseholdUpdateBuilder::new()
            .plus_one_accepted(true)
            .plus_one_allowed(false)
            .build()
            .apply(blank_household());
        assert!(!h.plus_one_accepted);
    }

    #[test]
    fn revoking_tisch_resets_guest_replies() {
        let h = HouseholdUpdateBuilder::new()
            .tisch_invited(true)
            .build()
            .apply(blank_household());
        let guest_id = h.guests[0].id.clone();
        let h = GuestUpdateBuilder::new()
            .tisch_rsvp(TischRsvp::Attending)
            .build()
            .apply(h, &guest_id);
        assert_eq!(h.guests[0].tisch_rsvp, TischRsvp::Attending);

        let h = HouseholdUpdateBuilder::new()
            .tisch_invited(false)
            .build()
            .apply(h);
        assert_eq!(h.guests[0].tisch_rsvp, TischRsvp::NotInvited);
    }

    #[test]
    fn guest_tisch_edit_ignored_while_uninvited() {
        let h = blank_household();
        let guest_id = h.guests[0].id.clone();
        let h = GuestUpdateBuilder::new()
            .tisch_rsvp(TischRsvp::Attending)
            .build()
            .apply(h, &guest_id);
        assert_eq!(h.guests[0].tisch_rsvp, TischRsvp::NotInvited);
    }

    #[test]
    fn rename_updates_slug() {
        let h = HouseholdUpdateBuilder::new()
            .envelope_name("The Okafor Family")
            .build()
            .apply(blank_household());
        assert_eq!(h.slug, "the_okafor_family");
    }

    #[test]
    fn empty_update_detected() {
        assert!(HouseholdUpdate::default().is_empty());
        assert!(!HouseholdUpdateBuilder::new().notes("x").build().is_empty());
    }
}
