//! Headline counts for the guest list.

use serde::Serialize;

use crate::entities::Household;
use crate::enums::RsvpStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestListStats {
    pub invitations: usize,
    pub guest_count: usize,
    /// Guests plus one open plus-one slot per household that allows one and
    /// has no plus-one guest yet.
    pub max_invited: usize,
    /// Guests attending either event, plus accepted plus-one slots.
    pub accepted_guests: usize,
    /// Households with the invitation sent and every guest still awaiting.
    pub awaiting_invites: usize,
}

impl GuestListStats {
    #[must_use]
    pub fn compute(households: &[Household]) -> Self {
        let mut stats = Self {
            invitations: households.len(),
            ..Self::default()
        };

        for household in households {
            let guests = household.guests.len();
            stats.guest_count += guests;

            let open_slot = household.plus_one_allowed && !household.has_plus_one_guest();
            stats.max_invited += guests + usize::from(open_slot);

            if household.invitation_sent
                && household
                    .guests
                    .iter()
                    .all(|g| g.rsvp_status == RsvpStatus::AwaitingResponse)
            {
                stats.awaiting_invites += 1;
            }

            stats.accepted_guests += household
                .guests
                .iter()
                .filter(|g| g.rsvp_status.is_attending())
                .count();
            if household.plus_one_allowed && household.plus_one_accepted {
                stats.accepted_guests += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_households;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_stats() {
        let stats = GuestListStats::compute(&seed_households());
        assert_eq!(
            stats,
            GuestListStats {
                invitations: 3,
                guest_count: 8,
                max_invited: 8,
                accepted_guests: 2,
                awaiting_invites: 1,
            }
        );
    }

    #[test]
    fn empty_list() {
        assert_eq!(GuestListStats::compute(&[]), GuestListStats::default());
    }
}
