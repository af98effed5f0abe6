//! Cross-cutting error types.
//!
//! Storage, transport and client errors live in their own crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Household lookup returned no result.
    #[error("Household not found: {0}")]
    HouseholdNotFound(String),

    /// Guest lookup returned no result.
    #[error("Guest not found: {household_id}/{guest_id}")]
    GuestNotFound {
        household_id: String,
        guest_id: String,
    },

    /// The request would leave a household without guests.
    #[error("Household {0} must keep at least one guest")]
    LastGuest(String),
}
