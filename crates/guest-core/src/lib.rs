//! # guest-core
//!
//! Core records and rules for the wedding guest list.
//!
//! This crate is shared by the storage layer, the HTTP endpoint and the client:
//! - Household, guest and address records with lenient deserialization
//! - Status enums with total normalization of legacy values
//! - Slug derivation and `ensure_derived_fields`
//! - Update builders that keep the plus-one and tisch invariants
//! - Sync wire types (`SyncRequest`, `SyncBatch`, `SaveResponse`)
//! - Seed data, blank records, id generation and stats

pub mod derive;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
mod lenient;
pub mod seed;
pub mod slug;
pub mod stats;
pub mod updates;
pub mod wire;

pub use entities::{Address, Guest, GuestListSnapshot, Household, HouseholdIndex};
pub use enums::{GuestType, InvitedBy, RsvpStatus, TischRsvp};
pub use errors::CoreError;
