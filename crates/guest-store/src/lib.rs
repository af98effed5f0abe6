//! # guest-store
//!
//! Durable storage for the guest list.
//!
//! ## Storage layout
//!
//! All keys sit under the configured prefix:
//! - `guest-list.json`: legacy single blob `{households, updatedAt}`
//! - `guest-list/households/<url-encoded-id>.json`: one object per household
//! - `guest-list/index.json`: `{householdIds, updatedAt}`
//!
//! The index is authoritative once it exists. The legacy blob is only read
//! when there is no index, and is migrated into per-household objects on the
//! first incremental save.
//!
//! The index is rewritten whole on every save. There is no conditional write,
//! so two concurrent savers can drop each other's ids.

pub mod backend;
pub mod error;
pub mod fanout;
pub mod layout;
pub mod service;
pub mod store;

pub use backend::{ObjectBackend, ObjectStoreBackend};
pub use error::StoreError;
pub use layout::StoreLayout;
pub use service::GuestListService;
pub use store::{BatchOutcome, HouseholdStore};
