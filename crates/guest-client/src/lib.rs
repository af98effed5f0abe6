//! # guest-client
//!
//! Offline-first client for the guest list.
//!
//! - `HouseholdCache`: the canonical list, written through to local storage
//! - `SyncQueue`: dirty ids flushed to `/guest-list` after a quiet period
//! - `GuestListManager`: mutations, expansion state and remote refresh
//! - `ViewPrefsStore`: filters, sort and expanded rows in a size-capped cookie
//!   with a local storage mirror
//! - `PasswordGate` and `HiddenColumns`: small persisted UI flags
//!
//! Timers run off an injected [`Clock`] and are advanced by calling `tick`,
//! so the host owns scheduling.

pub mod auth;
pub mod cache;
pub mod clock;
pub mod columns;
pub mod cookies;
pub mod dirty;
pub mod error;
pub mod local_store;
pub mod manager;
pub mod remote;
pub mod sync_queue;
pub mod view_prefs;

pub use auth::PasswordGate;
pub use cache::HouseholdCache;
pub use clock::{Clock, Debouncer, ManualClock, SystemClock};
pub use columns::{Column, HiddenColumns};
pub use cookies::{CookieJar, CookieOptions};
pub use dirty::{DirtyKind, DirtySet};
pub use error::ClientError;
pub use local_store::{FileStore, LocalStore, MemoryStore};
pub use manager::GuestListManager;
pub use remote::{HttpSyncClient, SyncApi};
pub use sync_queue::{SyncQueue, SyncStatus};
pub use view_prefs::{EncodingStrategy, ViewPrefs, ViewPrefsStore};
