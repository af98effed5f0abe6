//! Guest list manager settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuestListConfig {
    /// Shared password that unlocks the manager. Compared in plaintext.
    #[serde(default)]
    pub password: String,
}

impl GuestListConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.password.trim().is_empty()
    }
}
