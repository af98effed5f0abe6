//! Shared-password gate in front of the guest list.
//!
//! This is a convenience lock, not authentication: the password is compared
//! in plain text and the unlocked flag lives in local storage.

use std::sync::Arc;

use crate::error::ClientError;
use crate::local_store::{AUTH_KEY, LocalStore};

const UNLOCKED: &str = "true";

pub struct PasswordGate {
    password: String,
    store: Arc<dyn LocalStore>,
}

impl PasswordGate {
    pub fn new(password: impl Into<String>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            password: password.into(),
            store,
        }
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.store.get(AUTH_KEY).as_deref() == Some(UNLOCKED)
    }

    /// Compare the trimmed input against the password and remember success.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::IncorrectPassword` on mismatch. A failure to
    /// persist the flag is logged, not returned.
    pub fn unlock(&self, input: &str) -> Result<(), ClientError> {
        if input.trim() != self.password {
            return Err(ClientError::IncorrectPassword);
        }
        if let Err(error) = self.store.set(AUTH_KEY, UNLOCKED) {
            tracing::warn!(%error, "unable to persist guest list auth flag");
        }
        Ok(())
    }

    pub fn lock(&self) {
        if let Err(error) = self.store.remove(AUTH_KEY) {
            tracing::warn!(%error, "unable to clear guest list auth flag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;

    fn gate() -> PasswordGate {
        PasswordGate::new("macbeth", Arc::new(MemoryStore::new()))
    }

    #[test]
    fn wrong_password_stays_locked() {
        let gate = gate();
        let err = gate.unlock("hamlet").unwrap_err();
        assert!(matches!(err, ClientError::IncorrectPassword));
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn input_is_trimmed() {
        let gate = gate();
        gate.unlock("  macbeth \n").unwrap();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn lock_clears_flag() {
        let gate = gate();
        gate.unlock("macbeth").unwrap();
        gate.lock();
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn unlocked_flag_survives_new_gate() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        PasswordGate::new("macbeth", store.clone())
            .unlock("macbeth")
            .unwrap();
        assert!(PasswordGate::new("macbeth", store).is_unlocked());
    }
}
