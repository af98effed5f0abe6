//! Table columns the user can hide.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ClientError;
use crate::local_store::{HIDDEN_COLUMNS_KEY, LocalStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    InvitedBy,
    Address,
    Contact,
    SaveTheDate,
    Invitation,
    PlusOne,
    Tisch,
    Rsvp,
    Table,
    Dietary,
    Notes,
}

impl Column {
    pub const ALL: [Self; 11] = [
        Self::InvitedBy,
        Self::Address,
        Self::Contact,
        Self::SaveTheDate,
        Self::Invitation,
        Self::PlusOne,
        Self::Tisch,
        Self::Rsvp,
        Self::Table,
        Self::Dietary,
        Self::Notes,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvitedBy => "invitedBy",
            Self::Address => "address",
            Self::Contact => "contact",
            Self::SaveTheDate => "saveTheDate",
            Self::Invitation => "invitation",
            Self::PlusOne => "plusOne",
            Self::Tisch => "tisch",
            Self::Rsvp => "rsvp",
            Self::Table => "table",
            Self::Dietary => "dietary",
            Self::Notes => "notes",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

/// Persisted set of hidden columns.
pub struct HiddenColumns {
    hidden: BTreeSet<Column>,
    store: Arc<dyn LocalStore>,
}

impl HiddenColumns {
    /// Load from storage. Unknown names and malformed values are dropped.
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let hidden = store
            .get(HIDDEN_COLUMNS_KEY)
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|value| value.as_array().cloned())
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(Column::parse)
                    .collect()
            })
            .unwrap_or_default();
        Self { hidden, store }
    }

    #[must_use]
    pub fn is_hidden(&self, column: Column) -> bool {
        self.hidden.contains(&column)
    }

    #[must_use]
    pub fn visible(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.hidden.contains(c))
            .collect()
    }

    /// Flip a column and persist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the set cannot be written.
    pub fn toggle(&mut self, column: Column) -> Result<bool, ClientError> {
        let hidden = if self.hidden.remove(&column) {
            false
        } else {
            self.hidden.insert(column);
            true
        };
        self.persist()?;
        Ok(hidden)
    }

    /// Show every column and persist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the set cannot be written.
    pub fn show_all(&mut self) -> Result<(), ClientError> {
        self.hidden.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), ClientError> {
        let names: Vec<&str> = self.hidden.iter().map(|c| c.as_str()).collect();
        self.store
            .set(HIDDEN_COLUMNS_KEY, &serde_json::to_string(&names)?)
    }
}
