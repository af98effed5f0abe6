//! Storage error types.

/// Errors from the household store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying object store operation failed.
    #[error("{0}")]
    ObjectStore(#[from] object_store::Error),

    /// A key could not be turned into an object path.
    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// A stored object was not valid JSON.
    #[error("malformed JSON in '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectStore(object_store::Error::NotFound { .. }))
    }

    /// Whether the store refused access (HTTP 403 from S3).
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::ObjectStore(object_store::Error::PermissionDenied { .. })
        )
    }

    /// Machine-readable identifier of the underlying failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ObjectStore(error) => match error {
                object_store::Error::NotFound { .. } => "NotFound",
                object_store::Error::PermissionDenied { .. } => "PermissionDenied",
                object_store::Error::Unauthenticated { .. } => "Unauthenticated",
                object_store::Error::AlreadyExists { .. } => "AlreadyExists",
                object_store::Error::Precondition { .. } => "Precondition",
                object_store::Error::NotImplemented => "NotImplemented",
                object_store::Error::Generic { .. } => "Generic",
                _ => "ObjectStoreError",
            },
            Self::InvalidKey { .. } => "InvalidKey",
            Self::Malformed { .. } => "MalformedObject",
            Self::Encode(_) => "EncodeError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_forbidden() {
        let err = StoreError::from(object_store::Error::PermissionDenied {
            path: "guest-list/index.json".into(),
            source: "denied".into(),
        });
        assert!(err.is_forbidden());
        assert!(!err.is_not_found());
        assert_eq!(err.code(), "PermissionDenied");
    }

    #[test]
    fn generic_error_code() {
        let err = StoreError::from(object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        });
        assert!(!err.is_forbidden());
        assert_eq!(err.code(), "Generic");
    }
}
