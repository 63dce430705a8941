use crate::model::{EntityKind, Id};

/// Error taxonomy for the mapping/categorization/write pipeline.
///
/// Everything detected before a transaction opens (`MappingNotFound`,
/// `ValueNotMapped`, `Validation`, `NotFound`) is returned immediately.
/// Any failure once a transaction has started surfaces as a single
/// `TransactionFailure` for the whole aggregate, never per-bucket errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no active enum mapping for '{enum_name}'")]
    MappingNotFound { enum_name: String },

    #[error("value '{value}' is not mapped for enum '{enum_name}'")]
    ValueNotMapped { enum_name: String, value: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: Id },

    #[error("aggregate write failed: {0}")]
    TransactionFailure(#[source] anyhow::Error),

    /// Collaborator-side sync failure. Never rolls back the local write;
    /// the sync side reconciles later. Reserved for the CRM sync
    /// collaborator; nothing in this crate constructs it.
    #[error("external sync failed: {0}")]
    ExternalSyncFailure(String),

    /// Infrastructure failure outside a write transaction (registry reads,
    /// existence checks).
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }
}
