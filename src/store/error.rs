//! Store Errors

/// Unexpected failures of the persistent store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer satisfies the domain rules
    #[error("Invalid stored expense {id}: {reason}")]
    CorruptRecord { id: uuid::Uuid, reason: String },
}

impl StoreError {
    pub fn corrupt(id: uuid::Uuid, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            id,
            reason: reason.to_string(),
        }
    }
}
