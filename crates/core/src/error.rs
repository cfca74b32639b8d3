use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// Every variant is per-request and recoverable by the caller correcting
/// input; the HTTP layer maps variants to status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Validation error for a field name that is not in an entity's
    /// allow-list. The offending name is always included so the caller
    /// can see exactly what was rejected.
    pub fn unknown_field(entity: &str, field: &str) -> Self {
        CoreError::Validation(format!("unknown field `{field}` for {entity}"))
    }
}
