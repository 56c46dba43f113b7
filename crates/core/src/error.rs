#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A single machine entry violated the snapshot data contract.
    #[error("Data contract violation for machine {machine}: {reason}")]
    DataContract { machine: String, reason: String },
}
