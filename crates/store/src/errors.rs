use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("corrupt database file {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl StoreError {
    pub fn unknown(resource: &str) -> Self { Self::UnknownResource(resource.to_string()) }

    pub fn duplicate_id(resource: &str, id: &str) -> Self {
        Self::Conflict(format!("{} already has a record with id {}", resource, id))
    }
}
