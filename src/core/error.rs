use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("no row in table '{0}' matched the load criteria")]
    NotFound(String),

    #[error("post-load hook rejected the record for table '{0}'")]
    HookRejected(String),

    #[error("unknown capability '{0}'")]
    UnknownCapability(String),

    #[error("capability '{0}' failed to activate")]
    CapabilityFailed(String),

    #[error("field '{0}' is not declared for table '{1}'")]
    UnknownField(String, String),

    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("snapshot serialization failed: {0}")]
    Snapshot(String),

    #[error("execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, RecordError>;
