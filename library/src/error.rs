use thiserror::Error;

/// Construction-time failures.
///
/// Runtime misuse of a built instance (calls after `delete`, bad enum input,
/// unknown names) never produces an `ObjectError`; it is logged and answered
/// with a sentinel instead.
#[derive(Error, Debug)]
pub enum ObjectError {
    #[error("No setter for field '{name}' with descriptor type '{kind}'")]
    UnsupportedDescriptor { name: String, kind: String },
    #[error("Invalid field descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("The object capability was not installed on '{0}'")]
    MissingObjectCapability(String),
    #[error("Output ports declared on '{0}' without an update operation")]
    MissingUpdate(String),
    #[error("Operation '{0}' is already defined")]
    DuplicateOperation(String),
    #[error("No constructor registered under '{0}'")]
    UnknownConstructor(String),
    #[error("Update failed: {0}")]
    Update(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
