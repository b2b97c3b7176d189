use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("The '{0}' command is required but was not found on this system.")]
    ToolNotFound(String),
    #[error("Failed to collect port information: {0}")]
    CollectionFailed(String),
    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
