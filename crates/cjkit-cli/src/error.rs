use cjkit_core::ApiError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Configuration and usage problems exit 2, upstream API failures 3.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Api(ApiError::Config { .. } | ApiError::InvalidRequest { .. }) => 2,
            Self::Api(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
