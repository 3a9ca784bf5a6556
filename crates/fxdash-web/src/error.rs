use thiserror::Error;

/// Server startup errors mapped to exit codes.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("brokerage setup failed: {0}")]
    Broker(#[from] fxdash_core::HttpError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WebError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Broker(_) => 3,
            Self::Logging(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
