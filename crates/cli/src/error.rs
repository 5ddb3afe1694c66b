use stock_portfolio_core::errors::CoreError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("no data directory: pass --data-dir")]
    NoDataDir,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::NoDataDir => 2,
            Self::Core(_) => 10,
        }
    }
}
