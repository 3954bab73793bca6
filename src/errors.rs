use thiserror::Error;

use crate::strongbox::kinds::ActionKind;

#[derive(Debug, Error)]
pub enum HelperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Host UI error: {0}")]
    Host(String),

    #[error("UI node unavailable: {0}")]
    NodeUnavailable(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Click cap exceeded: {action} still present after {clicks} clicks")]
    ClickCapExceeded { action: ActionKind, clicks: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type HelperResult<T> = Result<T, HelperError>;
