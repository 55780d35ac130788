use table_core::ConfigError;

/// Failure while preparing a session
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Failed to load {name}: {reason}")]
    Asset { name: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Session is already set up")]
    AlreadySetUp,
}

impl SetupError {
    pub fn asset(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Asset {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Failure on the peer link
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Peer disconnected")]
    Disconnected,

    #[error("Malformed frame: {0}")]
    Codec(#[from] postcard::Error),
}
