use thiserror::Error;

#[derive(Error, Debug)]
pub enum DockhandError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("SSH connection error: {0}")]
    Connection(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Remote command failed: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSH protocol error: {0}")]
    SshProtocol(#[from] russh::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl DockhandError {
    /// Whether this is one of the classified failure kinds.
    ///
    /// Anything else is reported with its full cause chain.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            DockhandError::Config(_)
                | DockhandError::Connection(_)
                | DockhandError::Transfer(_)
                | DockhandError::Command(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DockhandError>;
