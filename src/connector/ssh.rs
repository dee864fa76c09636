//! Remote session abstraction and lifetime management.

use std::path::Path;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::Result;
use crate::ssh::{CommandOutput, SshClient, SshConfig};

/// An authenticated connection to one host.
///
/// Neither `exec` nor `upload` is time-bounded: a remote command that never
/// finishes hangs the caller. Only connecting is limited by a timeout.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Run `command` verbatim and return its fully buffered output.
    async fn exec(&self, command: &str) -> Result<CommandOutput>;

    /// Copy a local file to `remote_path`, overwriting any existing file.
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()>;

    /// Tear the connection down.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl RemoteSession for SshClient {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        tracing::debug!("[{}] exec: {}", self.host(), command);
        SshClient::exec(self, command).await
    }

    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        tracing::debug!(
            "[{}] upload: {} -> {}",
            self.host(),
            local_path.display(),
            remote_path
        );
        SshClient::upload(self, local_path, remote_path).await
    }

    async fn close(&self) -> Result<()> {
        self.disconnect().await
    }
}

/// Lifecycle of a session as seen by a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Connected,
    Succeeded,
    Failed,
    Closed,
}

/// Open an SSH session using the server settings in `config`.
///
/// `config` must already have passed [`AppConfig::validate`].
pub async fn connect(config: &AppConfig) -> Result<SshClient> {
    tracing::debug!(state = ?SessionState::Unconnected, "connecting to {}:{}", config.host, config.port);
    let ssh_config = SshConfig::from(config);
    SshClient::connect(&config.host, config.port, &ssh_config).await
}

/// Owns a connected session and guarantees it is closed.
///
/// Call [`SessionGuard::finish`] with the flow's outcome to close the session
/// and hand the outcome back. If the guard is dropped without `finish`, no
/// disconnect is sent; the session handle is dropped and the transport goes
/// with it.
pub struct SessionGuard<S: RemoteSession> {
    session: S,
    state: SessionState,
}

impl<S: RemoteSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        tracing::debug!(state = ?SessionState::Connected, "session opened");
        Self {
            session,
            state: SessionState::Connected,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Record the outcome, close the session once, and return the outcome.
    ///
    /// A failed close is logged, never allowed to mask the outcome.
    pub async fn finish<T>(mut self, outcome: Result<T>) -> Result<T> {
        self.state = if outcome.is_ok() {
            SessionState::Succeeded
        } else {
            SessionState::Failed
        };
        tracing::debug!(state = ?self.state, "flow finished");

        if let Err(e) = self.session.close().await {
            tracing::warn!("Failed to close session cleanly: {}", e);
        }
        self.state = SessionState::Closed;
        tracing::debug!(state = ?self.state, "session closed");

        outcome
    }
}

impl<S: RemoteSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if self.state() != SessionState::Closed {
            tracing::debug!(state = ?self.state, "session dropped without finish; dropping connection handle");
        }
    }
}
