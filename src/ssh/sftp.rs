//! SFTP file transfer implementation.

use std::path::Path;

use russh::client::Handle;
use russh_sftp::client::SftpSession;
use tokio::io::AsyncWriteExt;

use crate::error::{DockhandError, Result};
use crate::ssh::client::ClientHandler;

/// Read the whole local file before anything is opened remotely.
pub(crate) async fn read_local(local_path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(local_path).await.map_err(|e| {
        DockhandError::Transfer(format!(
            "Failed to read local file {}: {}",
            local_path.display(),
            e
        ))
    })
}

/// SFTP client for file transfers.
pub struct SftpClient {
    session: SftpSession,
}

impl SftpClient {
    /// Create a new SFTP client from an SSH session.
    pub async fn new(ssh_session: &Handle<ClientHandler>) -> Result<Self> {
        let channel = ssh_session
            .channel_open_session()
            .await
            .map_err(|e| DockhandError::Transfer(format!("Failed to open SFTP channel: {}", e)))?;

        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| {
                DockhandError::Transfer(format!("Failed to request SFTP subsystem: {}", e))
            })?;

        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| DockhandError::Transfer(format!("Failed to initialize SFTP: {}", e)))?;

        Ok(Self { session: sftp })
    }

    /// Write `content` to `remote_path`, replacing whatever is there.
    pub async fn write_file(&self, remote_path: &str, content: &[u8]) -> Result<()> {
        // `create` opens with truncate, so existing files are overwritten.
        let mut remote_file = self.session.create(remote_path).await.map_err(|e| {
            DockhandError::Transfer(format!("Failed to create remote file {}: {}", remote_path, e))
        })?;

        remote_file.write_all(content).await.map_err(|e| {
            DockhandError::Transfer(format!("Failed to write to {}: {}", remote_path, e))
        })?;

        remote_file.shutdown().await.map_err(|e| {
            DockhandError::Transfer(format!("Failed to close {}: {}", remote_path, e))
        })?;

        tracing::debug!("Wrote {} bytes to {}", content.len(), remote_path);

        Ok(())
    }

    /// End the SFTP subsystem session.
    pub async fn close(self) -> Result<()> {
        self.session
            .close()
            .await
            .map_err(|e| DockhandError::Transfer(format!("Failed to close SFTP session: {}", e)))
    }
}
