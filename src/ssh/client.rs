//! SSH client implementation using russh.
//!
//! Provides connection management and password authentication.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::Disconnect;

use crate::error::{DockhandError, Result};
use crate::ssh::config::{HostKeyPolicy, SshConfig};
use crate::ssh::exec::CommandOutput;
use crate::ssh::sftp::SftpClient;

/// SSH client wrapper over russh.
pub struct SshClient {
    session: Handle<ClientHandler>,
    host: String,
}

impl SshClient {
    /// Connect and authenticate, giving up after `config.connect_timeout`.
    pub async fn connect(host: &str, port: u16, config: &SshConfig) -> Result<Self> {
        match tokio::time::timeout(config.connect_timeout, Self::establish(host, port, config))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DockhandError::Connection(format!(
                "Timed out after {}s connecting to {}:{}",
                config.connect_timeout.as_secs(),
                host,
                port
            ))),
        }
    }

    async fn establish(host: &str, port: u16, config: &SshConfig) -> Result<Self> {
        let russh_config = Arc::new(client::Config {
            // Send keep-alive every 15 seconds
            keepalive_interval: Some(std::time::Duration::from_secs(15)),
            // Allow up to 4 missed keep-alives before disconnect (60 seconds)
            keepalive_max: 4,
            ..Default::default()
        });

        // Resolve inside the connect timeout
        let addr = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| DockhandError::Connection(format!("Failed to resolve {}: {}", host, e)))?
            .next()
            .ok_or_else(|| DockhandError::Connection(format!("No address found for {}", host)))?;

        let handler = ClientHandler {
            host_key_policy: config.host_key_policy,
        };

        let mut session = client::connect(russh_config, addr, handler)
            .await
            .map_err(|e| DockhandError::Connection(format!("Connection to {} failed: {}", addr, e)))?;

        Self::authenticate(&mut session, host, config).await?;

        tracing::debug!("Authenticated as {}@{}", config.user, host);

        Ok(Self {
            session,
            host: host.to_string(),
        })
    }

    async fn authenticate(
        session: &mut Handle<ClientHandler>,
        host: &str,
        config: &SshConfig,
    ) -> Result<()> {
        let accepted = session
            .authenticate_password(&config.user, &config.password)
            .await
            .map_err(|e| DockhandError::Connection(format!("Authentication failed: {}", e)))?;

        if accepted {
            Ok(())
        } else {
            Err(DockhandError::Connection(format!(
                "Authentication rejected for {}@{}",
                config.user, host
            )))
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Execute a command on the remote host (non-interactive).
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        crate::ssh::exec::exec_command(&self.session, command).await
    }

    /// Get an SFTP client for file transfers.
    pub async fn sftp(&self) -> Result<SftpClient> {
        SftpClient::new(&self.session).await
    }

    /// Upload one file over a short-lived SFTP session.
    ///
    /// The local file is read first, so an unreadable file fails before any
    /// SFTP channel is opened.
    pub async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let content = crate::ssh::sftp::read_local(local_path).await?;
        let sftp = self.sftp().await?;
        let result = sftp.write_file(remote_path, &content).await;
        if let Err(e) = sftp.close().await {
            tracing::debug!("Ignoring SFTP close failure: {}", e);
        }
        result
    }

    /// Send a disconnect to the server.
    pub async fn disconnect(&self) -> Result<()> {
        self.session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}

/// Client handler for russh connection callbacks.
pub struct ClientHandler {
    pub host_key_policy: HostKeyPolicy,
}

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = DockhandError;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh_keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_policy {
            HostKeyPolicy::AcceptAny => Ok(true),
        }
    }
}
