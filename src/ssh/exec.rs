//! Remote command execution.
//!
//! Provides non-interactive command execution with stdout/stderr capture.

use russh::client::Handle;
use russh::ChannelMsg;

use crate::error::{DockhandError, Result};
use crate::ssh::client::ClientHandler;

/// Output from a remote command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Exit status reported by the server, if any.
    ///
    /// Recorded for diagnostics only; callers judge commands by their text.
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status: None,
        }
    }
}

/// Execute a command on the remote host and buffer all of its output.
///
/// The command string is sent as-is. Blocks until the server closes the
/// channel; there is no time limit.
pub async fn exec_command(session: &Handle<ClientHandler>, command: &str) -> Result<CommandOutput> {
    let mut channel = session
        .channel_open_session()
        .await
        .map_err(|e| DockhandError::Command(format!("Failed to open channel: {}", e)))?;

    channel
        .exec(true, command.as_bytes())
        .await
        .map_err(|e| DockhandError::Command(format!("Failed to execute '{}': {}", command, e)))?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_status = None;

    // Exit status may arrive after EOF, so read until the channel closes.
    loop {
        match channel.wait().await {
            Some(ChannelMsg::Data { data }) => {
                stdout.extend_from_slice(&data);
            }
            Some(ChannelMsg::ExtendedData { data, ext }) => {
                if ext == 1 {
                    stderr.extend_from_slice(&data);
                }
            }
            Some(ChannelMsg::ExitStatus { exit_status: code }) => {
                exit_status = Some(code);
            }
            Some(ChannelMsg::Close) | None => {
                break;
            }
            _ => {}
        }
    }

    tracing::debug!(command, ?exit_status, "remote command finished");

    let mut output = CommandOutput::new(
        String::from_utf8_lossy(&stdout),
        String::from_utf8_lossy(&stderr),
    );
    output.exit_status = exit_status;
    Ok(output)
}
