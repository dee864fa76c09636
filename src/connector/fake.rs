//! Recording [`RemoteSession`] used by flow tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::connector::ssh::RemoteSession;
use crate::error::{DockhandError, Result};
use crate::ssh::CommandOutput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Exec(String),
    Upload(PathBuf, String),
    Close,
}

#[derive(Default)]
pub struct FakeSession {
    calls: Arc<Mutex<Vec<Call>>>,
    outputs: Mutex<VecDeque<CommandOutput>>,
    fail_upload: bool,
    fail_exec: bool,
    fail_close: bool,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output returned by the next `exec`.
    pub fn with_output(self, output: CommandOutput) -> Self {
        self.outputs.lock().unwrap().push_back(output);
        self
    }

    pub fn fail_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn fail_exec(mut self) -> Self {
        self.fail_exec = true;
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Shared view of recorded calls that outlives the session.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn exec_commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Exec(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RemoteSession for FakeSession {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Exec(command.to_string()));
        if self.fail_exec {
            return Err(DockhandError::Command(format!("channel closed: {}", command)));
        }
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Upload(
            local_path.to_path_buf(),
            remote_path.to_string(),
        ));
        if self.fail_upload {
            return Err(DockhandError::Transfer(format!(
                "Permission denied: {}",
                remote_path
            )));
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Close);
        if self.fail_close {
            return Err(DockhandError::Connection("already closed".into()));
        }
        Ok(())
    }
}
