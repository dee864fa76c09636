//! Pure Rust SSH plumbing for dockhand.
//!
//! - [`client`] - connection and password authentication
//! - [`exec`] - buffered remote command execution
//! - [`sftp`] - file upload

mod client;
pub mod config;
mod exec;
mod sftp;

pub use client::SshClient;
pub use config::SshConfig;
pub use exec::CommandOutput;
