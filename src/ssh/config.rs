//! SSH connection configuration.

use std::fmt;
use std::time::Duration;

/// Upper bound on TCP connect plus authentication.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// SSH connection configuration.
#[derive(Clone)]
pub struct SshConfig {
    /// SSH username.
    pub user: String,

    /// Password for password authentication.
    pub password: String,

    /// Time allowed for connecting and authenticating.
    pub connect_timeout: Duration,

    /// Host key verification policy.
    pub host_key_policy: HostKeyPolicy,
}

/// Host key verification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Accept any host key (insecure, but matches OpenSSH StrictHostKeyChecking=no).
    #[default]
    AcceptAny,
}

impl SshConfig {
    /// Create a new SSH configuration.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            connect_timeout: CONNECT_TIMEOUT,
            host_key_policy: HostKeyPolicy::AcceptAny,
        }
    }
}

impl fmt::Debug for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshConfig")
            .field("user", &self.user)
            .field("password", &"********")
            .field("connect_timeout", &self.connect_timeout)
            .field("host_key_policy", &self.host_key_policy)
            .finish()
    }
}

impl From<&crate::config::AppConfig> for SshConfig {
    fn from(app_config: &crate::config::AppConfig) -> Self {
        Self::new(&app_config.user, &app_config.password)
    }
}
