pub mod check_logs;
pub mod config;
pub mod deploy;
