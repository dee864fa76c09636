//! Remote session plumbing.
//!
//! Flows talk to a [`ssh::RemoteSession`] rather than to russh directly,
//! so they can run against a recording fake in tests.

pub mod ssh;

#[cfg(test)]
pub mod fake;
