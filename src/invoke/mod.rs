//! Deadline-bounded remote invocation.
//!
//! [`ControlPlaneInvoker`] issues commands against the cluster's
//! administrative endpoint; [`TargetInvoker`] addresses one member and
//! classifies the outcome so a sweep over many members can record individual
//! failures and keep going. Both bound every call with
//! [`DeadlineGuard`](crate::deadline::DeadlineGuard).

mod control;
mod target;

pub use control::ControlPlaneInvoker;
pub use target::TargetInvoker;

use crate::error::Result;

/// One reply from the cluster wire.
#[derive(Debug, Clone, Default)]
pub struct CommandReply {
    /// Status code; zero on success, negated errno on failure.
    pub code: i32,
    /// Response body; structure depends on the requested output format.
    pub body: Vec<u8>,
    /// Diagnostic text accompanying a failure.
    pub status: String,
}

impl CommandReply {
    /// A successful reply carrying `body`.
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            code: 0,
            body,
            status: String::new(),
        }
    }

    /// A failed reply with a status code and diagnostic text.
    pub fn error(code: i32, status: impl Into<String>) -> Self {
        Self {
            code,
            body: Vec::new(),
            status: status.into(),
        }
    }
}

/// Connection handle to the cluster, implemented by the embedding tool.
///
/// Both calls block until the cluster replies; the invokers bound them with
/// a deadline. An `Err` from either call is a connection-level failure
/// (unreachable control plane, bad credentials) and is fatal to the whole
/// run; command-level failures ride inside [`CommandReply`].
pub trait ClusterConnection: Send + Sync {
    /// Issue a command against the control plane.
    fn control_command(&self, payload: &str) -> Result<CommandReply>;

    /// Issue a command against one addressable cluster member.
    fn target_command(&self, target: &str, payload: &str) -> Result<CommandReply>;
}
