//! Control-plane invocation.

use std::sync::Arc;

use tracing::debug;

use super::{ClusterConnection, CommandReply};
use crate::command::{CommandDescriptor, ResultBuffer};
use crate::deadline::DeadlineGuard;
use crate::error::Result;

/// Issues commands against the cluster's administrative endpoint.
pub struct ControlPlaneInvoker;

impl ControlPlaneInvoker {
    /// Send `descriptor` to the control plane, bounded by `deadline_secs`.
    ///
    /// Returns the empty buffer both when the deadline elapses locally and
    /// when the cluster replies non-zero (the command is not supported by
    /// this cluster version). Callers must treat both as absence of data,
    /// not as an error. A transport-level `Err` propagates: it is fatal to
    /// the run.
    pub async fn invoke(
        conn: &Arc<dyn ClusterConnection>,
        descriptor: &CommandDescriptor,
        deadline_secs: u64,
    ) -> Result<ResultBuffer> {
        let payload = descriptor.to_wire();
        let conn = Arc::clone(conn);

        let reply = DeadlineGuard::run(
            move || conn.control_command(&payload),
            deadline_secs,
            // absence of a timely reply reads as an empty successful reply
            Ok(CommandReply::default()),
        )
        .await?;

        if reply.code != 0 {
            debug!(
                prefix = descriptor.prefix(),
                code = reply.code,
                "command not supported by this cluster version; recording no data"
            );
            return Ok(ResultBuffer::empty());
        }

        Ok(ResultBuffer::new(reply.body))
    }
}
