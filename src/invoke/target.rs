//! Per-member invocation with outcome classification.

use std::sync::Arc;

use tracing::debug;

use super::{ClusterConnection, CommandReply};
use crate::command::{CommandDescriptor, InvocationOutcome, ResultBuffer, REMOTE_TIMEOUT_CODE};
use crate::deadline::DeadlineGuard;
use crate::error::Result;

/// Issues commands against one addressable cluster member.
///
/// Per-member commands are expected to fail individually: a sweep over
/// dozens of members must keep going when a handful are transiently
/// unreachable. The invoker therefore never turns a command failure into an
/// `Err`; it classifies every reply into an [`InvocationOutcome`] the caller
/// can branch on and record.
pub struct TargetInvoker;

impl TargetInvoker {
    /// Send `descriptor` to `target`, bounded by `deadline_secs`.
    pub async fn invoke_on_target(
        conn: &Arc<dyn ClusterConnection>,
        target: &str,
        descriptor: &CommandDescriptor,
        deadline_secs: u64,
    ) -> Result<InvocationOutcome> {
        let payload = descriptor.to_wire();
        let conn = Arc::clone(conn);
        let addressed = target.to_string();

        let reply = DeadlineGuard::run(
            move || Some(conn.target_command(&addressed, &payload)),
            deadline_secs,
            None,
        )
        .await;

        let reply = match reply {
            None => {
                debug!(member = target, "no reply within the local deadline");
                return Ok(InvocationOutcome::TimedOut);
            }
            Some(reply) => reply?,
        };

        Ok(Self::classify(target, reply))
    }

    fn classify(target: &str, reply: CommandReply) -> InvocationOutcome {
        match reply.code {
            0 => InvocationOutcome::Success(ResultBuffer::new(reply.body)),
            REMOTE_TIMEOUT_CODE => {
                debug!(member = target, "command timed out at the remote end");
                InvocationOutcome::Failed {
                    code: REMOTE_TIMEOUT_CODE,
                    message: "ETIMEDOUT".to_string(),
                    raw_output: ResultBuffer::new(reply.body),
                }
            }
            code => InvocationOutcome::Failed {
                code,
                message: reply.status,
                raw_output: ResultBuffer::new(reply.body),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::OutputFormat;

    struct Scripted(CommandReply);

    impl ClusterConnection for Scripted {
        fn control_command(&self, _payload: &str) -> Result<CommandReply> {
            unimplemented!("target tests never address the control plane")
        }

        fn target_command(&self, _target: &str, _payload: &str) -> Result<CommandReply> {
            Ok(self.0.clone())
        }
    }

    async fn outcome_for(reply: CommandReply) -> InvocationOutcome {
        let conn: Arc<dyn ClusterConnection> = Arc::new(Scripted(reply));
        let descriptor =
            CommandDescriptor::new("bluestore allocator score block", OutputFormat::Plain);
        TargetInvoker::invoke_on_target(&conn, "member.0", &descriptor, 5)
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_status_zero_is_success() {
        let outcome = outcome_for(CommandReply::ok(b"0.125".to_vec())).await;
        assert_eq!(
            outcome,
            InvocationOutcome::Success(ResultBuffer::from("0.125"))
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remote_timeout_maps_to_etimedout() {
        let outcome = outcome_for(CommandReply::error(-110, "osd op timed out")).await;
        assert_eq!(
            outcome,
            InvocationOutcome::Failed {
                code: -110,
                message: "ETIMEDOUT".to_string(),
                raw_output: ResultBuffer::empty(),
            }
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_other_nonzero_keeps_code_and_diagnostic() {
        let outcome = outcome_for(CommandReply::error(5, "input/output error")).await;
        assert_eq!(
            outcome,
            InvocationOutcome::Failed {
                code: 5,
                message: "input/output error".to_string(),
                raw_output: ResultBuffer::empty(),
            }
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_local_deadline_yields_timed_out() {
        struct Stalled;
        impl ClusterConnection for Stalled {
            fn control_command(&self, _p: &str) -> Result<CommandReply> {
                unimplemented!()
            }
            fn target_command(&self, _t: &str, _p: &str) -> Result<CommandReply> {
                std::thread::sleep(std::time::Duration::from_secs(30));
                Ok(CommandReply::ok(Vec::new()))
            }
        }
        let conn: Arc<dyn ClusterConnection> = Arc::new(Stalled);
        let descriptor = CommandDescriptor::new("perf dump", OutputFormat::Json);
        let outcome = TargetInvoker::invoke_on_target(&conn, "member.9", &descriptor, 1)
            .await
            .unwrap();
        assert_eq!(outcome, InvocationOutcome::TimedOut);
    }
}
