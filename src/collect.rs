//! Sequential collection driver.
//!
//! Drives the invokers to populate a labeled set of result buffers the
//! embedding tool persists as files. Everything runs one command at a time;
//! the only concurrency lives inside the deadline guard. Per-target
//! failures are recorded and the sweep continues; connection-level and
//! redaction failures propagate and abort the run.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::command::{CommandDescriptor, InvocationOutcome, ResultBuffer, REMOTE_TIMEOUT_CODE};
use crate::error::Result;
use crate::invoke::{ClusterConnection, ControlPlaneInvoker, TargetInvoker};
use crate::redact::{RedactionEngine, RedactionRule};

/// Entry recorded for a member that did not answer within the deadline.
const LOCAL_TIMEOUT_NOTE: &str = "timed out locally";

/// Counts for one per-target sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerTargetSummary {
    /// Members that replied with status zero.
    pub succeeded: usize,
    /// Members whose reply never arrived within the local deadline.
    pub timed_out: usize,
    /// Members reporting a remote-end timeout (status −110).
    pub remote_timed_out: usize,
    /// Members reporting any other non-zero status.
    pub failed: usize,
}

impl PerTargetSummary {
    /// Total members swept.
    pub fn total(&self) -> usize {
        self.succeeded + self.timed_out + self.remote_timed_out + self.failed
    }
}

/// Metadata describing one collection run.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionMeta {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of labeled entries collected.
    pub entries: usize,
    /// Sweep summaries keyed by label prefix.
    pub per_target: BTreeMap<String, PerTargetSummary>,
}

/// Labeled result buffers produced by one collection run.
///
/// The embedding tool persists each entry as a file named after its label
/// and may serialize [`CollectionMeta`] alongside them.
#[derive(Debug)]
pub struct Collection {
    files: BTreeMap<String, ResultBuffer>,
    meta: CollectionMeta,
}

impl Collection {
    fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            meta: CollectionMeta {
                started_at: Utc::now(),
                finished_at: None,
                entries: 0,
                per_target: BTreeMap::new(),
            },
        }
    }

    /// Record a buffer under a caller-chosen label.
    pub fn insert(&mut self, label: impl Into<String>, buffer: ResultBuffer) {
        self.files.insert(label.into(), buffer);
    }

    pub fn get(&self, label: &str) -> Option<&ResultBuffer> {
        self.files.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResultBuffer)> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn meta(&self) -> &CollectionMeta {
        &self.meta
    }
}

/// Drives command invocation and redaction for one collection run.
pub struct Collector {
    conn: Arc<dyn ClusterConnection>,
    deadline_secs: u64,
    collection: Collection,
}

impl Collector {
    /// Create a collector over an established cluster connection.
    pub fn new(conn: Arc<dyn ClusterConnection>, deadline_secs: u64) -> Self {
        Self {
            conn,
            deadline_secs,
            collection: Collection::new(),
        }
    }

    /// Invoke a control-plane command and stash the result under `label`.
    pub async fn collect(&mut self, label: &str, descriptor: &CommandDescriptor) -> Result<()> {
        let buffer =
            ControlPlaneInvoker::invoke(&self.conn, descriptor, self.deadline_secs).await?;
        if buffer.is_empty() {
            info!(label, prefix = descriptor.prefix(), "no data; recording empty entry");
        }
        self.collection.insert(label, buffer);
        Ok(())
    }

    /// Like [`collect`](Self::collect), but the result is redacted before it
    /// is stashed. A redaction failure aborts the run.
    pub async fn collect_redacted(
        &mut self,
        label: &str,
        descriptor: &CommandDescriptor,
        is_config_file: bool,
        rules: &[RedactionRule],
    ) -> Result<()> {
        let buffer =
            ControlPlaneInvoker::invoke(&self.conn, descriptor, self.deadline_secs).await?;
        let redacted =
            RedactionEngine::redact(&buffer, descriptor.format(), is_config_file, rules)?;
        self.collection.insert(label, redacted);
        Ok(())
    }

    /// Sweep a command over `targets`, one at a time.
    ///
    /// Each member's entry is stored as `{label_prefix}.{target}`. A member
    /// that fails or times out gets its classification message recorded as a
    /// placeholder, so the bundle shows why the value is missing, and the
    /// sweep continues. Only a connection-level failure aborts.
    pub async fn collect_per_target(
        &mut self,
        label_prefix: &str,
        targets: &[String],
        descriptor_for: impl Fn(&str) -> CommandDescriptor,
    ) -> Result<PerTargetSummary> {
        let mut summary = PerTargetSummary::default();

        for target in targets {
            let descriptor = descriptor_for(target);
            let outcome = TargetInvoker::invoke_on_target(
                &self.conn,
                target,
                &descriptor,
                self.deadline_secs,
            )
            .await?;

            let label = format!("{label_prefix}.{target}");
            match outcome {
                InvocationOutcome::Success(buffer) => {
                    summary.succeeded += 1;
                    self.collection.insert(label, buffer);
                }
                InvocationOutcome::TimedOut => {
                    warn!(member = %target, "no reply within deadline; recording placeholder");
                    summary.timed_out += 1;
                    self.collection.insert(label, ResultBuffer::from(LOCAL_TIMEOUT_NOTE));
                }
                InvocationOutcome::Failed { code, message, .. } => {
                    if code == REMOTE_TIMEOUT_CODE {
                        summary.remote_timed_out += 1;
                    } else {
                        summary.failed += 1;
                    }
                    warn!(
                        member = %target,
                        code,
                        %message,
                        "command failed; recording placeholder"
                    );
                    self.collection.insert(label, ResultBuffer::from(message.as_str()));
                }
            }
        }

        info!(
            prefix = label_prefix,
            succeeded = summary.succeeded,
            timed_out = summary.timed_out,
            remote_timed_out = summary.remote_timed_out,
            failed = summary.failed,
            "per-target sweep finished"
        );
        self.collection
            .meta
            .per_target
            .insert(label_prefix.to_string(), summary);
        Ok(summary)
    }

    /// Finish the run, stamping the metadata, and hand back the collection.
    pub fn finish(mut self) -> Collection {
        self.collection.meta.finished_at = Some(Utc::now());
        self.collection.meta.entries = self.collection.files.len();
        self.collection
    }
}
