//! stor-assist: diagnostics collection core for distributed storage clusters.
//!
//! A diagnostic bundle collector issues administrative commands against a
//! cluster's control plane and against individual members, then hands the
//! gathered output to third parties. This crate is the part that makes such
//! a run reliable and safe to share:
//!
//! - [`deadline`]: a guard that never lets a call block past its deadline,
//!   even when the underlying client library has no cancellation hook.
//! - [`invoke`]: deadline-bounded invocation against the control plane and
//!   against single members, with per-member failures classified so a sweep
//!   can record them and keep going.
//! - [`redact`]: replaces credential-bearing values in command output with a
//!   fixed placeholder, preserving column alignment in tabular text and
//!   record shape in structured output.
//! - [`collect`]: the sequential driver tying the above together into a
//!   labeled set of buffers to persist.
//! - [`command`]: the request/response data model.
//! - [`config`]: TOML-backed collector settings.
//!
//! Archive packaging, upload transport and the CLI front end live in the
//! embedding tool, not here.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stor_assist::{AssistConfig, Collector, CommandDescriptor, OutputFormat};
//!
//! let config = AssistConfig::load_or_default("/etc/stor-assist.toml")?;
//! let rules = config.redaction_rules()?;
//! let mut collector = Collector::new(conn, config.deadline_secs);
//!
//! collector.collect("status", &CommandDescriptor::new("status", OutputFormat::Plain)).await?;
//! collector
//!     .collect_redacted(
//!         "config_dump",
//!         &CommandDescriptor::new("config dump", OutputFormat::JsonPretty),
//!         false,
//!         &rules,
//!     )
//!     .await?;
//!
//! let collection = collector.finish();
//! ```

pub mod collect;
pub mod command;
pub mod config;
pub mod deadline;
pub mod error;
pub mod invoke;
pub mod redact;

pub use collect::{Collection, CollectionMeta, Collector, PerTargetSummary};
pub use command::{
    CommandDescriptor, InvocationOutcome, OutputFormat, ResultBuffer, REMOTE_TIMEOUT_CODE,
};
pub use config::AssistConfig;
pub use deadline::DeadlineGuard;
pub use error::{Error, Result};
pub use invoke::{ClusterConnection, CommandReply, ControlPlaneInvoker, TargetInvoker};
pub use redact::{default_rules, RedactionEngine, RedactionRule, PLACEHOLDER};
