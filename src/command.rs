//! Command request/response data model.
//!
//! A [`CommandDescriptor`] names one administrative operation together with
//! the output format it should be rendered in and any operation-specific
//! parameters. Replies come back as opaque [`ResultBuffer`]s; per-target
//! replies are classified into an [`InvocationOutcome`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status code reported by a cluster member when the command timed out at
/// the remote end (errno `ETIMEDOUT`, negated). Distinct from a caller-side
/// [`InvocationOutcome::TimedOut`], which means the local deadline elapsed
/// before any reply arrived.
pub const REMOTE_TIMEOUT_CODE: i32 = -110;

/// Output format requested from the cluster for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Column-aligned tabular text
    #[default]
    Plain,
    /// Compact structured records
    Json,
    /// Indented structured records
    JsonPretty,
}

impl OutputFormat {
    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
        }
    }
}

/// One administrative command request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    prefix: String,
    format: OutputFormat,
    params: BTreeMap<String, String>,
}

impl CommandDescriptor {
    /// Create a descriptor for the named operation.
    pub fn new(prefix: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            prefix: prefix.into(),
            format,
            params: BTreeMap::new(),
        }
    }

    /// Attach an operation-specific parameter (builder style).
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Operation name.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Requested output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Operation-specific parameters, in key order.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Render the request payload sent over the wire: a JSON object with
    /// `prefix`, `format`, and every parameter flattened as a top-level
    /// key/value pair, in deterministic order.
    pub fn to_wire(&self) -> String {
        let mut payload = Map::new();
        payload.insert("prefix".to_string(), Value::String(self.prefix.clone()));
        payload.insert(
            "format".to_string(),
            Value::String(self.format.as_str().to_string()),
        );
        for (key, value) in &self.params {
            payload.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(payload).to_string()
    }
}

/// Raw bytes returned by an invocation.
///
/// The structure of the content is implied by the [`OutputFormat`] used to
/// request it. An empty buffer is a valid "feature not supported / no data"
/// result, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBuffer(Vec<u8>);

impl ResultBuffer {
    /// The empty buffer.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw reply bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ResultBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ResultBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ResultBuffer {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// Classified result of one per-target invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The member replied with status zero.
    Success(ResultBuffer),
    /// The local deadline elapsed before any reply arrived.
    TimedOut,
    /// The member replied with a non-zero status.
    Failed {
        /// Underlying status code; [`REMOTE_TIMEOUT_CODE`] means the command
        /// timed out at the remote end.
        code: i32,
        /// Diagnostic message accompanying the failure.
        message: String,
        /// Whatever output the member produced before failing.
        raw_output: ResultBuffer,
    },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }

    /// True for both local and remote timeouts.
    pub fn is_timeout(&self) -> bool {
        match self {
            InvocationOutcome::TimedOut => true,
            InvocationOutcome::Failed { code, .. } => *code == REMOTE_TIMEOUT_CODE,
            InvocationOutcome::Success(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_payload_shape() {
        let descriptor = CommandDescriptor::new("config dump", OutputFormat::JsonPretty)
            .param("target", "member.3");
        let payload: serde_json::Value =
            serde_json::from_str(&descriptor.to_wire()).unwrap();
        assert_eq!(payload["prefix"], "config dump");
        assert_eq!(payload["format"], "json-pretty");
        assert_eq!(payload["target"], "member.3");
    }

    #[test]
    fn test_wire_payload_is_deterministic() {
        let build = || {
            CommandDescriptor::new("df", OutputFormat::Plain)
                .param("zeta", "1")
                .param("alpha", "2")
        };
        assert_eq!(build().to_wire(), build().to_wire());
        // parameters are ordered by key, not by insertion
        let wire = build().to_wire();
        assert!(wire.find("alpha").unwrap() < wire.find("zeta").unwrap());
    }

    #[test]
    fn test_format_wire_names() {
        assert_eq!(OutputFormat::Plain.as_str(), "plain");
        assert_eq!(OutputFormat::Json.as_str(), "json");
        assert_eq!(OutputFormat::JsonPretty.as_str(), "json-pretty");
        let parsed: OutputFormat = serde_json::from_str("\"json-pretty\"").unwrap();
        assert_eq!(parsed, OutputFormat::JsonPretty);
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        let buffer = ResultBuffer::empty();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_outcome_timeout_classification() {
        assert!(InvocationOutcome::TimedOut.is_timeout());
        let remote = InvocationOutcome::Failed {
            code: REMOTE_TIMEOUT_CODE,
            message: "ETIMEDOUT".to_string(),
            raw_output: ResultBuffer::empty(),
        };
        assert!(remote.is_timeout());
        let other = InvocationOutcome::Failed {
            code: 5,
            message: "boom".to_string(),
            raw_output: ResultBuffer::empty(),
        };
        assert!(!other.is_timeout());
        assert!(!other.is_success());
    }
}
