//! Redaction of collected command output.
//!
//! Diagnostic bundles are handed to third parties, so credential-bearing
//! values must never leave the collector. The engine rewrites command output
//! in place of the value only, preserving the surrounding structure: column
//! alignment for tabular text, record shape for structured output.
//!
//! Each structural format gets its own [`RedactionStrategy`]; the engine
//! selects one from the buffer's [`OutputFormat`]. A redaction failure is a
//! hard error — the run must abort rather than emit unredacted output.

mod records;
mod rules;
mod tabular;

pub use records::RecordRedactor;
pub use rules::{default_rules, RedactionRule, PLACEHOLDER};
pub use tabular::TabularRedactor;

use crate::command::{OutputFormat, ResultBuffer};
use crate::error::Result;

/// A format-specific redaction algorithm.
pub trait RedactionStrategy {
    /// Rewrite `input` with every sensitive value replaced by
    /// [`PLACEHOLDER`].
    fn apply(&self, input: &[u8], rules: &[RedactionRule]) -> Result<Vec<u8>>;
}

/// Entry point selecting the strategy for a buffer's format.
pub struct RedactionEngine;

impl RedactionEngine {
    /// Redact `buffer` according to its structural format.
    ///
    /// `is_config_file` distinguishes a static configuration file (key `=`
    /// value lines, no header) from a live tabular dump with a column
    /// header; it is only meaningful for [`OutputFormat::Plain`]. The empty
    /// buffer passes through untouched.
    pub fn redact(
        buffer: &ResultBuffer,
        format: OutputFormat,
        is_config_file: bool,
        rules: &[RedactionRule],
    ) -> Result<ResultBuffer> {
        if buffer.is_empty() {
            return Ok(buffer.clone());
        }

        // every format has a strategy; the enum is the contract
        let strategy: Box<dyn RedactionStrategy> = match format {
            OutputFormat::Plain => Box::new(TabularRedactor { is_config_file }),
            OutputFormat::Json => Box::new(RecordRedactor { pretty: false }),
            OutputFormat::JsonPretty => Box::new(RecordRedactor { pretty: true }),
        };

        strategy.apply(buffer.as_bytes(), rules).map(ResultBuffer::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_untouched() {
        let out = RedactionEngine::redact(
            &ResultBuffer::empty(),
            OutputFormat::Plain,
            false,
            &default_rules(),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_redact_is_idempotent_across_formats() {
        let rules = default_rules();

        let tabular = ResultBuffer::from(
            "NAME                    VALUE       RO \n\
             mon_host                10.0.0.1    *  \n\
             rgw_keystone_password   hunter2     *  \n",
        );
        let json = ResultBuffer::from(
            r#"[{"name":"client_password","section":"client","value":"s3cr3t"}]"#,
        );

        for (buffer, format, cfg) in [
            (tabular, OutputFormat::Plain, false),
            (json.clone(), OutputFormat::Json, false),
            (json, OutputFormat::JsonPretty, false),
        ] {
            let once = RedactionEngine::redact(&buffer, format, cfg, &rules).unwrap();
            let twice = RedactionEngine::redact(&once, format, cfg, &rules).unwrap();
            assert_eq!(once, twice, "second pass changed {format:?} output");
        }
    }
}
