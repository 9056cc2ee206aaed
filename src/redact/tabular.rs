//! Redaction of column-aligned tabular text.

use tracing::debug;

use super::{RedactionRule, RedactionStrategy, PLACEHOLDER};
use crate::error::{Error, Result};

/// Header substring marking the start of the value column.
const VALUE_MARKER: &str = "VALUE";
/// Header substring marking the column after the value column.
const RO_MARKER: &str = "RO";

/// Redacts tabular documents.
///
/// Live dumps carry a header line whose `VALUE` and `RO` markers bound the
/// value column; matching lines get exactly that span overwritten, so every
/// line keeps its printable width and the columns stay aligned. Static
/// configuration files have no header; matching `key = value` lines get
/// everything after the last `=` replaced instead.
pub struct TabularRedactor {
    /// Input is a static configuration file rather than a live dump.
    pub is_config_file: bool,
}

impl TabularRedactor {
    /// Locate the value-column span from the header line, as display-column
    /// offsets (characters, not bytes).
    ///
    /// A header missing either marker makes the column bounds undefined, and
    /// a span too narrow to hold the placeholder cannot be rewritten without
    /// shifting the columns; both are hard errors, because skipping or
    /// misaligning redaction could leak secrets.
    fn value_span(header: &str) -> Result<(usize, usize)> {
        let start = header.find(VALUE_MARKER).ok_or_else(|| {
            Error::Redaction(format!("tabular header has no {VALUE_MARKER} column: {header:?}"))
        })?;
        let end = header.find(RO_MARKER).ok_or_else(|| {
            Error::Redaction(format!("tabular header has no {RO_MARKER} column: {header:?}"))
        })?;
        if end <= start {
            return Err(Error::Redaction(format!(
                "tabular header columns are out of order: {header:?}"
            )));
        }
        let start = header[..start].chars().count();
        let end = header[..end].chars().count();
        if end - start < PLACEHOLDER.chars().count() {
            return Err(Error::Redaction(format!(
                "tabular value column is too narrow for the placeholder: {header:?}"
            )));
        }
        Ok((start, end))
    }

    /// Byte offset of the character at display column `col`, or `None` when
    /// the line has fewer than `col` characters.
    fn byte_offset_at(line: &str, col: usize) -> Option<usize> {
        let mut chars = 0;
        for (idx, _) in line.char_indices() {
            if chars == col {
                return Some(idx);
            }
            chars += 1;
        }
        (chars == col).then_some(line.len())
    }

    /// Rewrite a `key = value` line, dropping everything after the last `=`.
    fn redact_config_line(line: &str) -> Option<String> {
        let cut = line.rfind('=')?;
        Some(format!("{} = {}", line[..cut].trim_end(), PLACEHOLDER))
    }

    /// Overwrite the value-column span, right-aligning the placeholder so
    /// the printable width of the line is unchanged. The span arrives in
    /// display columns; lines shorter than the span are left alone.
    fn redact_span(line: &str, start_col: usize, end_col: usize) -> Option<String> {
        let start = Self::byte_offset_at(line, start_col)?;
        let end = Self::byte_offset_at(line, end_col)?;
        let width = end_col - start_col;
        Some(format!(
            "{}{:>width$}{}",
            &line[..start],
            PLACEHOLDER,
            &line[end..],
        ))
    }
}

impl RedactionStrategy for TabularRedactor {
    fn apply(&self, input: &[u8], rules: &[RedactionRule]) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(input).map_err(|e| {
            Error::Redaction(format!("tabular input is not valid UTF-8: {e}"))
        })?;

        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            return Ok(input.to_vec());
        }

        let span = if self.is_config_file {
            None
        } else {
            Some(Self::value_span(&lines[0])?)
        };

        // data lines start after the header in live dumps
        let first_data = usize::from(!self.is_config_file);

        // last-to-first, so a rewrite never shifts a not-yet-scanned index
        for idx in (first_data..lines.len()).rev() {
            for rule in rules {
                if !rule.matches(&lines[idx]) {
                    continue;
                }
                let rewritten = match span {
                    None => Self::redact_config_line(&lines[idx]),
                    Some((start, end)) => Self::redact_span(&lines[idx], start, end),
                };
                if let Some(rewritten) = rewritten {
                    debug!(line = idx, rule = rule.as_str(), "redacted tabular value");
                    lines[idx] = rewritten;
                }
                // one redaction per line; later rules never reconsider it
                break;
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out.into_bytes())
    }
}
