//! Redaction of structured list-of-records output.

use serde_json::{Map, Value};
use tracing::debug;

use super::{RedactionRule, RedactionStrategy, PLACEHOLDER};
use crate::error::{Error, Result};

/// Record fields tested against the rules, in match order.
const MATCH_FIELDS: [&str; 3] = ["name", "section", "value"];

/// Redacts record documents (`json` / `json-pretty` output).
///
/// The input is an ordered list of key/value records, config-dump shaped:
/// each record carries at least `name`, `section` and `value`. A matching
/// record gets its `value` overwritten; the record shape and key order are
/// preserved on re-encode.
pub struct RecordRedactor {
    /// Re-encode with multi-space indentation (`json-pretty`).
    pub pretty: bool,
}

impl RedactionStrategy for RecordRedactor {
    fn apply(&self, input: &[u8], rules: &[RedactionRule]) -> Result<Vec<u8>> {
        // unparsable input is fatal: emitting it unredacted could leak
        let mut records: Vec<Map<String, Value>> =
            serde_json::from_slice(input).map_err(|e| {
                Error::Redaction(format!("structured input is not a record list: {e}"))
            })?;

        for idx in (0..records.len()).rev() {
            'rules: for rule in rules {
                for field in MATCH_FIELDS {
                    let matched = records[idx]
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| rule.matches(text));
                    if matched {
                        debug!(record = idx, field, rule = rule.as_str(), "redacted record value");
                        records[idx]
                            .insert("value".to_string(), Value::String(PLACEHOLDER.to_string()));
                        // one redaction per record; stop testing rules
                        break 'rules;
                    }
                }
            }
        }

        let mut out = if self.pretty {
            serde_json::to_vec_pretty(&records)?
        } else {
            serde_json::to_vec(&records)?
        };
        out.push(b'\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact::default_rules;

    fn redact(input: &str, pretty: bool, rules: &[RedactionRule]) -> Result<String> {
        let redactor = RecordRedactor { pretty };
        redactor
            .apply(input.as_bytes(), rules)
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_password_record_value_is_hidden() {
        let input = r#"[{"name":"client_password","section":"client","value":"s3cr3t"}]"#;
        let out = redact(input, false, &default_rules()).unwrap();
        let records: Vec<Map<String, Value>> = serde_json::from_str(&out).unwrap();
        assert_eq!(records[0]["name"], "client_password");
        assert_eq!(records[0]["section"], "client");
        assert_eq!(records[0]["value"], PLACEHOLDER);
    }

    #[test]
    fn test_section_field_is_tested_too() {
        let input = r#"[{"name":"harmless","section":"keyring","value":"abc"}]"#;
        let out = redact(input, false, &default_rules()).unwrap();
        assert!(out.contains(PLACEHOLDER));
        assert!(!out.contains("abc"));
    }

    #[test]
    fn test_non_matching_record_is_byte_identical() {
        let records = vec![serde_json::json!({
            "name": "mon_host",
            "section": "global",
            "value": "10.0.0.1"
        })];
        let mut input = serde_json::to_string(&records).unwrap();
        input.push('\n');
        let out = redact(&input, false, &default_rules()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let input = r#"[{"section":"client","value":"s3cr3t","name":"client_password"}]"#;
        let out = redact(input, false, &default_rules()).unwrap();
        // the value is replaced in place; keys keep their original order
        assert_eq!(
            out,
            format!(
                "[{{\"section\":\"client\",\"value\":\"{PLACEHOLDER}\",\"name\":\"client_password\"}}]\n"
            )
        );
    }

    #[test]
    fn test_only_first_matching_rule_applies() {
        // name matches both "password" and "key"; value must be written once
        let input = r#"[{"name":"keystone_password","section":"rgw","value":"x"}]"#;
        let out = redact(input, false, &default_rules()).unwrap();
        let records: Vec<Map<String, Value>> = serde_json::from_str(&out).unwrap();
        assert_eq!(records[0]["value"], PLACEHOLDER);
    }

    #[test]
    fn test_pretty_output_is_indented_and_idempotent() {
        let input = r#"[{"name":"client_password","section":"client","value":"s3cr3t"}]"#;
        let rules = default_rules();
        let once = redact(input, true, &rules).unwrap();
        assert!(once.contains("\n  "));
        let twice = redact(&once, true, &rules).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unparsable_input_is_a_hard_error() {
        let result = redact("VALUE RO\nnot json at all", false, &default_rules());
        assert!(matches!(result, Err(Error::Redaction(_))));
    }
}
