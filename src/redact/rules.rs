//! Redaction rule set.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Replacement written in place of every redacted value.
pub const PLACEHOLDER: &str = "** HIDDEN **";

/// Field names that carry credentials in stock cluster configurations.
const DEFAULT_PATTERNS: [&str; 3] = ["password", "key", "cert"];

/// A single pattern tested against field names and values.
///
/// Matching is always case-insensitive, whatever the pattern says.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pattern: Regex,
}

impl RedactionRule {
    /// Compile a rule from a regex pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    /// Test the rule against a field name or value string.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// The source pattern, for logging.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// The stock rule set. Callers append their own rules after these; rule
/// order is evaluation order.
pub fn default_rules() -> Vec<RedactionRule> {
    DEFAULT_PATTERNS
        .iter()
        .map(|p| RedactionRule::new(p).expect("default patterns compile"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        let rule = RedactionRule::new("password").unwrap();
        assert!(rule.matches("rgw_keystone_PASSWORD"));
        assert!(rule.matches("Password"));
        assert!(!rule.matches("mon_host"));
    }

    #[test]
    fn test_default_rules_cover_credential_fields() {
        let rules = default_rules();
        assert_eq!(rules.len(), 3);
        let hit = |text: &str| rules.iter().any(|r| r.matches(text));
        assert!(hit("client_password"));
        assert!(hit("osd_cluster_KEY"));
        assert!(hit("mgr_ssl_certificate"));
        assert!(!hit("mon_host"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(RedactionRule::new("(unclosed").is_err());
    }
}
