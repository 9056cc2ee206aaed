//! Collector configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::redact::{default_rules, RedactionRule};

/// Default hard per-command deadline in seconds.
pub const DEFAULT_DEADLINE_SECS: u64 = 60;

/// Collector settings, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Hard per-command deadline in seconds.
    pub deadline_secs: u64,
    /// Extra redaction patterns, appended after the defaults in order.
    pub redact_patterns: Vec<String>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            deadline_secs: DEFAULT_DEADLINE_SECS,
            redact_patterns: Vec::new(),
        }
    }
}

impl AssistConfig {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(path = %path.as_ref().display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.deadline_secs == 0 {
            return Err(Error::Config(
                "deadline_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Compile the full ordered rule set: stock rules first, then the
    /// configured extras. An invalid pattern is fatal before any collection
    /// starts.
    pub fn redaction_rules(&self) -> Result<Vec<RedactionRule>> {
        let mut rules = default_rules();
        for pattern in &self.redact_patterns {
            rules.push(RedactionRule::new(pattern)?);
        }
        Ok(rules)
    }
}
