//! Raw persona configuration
//!
//! These are the serde-facing structures as they appear in a persona
//! file (TOML or JSON). Defaults are deliberately permissive: missing
//! numeric fields read as 0, missing lists as empty. Validation and
//! pattern compilation happen once, when a [`Persona`] is built from
//! this configuration.
//!
//! [`Persona`]: crate::Persona

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A candidate output: either a single message or a sequence of
/// messages delivered one after another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expression {
    /// One message
    Single(String),
    /// Successive messages
    Sequence(Vec<String>),
}

impl Expression {
    /// Number of message parts in this expression
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequence(parts) => parts.len(),
        }
    }

    /// True if this expression carries no message at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Sequence(parts) => parts.is_empty(),
        }
    }
}

/// A reactive rule, evaluated against each inbound message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Pattern to match against the message; absent matches anything
    #[serde(default)]
    pub pattern: Option<String>,
    /// Probability in [0, 1] that the rule fires when matched
    #[serde(default)]
    pub frequence: Option<f64>,
    /// Mention alone bypasses the frequence gate
    #[serde(default)]
    pub when_mention: bool,
    /// Candidate outputs; one is picked at random
    #[serde(default)]
    pub expressions: Option<Vec<Expression>>,
    /// Single-candidate shorthand, used when `expressions` is absent
    #[serde(default)]
    pub expression: Option<Expression>,
    /// Channel-name patterns this rule is restricted to; absent is all
    #[serde(default)]
    pub channels: Option<Vec<String>>,
}

/// A proactive rule, evaluated once per minute tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineConfig {
    /// Wall-clock window `["HH:MM", "HH:MM"]`; start > end wraps
    /// overnight; absent is always active
    #[serde(default)]
    pub between: Option<[String; 2]>,
    /// Per-tick firing probability in [0, 1]
    #[serde(default)]
    pub frequence: Option<f64>,
    /// Candidate outputs; one is picked at random
    #[serde(default)]
    pub expressions: Option<Vec<Expression>>,
    /// Single-candidate shorthand
    #[serde(default)]
    pub expression: Option<Expression>,
    /// Channel-name patterns eligible as destination; absent is all
    #[serde(default)]
    pub channels: Option<Vec<String>>,
}

/// Complete persona configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Identifying configuration label
    pub config: String,
    /// Reactive rules, evaluated in order, first match wins
    #[serde(default)]
    pub responses: Vec<ResponseConfig>,
    /// Proactive rules, evaluated in order, first match wins
    #[serde(default)]
    pub routines: Vec<RoutineConfig>,
    /// Channel-name patterns excluded from all persona activity
    #[serde(default)]
    pub ignore_channels: Vec<String>,
}

impl PersonaConfig {
    /// Load persona configuration from a file, by extension
    /// (`.json` parses as JSON, anything else as TOML)
    pub fn from_file(path: &Path) -> Result<Self, crate::MasqueError> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Parse persona configuration from TOML
    pub fn from_toml(content: &str) -> Result<Self, crate::MasqueError> {
        toml::from_str(content).map_err(|e| crate::MasqueError::ParseError(e.to_string()))
    }

    /// Parse persona configuration from JSON
    pub fn from_json(content: &str) -> Result<Self, crate::MasqueError> {
        serde_json::from_str(content).map_err(|e| crate::MasqueError::ParseError(e.to_string()))
    }

    /// Serialize persona configuration to TOML
    pub fn to_toml(&self) -> Result<String, crate::MasqueError> {
        toml::to_string_pretty(self).map_err(|e| crate::MasqueError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_untagged_forms() {
        let cfg: ResponseConfig = serde_json::from_str(
            r#"{ "expressions": ["hey", ["one", "two"]] }"#,
        )
        .unwrap();
        let exprs = cfg.expressions.unwrap();
        assert_eq!(exprs[0], Expression::Single("hey".to_string()));
        assert_eq!(exprs[1].len(), 2);
    }

    #[test]
    fn test_permissive_defaults() {
        let cfg: PersonaConfig = serde_json::from_str(r#"{ "config": "empty" }"#).unwrap();
        assert!(cfg.responses.is_empty());
        assert!(cfg.routines.is_empty());
        assert!(cfg.ignore_channels.is_empty());
    }

    #[test]
    fn test_toml_roundtrip() {
        let cfg = PersonaConfig {
            config: "sample".to_string(),
            responses: vec![ResponseConfig {
                pattern: Some("hello".to_string()),
                frequence: Some(0.5),
                expression: Some(Expression::Single("hi".to_string())),
                ..Default::default()
            }],
            ..Default::default()
        };

        let toml = cfg.to_toml().unwrap();
        let parsed = PersonaConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed.config, "sample");
        assert_eq!(parsed.responses.len(), 1);
        assert_eq!(parsed.responses[0].frequence, Some(0.5));
    }

    #[test]
    fn test_from_file_by_extension() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("p.json");
        let mut f = std::fs::File::create(&json_path).unwrap();
        write!(f, r#"{{ "config": "json-one" }}"#).unwrap();

        let cfg = PersonaConfig::from_file(&json_path).unwrap();
        assert_eq!(cfg.config, "json-one");
    }
}
