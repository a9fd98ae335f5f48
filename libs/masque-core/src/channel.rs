//! Channel-name filtering
//!
//! Channel names are opaque strings compared by pattern, never by
//! identity. Both ignore lists and per-rule allow-lists are
//! case-insensitive regular expressions, compiled once.

use regex::{Regex, RegexBuilder};

use crate::error::{MasqueError, Result};

/// A compiled list of channel-name patterns
#[derive(Debug, Clone, Default)]
pub struct ChannelFilter {
    patterns: Vec<Regex>,
}

impl ChannelFilter {
    /// Compile a pattern list. `rule` names the owner for error reporting.
    pub fn compile(patterns: &[String], rule: &str) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| MasqueError::InvalidPattern {
                    rule: rule.to_string(),
                    message: e.to_string(),
                })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// True if the channel name matches any pattern in the list
    pub fn matches(&self, channel: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(channel))
    }

    /// True if the list holds no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Filter a channel list: drop everything the ignore list matches,
/// then keep only allow-list matches when an allow-list is declared.
pub fn filter_channels<'a>(
    channels: &'a [String],
    ignore: &ChannelFilter,
    allow: Option<&ChannelFilter>,
) -> Vec<&'a str> {
    channels
        .iter()
        .map(String::as_str)
        .filter(|channel| !ignore.matches(channel))
        .filter(|channel| match allow {
            Some(list) if !list.is_empty() => list.matches(channel),
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_match() {
        let filter = ChannelFilter::compile(&names(&["general"]), "test").unwrap();
        assert!(filter.matches("General"));
        assert!(filter.matches("off-GENERAL-topic"));
        assert!(!filter.matches("random"));
    }

    #[test]
    fn test_ignore_beats_allow() {
        let channels = names(&["general", "staff-room", "random"]);
        let ignore = ChannelFilter::compile(&names(&["staff"]), "ignore").unwrap();
        let allow = ChannelFilter::compile(&names(&["staff-room", "general"]), "allow").unwrap();

        let kept = filter_channels(&channels, &ignore, Some(&allow));
        assert_eq!(kept, vec!["general"]);
    }

    #[test]
    fn test_empty_allow_list_keeps_all() {
        let channels = names(&["a", "b"]);
        let ignore = ChannelFilter::default();
        assert_eq!(filter_channels(&channels, &ignore, None).len(), 2);
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        let err = ChannelFilter::compile(&names(&["("]), "response #2").unwrap_err();
        assert!(err.to_string().contains("response #2"));
    }
}
