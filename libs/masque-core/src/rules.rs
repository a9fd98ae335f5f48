//! Compiled rules
//!
//! Raw rule configurations are compiled once at persona construction:
//! message patterns become case-insensitive regexes, channel lists
//! become [`ChannelFilter`]s, time windows are parsed, and frequences
//! are range-checked. Evaluation never parses anything.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Regex, RegexBuilder};

use crate::channel::ChannelFilter;
use crate::config::{Expression, ResponseConfig, RoutineConfig};
use crate::error::{MasqueError, Result};
use crate::schedule::TimeWindow;

fn compile_pattern(pattern: &str, rule: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| MasqueError::InvalidPattern {
            rule: rule.to_string(),
            message: e.to_string(),
        })
}

fn check_frequence(frequence: Option<f64>, rule: &str) -> Result<f64> {
    let value = frequence.unwrap_or(0.0);
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(MasqueError::InvalidFrequence {
            rule: rule.to_string(),
            value,
        });
    }
    Ok(value)
}

fn merge_expressions(
    expressions: Option<Vec<Expression>>,
    expression: Option<Expression>,
) -> Vec<Expression> {
    match expressions {
        Some(list) => list,
        None => expression.into_iter().collect(),
    }
}

/// A compiled reactive rule
#[derive(Debug, Clone)]
pub struct ResponseRule {
    pattern: Option<Regex>,
    frequence: f64,
    when_mention: bool,
    expressions: Vec<Expression>,
    channels: Option<ChannelFilter>,
}

impl ResponseRule {
    /// Compile one response rule; `index` identifies it in errors
    pub fn compile(config: &ResponseConfig, index: usize) -> Result<Self> {
        let rule = format!("response #{index}");

        let pattern = match &config.pattern {
            Some(p) => Some(compile_pattern(p, &rule)?),
            None => None,
        };
        let channels = match &config.channels {
            Some(list) => Some(ChannelFilter::compile(list, &rule)?),
            None => None,
        };

        Ok(Self {
            pattern,
            frequence: check_frequence(config.frequence, &rule)?,
            when_mention: config.when_mention,
            expressions: merge_expressions(config.expressions.clone(), config.expression.clone()),
            channels,
        })
    }

    /// True if this rule has a message pattern (excluded from the
    /// compounded info frequence)
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// The rule's firing probability
    pub fn frequence(&self) -> f64 {
        self.frequence
    }

    /// True if the rule accepts this channel
    pub fn allows_channel(&self, channel: &str) -> bool {
        match &self.channels {
            Some(filter) => filter.matches(channel),
            None => true,
        }
    }

    /// Frequency/mention gate. A mention bypasses the draw entirely
    /// when `when_mention` is set; otherwise a uniform draw in [0, 1)
    /// must not exceed the frequence.
    pub fn fires<R: Rng>(&self, mentioned: bool, rng: &mut R) -> bool {
        (self.when_mention && mentioned) || rng.gen::<f64>() <= self.frequence
    }

    /// Match the message, returning capture group values on success.
    /// A rule without a pattern trivially matches with the whole
    /// message as group 0.
    pub fn captures(&self, message: &str) -> Option<Vec<Option<String>>> {
        match &self.pattern {
            Some(pattern) => pattern.captures(message).map(|caps| {
                caps.iter()
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect()
            }),
            None => Some(vec![Some(message.to_string())]),
        }
    }

    /// Pick one candidate expression uniformly at random
    pub fn pick_expression<R: Rng>(&self, rng: &mut R) -> Option<&Expression> {
        self.expressions.choose(rng)
    }

    /// Declared candidate count, as reported by persona info
    /// (a rule with no candidates still counts as 1)
    pub fn expression_count(&self) -> usize {
        self.expressions.len().max(1)
    }
}

/// A compiled proactive rule
#[derive(Debug, Clone)]
pub struct RoutineRule {
    between: Option<TimeWindow>,
    frequence: f64,
    expressions: Vec<Expression>,
    channels: Option<ChannelFilter>,
}

impl RoutineRule {
    /// Compile one routine rule; `index` identifies it in errors
    pub fn compile(config: &RoutineConfig, index: usize) -> Result<Self> {
        let rule = format!("routine #{index}");

        let between = match &config.between {
            Some([start, end]) => {
                Some(
                    TimeWindow::parse(start, end).ok_or_else(|| MasqueError::InvalidWindow {
                        rule: rule.clone(),
                        value: format!("{start}..{end}"),
                    })?,
                )
            }
            None => None,
        };
        let channels = match &config.channels {
            Some(list) => Some(ChannelFilter::compile(list, &rule)?),
            None => None,
        };

        Ok(Self {
            between,
            frequence: check_frequence(config.frequence, &rule)?,
            expressions: merge_expressions(config.expressions.clone(), config.expression.clone()),
            channels,
        })
    }

    /// True if the routine's window covers this time of day
    pub fn active_at(&self, now: chrono::NaiveTime) -> bool {
        match &self.between {
            Some(window) => window.contains(now),
            None => true,
        }
    }

    /// Per-tick frequency gate (no mention override for routines)
    pub fn fires<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() <= self.frequence
    }

    /// The routine's destination allow-list, if declared
    pub fn channels(&self) -> Option<&ChannelFilter> {
        self.channels.as_ref()
    }

    /// Pick one candidate expression uniformly at random
    pub fn pick_expression<R: Rng>(&self, rng: &mut R) -> Option<&Expression> {
        self.expressions.choose(rng)
    }

    /// Declared candidate count, as reported by persona info
    pub fn expression_count(&self) -> usize {
        self.expressions.len().max(1)
    }
}
