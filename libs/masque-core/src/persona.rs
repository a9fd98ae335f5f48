//! Persona rule evaluation
//!
//! A [`Persona`] owns an ordered list of compiled response rules, an
//! ordered list of compiled routine rules, and a channel ignore list.
//! It is immutable after construction and holds no mutable state:
//! evaluation reads the rules, draws from a caller-supplied random
//! source, and returns data. It never sends anything itself.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::channel::{filter_channels, ChannelFilter};
use crate::config::{Expression, PersonaConfig};
use crate::error::Result;
use crate::rules::{ResponseRule, RoutineRule};
use crate::template;

/// What the persona wants to say: one message, or an ordered sequence
/// delivered as successive messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// One message
    Single(String),
    /// Successive messages
    Sequence(Vec<String>),
}

impl Output {
    fn render(expression: &Expression, captures: &[Option<String>]) -> Self {
        match expression {
            Expression::Single(text) => Self::Single(template::render(text, captures)),
            Expression::Sequence(parts) => Self::Sequence(
                parts
                    .iter()
                    .map(|part| template::render(part, captures))
                    .collect(),
            ),
        }
    }

    /// True if there is nothing to deliver
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Sequence(parts) => parts.is_empty(),
        }
    }
}

/// A routine firing: the message to send and the chosen destination.
/// The channel is `None` when no active channel survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineAction {
    /// Rendered routine output
    pub message: Output,
    /// Destination channel, picked uniformly from eligible channels
    pub channel: Option<String>,
}

/// Summary snapshot of a persona's configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaInfo {
    /// Configuration label
    pub config: String,
    /// Number of response rules
    pub responses: usize,
    /// Number of routine rules
    pub routines: usize,
    /// Total declared expression candidates across all rules
    pub expressions: usize,
    /// Compounded probability that at least one pattern-less response
    /// rule fires for an arbitrary message
    pub frequence: f64,
}

/// A compiled chat persona
#[derive(Debug, Clone)]
pub struct Persona {
    config: String,
    responses: Vec<ResponseRule>,
    routines: Vec<RoutineRule>,
    ignore_channels: ChannelFilter,
}

impl Persona {
    /// Compile a persona from raw configuration.
    ///
    /// Fails if any rule declares an unparsable pattern, a frequence
    /// outside [0, 1], or a malformed time window; the error names the
    /// offending rule. A persona is never partially usable.
    pub fn from_config(config: &PersonaConfig) -> Result<Self> {
        let responses = config
            .responses
            .iter()
            .enumerate()
            .map(|(i, r)| ResponseRule::compile(r, i))
            .collect::<Result<Vec<_>>>()?;
        let routines = config
            .routines
            .iter()
            .enumerate()
            .map(|(i, r)| RoutineRule::compile(r, i))
            .collect::<Result<Vec<_>>>()?;
        let ignore_channels = ChannelFilter::compile(&config.ignore_channels, "ignore_channels")?;

        Ok(Self {
            config: config.config.clone(),
            responses,
            routines,
            ignore_channels,
        })
    }

    /// The identifying configuration label
    pub fn config(&self) -> &str {
        &self.config
    }

    /// Evaluate the response rules against an inbound message.
    ///
    /// An ignored channel short-circuits before any rule is tried.
    /// Rules are evaluated in declared order; the first rule passing
    /// channel filter, frequency/mention gate, and pattern match wins.
    pub fn respond<R: Rng>(
        &self,
        message: &str,
        channel: &str,
        mentioned: bool,
        rng: &mut R,
    ) -> Option<Output> {
        if self.ignore_channels.matches(channel) {
            return None;
        }

        for rule in &self.responses {
            if !rule.allows_channel(channel) {
                continue;
            }
            if !rule.fires(mentioned, rng) {
                continue;
            }
            let captures = match rule.captures(message) {
                Some(captures) => captures,
                None => continue,
            };
            let output = match rule.pick_expression(rng) {
                Some(expression) => Output::render(expression, &captures),
                None => Output::Sequence(Vec::new()),
            };
            return Some(output);
        }

        None
    }

    /// Evaluate the routine rules for one minute tick.
    ///
    /// `now` is the wall-clock time of day; `active_channels` are the
    /// channels currently available as destinations. Routines render
    /// with the empty capture list, so `{N}` placeholders stay
    /// literal.
    pub fn routine<R: Rng>(
        &self,
        active_channels: &[String],
        now: chrono::NaiveTime,
        rng: &mut R,
    ) -> Option<RoutineAction> {
        for rule in &self.routines {
            if !rule.active_at(now) || !rule.fires(rng) {
                continue;
            }

            let message = match rule.pick_expression(rng) {
                Some(expression) => Output::render(expression, &[]),
                None => Output::Sequence(Vec::new()),
            };
            let channel = filter_channels(active_channels, &self.ignore_channels, rule.channels())
                .choose(rng)
                .map(|c| c.to_string());

            return Some(RoutineAction { message, channel });
        }

        None
    }

    /// Summarize the persona's configuration.
    ///
    /// The compounded frequence folds `f <- f + (1 - f) * rule` over
    /// pattern-less response rules in order; patterned rules are
    /// excluded because their firing also depends on message content.
    pub fn info(&self) -> PersonaInfo {
        let expressions = self
            .responses
            .iter()
            .map(ResponseRule::expression_count)
            .chain(self.routines.iter().map(RoutineRule::expression_count))
            .sum();
        let frequence = self
            .responses
            .iter()
            .filter(|rule| !rule.has_pattern())
            .fold(0.0, |f, rule| f + (1.0 - f) * rule.frequence());

        PersonaInfo {
            config: self.config.clone(),
            responses: self.responses.len(),
            routines: self.routines.len(),
            expressions,
            frequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResponseConfig, RoutineConfig};
    use chrono::NaiveTime;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;

    // Always draws 0.0, so every frequency gate passes and every
    // uniform pick lands on the first element.
    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    fn persona(config: PersonaConfig) -> Persona {
        Persona::from_config(&config).unwrap()
    }

    fn response(pattern: Option<&str>, expression: &str) -> ResponseConfig {
        ResponseConfig {
            pattern: pattern.map(|p| p.to_string()),
            frequence: Some(1.0),
            expression: Some(Expression::Single(expression.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_rules_no_response() {
        let p = persona(PersonaConfig {
            config: "mute".to_string(),
            ..Default::default()
        });
        assert_eq!(p.respond("hello", "general", true, &mut always()), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let p = persona(PersonaConfig {
            config: "order".to_string(),
            responses: vec![response(None, "first"), response(None, "second")],
            ..Default::default()
        });

        for _ in 0..8 {
            let out = p.respond("anything", "general", false, &mut always());
            assert_eq!(out, Some(Output::Single("first".to_string())));
        }
    }

    #[test]
    fn test_capture_substitution() {
        let p = persona(PersonaConfig {
            config: "greeter".to_string(),
            responses: vec![response(Some(r"hi (\w+)"), "hello {1}")],
            ..Default::default()
        });

        let out = p.respond("hi Bob", "general", false, &mut always());
        assert_eq!(out, Some(Output::Single("hello Bob".to_string())));
    }

    #[test]
    fn test_missing_capture_left_verbatim() {
        let p = persona(PersonaConfig {
            config: "greeter".to_string(),
            responses: vec![response(Some(r"hi (\w+)"), "hello {2}")],
            ..Default::default()
        });

        let out = p.respond("hi Bob", "general", false, &mut always());
        assert_eq!(out, Some(Output::Single("hello {2}".to_string())));
    }

    #[test]
    fn test_pattern_failure_falls_through_to_next_rule() {
        let p = persona(PersonaConfig {
            config: "fallthrough".to_string(),
            responses: vec![response(Some("^ping$"), "pong"), response(None, "default")],
            ..Default::default()
        });

        let out = p.respond("not a ping", "general", false, &mut always());
        assert_eq!(out, Some(Output::Single("default".to_string())));
    }

    #[test]
    fn test_ignored_channel_short_circuits() {
        let p = persona(PersonaConfig {
            config: "shy".to_string(),
            responses: vec![ResponseConfig {
                frequence: Some(1.0),
                channels: Some(vec!["staff".to_string()]),
                expression: Some(Expression::Single("here".to_string())),
                ..Default::default()
            }],
            ignore_channels: vec!["staff".to_string()],
            ..Default::default()
        });

        // Ignore wins even though the rule's allow-list includes it
        assert_eq!(p.respond("hello", "staff", true, &mut always()), None);
    }

    #[test]
    fn test_channel_allow_list_skips_rule() {
        let p = persona(PersonaConfig {
            config: "picky".to_string(),
            responses: vec![ResponseConfig {
                frequence: Some(1.0),
                channels: Some(vec!["^games$".to_string()]),
                expression: Some(Expression::Single("gg".to_string())),
                ..Default::default()
            }],
            ..Default::default()
        });

        assert_eq!(p.respond("hello", "general", false, &mut always()), None);
        assert_eq!(
            p.respond("hello", "GAMES", false, &mut always()),
            Some(Output::Single("gg".to_string()))
        );
    }

    #[test]
    fn test_sequence_expression_renders_each_part() {
        let p = persona(PersonaConfig {
            config: "chatty".to_string(),
            responses: vec![ResponseConfig {
                pattern: Some(r"hi (\w+)".to_string()),
                frequence: Some(1.0),
                expression: Some(Expression::Sequence(vec![
                    "oh".to_string(),
                    "hi {1}!".to_string(),
                ])),
                ..Default::default()
            }],
            ..Default::default()
        });

        let out = p.respond("hi Ada", "general", false, &mut always());
        assert_eq!(
            out,
            Some(Output::Sequence(vec![
                "oh".to_string(),
                "hi Ada!".to_string()
            ]))
        );
    }

    #[test]
    fn test_rule_without_expressions_yields_empty_sequence() {
        let p = persona(PersonaConfig {
            config: "silent".to_string(),
            responses: vec![ResponseConfig {
                frequence: Some(1.0),
                ..Default::default()
            }],
            ..Default::default()
        });

        let out = p.respond("hello", "general", false, &mut always()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_routine_window_and_destination() {
        let p = persona(PersonaConfig {
            config: "owl".to_string(),
            routines: vec![RoutineConfig {
                between: Some(["22:00".to_string(), "06:00".to_string()]),
                frequence: Some(1.0),
                expression: Some(Expression::Single("hoot".to_string())),
                ..Default::default()
            }],
            ignore_channels: vec!["staff".to_string()],
            ..Default::default()
        });
        let channels = vec!["staff".to_string(), "general".to_string()];

        let night = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        let action = p.routine(&channels, night, &mut always()).unwrap();
        assert_eq!(action.message, Output::Single("hoot".to_string()));
        assert_eq!(action.channel.as_deref(), Some("general"));

        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(p.routine(&channels, noon, &mut always()), None);
    }

    #[test]
    fn test_routine_with_no_surviving_channel() {
        let p = persona(PersonaConfig {
            config: "owl".to_string(),
            routines: vec![RoutineConfig {
                frequence: Some(1.0),
                expression: Some(Expression::Single("hoot".to_string())),
                channels: Some(vec!["^lounge$".to_string()]),
                ..Default::default()
            }],
            ..Default::default()
        });

        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let action = p
            .routine(&["general".to_string()], noon, &mut always())
            .unwrap();
        assert_eq!(action.channel, None);
    }

    #[test]
    fn test_routine_placeholders_stay_literal() {
        let p = persona(PersonaConfig {
            config: "owl".to_string(),
            routines: vec![RoutineConfig {
                frequence: Some(1.0),
                expression: Some(Expression::Single("tick {0}".to_string())),
                ..Default::default()
            }],
            ..Default::default()
        });

        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let action = p.routine(&[], noon, &mut always()).unwrap();
        assert_eq!(action.message, Output::Single("tick {0}".to_string()));
    }

    #[test]
    fn test_info_counts_and_compound_frequence() {
        let p = persona(PersonaConfig {
            config: "stats".to_string(),
            responses: vec![
                ResponseConfig {
                    frequence: Some(0.5),
                    expressions: Some(vec![
                        Expression::Single("a".to_string()),
                        Expression::Single("b".to_string()),
                    ]),
                    ..Default::default()
                },
                ResponseConfig {
                    frequence: Some(0.5),
                    ..Default::default()
                },
                // Patterned rules are excluded from the fold
                response(Some("x"), "y"),
            ],
            routines: vec![RoutineConfig {
                expression: Some(Expression::Single("z".to_string())),
                ..Default::default()
            }],
            ..Default::default()
        });

        let info = p.info();
        assert_eq!(info.responses, 3);
        assert_eq!(info.routines, 1);
        // 2 candidates + empty-counts-as-1 + 1 + 1
        assert_eq!(info.expressions, 5);
        assert!((info.frequence - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_identical_seed_identical_routine() {
        let p = persona(PersonaConfig {
            config: "owl".to_string(),
            routines: vec![RoutineConfig {
                frequence: Some(0.5),
                expressions: Some(vec![
                    Expression::Single("one".to_string()),
                    Expression::Single("two".to_string()),
                ]),
                ..Default::default()
            }],
            ..Default::default()
        });
        let channels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        let mut rng1 = rand::rngs::StdRng::seed_from_u64(7);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..32 {
            assert_eq!(
                p.routine(&channels, noon, &mut rng1),
                p.routine(&channels, noon, &mut rng2)
            );
        }
    }
}
