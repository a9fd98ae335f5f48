//! Built-in sample persona
//!
//! Used by the daemon when no persona file is given, and handy as a
//! working reference for the configuration shape.

use crate::config::{Expression, PersonaConfig, ResponseConfig, RoutineConfig};

/// The Harlequin sample persona: greets back, answers pings when
/// mentioned, chimes in rarely, and yawns late at night.
pub fn harlequin() -> PersonaConfig {
    PersonaConfig {
        config: "harlequin".to_string(),
        responses: vec![
            ResponseConfig {
                pattern: Some(r"\b(?:hi|hello|hey)\b[ ,]*(\w+)?".to_string()),
                frequence: Some(0.6),
                when_mention: true,
                expressions: Some(vec![
                    Expression::Single("hello {1}".to_string()),
                    Expression::Single("o/".to_string()),
                    Expression::Sequence(vec!["oh".to_string(), "hi!".to_string()]),
                ]),
                ..Default::default()
            },
            ResponseConfig {
                pattern: Some("^ping$".to_string()),
                when_mention: true,
                expression: Some(Expression::Single("pong".to_string())),
                ..Default::default()
            },
            ResponseConfig {
                frequence: Some(0.02),
                expressions: Some(vec![
                    Expression::Single("interesting".to_string()),
                    Expression::Single(":thinking:".to_string()),
                ]),
                ..Default::default()
            },
        ],
        routines: vec![RoutineConfig {
            between: Some(["23:00".to_string(), "02:00".to_string()]),
            frequence: Some(0.005),
            expression: Some(Expression::Single("anyone still up?".to_string())),
            ..Default::default()
        }],
        ignore_channels: vec!["^mod-".to_string(), "announcements".to_string()],
    }
}
