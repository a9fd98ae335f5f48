//! # Masque Core
//!
//! Rule-evaluation and scheduling core of the Masque chat persona
//! engine. Given inbound messages on named channels and a once-a-minute
//! clock tick, a [`Persona`] decides whether and what to respond with,
//! driven by an ordered rule language of patterned responses and
//! time-windowed routines.
//!
//! The core is pure and synchronous: it receives plain strings and
//! booleans, draws from an injectable random source, and returns
//! strings or string sequences. Delivery, platform clients, and the
//! optional LLM completion oracle are external collaborators.
//!
//! ## Example
//!
//! ```
//! use masque_core::{Persona, PersonaEngine, PersonaConfig};
//!
//! let toml = r#"
//! config = "greeter"
//!
//! [[responses]]
//! pattern = 'hi (\w+)'
//! frequence = 1.0
//! expression = "hello {1}"
//! "#;
//!
//! let config = PersonaConfig::from_toml(toml).unwrap();
//! let engine = PersonaEngine::with_seed(Persona::from_config(&config).unwrap(), 1);
//! let reply = engine.on_message("hi Bob", "general", false);
//! assert!(reply.is_some());
//! ```

pub mod builtin;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod persona;
pub mod rules;
pub mod schedule;
pub mod template;

pub use config::{Expression, PersonaConfig, ResponseConfig, RoutineConfig};
pub use engine::PersonaEngine;
pub use error::{MasqueError, Result};
pub use oracle::{CompletionOracle, NullOracle};
pub use persona::{Output, Persona, PersonaInfo, RoutineAction};
pub use schedule::TimeWindow;
