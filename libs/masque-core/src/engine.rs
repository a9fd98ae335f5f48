//! Scheduler facade
//!
//! [`PersonaEngine`] wraps a compiled [`Persona`] with the two runtime
//! dependencies evaluation needs: a random source and the wall clock.
//! The engine keeps the `&self` API of the underlying persona, so one
//! engine can be shared across tasks; the RNG sits behind a mutex and
//! a draw never blocks on anything else.

use std::sync::Mutex;

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::persona::{Output, Persona, PersonaInfo, RoutineAction};

/// A persona bound to a random source and the wall clock
#[derive(Debug)]
pub struct PersonaEngine {
    persona: Persona,
    rng: Mutex<StdRng>,
}

impl PersonaEngine {
    /// Wrap a persona with an entropy-seeded random source
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Wrap a persona with a fixed seed, for deterministic runs
    pub fn with_seed(persona: Persona, seed: u64) -> Self {
        Self {
            persona,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The underlying persona
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Inform the persona that a message was received
    pub fn on_message(&self, text: &str, channel: &str, mentioned: bool) -> Option<Output> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.persona.respond(text, channel, mentioned, &mut *rng)
    }

    /// Inform the persona that a minute has passed
    pub fn on_minute(&self, active_channels: &[String]) -> Option<RoutineAction> {
        self.on_minute_at(active_channels, Local::now().time())
    }

    /// Minute tick with an explicit time of day
    pub fn on_minute_at(
        &self,
        active_channels: &[String],
        now: chrono::NaiveTime,
    ) -> Option<RoutineAction> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.persona.routine(active_channels, now, &mut *rng)
    }

    /// Summary snapshot of the persona's configuration
    pub fn info(&self) -> PersonaInfo {
        self.persona.info()
    }
}
