//! Completion oracle contract
//!
//! The LLM-backed persona variant delegates message formulation to an
//! external text-completion collaborator. The core only defines the
//! contract: one awaited call per message, no retry, no timeout of its
//! own. Any failure is `None`, which callers treat as "no response".

use async_trait::async_trait;

/// An opaque external text-completion collaborator
#[async_trait]
pub trait CompletionOracle: Send + Sync {
    /// Complete a prompt, or `None` if the oracle has nothing to say
    /// (including any transport or provider failure)
    async fn complete(&self, prompt: &str) -> Option<String>;
}

/// Oracle that never answers; the default when none is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOracle;

#[async_trait]
impl CompletionOracle for NullOracle {
    async fn complete(&self, _prompt: &str) -> Option<String> {
        None
    }
}
