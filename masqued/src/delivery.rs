//! Message delivery with human-like pacing
//!
//! The persona core returns what to say; the courier decides when.
//! Each delivery waits a jittered reaction delay, then a jittered
//! typing time, then hands the text to the sink. A sequence output is
//! split into successive deliveries with inter-message pacing, and
//! emoji tags are resolved just before transmission.

use async_trait::async_trait;
use masque_core::Output;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::emoji::EmojiBook;

/// A destination for outgoing messages
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver one message; `channel` is `None` when no destination
    /// channel was chosen
    async fn send(&self, channel: Option<&str>, text: &str);
}

/// Sink printing to stdout, used by the local chat frontend
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn send(&self, channel: Option<&str>, text: &str) {
        match channel {
            Some(channel) => println!("[#{channel}] {text}"),
            None => println!("{text}"),
        }
    }
}

/// Add or remove up to `percent`% of the value, uniformly
fn jitter(value_ms: u64, percent: f64) -> u64 {
    let factor = 1.0 + (rand::thread_rng().gen::<f64>() - 0.5) * percent / 50.0;
    (value_ms as f64 * factor).max(0.0) as u64
}

/// Paced message delivery
pub struct Courier<S: MessageSink> {
    sink: S,
    emoji: EmojiBook,
    delay_ms: u64,
    typing_time_ms: u64,
}

impl<S: MessageSink> Courier<S> {
    pub fn new(sink: S, emoji: EmojiBook, delay_ms: u64, typing_time_ms: u64) -> Self {
        Self {
            sink,
            emoji,
            delay_ms,
            typing_time_ms,
        }
    }

    /// Deliver a persona output, pacing each part
    pub async fn deliver(&self, channel: Option<&str>, output: &Output) {
        match output {
            Output::Single(text) => self.deliver_one(channel, text).await,
            Output::Sequence(parts) => {
                let mut first = true;
                for part in parts {
                    if !first {
                        // Gap between successive messages of one reply
                        let gap = jitter(self.delay_ms / 2, 20.0)
                            + jitter(self.typing_time_ms, 10.0)
                            + 100;
                        tokio::time::sleep(Duration::from_millis(gap)).await;
                    }
                    first = false;
                    self.deliver_one(channel, part).await;
                }
            }
        }
    }

    async fn deliver_one(&self, channel: Option<&str>, text: &str) {
        let text = self.emoji.resolve(text);

        let delay = jitter(self.delay_ms, 60.0);
        let typing = jitter(self.typing_time_ms, 30.0);
        debug!(
            "Delivering after {}ms delay + {}ms typing to {:?}",
            delay, typing, channel
        );
        tokio::time::sleep(Duration::from_millis(delay)).await;
        tokio::time::sleep(Duration::from_millis(typing)).await;

        self.sink.send(channel, &text).await;
    }
}
