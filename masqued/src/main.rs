//! # Masqued
//!
//! Chat persona daemon. Loads a persona rule configuration, then:
//!
//! - feeds inbound messages from the local line frontend to the
//!   persona and delivers whatever it decides to say, with simulated
//!   typing pacing
//! - ticks the persona once per minute so its routines can fire
//! - reloads the persona when its file changes on disk
//! - optionally falls back to a completion oracle when the persona
//!   was mentioned but no rule produced a response
//!
//! Frontend input: plain text is a message on the default channel,
//! `#channel text` selects a channel, a leading `@` marks a mention,
//! `/info` prints the persona summary.

mod config;
mod delivery;
mod emoji;
mod oracle;
mod watcher;

use anyhow::Result;
use clap::Parser;
use masque_core::{builtin, CompletionOracle, Persona, PersonaConfig, PersonaEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::MasquedConfig;
use crate::delivery::{ConsoleSink, Courier};
use crate::emoji::EmojiBook;
use crate::oracle::HttpOracle;

/// Masque - chat persona daemon
#[derive(Parser, Debug)]
#[command(name = "masqued", version, about = "Masque persona daemon")]
struct Args {
    /// Persona file (TOML or JSON); omit for the built-in sample
    #[arg(short, long)]
    persona: Option<PathBuf>,

    /// Daemon configuration file
    #[arg(short, long, default_value = "masqued.toml")]
    config: PathBuf,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn build_engine(config: &PersonaConfig, seed: Option<u64>) -> masque_core::Result<PersonaEngine> {
    let persona = Persona::from_config(config)?;
    Ok(match seed {
        Some(seed) => PersonaEngine::with_seed(persona, seed),
        None => PersonaEngine::new(persona),
    })
}

fn load_persona_config(path: Option<&PathBuf>) -> masque_core::Result<PersonaConfig> {
    match path {
        Some(path) => PersonaConfig::from_file(path),
        None => Ok(builtin::harlequin()),
    }
}

/// One line of the persona summary, the `/info` command output
fn info_line(engine: &PersonaEngine) -> String {
    let info = engine.info();
    format!(
        "I have {} responses, {} routines, {} expressions and reply to roughly {:.0}% of messages ({})",
        info.responses,
        info.routines,
        info.expressions,
        info.frequence * 100.0,
        info.config
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .init();

    info!("Masqued v{} starting", env!("CARGO_PKG_VERSION"));

    let daemon_config = MasquedConfig::load(&args.config)?;
    let persona_config = load_persona_config(args.persona.as_ref())?;
    let engine = Arc::new(RwLock::new(build_engine(&persona_config, args.seed)?));
    info!(
        "Persona loaded: {}",
        info_line(&*engine.read().await)
    );

    let courier = Arc::new(Courier::new(
        ConsoleSink,
        EmojiBook::new(daemon_config.emoji_file.clone()),
        daemon_config.delivery.delay_ms,
        daemon_config.delivery.typing_time_ms,
    ));

    let oracle: Option<Arc<dyn CompletionOracle>> = daemon_config
        .oracle
        .enabled
        .then(|| Arc::new(HttpOracle::from_config(&daemon_config.oracle)) as Arc<dyn CompletionOracle>);

    // Minute ticker for routines
    let ticker_engine = engine.clone();
    let ticker_courier = courier.clone();
    let active_channels = daemon_config.channels.active.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        interval.tick().await; // first tick fires immediately; skip it
        loop {
            interval.tick().await;
            let action = ticker_engine.read().await.on_minute(&active_channels);
            if let Some(action) = action {
                if !action.message.is_empty() {
                    ticker_courier
                        .deliver(action.channel.as_deref(), &action.message)
                        .await;
                }
            }
        }
    });

    // Live reload of the persona file
    let _watcher = match &args.persona {
        Some(path) => {
            let (watcher, mut reload_rx) = watcher::PersonaWatcher::start(path, 100)?;
            let reload_engine = engine.clone();
            let path = path.clone();
            let seed = args.seed;
            tokio::spawn(async move {
                while reload_rx.recv().await.is_some() {
                    match PersonaConfig::from_file(&path).and_then(|c| build_engine(&c, seed)) {
                        Ok(new_engine) => {
                            *reload_engine.write().await = new_engine;
                            info!("Persona reloaded from {:?}", path);
                        }
                        Err(e) => warn!("Persona reload failed, keeping old rules: {}", e),
                    }
                }
            });
            Some(watcher)
        }
        None => None,
    };

    // Shutdown handler
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Masqued shutting down");
        std::process::exit(0);
    });

    // Local line frontend
    let default_channel = daemon_config.channels.default.clone();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    info!("Frontend ready on stdin (default channel #{})", default_channel);

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/info" {
            println!("{}", info_line(&*engine.read().await));
            continue;
        }

        // `#channel text` selects a channel, leading `@` is a mention
        let (channel, rest) = match line.strip_prefix('#') {
            Some(rest) => match rest.split_once(' ') {
                Some((channel, text)) => (channel.to_string(), text.trim()),
                None => (rest.to_string(), ""),
            },
            None => (default_channel.clone(), line),
        };
        let (mentioned, text) = match rest.strip_prefix('@') {
            Some(text) => (true, text.trim_start()),
            None => (false, rest),
        };

        let response = engine.read().await.on_message(text, &channel, mentioned);
        match response {
            Some(output) if !output.is_empty() => {
                courier.deliver(Some(&channel), &output).await;
            }
            _ => {
                // Rules stayed silent; a mention may still consult the oracle
                if mentioned {
                    if let Some(oracle) = &oracle {
                        if let Some(text) = oracle.complete(text).await {
                            courier
                                .deliver(Some(&channel), &masque_core::Output::Single(text))
                                .await;
                        }
                    }
                }
            }
        }
    }

    info!("Frontend input closed");
    Ok(())
}
