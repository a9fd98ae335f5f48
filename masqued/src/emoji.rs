//! Emoji tag resolution
//!
//! Expressions may carry `:name:` tags that the delivery layer
//! rewrites to platform emoji tags before transmission. The lookup
//! table lives in a TOML file (`name = "<:name:123456>"`) and is read
//! lazily on first use, then cached for the lifetime of the daemon.
//! This cache belongs here, in the delivery collaborator; the persona
//! core stays stateless.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

static TAG: OnceCell<Regex> = OnceCell::new();

fn tag_regex() -> &'static Regex {
    TAG.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+):").unwrap())
}

/// Lazily loaded emoji tag table
#[derive(Debug)]
pub struct EmojiBook {
    path: Option<PathBuf>,
    table: OnceCell<HashMap<String, String>>,
}

impl EmojiBook {
    /// Book backed by a table file
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            table: OnceCell::new(),
        }
    }

    /// Book with a fixed table, for tests
    #[cfg(test)]
    pub fn with_table(table: HashMap<String, String>) -> Self {
        let cell = OnceCell::new();
        cell.set(table).ok();
        Self { path: None, table: cell }
    }

    fn table(&self) -> &HashMap<String, String> {
        self.table.get_or_init(|| {
            let Some(path) = &self.path else {
                return HashMap::new();
            };
            match std::fs::read_to_string(path).map_err(anyhow::Error::from).and_then(|content| {
                toml::from_str::<HashMap<String, String>>(&content).map_err(Into::into)
            }) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Failed to load emoji table from {:?}: {}", path, e);
                    HashMap::new()
                }
            }
        })
    }

    /// Rewrite `:name:` tags to their platform form.
    ///
    /// Tags already in platform form (`<:name:123>`) and tags followed
    /// by digits are left alone, as is any name missing from the
    /// table.
    pub fn resolve(&self, text: &str) -> String {
        let table = self.table();
        if table.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in tag_regex().captures_iter(text) {
            let whole = caps.get(0).unwrap();
            let preceded_by_angle = text[..whole.start()].ends_with('<');
            let followed_by_digit = text[whole.end()..]
                .chars()
                .next()
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false);

            out.push_str(&text[last..whole.start()]);
            match table.get(&caps[1]) {
                Some(tag) if !preceded_by_angle && !followed_by_digit => out.push_str(tag),
                _ => out.push_str(whole.as_str()),
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
        out
    }
}
