//! `{N}` placeholder rendering
//!
//! Templates reference capture groups by index: `{0}` is the whole
//! match, `{1}` the first group, and so on. An index with no
//! corresponding capture leaves the placeholder verbatim; this is a
//! deliberate fallback, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([0-9]+)\}").unwrap());

/// Render a template against a capture list.
///
/// `captures[N]` is `None` when group N participated in no match
/// (e.g. an unmatched optional group).
pub fn render(template: &str, captures: &[Option<String>]) -> String {
    PLACEHOLDER
        .replace_all(template, |m: &regex::Captures<'_>| {
            let index: usize = m[1].parse().unwrap_or(usize::MAX);
            match captures.get(index) {
                Some(Some(value)) => Cow::Owned(value.clone()),
                _ => Cow::Owned(m[0].to_string()),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_substitutes_group() {
        let out = render("hello {1}", &caps(&["hi Bob", "Bob"]));
        assert_eq!(out, "hello Bob");
    }

    #[test]
    fn test_unknown_index_left_verbatim() {
        let out = render("hello {2}", &caps(&["hi Bob", "Bob"]));
        assert_eq!(out, "hello {2}");
    }

    #[test]
    fn test_whole_match_is_group_zero() {
        let out = render("you said: {0}", &caps(&["hi Bob"]));
        assert_eq!(out, "you said: hi Bob");
    }

    #[test]
    fn test_unmatched_group_left_verbatim() {
        let captures = vec![Some("x".to_string()), None];
        assert_eq!(render("got {1}", &captures), "got {1}");
    }

    #[test]
    fn test_empty_captures_render_identity() {
        assert_eq!(render("tick {0} tock {3}", &[]), "tick {0} tock {3}");
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(render("plain text", &caps(&["whatever"])), "plain text");
    }
}
