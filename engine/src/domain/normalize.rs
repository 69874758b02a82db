// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Text normalization applied before embedding.
//!
//! The transform is pure and idempotent: lowercase, drop every character
//! outside lowercase letters / digits / whitespace / `. , ! ? ; : ' -`,
//! collapse whitespace runs to a single space, trim. Stripping runs before
//! collapsing so that removed characters cannot leave a double space behind.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s.,!?;:'-]").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw comment text for embedding.
///
/// Empty and whitespace-only input normalizes to the empty string; callers
/// treat that as invalid input, not as a text to embed.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let collapsed = WHITESPACE_RUNS.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(
            normalize("The   Server\n\tCrashed  During Deployment"),
            "the server crashed during deployment"
        );
    }

    #[test]
    fn keeps_the_retained_punctuation_set() {
        assert_eq!(
            normalize("Wait... really?! Yes; it's live: v2-beta, now"),
            "wait... really?! yes; it's live: v2-beta, now"
        );
    }

    #[test]
    fn strips_everything_else() {
        assert_eq!(normalize("deploy @ 5pm (maybe) #urgent 💥"), "deploy 5pm maybe urgent");
        assert_eq!(normalize("Café ➜ closed"), "caf closed");
    }

    #[test]
    fn stripped_characters_do_not_leave_double_spaces() {
        assert_eq!(normalize("a # b"), "a b");
        assert_eq!(normalize("(a) [b] {c}"), "a b c");
    }

    #[test]
    fn empty_and_whitespace_only_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n  "), "");
        assert_eq!(normalize("🙂🙂🙂"), "");
    }

    #[test]
    fn idempotent_on_arbitrary_input() {
        let cases = [
            "",
            "   ",
            "Hello, World!",
            "a # b",
            "MIXED case\twith\nlines",
            "ünïcödé outside the set — em dash too",
            "numbers 123 and symbols $%^&*",
            "already normalized text.",
        ];
        for case in cases {
            let once = normalize(case);
            assert_eq!(normalize(&once), once, "not idempotent for {case:?}");
        }
    }
}
