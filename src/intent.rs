//! Keyword rules that turn a line of user text into an intent and its slots.
//!
//! Keywords match case-insensitively; slot values keep the user's casing.

use crate::models::{Intent, SLOT_PROMPT, SLOT_TASK, SLOT_TEXT, Slots};
use tracing::debug;

/// Prompt used when an ASK_AI keyword arrives with nothing after it
pub const DEFAULT_PROMPT: &str = "Give a brief, encouraging tip.";

const HELP_WORDS: &[&str] = &["help", "h", "?"];
const GREET_PREFIXES: &[&str] = &["hello", "hi"];
const ECHO_PREFIXES: &[&str] = &["echo "];
const ASK_PREFIXES: &[&str] = &["ai:", "explain ", "ask "];
const CREATE_PREFIXES: &[&str] = &["add ", "create "];
const LIST_WORDS: &[&str] = &["list", "show", "ls"];
const DELETE_PREFIXES: &[&str] = &["remove ", "delete "];

/// Classify `input`. First matching rule wins.
pub fn detect(input: &str) -> (Intent, Slots) {
    let (intent, slots) = classify(input.trim());
    debug!(%intent, slots = slots.len(), "detected intent");
    (intent, slots)
}

fn classify(s: &str) -> (Intent, Slots) {
    if s.is_empty() {
        return (Intent::Unknown, Slots::new());
    }
    if is_one_of(s, HELP_WORDS) {
        return (Intent::Help, Slots::new());
    }
    if strip_any(s, GREET_PREFIXES).is_some() {
        return (Intent::Greet, Slots::new());
    }
    if let Some(rest) = strip_any(s, ECHO_PREFIXES) {
        return (Intent::Echo, Slots::new().with(SLOT_TEXT, rest.trim()));
    }
    if let Some(rest) = strip_any(s, ASK_PREFIXES) {
        let prompt = match rest.trim() {
            "" => DEFAULT_PROMPT,
            p => p,
        };
        return (Intent::AskAi, Slots::new().with(SLOT_PROMPT, prompt));
    }
    if let Some(rest) = strip_any(s, CREATE_PREFIXES) {
        return (Intent::Create, Slots::new().with(SLOT_TASK, rest.trim()));
    }
    if is_one_of(s, LIST_WORDS) {
        return (Intent::List, Slots::new());
    }
    if let Some(rest) = strip_any(s, DELETE_PREFIXES) {
        return (Intent::Delete, Slots::new().with(SLOT_TASK, rest.trim()));
    }
    (Intent::Unknown, Slots::new())
}

fn is_one_of(s: &str, words: &[&str]) -> bool {
    words.iter().any(|w| s.eq_ignore_ascii_case(w))
}

/// Remainder of `s` after the first matching keyword, if any
fn strip_any<'a>(s: &'a str, keywords: &[&str]) -> Option<&'a str> {
    keywords.iter().find_map(|kw| strip_keyword(s, kw))
}

fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    // `get` refuses to split a multi-byte char, so non-ASCII heads never match
    let head = s.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| &s[keyword.len()..])
}
