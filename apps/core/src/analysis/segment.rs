//! Sentence segmentation for email text.
//!
//! Rule-based splitter in the spirit of Punkt: terminal punctuation only ends
//! a sentence when it is followed by whitespace and a plausible sentence
//! opener, and never after a known abbreviation, an initial, or an ellipsis
//! that continues in lower case. Emails are line-structured (subject,
//! salutation, sign-off), so short lines and lines ending in punctuation are
//! boundaries too; long hard-wrapped lines are joined back together.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Lines shorter than this are treated as standalone segments.
const SHORT_LINE_CHARS: usize = 40;

static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Titles
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "rev", "hon", "capt", "gen", "sen",
        // Latin and common shorthands
        "e.g", "i.e", "etc", "vs", "cf", "al", "approx", "est", "misc", "viz",
        // Business
        "inc", "ltd", "co", "corp", "llc", "dept", "div", "assn", "bros", "ref",
        "attn", "encl", "fig", "ext", "tel", "p.s", "ps",
        // Time
        "a.m", "p.m", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
        "nov", "dec", "mon", "tue", "tues", "wed", "thu", "thur", "thurs", "fri",
        // Places
        "u.s", "u.k", "ave", "blvd", "rd", "mt",
    ]
    .into_iter()
    .collect()
});

/// Abbreviations that are also everyday words, so they only hold a sentence
/// together before a number ("No. 5").
static NUMBER_ABBREVIATIONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["no", "nos", "vol", "pp"].into_iter().collect());

/// Split `text` into trimmed, non-empty sentences in source order.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for block in logical_blocks(text) {
        split_block(&block, &mut sentences);
    }

    sentences
}

/// Group physical lines into blocks that may still contain several sentences.
fn logical_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line = line.trim();

        if line.is_empty() {
            flush(&mut current, &mut blocks);
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);

        if ends_block(line) {
            flush(&mut current, &mut blocks);
        }
    }

    flush(&mut current, &mut blocks);
    blocks
}

fn ends_block(line: &str) -> bool {
    if line.chars().count() < SHORT_LINE_CHARS {
        return true;
    }

    matches!(
        line.chars().last(),
        Some('.' | '!' | '?' | '…' | ',' | ':' | ';')
    )
}

fn flush(current: &mut String, blocks: &mut Vec<String>) {
    if !current.trim().is_empty() {
        blocks.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

fn split_block(block: &str, sentences: &mut Vec<String>) {
    let chars: Vec<(usize, char)> = block.char_indices().collect();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (_, ch) = chars[i];

        if !is_terminator(ch) {
            i += 1;
            continue;
        }

        // Consume the full run of terminators and any closing quotes/brackets.
        let run_start = i;
        while i < chars.len() && is_terminator(chars[i].1) {
            i += 1;
        }
        let run: String = chars[run_start..i].iter().map(|(_, c)| *c).collect();
        while i < chars.len() && is_closer(chars[i].1) {
            i += 1;
        }

        // A boundary needs whitespace (or the end of the block) right after.
        let end_byte = chars.get(i).map(|(b, _)| *b).unwrap_or(block.len());
        if i < chars.len() && !chars[i].1.is_whitespace() {
            continue;
        }

        let next = chars[i..]
            .iter()
            .map(|(_, c)| *c)
            .find(|c| !c.is_whitespace());

        if is_boundary(&run, &block[..chars[run_start].0], next) {
            push_sentence(&block[start..end_byte], sentences);
            start = end_byte;
        }
    }

    if start < block.len() {
        push_sentence(&block[start..], sentences);
    }
}

fn is_boundary(run: &str, before: &str, next: Option<char>) -> bool {
    let Some(next) = next else {
        return true;
    };

    let is_ellipsis = run.starts_with("..") || run.contains('…');
    let has_strong = run.contains('!') || run.contains('?');

    if has_strong && !is_ellipsis {
        return true;
    }

    if next.is_lowercase() {
        return false;
    }

    if is_ellipsis {
        return true;
    }

    let previous_token = before
        .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '"')
        .next()
        .unwrap_or("")
        .trim_start_matches(['\'', '“', '‘']);

    if next.is_ascii_digit() && NUMBER_ABBREVIATIONS.contains(previous_token.to_lowercase().as_str()) {
        return false;
    }

    !is_abbreviation(previous_token)
}

fn is_abbreviation(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    let lower = token.to_lowercase();
    if ABBREVIATIONS.contains(lower.as_str()) {
        return true;
    }

    // Single-letter initials ("J. Smith") and dotted acronyms ("U.S.A").
    let letters: Vec<&str> = lower.split('.').collect();
    letters.iter().all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’' | '»')
}

fn push_sentence(fragment: &str, sentences: &mut Vec<String>) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
