//! Language-independent tokens: web links and invisible characters.
//!
//! These are layered on top of parser output, since no grammar reports them.

use crate::merge::TextRange;
use crate::token::{Category, Token};
use regex::Regex;
use std::sync::LazyLock;

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?|ftp)://[^\s<>"'`)\]]+|www\.[^\s<>"'`)\]]+\.[^\s<>"'`)\]]+"#)
        .expect("link pattern is a valid regex")
});

/// Characters that render with no visible width.
pub const HIDDEN_CHARS: &[char] = &[
    '\u{00AD}', // soft hyphen
    '\u{034F}', // combining grapheme joiner
    '\u{061C}', // arabic letter mark
    '\u{115F}',
    '\u{1160}',
    '\u{17B4}',
    '\u{17B5}',
    '\u{180E}', // mongolian vowel separator
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{2060}', // word joiner
    '\u{2061}',
    '\u{2062}',
    '\u{2063}',
    '\u{2064}',
    '\u{3164}', // hangul filler
    '\u{FEFF}', // byte order mark
    '\u{FFA0}',
];

/// Whether `ch` is an invisible character that should be surfaced as [`Category::HiddenChar`].
pub fn is_hidden_char(ch: char) -> bool {
    HIDDEN_CHARS.contains(&ch)
}

/// Find links and hidden characters in the lines of `text` covered by `range`.
pub fn special_tokens(text: &str, range: TextRange) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (idx, line_text) in text.lines().enumerate() {
        let line = idx + 1;
        if !range.contains_line(line) {
            if range.end.is_some_and(|end| line > end) {
                break;
            }
            continue;
        }

        for m in LINK_REGEX.find_iter(line_text) {
            tokens.push(Token::new(line, m.start(), m.len(), Category::Link));
        }

        for (column, ch) in line_text.char_indices() {
            if is_hidden_char(ch) {
                tokens.push(Token::new(line, column, ch.len_utf8(), Category::HiddenChar));
            }
        }
    }

    tokens
}
