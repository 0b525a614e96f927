//! Conversion between localized strings and token sequences
//!
//! Localized strings carry layout as inline markup tags:
//!
//! | Markup                  | Token                |
//! |-------------------------|----------------------|
//! | `[/newline]` or `\n`    | `NewLine`            |
//! | `[/left]`               | `JustifyLeft`        |
//! | `[/center]`             | `JustifyCenter`      |
//! | `[/input]`              | `InputCursor`        |
//! | `[/record]`             | `SubrecordSeparator` |
//! | `[/end]`                | `EndOfRecord`        |
//!
//! Anything else, including unknown `[/...]` tags, is literal text.

use crate::formats::token::{Token, TokenSequence};

static TAGS: [(&str, Token); 6] = [
    ("[/newline]", Token::NewLine),
    ("[/left]", Token::JustifyLeft),
    ("[/center]", Token::JustifyCenter),
    ("[/input]", Token::InputCursor),
    ("[/record]", Token::SubrecordSeparator),
    ("[/end]", Token::EndOfRecord),
];

fn tag_at(s: &str) -> Option<(&'static str, Token)> {
    TAGS.iter()
        .find(|(tag, _)| s.starts_with(tag))
        .map(|(tag, token)| (*tag, token.clone()))
}

/// Convert a localized string into a well-formed token sequence.
///
/// The result ends in exactly one `EndOfRecord`; text after an explicit
/// `[/end]` is ignored. Carriage returns are dropped.
#[must_use]
pub fn string_to_tokens(s: &str) -> TokenSequence {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = s;

    while let Some(c) = rest.chars().next() {
        let (marker, consumed) = if c == '\n' {
            (Some(Token::NewLine), 1)
        } else if c == '[' {
            match tag_at(rest) {
                Some((tag, token)) => (Some(token), tag.len()),
                None => (None, 1),
            }
        } else {
            (None, c.len_utf8())
        };

        match marker {
            Some(token) => {
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                if token == Token::EndOfRecord {
                    break;
                }
                tokens.push(token);
            }
            None if c == '\r' => {}
            None => text.push(c),
        }
        rest = &rest[consumed..];
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    TokenSequence::terminated(tokens)
}

/// Convert tokens back into markup.
///
/// `NewLine` is written as `\n`; the trailing `EndOfRecord` is omitted, so
/// the output of [`string_to_tokens`] converts back to its input modulo
/// `[/newline]` spelling.
#[must_use]
pub fn tokens_to_string(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::NewLine => out.push('\n'),
            Token::EndOfRecord => break,
            marker => {
                if let Some((tag, _)) = TAGS.iter().find(|(_, t)| t == marker) {
                    out.push_str(tag);
                }
            }
        }
    }
    out
}
