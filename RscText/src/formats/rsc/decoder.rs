//! Record body decoding
//!
//! | Byte   | Token                |
//! |--------|----------------------|
//! | `0x00` | `NewLine`            |
//! | `0xF6` | `InputCursor`        |
//! | `0xFC` | `JustifyLeft`        |
//! | `0xFD` | `JustifyCenter`      |
//! | `0xFE` | `EndOfRecord`        |
//! | `0xFF` | `SubrecordSeparator` |
//!
//! Every other byte is a Latin-1 character; consecutive characters form one
//! `Text` token.

use crate::formats::token::{Token, TokenSequence};

pub const CODE_NEW_LINE: u8 = 0x00;
pub const CODE_INPUT_CURSOR: u8 = 0xF6;
pub const CODE_JUSTIFY_LEFT: u8 = 0xFC;
pub const CODE_JUSTIFY_CENTER: u8 = 0xFD;
pub const CODE_END_OF_RECORD: u8 = 0xFE;
pub const CODE_SUBRECORD_SEPARATOR: u8 = 0xFF;

/// Where decoding stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopAt {
    /// Stop at the first end-of-record code
    #[default]
    EndOfRecord,
    /// Decode the whole buffer; end-of-record codes inside it are dropped
    EndOfBuffer,
}

fn marker_for(byte: u8) -> Option<Token> {
    match byte {
        CODE_NEW_LINE => Some(Token::NewLine),
        CODE_INPUT_CURSOR => Some(Token::InputCursor),
        CODE_JUSTIFY_LEFT => Some(Token::JustifyLeft),
        CODE_JUSTIFY_CENTER => Some(Token::JustifyCenter),
        CODE_END_OF_RECORD => Some(Token::EndOfRecord),
        CODE_SUBRECORD_SEPARATOR => Some(Token::SubrecordSeparator),
        _ => None,
    }
}

/// Decode a record body starting at `start`.
///
/// The result always ends in exactly one `EndOfRecord`, appended if the buffer
/// runs out first. A `start` past the end yields just the terminator.
#[must_use]
pub fn decode_record(data: &[u8], start: usize, stop: StopAt) -> TokenSequence {
    let mut tokens = Vec::new();
    let mut text = String::new();

    for &byte in data.get(start..).unwrap_or_default() {
        match marker_for(byte) {
            Some(marker) => {
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                if marker == Token::EndOfRecord {
                    if stop == StopAt::EndOfRecord {
                        break;
                    }
                    continue;
                }
                tokens.push(marker);
            }
            // Latin-1 maps each byte to the code point of the same value
            None => text.push(char::from(byte)),
        }
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    TokenSequence::terminated(tokens)
}

/// Encode tokens into a record body.
///
/// Characters outside Latin-1 are written as `?`. Encoding stops after the
/// first `EndOfRecord`; one is appended if missing.
#[must_use]
pub fn encode_record(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::new();
    for token in tokens {
        match token {
            Token::Text(text) => {
                out.extend(text.chars().map(|c| match u8::try_from(u32::from(c)) {
                    Ok(b) if marker_for(b).is_none() => b,
                    _ => b'?',
                }));
            }
            Token::NewLine => out.push(CODE_NEW_LINE),
            Token::InputCursor => out.push(CODE_INPUT_CURSOR),
            Token::JustifyLeft => out.push(CODE_JUSTIFY_LEFT),
            Token::JustifyCenter => out.push(CODE_JUSTIFY_CENTER),
            Token::SubrecordSeparator => out.push(CODE_SUBRECORD_SEPARATOR),
            Token::EndOfRecord => {
                out.push(CODE_END_OF_RECORD);
                return out;
            }
        }
    }
    out.push(CODE_END_OF_RECORD);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_basic() {
        let data = b"Hello\xFDworld\xFF\xE9t\xE9\xFE";
        let seq = decode_record(data, 0, StopAt::EndOfRecord);
        assert_eq!(
            seq.tokens(),
            &[
                Token::text("Hello"),
                Token::JustifyCenter,
                Token::text("world"),
                Token::SubrecordSeparator,
                Token::text("été"),
                Token::EndOfRecord,
            ]
        );
    }

    #[test]
    fn test_decode_stops_at_first_terminator() {
        let seq = decode_record(b"one\xFEtwo\xFE", 0, StopAt::EndOfRecord);
        assert_eq!(seq.tokens(), &[Token::text("one"), Token::EndOfRecord]);

        let seq = decode_record(b"one\xFEtwo\xFE", 0, StopAt::EndOfBuffer);
        assert_eq!(
            seq.tokens(),
            &[Token::text("one"), Token::text("two"), Token::EndOfRecord]
        );
        assert!(seq.is_well_formed());
    }

    #[test]
    fn test_decode_unterminated_and_offsets() {
        let seq = decode_record(b"xxabc", 2, StopAt::EndOfRecord);
        assert_eq!(seq.tokens(), &[Token::text("abc"), Token::EndOfRecord]);

        let seq = decode_record(b"abc", 10, StopAt::EndOfRecord);
        assert_eq!(seq.tokens(), &[Token::EndOfRecord]);
    }

    #[test]
    fn test_encode_replaces_unencodable() {
        let bytes = encode_record(&[Token::text("a\u{2014}b"), Token::NewLine]);
        assert_eq!(bytes, b"a?b\x00\xFE");
    }
}
