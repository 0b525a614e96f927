//! Formatted text tokens
//!
//! A resolved text resource is a flat stream of [`Token`]s: literal text runs
//! interleaved with layout markers. Every sequence produced by resolution ends
//! in exactly one [`Token::EndOfRecord`].

use serde::Serialize;

/// One unit of a formatted text stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "text")]
pub enum Token {
    /// Literal text
    Text(String),
    /// Line break
    NewLine,
    /// End of line, next line left-justified
    JustifyLeft,
    /// End of line, next line centered
    JustifyCenter,
    /// Position of an input field in prompt text
    InputCursor,
    /// Boundary between alternative variants of the same record
    SubrecordSeparator,
    /// End of the record
    EndOfRecord,
}

/// Payload-free discriminant of a [`Token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Text,
    NewLine,
    JustifyLeft,
    JustifyCenter,
    InputCursor,
    SubrecordSeparator,
    EndOfRecord,
}

impl Token {
    /// Create a text token
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Get the kind of this token
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Text(_) => TokenKind::Text,
            Self::NewLine => TokenKind::NewLine,
            Self::JustifyLeft => TokenKind::JustifyLeft,
            Self::JustifyCenter => TokenKind::JustifyCenter,
            Self::InputCursor => TokenKind::InputCursor,
            Self::SubrecordSeparator => TokenKind::SubrecordSeparator,
            Self::EndOfRecord => TokenKind::EndOfRecord,
        }
    }

    /// Text payload, or an empty string for markers
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::Text(text) => text,
            _ => "",
        }
    }

    /// Whether this token ends a visual line
    #[must_use]
    pub fn is_line_break(&self) -> bool {
        matches!(self, Self::NewLine | Self::JustifyLeft | Self::JustifyCenter)
    }
}

impl TokenKind {
    /// Build the marker token for this kind.
    ///
    /// Returns `None` for [`TokenKind::Text`], which needs a payload.
    #[must_use]
    pub fn marker(self) -> Option<Token> {
        match self {
            Self::Text => None,
            Self::NewLine => Some(Token::NewLine),
            Self::JustifyLeft => Some(Token::JustifyLeft),
            Self::JustifyCenter => Some(Token::JustifyCenter),
            Self::InputCursor => Some(Token::InputCursor),
            Self::SubrecordSeparator => Some(Token::SubrecordSeparator),
            Self::EndOfRecord => Some(Token::EndOfRecord),
        }
    }
}

/// Ordered, immutable sequence of tokens for one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    /// Wrap a token vector
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Wrap a token vector, appending an [`Token::EndOfRecord`] unless the
    /// last token already is one.
    #[must_use]
    pub fn terminated(mut tokens: Vec<Token>) -> Self {
        if tokens.last() != Some(&Token::EndOfRecord) {
            tokens.push(Token::EndOfRecord);
        }
        Self { tokens }
    }

    /// Borrow the tokens
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Iterate over the payloads of all text tokens
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the sequence ends in exactly one end-of-record marker with
    /// none before it
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self.tokens.split_last() {
            Some((Token::EndOfRecord, rest)) => !rest.contains(&Token::EndOfRecord),
            _ => false,
        }
    }

    /// Render as plain text.
    ///
    /// Line markers and variant separators become `\n`; input cursors and the
    /// terminator are dropped. Trailing newlines are trimmed.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::SubrecordSeparator => out.push('\n'),
                t if t.is_line_break() => out.push('\n'),
                _ => {}
            }
        }
        out.truncate(out.trim_end_matches('\n').len());
        out
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Build a token sequence from raw lines.
///
/// Each line becomes a [`Token::Text`] followed by a `terminator` marker, and
/// a single [`Token::EndOfRecord`] closes the sequence. A `Text` terminator has
/// no marker form and is skipped.
pub fn build_tokens<I, S>(terminator: TokenKind, lines: I) -> TokenSequence
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let marker = terminator.marker();
    let mut tokens = Vec::new();
    for line in lines {
        tokens.push(Token::Text(line.into()));
        if let Some(marker) = &marker {
            tokens.push(marker.clone());
        }
    }
    tokens.push(Token::EndOfRecord);
    TokenSequence::new(tokens)
}
