//! Tokenizer over normalized header text.
//!
//! Tokens carry byte spans into the normalized text, so every later stage can
//! report offsets and slice verbatim source. Braces are paired once here; the
//! scope and extraction passes only look matches up.

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `[A-Za-z0-9_]+`, including numbers
    Ident,
    /// `::`
    PathSep,
    /// A quoted string or character literal
    Literal,
    Punct(char),
}

/// Byte range into the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokens of one normalized header, with every `{` paired to its `}`.
pub struct TokenStream<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// For each `{` token, the index of its matching `}` token.
    closers: Vec<Option<usize>>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize `source` and pair its braces.
///
/// Fails on a `}` with nothing open or a `{` left open at end of text.
pub fn tokenize(source: &str) -> Result<TokenStream<'_>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut iter = source.char_indices().peekable();

    while let Some((start, ch)) = iter.next() {
        if ch.is_whitespace() {
            continue;
        }

        let kind = if is_ident_char(ch) {
            let numeric = ch.is_ascii_digit();
            while let Some(&(i, c)) = iter.peek() {
                // 1'000'000 digit separators
                let separator = numeric
                    && c == '\''
                    && bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphanumeric());
                if is_ident_char(c) || separator {
                    iter.next();
                } else {
                    break;
                }
            }
            TokenKind::Ident
        } else if ch == '"' || ch == '\'' {
            let mut escaped = false;
            for (_, c) in iter.by_ref() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == ch {
                    break;
                }
            }
            TokenKind::Literal
        } else if ch == ':' && iter.peek().is_some_and(|&(_, c)| c == ':') {
            iter.next();
            TokenKind::PathSep
        } else {
            TokenKind::Punct(ch)
        };

        let end = iter.peek().map_or(source.len(), |&(i, _)| i);
        tokens.push(Token { kind, span: Span { start, end } });
    }

    let closers = pair_braces(&tokens)?;
    Ok(TokenStream { source, tokens, closers })
}

fn pair_braces(tokens: &[Token]) -> Result<Vec<Option<usize>>, ParseError> {
    let mut closers = vec![None; tokens.len()];
    let mut open: Vec<usize> = Vec::new();

    for (idx, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::Punct('{') => open.push(idx),
            TokenKind::Punct('}') => {
                let opener =
                    open.pop().ok_or(ParseError::UnmatchedClose { offset: tok.span.start })?;
                closers[opener] = Some(idx);
            }
            _ => {}
        }
    }

    match open.pop() {
        Some(idx) => Err(ParseError::UnterminatedScope { offset: tokens[idx].span.start }),
        None => Ok(closers),
    }
}

impl<'src> TokenStream<'src> {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    /// Byte offset where token `idx` starts, or end of text past the last token.
    pub fn offset(&self, idx: usize) -> usize {
        self.tokens.get(idx).map_or(self.source.len(), |t| t.span.start)
    }

    pub fn text(&self, idx: usize) -> &'src str {
        match self.tokens.get(idx) {
            Some(t) => &self.source[t.span.start..t.span.end],
            None => "",
        }
    }

    /// Verbatim normalized text from the start of token `from` to the start of token `to`.
    pub fn text_between(&self, from: usize, to: usize) -> &'src str {
        let start = self.offset(from);
        let end = self.offset(to).max(start);
        &self.source[start..end]
    }

    pub fn is_ident(&self, idx: usize, name: &str) -> bool {
        self.tokens.get(idx).is_some_and(|t| t.kind == TokenKind::Ident) && self.text(idx) == name
    }

    pub fn is_punct(&self, idx: usize, ch: char) -> bool {
        self.tokens.get(idx).is_some_and(|t| t.kind == TokenKind::Punct(ch))
    }

    /// Index of the `}` closing the `{` at `open`.
    pub fn closer(&self, open: usize) -> Option<usize> {
        self.closers.get(open).copied().flatten()
    }

    /// First index in `from..to` holding identifier `name`.
    pub fn find_ident(&self, from: usize, to: usize, name: &str) -> Option<usize> {
        (from..to.min(self.len())).find(|&i| self.is_ident(i, name))
    }

    /// First index in `from..to` holding punctuation `ch`.
    pub fn find_punct(&self, from: usize, to: usize, ch: char) -> Option<usize> {
        (from..to.min(self.len())).find(|&i| self.is_punct(i, ch))
    }
}

/// A forward-only position in a [`TokenStream`].
pub struct Cursor<'a, 'src> {
    stream: &'a TokenStream<'src>,
    pos: usize,
}

impl<'a, 'src> Cursor<'a, 'src> {
    pub fn new(stream: &'a TokenStream<'src>) -> Self {
        Self { stream, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to the next occurrence of identifier `name` and step past it.
    /// Returns the marker's token index.
    pub fn next_ident(&mut self, name: &str) -> Option<usize> {
        let found = self.stream.find_ident(self.pos, self.stream.len(), name)?;
        self.pos = found + 1;
        Some(found)
    }

    /// Jump to `pos`. The cursor never moves backwards.
    pub fn advance_to(&mut self, pos: usize) {
        self.pos = self.pos.max(pos);
    }
}
