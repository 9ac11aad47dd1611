//! Lexer for the pattern language.
//!
//! Produces span-based tokens; text is sliced from the source only when
//! needed. `!=` is deliberately two tokens (`!` `=`) so the parser can
//! decide from context whether `!` negates a symbol or a value.

use logos::Logos;

use super::error::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("?")]
    Question,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("=")]
    Equals,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("<")]
    AngleOpen,
    #[token(">")]
    AngleClose,
    #[token(":")]
    Colon,

    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Label,

    #[regex("-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Float,

    /// Exactly one character between single quotes.
    #[regex(r"'[^']'")]
    CharLit,

    #[regex(r#""(\\.|[^"\\])*""#)]
    StringLit,
}

impl TokenKind {
    /// Short human-readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::Pipe => "`|`",
            TokenKind::Star => "`*`",
            TokenKind::Plus => "`+`",
            TokenKind::Question => "`?`",
            TokenKind::Tilde => "`~`",
            TokenKind::Bang => "`!`",
            TokenKind::Equals => "`=`",
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::BraceOpen => "`{`",
            TokenKind::BraceClose => "`}`",
            TokenKind::AngleOpen => "`<`",
            TokenKind::AngleClose => "`>`",
            TokenKind::Colon => "`:`",
            TokenKind::Label => "label",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::CharLit => "char literal",
            TokenKind::StringLit => "string literal",
        }
    }
}

/// Zero-copy token: kind + byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.start..token.end]
}

/// Tokenizes source, failing on the first bad span.
///
/// An error span beginning with a quote is an unterminated literal (the
/// automaton ran off the end of the input looking for the closing quote);
/// anything else is an unexpected character.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                start: span.start,
                end: span.end,
            }),
            Err(()) => {
                let pos = span.start;
                return Err(match source.as_bytes().get(pos) {
                    Some(b'"') => ParseError::UnterminatedString { pos },
                    Some(b'\'') => ParseError::UnterminatedChar { pos },
                    _ => ParseError::UnexpectedCharacter { pos },
                });
            }
        }
    }

    Ok(tokens)
}
