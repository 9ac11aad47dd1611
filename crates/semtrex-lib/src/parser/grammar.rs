//! Recursive descent over the token vector, producing a pattern tree.
//!
//! The pattern tree is an ordinary semantic tree whose nodes are tagged
//! with the `SEMTREX_*` builtin symbols. Precedence: alternation binds
//! looser than sequence, both looser than any atom-level construct;
//! quantifiers attach to the immediately preceding atom or group.

use semtrex_core::builtins::symbols as sym;
use semtrex_core::{NodeId, Registry, SemId, Surface, Tree};

use super::error::ParseError;
use super::lexer::{Token, TokenKind, lex, token_text};

/// Parse a pattern string against `registry`; all labels must resolve.
pub fn parse(source: &str, registry: &Registry) -> Result<(Tree, NodeId), ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        source,
        registry,
        tokens,
        pos: 0,
        tree: Tree::new(),
    };
    let root = parser.parse_semtrex()?;
    Ok((parser.tree, root))
}

struct Parser<'a> {
    source: &'a str,
    registry: &'a Registry,
    tokens: Vec<Token>,
    pos: usize,
    tree: Tree,
}

impl Parser<'_> {
    fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn nth_kind(&self, lookahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + lookahead).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.current() {
            Some(t) => ParseError::UnexpectedToken {
                expected,
                got: t.kind.describe().to_owned(),
                pos: t.start,
            },
            None => ParseError::UnterminatedConstruct {
                what: "pattern",
                pos: self.source.len(),
            },
        }
    }

    /// Expect the closing token of a delimited construct; EOF reports the
    /// construct unterminated at its opening position.
    fn expect_closing(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
        what: &'static str,
        open_pos: usize,
    ) -> Result<(), ParseError> {
        match self.current() {
            Some(t) if t.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => Err(ParseError::UnexpectedToken {
                expected,
                got: t.kind.describe().to_owned(),
                pos: t.start,
            }),
            None => Err(ParseError::UnterminatedConstruct {
                what,
                pos: open_pos,
            }),
        }
    }

    fn resolve_symbol(&self, token: Token) -> Result<SemId, ParseError> {
        let label = token_text(self.source, &token);
        self.registry
            .symbol_named(label)
            .ok_or_else(|| ParseError::UnknownSymbol {
                label: label.to_owned(),
                pos: token.start,
            })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Node helpers
    // ─────────────────────────────────────────────────────────────────────

    fn op(&mut self, symbol: SemId) -> NodeId {
        self.tree.new_node(symbol, Surface::Null)
    }

    fn wrap(&mut self, symbol: SemId, child: NodeId) -> NodeId {
        let node = self.op(symbol);
        self.tree.add_child(node, child);
        node
    }

    fn symbol_node(&mut self, symbol: SemId) -> NodeId {
        self.tree.new_node(sym::SEMTREX_SYMBOL, Surface::Id(symbol))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Grammar
    // ─────────────────────────────────────────────────────────────────────

    /// `semtrex = "/" siblings EOF`
    fn parse_semtrex(&mut self) -> Result<NodeId, ParseError> {
        if !self.eat(TokenKind::Slash) {
            return Err(self.unexpected("`/` at the start of a pattern"));
        }
        let root = self.parse_siblings()?;
        if let Some(t) = self.current() {
            return Err(ParseError::UnexpectedToken {
                expected: "end of pattern",
                got: t.kind.describe().to_owned(),
                pos: t.start,
            });
        }
        Ok(root)
    }

    fn parse_siblings(&mut self) -> Result<NodeId, ParseError> {
        self.parse_alternation()
    }

    /// `orExpr = seqExpr ("|" seqExpr)*`, folded into binary `OR`s from
    /// the right.
    fn parse_alternation(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_sequence()?;
        if self.eat(TokenKind::Pipe) {
            let rest = self.parse_alternation()?;
            let node = self.op(sym::SEMTREX_OR);
            self.tree.add_child(node, first);
            self.tree.add_child(node, rest);
            return Ok(node);
        }
        Ok(first)
    }

    /// `seqExpr = element ("," element)*`; a single element is not wrapped.
    fn parse_sequence(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_element()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let node = self.wrap(sym::SEMTREX_SEQUENCE, first);
        while self.eat(TokenKind::Comma) {
            let next = self.parse_element()?;
            self.tree.add_child(node, next);
        }
        Ok(node)
    }

    fn parse_element(&mut self) -> Result<NodeId, ParseError> {
        match self.kind() {
            Some(TokenKind::Percent) => {
                self.pos += 1;
                let inner = self.parse_element()?;
                Ok(self.wrap(sym::SEMTREX_WALK, inner))
            }
            Some(TokenKind::Tilde) => {
                self.pos += 1;
                let inner = self.parse_element()?;
                Ok(self.wrap(sym::SEMTREX_NOT, inner))
            }
            Some(TokenKind::AngleOpen) => {
                let group = self.parse_group()?;
                Ok(self.maybe_postfix(group))
            }
            _ => {
                let atom = self.parse_atom()?;
                Ok(self.maybe_postfix(atom))
            }
        }
    }

    fn maybe_postfix(&mut self, node: NodeId) -> NodeId {
        let op = match self.kind() {
            Some(TokenKind::Star) => sym::SEMTREX_ZERO_OR_MORE,
            Some(TokenKind::Plus) => sym::SEMTREX_ONE_OR_MORE,
            Some(TokenKind::Question) => sym::SEMTREX_ZERO_OR_ONE,
            _ => return node,
        };
        self.pos += 1;
        self.wrap(op, node)
    }

    /// `group = "<" LABEL ":" siblings ">"`; the label names the capture.
    fn parse_group(&mut self) -> Result<NodeId, ParseError> {
        let open = self.bump();
        debug_assert_eq!(open.kind, TokenKind::AngleOpen);

        let label = match self.current() {
            Some(t) if t.kind == TokenKind::Label => self.bump(),
            Some(t) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "capture label",
                    got: t.kind.describe().to_owned(),
                    pos: t.start,
                });
            }
            None => {
                return Err(ParseError::UnterminatedConstruct {
                    what: "capture group",
                    pos: open.start,
                });
            }
        };
        let capture = self.resolve_symbol(label)?;

        match self.current() {
            Some(t) if t.kind == TokenKind::Colon => {
                self.pos += 1;
            }
            Some(t) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "`:` after capture label",
                    got: t.kind.describe().to_owned(),
                    pos: t.start,
                });
            }
            None => {
                return Err(ParseError::UnterminatedConstruct {
                    what: "capture group",
                    pos: open.start,
                });
            }
        }

        let body = self.parse_siblings()?;
        self.expect_closing(
            TokenKind::AngleClose,
            "`>` to close the capture group",
            "capture group",
            open.start,
        )?;

        let node = self.tree.new_node(sym::SEMTREX_GROUP, Surface::Id(capture));
        self.tree.add_child(node, body);
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<NodeId, ParseError> {
        let Some(token) = self.current() else {
            return Err(ParseError::UnterminatedConstruct {
                what: "pattern",
                pos: self.source.len(),
            });
        };
        match token.kind {
            TokenKind::Slash => {
                self.pos += 1;
                let inner = self.parse_element()?;
                Ok(self.wrap(sym::SEMTREX_DESCEND, inner))
            }
            TokenKind::Dot => {
                self.pos += 1;
                Ok(self.op(sym::SEMTREX_SYMBOL_ANY))
            }
            TokenKind::ParenOpen => {
                self.pos += 1;
                let body = self.parse_siblings()?;
                self.expect_closing(
                    TokenKind::ParenClose,
                    "`)`",
                    "parenthesized pattern",
                    token.start,
                )?;
                Ok(body)
            }
            TokenKind::Bang => {
                self.pos += 1;
                match self.kind() {
                    Some(TokenKind::Label) => {
                        let label = self.bump();
                        let symbol = self.resolve_symbol(label)?;
                        let child = self.symbol_node(symbol);
                        Ok(self.wrap(sym::SEMTREX_SYMBOL_LITERAL_NOT, child))
                    }
                    Some(TokenKind::BraceOpen) => {
                        let set = self.parse_symbol_set()?;
                        Ok(self.wrap(sym::SEMTREX_SYMBOL_LITERAL_NOT, set))
                    }
                    _ => Err(self.unexpected("a symbol or symbol set after `!`")),
                }
            }
            TokenKind::BraceOpen => {
                let set = self.parse_symbol_set()?;
                Ok(self.wrap(sym::SEMTREX_SYMBOL_LITERAL, set))
            }
            TokenKind::Label => {
                self.pos += 1;
                let symbol = self.resolve_symbol(token)?;
                self.parse_post_label(symbol)
            }
            _ => Err(self.unexpected("a pattern element")),
        }
    }

    /// What may follow a bare label: `!= value`, `= value`, `/ child`
    /// (descent sugar, kept as the literal's second child), or nothing.
    fn parse_post_label(&mut self, symbol: SemId) -> Result<NodeId, ParseError> {
        if self.at(TokenKind::Bang) && self.nth_kind(1) == Some(TokenKind::Equals) {
            self.pos += 2;
            let value = self.parse_value_group(symbol)?;
            return Ok(self.wrap(sym::SEMTREX_VALUE_LITERAL_NOT, value));
        }
        if self.eat(TokenKind::Equals) {
            let value = self.parse_value_group(symbol)?;
            return Ok(self.wrap(sym::SEMTREX_VALUE_LITERAL, value));
        }
        if self.eat(TokenKind::Slash) {
            let child = self.parse_element()?;
            let node = self.op(sym::SEMTREX_SYMBOL_LITERAL);
            let sym_child = self.symbol_node(symbol);
            self.tree.add_child(node, sym_child);
            self.tree.add_child(node, child);
            return Ok(node);
        }
        let child = self.symbol_node(symbol);
        Ok(self.wrap(sym::SEMTREX_SYMBOL_LITERAL, child))
    }

    /// `symset = "{" LABEL ("," LABEL)* "}"`
    fn parse_symbol_set(&mut self) -> Result<NodeId, ParseError> {
        let open = self.bump();
        debug_assert_eq!(open.kind, TokenKind::BraceOpen);
        let set = self.op(sym::SEMTREX_SYMBOL_SET);
        loop {
            match self.current() {
                Some(t) if t.kind == TokenKind::Label => {
                    self.pos += 1;
                    let symbol = self.resolve_symbol(t)?;
                    let child = self.symbol_node(symbol);
                    self.tree.add_child(set, child);
                }
                Some(t) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "symbol label",
                        got: t.kind.describe().to_owned(),
                        pos: t.start,
                    });
                }
                None => {
                    return Err(ParseError::UnterminatedConstruct {
                        what: "symbol set",
                        pos: open.start,
                    });
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(
            TokenKind::BraceClose,
            "`}` to close the symbol set",
            "symbol set",
            open.start,
        )?;
        Ok(set)
    }

    /// `value(set) = value | "{" value ("," value)* "}"`
    fn parse_value_group(&mut self, symbol: SemId) -> Result<NodeId, ParseError> {
        if self.at(TokenKind::BraceOpen) {
            let open = self.bump();
            let set = self.op(sym::SEMTREX_VALUE_SET);
            loop {
                let value = self.parse_value_node(symbol)?;
                self.tree.add_child(set, value);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing(
                TokenKind::BraceClose,
                "`}` to close the value set",
                "value set",
                open.start,
            )?;
            return Ok(set);
        }
        self.parse_value_node(symbol)
    }

    /// A literal value carried as a node `(symbol, surface)`.
    fn parse_value_node(&mut self, symbol: SemId) -> Result<NodeId, ParseError> {
        let Some(token) = self.current() else {
            return Err(ParseError::UnterminatedConstruct {
                what: "value literal",
                pos: self.source.len(),
            });
        };
        let surface = match token.kind {
            TokenKind::Integer => {
                let text = token_text(self.source, &token);
                let value = text.parse::<i64>().map_err(|_| ParseError::UnexpectedToken {
                    expected: "integer literal",
                    got: text.to_owned(),
                    pos: token.start,
                })?;
                Surface::Int(value)
            }
            TokenKind::Float => {
                let text = token_text(self.source, &token);
                let value = text.parse::<f64>().map_err(|_| ParseError::UnexpectedToken {
                    expected: "float literal",
                    got: text.to_owned(),
                    pos: token.start,
                })?;
                Surface::Float(value)
            }
            TokenKind::CharLit => {
                let text = token_text(self.source, &token);
                let inner = &text[1..text.len() - 1];
                Surface::Char(inner.chars().next().expect("char literal has one char"))
            }
            TokenKind::StringLit => Surface::Str(self.decode_string(token)?),
            _ => return Err(self.unexpected("a value literal")),
        };
        self.pos += 1;
        Ok(self.tree.new_node(symbol, surface))
    }

    fn decode_string(&self, token: Token) -> Result<String, ParseError> {
        let text = token_text(self.source, &token);
        let inner = &text[1..text.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.char_indices();
        while let Some((offset, c)) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                _ => {
                    return Err(ParseError::UnexpectedCharacter {
                        pos: token.start + 1 + offset,
                    });
                }
            }
        }
        Ok(out)
    }
}
