use crate::asm::literal::Literal;
use crate::asm::tokens::keyword::{Directive, Instruction, Keyword, Operand, Symbol};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use strum::AsRefStr;

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TokenKind {
    End,
    Directive,
    Identifier,
    Instruction,
    Label,
    Literal,
    Operand,
    Scalar,
    Symbol,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Payload {
    Text(Literal),
    Scalar(u16),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Scalar(0)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    subtype: usize,
    source: Option<Arc<Path>>,
    line: u32,
    payload: Payload,
}

impl Token {
    pub fn new(kind: TokenKind, subtype: usize, source: Arc<Path>, line: u32) -> Token {
        Token {
            kind,
            subtype,
            source: Some(source),
            line,
            payload: Payload::default(),
        }
    }

    /// The terminal token. It has no source position.
    pub fn end() -> Token {
        Token {
            kind: TokenKind::End,
            subtype: 0,
            source: None,
            line: 0,
            payload: Payload::default(),
        }
    }

    pub fn keyword<K: Keyword>(keyword: K, source: Arc<Path>, line: u32) -> Token {
        Token::new(K::KIND, keyword.subtype(), source, line)
    }

    /// A token carrying a copy of `literal`.
    pub fn text(kind: TokenKind, literal: &Literal, source: Arc<Path>, line: u32) -> Token {
        let mut token = Token::new(kind, 0, source, line);
        token.set_literal(literal);
        token
    }

    pub fn scalar(value: u16, source: Arc<Path>, line: u32) -> Token {
        let mut token = Token::new(TokenKind::Scalar, 0, source, line);
        token.set_scalar(value);
        token
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn subtype(&self) -> usize {
        self.subtype
    }

    pub fn source(&self) -> Option<&Arc<Path>> {
        self.source.as_ref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn set_literal(&mut self, literal: &Literal) {
        self.payload = Payload::Text(literal.clone());
    }

    pub fn set_scalar(&mut self, value: u16) {
        self.payload = Payload::Scalar(value);
    }

    pub fn literal(&self) -> Option<&Literal> {
        match &self.payload {
            Payload::Text(literal) => Some(literal),
            Payload::Scalar(_) => None,
        }
    }

    pub fn get_scalar(&self) -> Option<u16> {
        match self.payload {
            Payload::Scalar(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    fn keyword_of<K: Keyword>(&self) -> Option<K> {
        if self.kind == K::KIND {
            K::from_subtype(self.subtype)
        } else {
            None
        }
    }

    pub fn directive(&self) -> Option<Directive> {
        self.keyword_of()
    }

    pub fn instruction(&self) -> Option<Instruction> {
        self.keyword_of()
    }

    pub fn operand(&self) -> Option<Operand> {
        self.keyword_of()
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.keyword_of()
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }
}

/// One line of the token listing.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}]", self.kind, self.subtype)?;
        let Some(source) = &self.source else {
            return write!(f, " END");
        };
        match &self.payload {
            Payload::Text(literal) => write!(f, " \"{literal}\"")?,
            Payload::Scalar(value) if self.kind == TokenKind::Scalar => {
                write!(f, " {value:04X} ({value})")?
            }
            Payload::Scalar(_) => {}
        }
        write!(f, " ({}@{})", source.display(), self.line)
    }
}
