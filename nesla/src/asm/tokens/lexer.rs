use crate::asm::error_codes::ErrorCode;
use crate::asm::list::{EntryId, Iter, List};
use crate::asm::literal::Literal;
use crate::asm::reader::{ByteReader, FileReader, Reader};
use crate::asm::stream::{CharacterClass, Stream};
use crate::asm::tokens::keyword::{Directive, Instruction, Keyword, Operand, Symbol};
use crate::asm::tokens::token::{Token, TokenKind};
use crate::asm::{Error, Position};
use std::num::IntErrorKind;
use std::path::Path;
use std::sync::Arc;

/// What the scan loop does after a lexeme has been handled.
enum Step {
    /// The character under the cursor belongs to the handled lexeme.
    Advance,
    /// The character under the cursor has not been looked at yet.
    Hold,
    /// The input ran out while reading the lexeme.
    Exhausted,
}

impl Step {
    fn after_run(more: bool) -> Step {
        if more {
            Step::Hold
        } else {
            Step::Exhausted
        }
    }
}

/// Splits an assembly source into tokens.
///
/// The whole source is tokenized when the lexer is created. Afterwards the
/// tokens are consumed in order through [`Lexer::get`] and [`Lexer::next`].
/// The last token is always [`TokenKind::End`].
pub struct Lexer<R>
where
    R: Reader + Sized,
{
    stream: Stream<R>,
    tokens: List<Token>,
    literal: Literal,
    index: usize,
    cursor: Option<EntryId>,
}

impl Lexer<FileReader> {
    pub fn open(path: impl AsRef<Path>) -> Result<Lexer<FileReader>, Error> {
        Lexer::new(FileReader::open(path)?)
    }
}

impl Lexer<ByteReader> {
    pub fn from_text(
        text: impl Into<String>,
        source: Arc<Path>,
    ) -> Result<Lexer<ByteReader>, Error> {
        Lexer::new(ByteReader::from_string(text, source))
    }
}

impl<R> Lexer<R>
where
    R: Reader + Sized,
{
    pub fn new(reader: R) -> Result<Lexer<R>, Error> {
        let mut lexer = Lexer {
            stream: Stream::new(reader)?,
            tokens: List::new(),
            literal: Literal::new(),
            index: 0,
            cursor: None,
        };
        lexer.parse()?;
        Ok(lexer)
    }

    pub fn source(&self) -> Arc<Path> {
        self.stream.path().clone()
    }

    /// Moves the stream forward. Returns `false` at the end of input.
    fn advance(&mut self) -> Result<bool, Error> {
        match self.stream.next() {
            Ok(()) => Ok(true),
            Err(err) if err.is(ErrorCode::EndOfFile) => Ok(false),
            Err(err) => Err(err),
        }
    }

    // precondition: the current character is already part of the lexeme
    // Moves past it and appends every following character matching `cond`.
    // Returns `false` if the input ran out.
    fn read_while<F>(&mut self, cond: F) -> Result<bool, Error>
    where
        F: Fn(u8) -> bool,
    {
        loop {
            if !self.advance()? {
                return Ok(false);
            }
            let ch = self.stream.get();
            if !cond(ch) {
                return Ok(true);
            }
            self.literal.append(ch)?;
        }
    }

    fn match_type<K: Keyword>(&self) -> Option<K> {
        K::lookup(&self.literal)
    }

    fn emit(&mut self, token: Token) -> Result<(), Error> {
        tracing::trace!("{token}");
        self.tokens.push_back(token)?;
        Ok(())
    }

    fn emit_keyword<K: Keyword>(&mut self, keyword: K, line: u32) -> Result<(), Error> {
        self.emit(Token::keyword(keyword, self.source(), line))
    }

    fn emit_text(&mut self, kind: TokenKind, line: u32) -> Result<(), Error> {
        let token = Token::text(kind, &self.literal, self.source(), line);
        self.emit(token)
    }

    fn error_at(&self, error: Error, pos: Position) -> Error {
        error.at(self.source(), pos)
    }

    // LOOP: INX
    // ^~~ cursor is here
    fn parse_alpha(&mut self) -> Result<Step, Error> {
        let line = self.stream.line();
        self.literal.clear();
        self.literal.append(self.stream.get())?;
        let more = self.read_while(|ch| ch.is_ascii_alphanumeric() || ch == b'_')?;
        if more && self.stream.get() == b':' {
            self.emit_text(TokenKind::Label, line)?;
            return Ok(Step::Advance);
        }
        if let Some(instruction) = self.match_type::<Instruction>() {
            self.emit_keyword(instruction, line)?;
        } else if let Some(operand) = self.match_type::<Operand>() {
            self.emit_keyword(operand, line)?;
        } else {
            self.emit_text(TokenKind::Identifier, line)?;
        }
        Ok(Step::after_run(more))
    }

    // LDA 255
    //     ^~~ cursor is here
    fn parse_digit(&mut self) -> Result<Step, Error> {
        let pos = self.stream.pos();
        self.literal.clear();
        self.literal.append(self.stream.get())?;
        let more = self.read_while(|ch| ch.is_ascii_alphanumeric())?;
        self.emit_scalar(10, "", pos)?;
        Ok(Step::after_run(more))
    }

    // LDA #$10
    //      ^~~ cursor is here
    fn parse_prefixed_scalar(&mut self, radix: u32) -> Result<Step, Error> {
        let pos = self.stream.pos();
        let prefix = self.stream.get() as char;
        self.literal.clear();
        let more = self.read_while(|ch| ch.is_ascii_alphanumeric())?;
        self.emit_scalar(radix, &prefix.to_string(), pos)?;
        Ok(Step::after_run(more))
    }

    fn emit_scalar(&mut self, radix: u32, prefix: &str, pos: Position) -> Result<(), Error> {
        let text = self.literal.as_str();
        let value = u16::from_str_radix(&text, radix).map_err(|err| {
            let error = match err.kind() {
                IntErrorKind::PosOverflow => raise!(
                    ErrorCode::ScalarOverflow,
                    "Scalar out of range: {prefix}{text}"
                ),
                _ => raise!(ErrorCode::InvalidScalar, "Invalid scalar: {prefix}{text}"),
            };
            self.error_at(error, pos)
        })?;
        self.emit(Token::scalar(value, self.source(), pos.line()))
    }

    // ; comment
    // ^~~ cursor is here
    fn skip_comment(&mut self) -> Result<Step, Error> {
        loop {
            if !self.advance()? {
                return Ok(Step::Exhausted);
            }
            if self.stream.get() == b'\n' {
                return Ok(Step::Hold);
            }
        }
    }

    // .BYTE 1, 2
    // ^~~ cursor is here
    fn parse_directive(&mut self) -> Result<Step, Error> {
        let pos = self.stream.pos();
        self.literal.clear();
        let more = self.read_while(|ch| ch.is_ascii_alphabetic())?;
        let Some(directive) = self.match_type::<Directive>() else {
            let error = raise!(
                ErrorCode::UnsupportedDirective,
                "Unsupported directive: .{}",
                self.literal
            );
            return Err(self.error_at(error, pos));
        };
        self.emit_keyword(directive, pos.line())?;
        Ok(Step::after_run(more))
    }

    // .INC "file.asm"
    //      ^~~ cursor is here
    fn parse_string(&mut self) -> Result<Step, Error> {
        let pos = self.stream.pos();
        let mut is_escaped = false;
        self.literal.clear();
        loop {
            if !self.advance()? {
                let error = raise!(ErrorCode::UnterminatedLiteral, "Unterminated literal");
                return Err(self.error_at(error, pos));
            }
            match self.stream.get() {
                b'\\' => {
                    if is_escaped {
                        self.literal.append(b'\\')?;
                    }
                    is_escaped = !is_escaped;
                }
                b'"' => {
                    if is_escaped {
                        self.literal.append(b'"')?;
                        is_escaped = false;
                    } else {
                        self.emit_text(TokenKind::Literal, pos.line())?;
                        return Ok(Step::Advance);
                    }
                }
                b'\n' => {
                    let error = raise!(ErrorCode::UnterminatedLiteral, "Unterminated literal");
                    return Err(self.error_at(error, pos));
                }
                ch => {
                    is_escaped = false;
                    self.literal.append(ch)?;
                }
            }
        }
    }

    fn parse_symbol(&mut self) -> Result<Step, Error> {
        match self.stream.get() {
            b';' => self.skip_comment(),
            b'.' => self.parse_directive(),
            b'_' => self.parse_alpha(),
            b'"' => self.parse_string(),
            b'$' => self.parse_prefixed_scalar(16),
            b'%' => self.parse_prefixed_scalar(2),
            ch if !ch.is_ascii() => {
                let error = raise!(ErrorCode::InvalidCharacter, "Invalid character: 0x{ch:02X}");
                Err(self.error_at(error, self.stream.pos()))
            }
            ch => {
                let pos = self.stream.pos();
                self.literal.clear();
                self.literal.append(ch)?;
                let Some(symbol) = self.match_type::<Symbol>() else {
                    let error = raise!(
                        ErrorCode::UnsupportedSymbol,
                        "Unsupported symbol: '{}'",
                        ch as char
                    );
                    return Err(self.error_at(error, pos));
                };
                self.emit_keyword(symbol, pos.line())?;
                Ok(Step::Advance)
            }
        }
    }

    fn parse(&mut self) -> Result<(), Error> {
        loop {
            let step = match self.stream.get_type() {
                CharacterClass::Alpha => self.parse_alpha()?,
                CharacterClass::Digit => self.parse_digit()?,
                CharacterClass::Symbol => self.parse_symbol()?,
                CharacterClass::Whitespace | CharacterClass::End => Step::Advance,
            };
            let more = match step {
                Step::Advance => self.advance()?,
                Step::Hold => true,
                Step::Exhausted => false,
            };
            if !more {
                break;
            }
        }
        self.emit(Token::end())?;
        tracing::debug!(
            "tokenized {}: {} tokens",
            self.stream.path().display(),
            self.tokens.len()
        );
        self.reset()
    }

    /// Returns the token under the cursor.
    pub fn get(&self) -> Result<&Token, Error> {
        let id = match self.cursor {
            Some(id) => id,
            None => self.tokens.get(self.index)?,
        };
        self.tokens
            .get_context(id)
            .ok_or_else(|| raise!(ErrorCode::IndexOutOfRange, "Invalid index: {}", self.index))
    }

    /// Moves the cursor to the following token.
    pub fn next(&mut self) -> Result<(), Error> {
        if self.index + 1 >= self.tokens.len() {
            return Err(raise!(ErrorCode::NoNextToken, "No next token: {}", self.index));
        }
        self.index += 1;
        self.cursor = match self.cursor {
            Some(id) => self.tokens.next(id),
            None => Some(self.tokens.get(self.index)?),
        };
        Ok(())
    }

    /// Rewinds the cursor to the first token and the stream to the first character.
    /// The source is not tokenized again.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.stream.reset()?;
        self.index = 0;
        self.cursor = self.tokens.head();
        tracing::debug!("rewound {}", self.stream.path().display());
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &List<Token> {
        &self.tokens
    }

    pub fn iter(&self) -> Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Drops every token and closes the source.
    pub fn close(&mut self) {
        self.tokens.clear();
        self.literal.free();
        self.stream.close();
        self.index = 0;
        self.cursor = None;
    }
}
