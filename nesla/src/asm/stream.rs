use crate::asm::data::Position;
use crate::asm::error_codes::ErrorCode;
use crate::asm::reader::{FileReader, Reader};
use crate::asm::Error;
use std::path::Path;
use std::sync::Arc;

/// The class of the character under the stream cursor.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CharacterClass {
    End,
    Alpha,
    Digit,
    Whitespace,
    Symbol,
}

impl CharacterClass {
    /// Classifies a single byte. Every byte falls into exactly one class.
    pub fn of(ch: u8) -> CharacterClass {
        if ch == b'\0' {
            CharacterClass::End
        } else if ch.is_ascii_alphabetic() {
            CharacterClass::Alpha
        } else if ch.is_ascii_digit() {
            CharacterClass::Digit
        } else if ch.is_ascii_whitespace() || ch == 0x0b {
            CharacterClass::Whitespace
        } else {
            CharacterClass::Symbol
        }
    }
}

/// A reader with one character of lookahead and line/column tracking.
pub struct Stream<R>
where
    R: Reader + Sized,
{
    reader: R,
    character: u8,
    pos: Position,
}

impl Stream<FileReader> {
    pub fn open(path: impl AsRef<Path>) -> Result<Stream<FileReader>, Error> {
        Stream::new(FileReader::open(path)?)
    }
}

impl<R> Stream<R>
where
    R: Reader + Sized,
{
    /// Wraps `reader` and loads its first character.
    /// Empty sources are rejected.
    pub fn new(mut reader: R) -> Result<Stream<R>, Error> {
        if reader.size()? == 0 {
            return Err(raise!(
                ErrorCode::EmptyFile,
                "Empty file: {}",
                reader.path().display()
            ));
        }
        let mut stream = Stream {
            reader,
            character: b'\0',
            pos: Position::start(),
        };
        stream.reset()?;
        Ok(stream)
    }

    pub fn get(&self) -> u8 {
        self.character
    }

    pub fn get_type(&self) -> CharacterClass {
        CharacterClass::of(self.character)
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.pos.line()
    }

    pub fn column(&self) -> u32 {
        self.pos.column()
    }

    pub fn path(&self) -> &Arc<Path> {
        self.reader.path()
    }

    /// Moves past the current character and loads the next one.
    /// At the end of input this fails with [`ErrorCode::EndOfFile`]
    /// and the stream keeps pointing at the last character.
    pub fn next(&mut self) -> Result<(), Error> {
        let ch = self.reader.read_byte()?;
        self.pos = if self.character == b'\n' {
            self.pos.next_line()
        } else {
            self.pos.next_column()
        };
        self.character = ch;
        Ok(())
    }

    /// Rewinds to the first character at line 1, column 0.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.reader.reset()?;
        self.character = b'\0';
        self.pos = Position::start();
        self.character = self.reader.read_byte()?;
        Ok(())
    }

    /// Releases the underlying reader. The stream reads as exhausted afterwards.
    pub fn close(&mut self) {
        self.reader.close();
        self.character = b'\0';
        self.pos = Position::start();
    }
}

impl<R> Drop for Stream<R>
where
    R: Reader + Sized,
{
    fn drop(&mut self) {
        self.reader.close();
    }
}
