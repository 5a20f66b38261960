use crate::asm::error_codes::ErrorCode;
use crate::asm::Error;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};

const INITIAL_CAPACITY: usize = 16;

/// A growable byte buffer used to accumulate lexemes.
///
/// The buffer is allocated on first use with room for 16 bytes
/// and doubles its capacity whenever it runs full.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Literal {
    buffer: Vec<u8>,
}

impl Literal {
    pub fn new() -> Literal {
        Literal::default()
    }

    pub fn append(&mut self, value: u8) -> Result<(), Error> {
        let capacity = self.buffer.capacity();
        if capacity == 0 {
            self.grow(INITIAL_CAPACITY)?;
        } else if self.buffer.len() + 1 >= capacity {
            self.grow(capacity)?;
        }
        self.buffer.push(value);
        Ok(())
    }

    fn grow(&mut self, additional: usize) -> Result<(), Error> {
        let capacity = self.buffer.capacity() + additional;
        self.buffer
            .try_reserve_exact(capacity - self.buffer.len())
            .map_err(|err| {
                raise!(
                    ErrorCode::AllocationFailure,
                    "Failed to allocate literal: {capacity} bytes: {err}"
                )
            })
    }

    pub fn get(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Forgets the contents but keeps the allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Releases the buffer. Safe to call on an empty literal.
    pub fn free(&mut self) {
        self.buffer = Vec::new();
    }
}

impl From<&[u8]> for Literal {
    fn from(value: &[u8]) -> Self {
        Literal {
            buffer: value.to_vec(),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::from(value.as_bytes())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}
