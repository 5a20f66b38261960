use enum_map::{enum_map, Enum, EnumMap};
use std::fmt::{Display, Formatter};
use std::ops::Index;
use strum::{AsRefStr, EnumString};

#[derive(PartialEq, Eq, Debug, Copy, Clone, EnumString, AsRefStr, Enum)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    IOError,
    EmptyFile,
    EndOfFile,
    AllocationFailure,
    UnsupportedDirective,
    UnsupportedSymbol,
    InvalidCharacter,
    InvalidScalar,
    ScalarOverflow,
    UnterminatedLiteral,
    IndexOutOfRange,
    InvalidEntry,
    EmptyList,
    NoNextToken,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Category {
    Io,
    Allocation,
    Lexical,
    Navigation,
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Category::*;
        match self {
            Io => write!(f, "I/O error"),
            Allocation => write!(f, "allocation error"),
            Lexical => write!(f, "lexical error"),
            Navigation => write!(f, "navigation error"),
        }
    }
}

/// The `CategoryMap` maps error codes to the category they are reported under.
///
/// Implementation for `Index` is provided, so elements within the map can
/// be accessed using the `[]` operator.
#[derive(Clone, PartialEq, Eq, Debug, Copy)]
pub struct CategoryMap {
    // Every error code is mapped to exactly one category.
    inner: EnumMap<ErrorCode, Category>,
}

impl Default for CategoryMap {
    fn default() -> Self {
        use ErrorCode::*;
        let map = enum_map! {
            IOError | EmptyFile | EndOfFile => Category::Io,
            AllocationFailure => Category::Allocation,
            UnsupportedDirective
            | UnsupportedSymbol
            | InvalidCharacter
            | InvalidScalar
            | ScalarOverflow
            | UnterminatedLiteral => Category::Lexical,
            IndexOutOfRange | InvalidEntry | EmptyList | NoNextToken => Category::Navigation,
        };
        CategoryMap { inner: map }
    }
}

impl Index<ErrorCode> for CategoryMap {
    type Output = Category;

    fn index(&self, key: ErrorCode) -> &Self::Output {
        self.inner.index(key)
    }
}
