/// Front end of the NESLA assembler for 6502 / NES sources
#[macro_use]
mod diagnostics;
mod assembler;
mod data;
mod error_codes;

pub mod list;
pub mod literal;
pub mod reader;
pub mod stream;
pub mod tokens;

pub use assembler::{assemble, dump, version, Context, Version};
pub use data::Position;
pub use diagnostics::{DiagnosticPrinter, Error, Location};
pub use error_codes::{Category, CategoryMap, ErrorCode};
