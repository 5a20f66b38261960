pub mod keyword;
pub mod lexer;
pub mod token;

pub use keyword::{Directive, Instruction, Keyword, Operand, Symbol};
pub use lexer::Lexer;
pub use token::{Payload, Token, TokenKind};
