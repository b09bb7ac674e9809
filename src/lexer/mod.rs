//! Lexical analysis for Ember
//!
//! Converts source text into a flat stream of tokens terminated by a single
//! end-of-input token.

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind, KEYWORDS};
