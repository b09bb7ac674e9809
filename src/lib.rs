//! # Ember - A Small Scripting Language
//!
//! A tree-walking interpreter for Ember, a C-flavoured scripting language
//! with numbers, strings and arrays, `let`/`print`, `if`/`else`, `while`,
//! ranged `for` loops and recursive functions.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ember::{Interpreter, Parser, Scanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = r#"
//!     func fact(n) {
//!         if (n <= 1) { return 1; }
//!         return n * fact(n - 1);
//!     }
//!     print(fact(5));
//! "#;
//!
//! // Tokenize (scan)
//! let tokens = Scanner::new(code).scan_tokens();
//!
//! // Parse into AST
//! let program = Parser::new(tokens).parse()?;
//!
//! // Execute, capturing output
//! let mut interpreter = Interpreter::with_output(Vec::<u8>::new());
//! interpreter.interpret(&program)?;
//!
//! assert_eq!(interpreter.into_output(), b"120\n");
//! # Ok(())
//! # }
//! ```
//!
//! The whole pipeline is also available as [`run_source`]:
//!
//! ```rust
//! let mut out: Vec<u8> = Vec::new();
//! let env = ember::run_source("let a = [1, 2, 3]; print(len(a));", &mut out)?;
//!
//! assert_eq!(out, b"3\n");
//! assert!(env.exists("a"));
//! # Ok::<(), ember::Error>(())
//! ```
//!
//! ## Language Overview
//!
//! - **Values**: numbers (`f64`), strings, arrays `[1, "a", [2]]`;
//!   `true`/`false` are the numbers 1 and 0
//! - **Statements**: `let x = e;`, `x = e;`, `a[i] = e;`, `print(e)`,
//!   `if (c) { } else { }`, `while (c) { }`, `for i = a to b step s { }`,
//!   `func f(x, y) { }`, `return e;`
//! - **Operators**: `+ - * /`, `== != < > <= >=`, `&& ||`
//! - **Built-ins**: `len(array)`
//!
//! Functions see every variable of their caller. Anything a call binds,
//! parameters included, is discarded when it returns; only the return
//! value survives.
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Interpreter → Output
//! ```
//!
//! - [`Scanner`] - Tokenizes source code; never fails
//! - [`Parser`] - Builds the [`Program`] AST; structural errors are fatal
//! - [`Interpreter`] - Executes the AST, printing to any `Write` sink
//! - [`Value`] - Runtime value representation
//! - [`Environment`] - Variable storage with call snapshots

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

use std::io::Write;

pub use error::{Error, Result};
pub use lexer::{Token, TokenKind};
pub use parser::{BinaryOp, Expression, FunctionDecl, Program, Statement};
pub use runtime::{Cell, Environment, Interpreter, Value};

/// Version of the Ember interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Type alias for the scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner = lexer::Scanner;

/// Type alias for the recursive-descent parser.
/// Converts tokens into an abstract syntax tree (AST).
pub type Parser = parser::Parser;

/// Scans, parses and runs `source`, printing to `out`
///
/// Returns the final top-level environment. Output written before an
/// error stays in `out`.
pub fn run_source<W: Write>(source: &str, out: W) -> Result<Environment> {
    let tokens = Scanner::new(source).scan_tokens();
    let program = Parser::new(tokens).parse()?;
    Interpreter::with_output(out).interpret(&program)
}
