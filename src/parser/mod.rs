//! Ember Parser Module
//!
//! Parses the token stream into an Abstract Syntax Tree (AST) with a
//! recursive-descent statement parser and a precedence-climbing expression
//! parser.

mod ast;
mod recursive_descent;

pub use ast::{BinaryOp, Expression, FunctionDecl, Program, Statement};
pub use recursive_descent::Parser;
