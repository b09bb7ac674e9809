//! Runtime execution for Ember programs

mod environment;
mod evaluator;
pub mod number_format;
mod operators;
mod value;

pub use environment::Environment;
pub use evaluator::Interpreter;
pub use operators::apply_binary;
pub use value::{Cell, Value};
