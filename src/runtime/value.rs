use std::fmt;
use std::rc::Rc;

use super::number_format::format_general;
use crate::error::{Error, Result};

/// One slot of an array. Cells are shared between arrays copied from the
/// same source and are only ever replaced, never written through.
pub type Cell = Rc<Value>;

/// Runtime value representation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit floating-point number
    Number(f64),
    /// Text string
    String(String),
    /// Fixed-length sequence of cells
    ///
    /// Cloning copies the sequence but shares the cells, so two copies see
    /// the same elements until one of them replaces a slot.
    Array(Vec<Cell>),
}

impl Value {
    /// Creates an array value, one fresh cell per element
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(values.into_iter().map(Rc::new).collect())
    }

    /// 1 for true, 0 for false
    pub fn from_bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    /// Nonzero numbers and nonempty strings are truthy; arrays never are
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(_) => false,
        }
    }

    /// Extracts a number, naming `context` in the error otherwise
    pub fn as_number(&self, context: &str) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(Error::type_error(context, "number", self.type_name())),
        }
    }

    /// Resolves `index` to a valid slot of this array. The index is
    /// truncated toward zero; NaN is never a valid slot.
    pub fn slot(&self, index: &Value) -> Result<usize> {
        let cells = match self {
            Value::Array(cells) => cells,
            _ => return Err(Error::type_error("indexing", "array", self.type_name())),
        };
        let raw = index.as_number("array index")?;
        // `as` maps NaN to 0, which would alias the first element
        let i = if raw.is_nan() {
            i64::MIN
        } else {
            raw.trunc() as i64
        };
        if i < 0 || i as usize >= cells.len() {
            return Err(Error::IndexOutOfBounds {
                index: i,
                length: cells.len(),
            });
        }
        Ok(i as usize)
    }

    /// Reads the element at `index`
    pub fn get_index(&self, index: &Value) -> Result<Value> {
        let slot = self.slot(index)?;
        match self {
            Value::Array(cells) => Ok(cells[slot].as_ref().clone()),
            _ => Err(Error::type_error("indexing", "array", self.type_name())),
        }
    }

    /// Replaces the cell at `index` with a fresh cell holding `value`.
    /// Other arrays that shared the old cell keep it.
    pub fn set_index(&mut self, index: &Value, value: Value) -> Result<()> {
        let slot = self.slot(index)?;
        match self {
            Value::Array(cells) => {
                cells[slot] = Rc::new(value);
                Ok(())
            }
            _ => Err(Error::type_error("indexing", "array", self.type_name())),
        }
    }

    /// Text written by `print`, or `None` for values that print nothing
    pub fn print_text(&self) -> Option<String> {
        match self {
            Value::Number(n) => Some(format_general(*n)),
            Value::String(s) => Some(s.clone()),
            Value::Array(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_general(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(cells) => {
                write!(f, "[")?;
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", cell)?;
                }
                write!(f, "]")
            }
        }
    }
}
