//! Binary operator semantics

use super::number_format::format_fixed;
use super::Value;
use crate::error::{Error, Result};
use crate::parser::BinaryOp;

/// Applies `op` to two evaluated operands
///
/// Arithmetic is plain `f64` (division by zero gives inf/nan). `+` also
/// concatenates strings, and a number on either side of a string is
/// rendered in fixed six-decimal form. `==`/`!=` compare numbers or
/// strings, the ordering operators numbers only. `&&`/`||` take any
/// operands by truthiness. Everything else is an invalid-operands error.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    use Value::{Number, String};

    let result = match (op, left, right) {
        (BinaryOp::Add, Number(a), Number(b)) => Number(a + b),
        (BinaryOp::Add, String(a), String(b)) => String(format!("{}{}", a, b)),
        (BinaryOp::Add, String(a), Number(b)) => String(format!("{}{}", a, format_fixed(*b))),
        (BinaryOp::Add, Number(a), String(b)) => String(format!("{}{}", format_fixed(*a), b)),
        (BinaryOp::Sub, Number(a), Number(b)) => Number(a - b),
        (BinaryOp::Mul, Number(a), Number(b)) => Number(a * b),
        (BinaryOp::Div, Number(a), Number(b)) => Number(a / b),

        (BinaryOp::Eq, Number(a), Number(b)) => Value::from_bool(a == b),
        (BinaryOp::Eq, String(a), String(b)) => Value::from_bool(a == b),
        (BinaryOp::NotEq, Number(a), Number(b)) => Value::from_bool(a != b),
        (BinaryOp::NotEq, String(a), String(b)) => Value::from_bool(a != b),

        (BinaryOp::Lt, Number(a), Number(b)) => Value::from_bool(a < b),
        (BinaryOp::Gt, Number(a), Number(b)) => Value::from_bool(a > b),
        (BinaryOp::LtEq, Number(a), Number(b)) => Value::from_bool(a <= b),
        (BinaryOp::GtEq, Number(a), Number(b)) => Value::from_bool(a >= b),

        (BinaryOp::And, l, r) => Value::from_bool(l.is_truthy() && r.is_truthy()),
        (BinaryOp::Or, l, r) => Value::from_bool(l.is_truthy() || r.is_truthy()),

        _ => {
            return Err(Error::InvalidOperands {
                op: op.symbol().to_string(),
                left_type: left.type_name().to_string(),
                right_type: right.type_name().to_string(),
            })
        }
    };

    Ok(result)
}
