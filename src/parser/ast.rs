use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete Ember program
///
/// Built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
}

impl Program {
    /// Function declarations that appear directly at top level, in source
    /// order. Declarations nested inside bodies are not included.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Function(decl) => Some(decl),
            _ => None,
        })
    }
}

/// Function declaration: `func name(a, b) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name
    pub name: String,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// Body statements
    pub body: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `let x = expr;` or `x = expr;`
    Let {
        /// Name of the variable to bind
        name: String,
        /// Expression value to bind
        value: Expression,
    },

    /// `print(expr)`
    Print {
        /// Expression to print
        expr: Expression,
    },

    /// If statement; an absent `else` is an empty branch
    If {
        /// Condition expression to evaluate
        condition: Expression,
        /// Statements to execute if condition is truthy
        then_branch: Vec<Statement>,
        /// Statements to execute otherwise
        else_branch: Vec<Statement>,
    },

    /// While loop
    While {
        /// Loop condition, re-evaluated before every iteration
        condition: Expression,
        /// Statements to execute in loop body
        body: Vec<Statement>,
    },

    /// Ranged for loop: `for i = start to end [step s] { ... }`
    For {
        /// Loop variable name
        variable: String,
        /// Start value (inclusive)
        start: Expression,
        /// End value (inclusive)
        end: Expression,
        /// Step, 1 when absent
        step: Option<Expression>,
        /// Statements to execute in loop body
        body: Vec<Statement>,
    },

    /// Function declaration
    Function(FunctionDecl),

    /// `return expr;`
    Return {
        /// Value to return
        value: Expression,
    },

    /// Expression evaluated for its effect. The parser only produces this
    /// for element assignment (`a[i] = v;`).
    Expression(Expression),
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Number literal; `true`/`false` are lowered to 1 and 0
    Number(f64),
    /// String literal
    StringLiteral(String),
    /// Array literal `[a, b, c]`
    ArrayLiteral(Vec<Expression>),
    /// Variable reference
    Identifier(String),

    /// Binary operation
    Binary {
        /// Binary operator to apply
        op: BinaryOp,
        /// Left operand expression
        left: Box<Expression>,
        /// Right operand expression
        right: Box<Expression>,
    },

    /// Index access `array[index]`
    Index {
        /// Expression producing the array
        array: Box<Expression>,
        /// Index expression
        index: Box<Expression>,
    },

    /// Function call; `len(x)` is a call to the built-in `len`
    Call {
        /// Name of the function
        name: String,
        /// Arguments in call order
        args: Vec<Expression>,
    },

    /// Element assignment `name[index] = value`. The target is the parsed
    /// left-hand side, normally an [`Expression::Index`] over an identifier.
    AssignIndex {
        /// Left-hand side of the assignment
        target: Box<Expression>,
        /// Value to store
        value: Box<Expression>,
    },
}

impl Expression {
    /// Creates a binary expression
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an index access expression
    pub fn index(array: Expression, index: Expression) -> Self {
        Expression::Index {
            array: Box::new(array),
            index: Box::new(index),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition / concatenation (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    NotEq,
    /// Less than (<)
    Lt,
    /// Greater than (>)
    Gt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than or equal (>=)
    GtEq,
    /// Logical AND (&&)
    And,
    /// Logical OR (||)
    Or,
    /// Bare `!`. It has no unary form and no valid operands; it only exists
    /// because the operator token is accepted at precedence 0.
    Bang,
}

impl BinaryOp {
    /// Maps an operator token's text to its operator
    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        let op = match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::LtEq,
            ">=" => BinaryOp::GtEq,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "!" => BinaryOp::Bang,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Bang => 0,
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div => 6,
        }
    }

    /// Source text of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Bang => "!",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_table() {
        let ordered = ["||", "&&", "==", "<", "+", "*"];
        for pair in ordered.windows(2) {
            let low = BinaryOp::from_symbol(pair[0]).unwrap();
            let high = BinaryOp::from_symbol(pair[1]).unwrap();
            assert!(low.precedence() < high.precedence(), "{} vs {}", low, high);
        }
        assert_eq!(BinaryOp::NotEq.precedence(), BinaryOp::Eq.precedence());
        assert_eq!(BinaryOp::GtEq.precedence(), BinaryOp::Lt.precedence());
        assert_eq!(BinaryOp::Div.precedence(), BinaryOp::Mul.precedence());
    }

    #[test]
    fn test_symbol_round_trip() {
        for symbol in ["+", "-", "*", "/", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!"] {
            assert_eq!(BinaryOp::from_symbol(symbol).unwrap().symbol(), symbol);
        }
        assert_eq!(BinaryOp::from_symbol("%"), None);
    }

    #[test]
    fn test_program_functions_only_top_level() {
        let inner = FunctionDecl {
            name: "inner".to_string(),
            params: vec![],
            body: vec![],
        };
        let outer = FunctionDecl {
            name: "outer".to_string(),
            params: vec!["a".to_string()],
            body: vec![Statement::Function(inner)],
        };
        let program = Program {
            statements: vec![
                Statement::Print {
                    expr: Expression::Number(1.0),
                },
                Statement::Function(outer),
            ],
        };
        let names: Vec<&str> = program.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer"]);
    }
}
