use std::collections::HashMap;
use std::io::{self, Write};

use super::operators::apply_binary;
use crate::error::{Error, Result};
use crate::parser::{Expression, FunctionDecl, Program, Statement};
use crate::runtime::{Environment, Value};

/// Tree-walking interpreter for Ember programs
///
/// The interpreter only owns the output sink. Everything a run mutates
/// (variables, function registry, pending return) lives in a context that
/// is created by [`interpret`](Self::interpret) and dropped when it
/// finishes, so one interpreter can run several programs independently.
pub struct Interpreter<W: Write = io::Stdout> {
    out: W,
}

impl Interpreter<io::Stdout> {
    /// Creates an interpreter that prints to stdout
    pub fn new() -> Self {
        Interpreter { out: io::stdout() }
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter that prints to `out`
    pub fn with_output(out: W) -> Self {
        Interpreter { out }
    }

    /// Borrow the output sink
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the interpreter, returning the output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs `program` to completion and returns the final top-level
    /// environment
    ///
    /// Output printed before a runtime error has already been written and
    /// flushed when the error is returned.
    pub fn interpret(&mut self, program: &Program) -> Result<Environment> {
        let mut ctx = ExecutionContext::new(program, &mut self.out);
        ctx.run(program)?;
        Ok(ctx.env)
    }
}

/// State of a single run
struct ExecutionContext<'p, 'o, W: Write> {
    env: Environment,
    functions: HashMap<&'p str, &'p FunctionDecl>,
    /// Set by `return`, cleared when the enclosing call picks it up
    pending_return: Option<Value>,
    out: &'o mut W,
}

impl<'p, 'o, W: Write> ExecutionContext<'p, 'o, W> {
    fn new(program: &'p Program, out: &'o mut W) -> Self {
        // Later declarations of the same name replace earlier ones
        let functions: HashMap<&'p str, &'p FunctionDecl> = program
            .functions()
            .map(|decl| (decl.name.as_str(), decl))
            .collect();
        tracing::debug!(count = functions.len(), "registered functions");

        ExecutionContext {
            env: Environment::new(),
            functions,
            pending_return: None,
            out,
        }
    }

    fn run(&mut self, program: &'p Program) -> Result<()> {
        tracing::trace!(statements = program.statements.len(), "executing program");
        self.exec_block(&program.statements)
    }

    /// Executes statements in order, stopping once a return is pending
    fn exec_block(&mut self, statements: &'p [Statement]) -> Result<()> {
        for stmt in statements {
            self.exec_statement(stmt)?;
            if self.pending_return.is_some() {
                break;
            }
        }
        Ok(())
    }

    fn exec_statement(&mut self, stmt: &'p Statement) -> Result<()> {
        match stmt {
            Statement::Let { name, value } => {
                let value = self.eval(value)?;
                self.env.define(name.as_str(), value);
            }

            Statement::Print { expr } => {
                let value = self.eval(expr)?;
                if let Some(text) = value.print_text() {
                    writeln!(self.out, "{}", text)?;
                    self.out.flush()?;
                }
            }

            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec_block(then_branch)?;
                } else {
                    self.exec_block(else_branch)?;
                }
            }

            Statement::While { condition, body } => {
                while self.eval(condition)?.is_truthy() {
                    self.exec_block(body)?;
                    if self.pending_return.is_some() {
                        break;
                    }
                }
            }

            Statement::For {
                variable,
                start,
                end,
                step,
                body,
            } => {
                let start = self.eval(start)?.as_number("for loop start")?;
                let end = self.eval(end)?.as_number("for loop end")?;
                let step = match step {
                    Some(expr) => self.eval(expr)?.as_number("for loop step")?,
                    None => 1.0,
                };

                // The counter is kept outside the environment; the body may
                // rebind the loop variable without affecting iteration.
                let in_range = |c: f64| if step > 0.0 { c <= end } else { c >= end };
                let mut counter = start;
                while in_range(counter) {
                    self.env.define(variable.as_str(), Value::Number(counter));
                    self.exec_block(body)?;
                    if self.pending_return.is_some() {
                        break;
                    }
                    counter += step;
                }
            }

            // Top-level declarations are registered before the run starts
            Statement::Function(_) => {}

            Statement::Return { value } => {
                let value = self.eval(value)?;
                self.pending_return = Some(value);
            }

            Statement::Expression(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(())
    }

    fn eval(&mut self, expr: &'p Expression) -> Result<Value> {
        match expr {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::StringLiteral(s) => Ok(Value::String(s.clone())),

            Expression::ArrayLiteral(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element)?);
                }
                Ok(Value::array(values))
            }

            Expression::Identifier(name) => self.env.get(name).cloned(),

            Expression::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                apply_binary(*op, &left, &right)
            }

            Expression::Index { array, index } => {
                let array = self.eval(array)?;
                let index = self.eval(index)?;
                array.get_index(&index)
            }

            Expression::Call { name, args } => self.call(name, args),

            Expression::AssignIndex { target, value } => self.assign_index(target, value),
        }
    }

    fn call(&mut self, name: &str, args: &'p [Expression]) -> Result<Value> {
        if name == "len" {
            return self.call_len(args);
        }

        let decl = *self
            .functions
            .get(name)
            .ok_or_else(|| Error::UndefinedFunction {
                name: name.to_string(),
            })?;

        if decl.params.len() != args.len() {
            return Err(Error::ArgumentCountMismatch {
                name: name.to_string(),
                expected: decl.params.len(),
                got: args.len(),
            });
        }

        self.env.enter_call();
        tracing::trace!(function = name, depth = self.env.call_depth(), "call");

        let result = self.invoke(decl, args);

        tracing::trace!(function = name, depth = self.env.call_depth(), "return");
        self.env.exit_call();
        result
    }

    /// Binds arguments and runs the body. Each argument is evaluated right
    /// before its parameter is bound, so later arguments see earlier
    /// parameters.
    fn invoke(&mut self, decl: &'p FunctionDecl, args: &'p [Expression]) -> Result<Value> {
        for (param, arg) in decl.params.iter().zip(args) {
            let value = self.eval(arg)?;
            self.env.define(param.as_str(), value);
        }

        self.pending_return = None;
        self.exec_block(&decl.body)?;

        Ok(self.pending_return.take().unwrap_or(Value::Number(0.0)))
    }

    fn call_len(&mut self, args: &'p [Expression]) -> Result<Value> {
        let arg = match args {
            [arg] => arg,
            _ => {
                return Err(Error::ArgumentCountMismatch {
                    name: "len".to_string(),
                    expected: 1,
                    got: args.len(),
                })
            }
        };

        match self.eval(arg)? {
            Value::Array(cells) => Ok(Value::Number(cells.len() as f64)),
            other => Err(Error::type_error("len", "array", other.type_name())),
        }
    }

    /// `name[index] = value`
    fn assign_index(&mut self, target: &'p Expression, value: &'p Expression) -> Result<Value> {
        let (name, index) = match target {
            Expression::Index { array, index } => match array.as_ref() {
                Expression::Identifier(name) => (name.as_str(), index.as_ref()),
                _ => {
                    return Err(Error::InvalidAssignmentTarget {
                        message: "element assignment requires a variable name".to_string(),
                    })
                }
            },
            _ => {
                return Err(Error::InvalidAssignmentTarget {
                    message: "expected an indexed variable".to_string(),
                })
            }
        };

        let current = self.env.get(name)?;
        if !matches!(current, Value::Array(_)) {
            return Err(Error::type_error(
                "element assignment",
                "array",
                current.type_name(),
            ));
        }

        let index = self.eval(index)?;
        self.env.get(name)?.slot(&index)?;

        let value = self.eval(value)?;
        self.env.get_mut(name)?.set_index(&index, value.clone())?;
        Ok(value)
    }
}
