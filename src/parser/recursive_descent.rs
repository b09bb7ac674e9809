use super::ast::{BinaryOp, Expression, FunctionDecl, Program, Statement};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

// Grammar (informal):
// program    -> statement* EOF
// statement  -> func | return | let | assign | index_assign | print | if | while | for
// func       -> "func" ident "(" (ident ("," ident)*)? ")" "{" statement* "}"
// return     -> "return" expr ";"
// let        -> "let" ident "=" expr ";"?
// assign     -> ident "=" expr ";"
// index_asgn -> ident ("[" expr "]")+ "=" expr ";"
// print      -> "print" "(" expr ")" ";"?
// if         -> "if" "(" expr ")" "{" statement* "}" ("else" "{" statement* "}")?
// while      -> "while" "(" expr ")" "{" (statement ";")* "}"
// for        -> "for" ident "=" expr "to" expr ("step" expr)? "{" (statement ";")* "}"
// expr       -> primary (op expr)*            precedence climbing
// primary    -> atom ("[" expr "]")*
// atom       -> "[" (expr ("," expr)*)? "]" | "len" "(" expr? ")" | ident "(" args ")"
//             | ident | number | decimal | string | "(" expr ")" | "true" | "false"
//             | "-" primary

/// How a block treats `;` after each of its statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminators {
    /// `if`/`else` bodies: statements handle their own terminators
    Free,
    /// Function bodies: one `;` after a statement is consumed if present
    Optional,
    /// Loop bodies: every statement must end with `;`
    Required,
}

/// Recursive-descent parser for Ember
///
/// Statements that do not start with a recognized form are skipped one
/// token at a time. Inside a recognized form, a missing keyword, delimiter
/// or closing token aborts the whole parse.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Creates a new parser over a token sequence
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Parser { tokens, current: 0 }
    }

    /// Parses the tokens into a program
    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {
                    self.advance();
                }
                Err(err) => {
                    tracing::debug!(error = %err, "parse aborted");
                    return Err(err);
                }
            }
        }

        tracing::trace!(count = statements.len(), "parsed top-level statements");
        Ok(Program { statements })
    }

    /// Parses one statement, or returns `None` when the current token does
    /// not begin a recognized form
    fn parse_statement(&mut self) -> Result<Option<Statement>> {
        if self.peek().is_keyword("func") {
            return self.parse_function().map(Some);
        }
        if self.peek().is_keyword("return") {
            return self.parse_return().map(Some);
        }
        if self.peek().is_keyword("let") {
            return self.parse_let().map(Some);
        }

        if self.peek().kind == TokenKind::Identifier {
            let next = self.peek_at(1).kind;
            match next {
                TokenKind::Assign => return self.parse_reassignment().map(Some),
                TokenKind::LeftBracket => {
                    // The indexed target is consumed even when no `=`
                    // follows; parsing then carries on from wherever it
                    // stopped.
                    let target = self.parse_primary()?;
                    if self.check(TokenKind::Assign) {
                        return self.parse_index_assignment(target).map(Some);
                    }
                }
                _ => {}
            }
        }

        if self.peek().is_keyword("print") {
            return self.parse_print().map(Some);
        }
        if self.peek().is_keyword("if") {
            return self.parse_if().map(Some);
        }
        if self.peek().is_keyword("while") {
            return self.parse_while().map(Some);
        }
        if self.peek().is_keyword("for") {
            return self.parse_for().map(Some);
        }

        Ok(None)
    }

    fn parse_let(&mut self) -> Result<Statement> {
        self.advance(); // consume 'let'
        let name = self.expect_identifier("Expected identifier after 'let'")?;
        self.consume(TokenKind::Assign, "Expected '=' after identifier")?;
        let value = self.parse_expression()?;

        // Either an explicit `;` or any one token ends the declaration
        if self.peek().kind != TokenKind::Eof {
            self.advance();
        }

        Ok(Statement::Let { name, value })
    }

    fn parse_reassignment(&mut self) -> Result<Statement> {
        let name = self.advance().lexeme;
        self.advance(); // consume '='
        let value = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after assignment")?;
        Ok(Statement::Let { name, value })
    }

    fn parse_index_assignment(&mut self, target: Expression) -> Result<Statement> {
        self.advance(); // consume '='
        let value = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after array assignment")?;
        Ok(Statement::Expression(Expression::AssignIndex {
            target: Box::new(target),
            value: Box::new(value),
        }))
    }

    fn parse_print(&mut self) -> Result<Statement> {
        self.advance(); // consume 'print'
        self.consume(TokenKind::LeftParen, "Expected '(' after 'print'")?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after print expression")?;
        self.match_kind(TokenKind::Semicolon);
        Ok(Statement::Print { expr })
    }

    fn parse_if(&mut self) -> Result<Statement> {
        self.advance(); // consume 'if'
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition")?;
        self.consume(TokenKind::LeftBrace, "Expected '{' after if condition")?;
        let then_branch = self.parse_block(Terminators::Free, "if")?;
        self.consume(TokenKind::RightBrace, "Expected '}' after if block")?;

        let mut else_branch = Vec::new();
        if !self.is_at_end() && self.peek().is_keyword("else") {
            self.advance(); // consume 'else'
            self.consume(TokenKind::LeftBrace, "Expected '{' after else")?;
            else_branch = self.parse_block(Terminators::Free, "else")?;
            self.consume(TokenKind::RightBrace, "Expected '}' after else block")?;
        }

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Statement> {
        self.advance(); // consume 'while'
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition")?;
        self.consume(TokenKind::LeftBrace, "Expected '{' after while condition")?;
        let body = self.parse_block(Terminators::Required, "while")?;
        self.consume(TokenKind::RightBrace, "Expected '}' after while block")?;
        Ok(Statement::While { condition, body })
    }

    fn parse_for(&mut self) -> Result<Statement> {
        self.advance(); // consume 'for'
        let variable = self.expect_identifier("Expected loop variable after 'for'")?;
        self.consume(TokenKind::Assign, "Expected '=' after loop variable")?;
        let start = self.parse_expression()?;
        if !self.peek().is_keyword("to") {
            return Err(self.syntax_error("Expected 'to' after for loop start value"));
        }
        self.advance(); // consume 'to'
        let end = self.parse_expression()?;

        let step = if self.peek().is_keyword("step") {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expected '{' after for loop header")?;
        let body = self.parse_block(Terminators::Required, "for")?;
        self.consume(TokenKind::RightBrace, "Expected '}' after for block")?;

        Ok(Statement::For {
            variable,
            start,
            end,
            step,
            body,
        })
    }

    fn parse_function(&mut self) -> Result<Statement> {
        self.advance(); // consume 'func'
        let name = self.expect_identifier("Expected function name after 'func'")?;
        self.consume(TokenKind::LeftParen, "Expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.expect_identifier("Expected parameter name")?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameter list")?;
        self.consume(TokenKind::LeftBrace, "Expected '{' after parameter list")?;
        let body = self.parse_block(Terminators::Optional, "function")?;
        self.consume(TokenKind::RightBrace, "Expected '}' after function body")?;

        Ok(Statement::Function(FunctionDecl { name, params, body }))
    }

    fn parse_return(&mut self) -> Result<Statement> {
        self.advance(); // consume 'return'
        let value = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after return statement")?;
        Ok(Statement::Return { value })
    }

    /// Parses statements up to (not including) the closing `}`
    fn parse_block(&mut self, terminators: Terminators, context: &str) -> Result<Vec<Statement>> {
        let mut body = Vec::new();

        while !self.is_at_end() && !self.check(TokenKind::RightBrace) {
            let stmt = match self.parse_statement()? {
                Some(stmt) => stmt,
                None => {
                    self.advance();
                    continue;
                }
            };
            body.push(stmt);

            match terminators {
                Terminators::Free => {}
                Terminators::Optional => {
                    self.match_kind(TokenKind::Semicolon);
                }
                Terminators::Required => {
                    // `x = 1;` and `return v;` consume their own `;`
                    if self.previous().kind != TokenKind::Semicolon
                        && !self.match_kind(TokenKind::Semicolon)
                    {
                        return Err(self.syntax_error(format!(
                            "Expected ';' after statement in {} block",
                            context
                        )));
                    }
                }
            }
        }

        Ok(body)
    }

    /// Parses a full expression
    pub fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_binary(0)
    }

    /// Precedence climbing: operators at or above `min_precedence` extend
    /// the left operand; the right operand binds one level tighter, which
    /// keeps equal-precedence chains left-associative.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression> {
        let mut left = self.parse_primary()?;

        while self.peek().kind == TokenKind::Operator {
            let op = match BinaryOp::from_symbol(&self.peek().lexeme) {
                Some(op) if op.precedence() >= min_precedence => op,
                _ => break,
            };
            self.advance(); // consume operator
            let right = self.parse_binary(op.precedence() + 1)?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parses an atom followed by any number of `[index]` suffixes
    fn parse_primary(&mut self) -> Result<Expression> {
        let mut expr = self.parse_atom()?;

        while self.check(TokenKind::LeftBracket) {
            self.advance(); // consume '['
            let index = self.parse_expression()?;
            self.consume(TokenKind::RightBracket, "Expected ']' after array index")?;
            expr = Expression::index(expr, index);
        }

        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expression> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::Keyword if token.lexeme == "len" => self.parse_len_call(),
            TokenKind::Keyword if token.lexeme == "true" || token.lexeme == "false" => {
                self.advance();
                let value = if token.lexeme == "true" { 1.0 } else { 0.0 };
                Ok(Expression::Number(value))
            }
            TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(token.lexeme)
                } else {
                    Ok(Expression::Identifier(token.lexeme))
                }
            }
            TokenKind::Number | TokenKind::Decimal => {
                let value: f64 = token.lexeme.parse().map_err(|_| {
                    self.syntax_error(format!("Invalid number literal: {}", token.lexeme))
                })?;
                self.advance();
                Ok(Expression::Number(value))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expression::StringLiteral(token.lexeme))
            }
            TokenKind::LeftParen => {
                self.advance(); // consume '('
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::Operator if token.lexeme == "-" => {
                self.advance(); // consume '-'
                let operand = self.parse_primary()?;
                Ok(match operand {
                    Expression::Number(n) => Expression::Number(-n),
                    other => Expression::binary(BinaryOp::Sub, Expression::Number(0.0), other),
                })
            }
            _ => Err(self.syntax_error("Unexpected token in expression")),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        self.advance(); // consume '['
        let mut elements = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightBracket, "Expected ']' in array literal")?;
        Ok(Expression::ArrayLiteral(elements))
    }

    /// `len(expr)`: at most one argument is parsed, the arity itself is
    /// checked when the call runs
    fn parse_len_call(&mut self) -> Result<Expression> {
        let name = self.advance().lexeme;
        self.consume(TokenKind::LeftParen, "Expected '(' after function name")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            args.push(self.parse_expression()?);
        }
        self.consume(TokenKind::RightParen, "Expected ')' after function argument")?;
        Ok(Expression::Call { name, args })
    }

    /// User function call; the name has already been consumed
    fn parse_call(&mut self, name: String) -> Result<Expression> {
        self.advance(); // consume '('
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after call arguments")?;
        Ok(Expression::Call { name, args })
    }

    // Token helpers

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Looking past the end yields the final (end-of-input) token
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + offset).min(last)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(message))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<String> {
        Ok(self.consume(TokenKind::Identifier, message)?.lexeme)
    }

    fn syntax_error(&self, message: impl Into<String>) -> Error {
        let token = self.peek();
        Error::syntax(token.line, token.column, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;

    fn parse(source: &str) -> Result<Program> {
        let tokens = Scanner::new(source).scan_tokens();
        Parser::new(tokens).parse()
    }

    fn parse_expr(source: &str) -> Expression {
        let tokens = Scanner::new(source).scan_tokens();
        Parser::new(tokens).parse_expression().unwrap()
    }

    fn num(n: f64) -> Expression {
        Expression::Number(n)
    }

    fn ident(name: &str) -> Expression {
        Expression::Identifier(name.to_string())
    }

    #[test]
    fn test_let_and_print() {
        let program = parse("let x = 1; print(x);").unwrap();
        assert_eq!(
            program.statements,
            vec![
                Statement::Let {
                    name: "x".to_string(),
                    value: num(1.0),
                },
                Statement::Print { expr: ident("x") },
            ]
        );
    }

    #[test]
    fn test_precedence_and_associativity() {
        // 1 + 2 * 3 - 4  =>  (1 + (2 * 3)) - 4
        assert_eq!(
            parse_expr("1 + 2 * 3 - 4"),
            Expression::binary(
                BinaryOp::Sub,
                Expression::binary(
                    BinaryOp::Add,
                    num(1.0),
                    Expression::binary(BinaryOp::Mul, num(2.0), num(3.0)),
                ),
                num(4.0),
            )
        );
        // 8 / 4 / 2  =>  (8 / 4) / 2
        assert_eq!(
            parse_expr("8 / 4 / 2"),
            Expression::binary(
                BinaryOp::Div,
                Expression::binary(BinaryOp::Div, num(8.0), num(4.0)),
                num(2.0),
            )
        );
    }

    #[test]
    fn test_logical_binds_loosest() {
        // a < 1 || b == 2 && c  =>  (a < 1) || ((b == 2) && c)
        assert_eq!(
            parse_expr("a < 1 || b == 2 && c"),
            Expression::binary(
                BinaryOp::Or,
                Expression::binary(BinaryOp::Lt, ident("a"), num(1.0)),
                Expression::binary(
                    BinaryOp::And,
                    Expression::binary(BinaryOp::Eq, ident("b"), num(2.0)),
                    ident("c"),
                ),
            )
        );
    }

    #[test]
    fn test_booleans_lower_to_numbers() {
        assert_eq!(parse_expr("true"), num(1.0));
        assert_eq!(parse_expr("false"), num(0.0));
    }

    #[test]
    fn test_prefix_minus() {
        assert_eq!(parse_expr("-1"), num(-1.0));
        assert_eq!(
            parse_expr("-a[0] * 2"),
            Expression::binary(
                BinaryOp::Mul,
                Expression::binary(
                    BinaryOp::Sub,
                    num(0.0),
                    Expression::index(ident("a"), num(0.0)),
                ),
                num(2.0),
            )
        );
        assert_eq!(
            parse_expr("3 - -2"),
            Expression::binary(BinaryOp::Sub, num(3.0), num(-2.0))
        );
    }

    #[test]
    fn test_chained_indexing() {
        assert_eq!(
            parse_expr("m[1][2]"),
            Expression::index(Expression::index(ident("m"), num(1.0)), num(2.0))
        );
    }

    #[test]
    fn test_array_literal_and_len() {
        assert_eq!(
            parse_expr("len([1, \"a\"])"),
            Expression::Call {
                name: "len".to_string(),
                args: vec![Expression::ArrayLiteral(vec![
                    num(1.0),
                    Expression::StringLiteral("a".to_string()),
                ])],
            }
        );
        assert_eq!(parse_expr("[]"), Expression::ArrayLiteral(vec![]));
    }

    #[test]
    fn test_user_call() {
        assert_eq!(
            parse_expr("add(1, x)"),
            Expression::Call {
                name: "add".to_string(),
                args: vec![num(1.0), ident("x")],
            }
        );
    }

    #[test]
    fn test_index_assignment() {
        let program = parse("a[0] = 9;").unwrap();
        assert_eq!(
            program.statements,
            vec![Statement::Expression(Expression::AssignIndex {
                target: Box::new(Expression::index(ident("a"), num(0.0))),
                value: Box::new(num(9.0)),
            })]
        );
    }

    #[test]
    fn test_for_with_step() {
        let program = parse("for i = 5 to 1 step 0 - 1 { print(i); }").unwrap();
        match &program.statements[0] {
            Statement::For {
                variable,
                start,
                end,
                step,
                body,
            } => {
                assert_eq!(variable, "i");
                assert_eq!(start, &num(5.0));
                assert_eq!(end, &num(1.0));
                assert_eq!(
                    step,
                    &Some(Expression::binary(BinaryOp::Sub, num(0.0), num(1.0)))
                );
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else() {
        let program = parse("if (x > 3) { print(\"big\"); } else { print(\"small\"); }").unwrap();
        match &program.statements[0] {
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.len(), 1);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_function_declaration() {
        let program = parse("func add(a, b) { return a + b; }").unwrap();
        assert_eq!(
            program.statements,
            vec![Statement::Function(FunctionDecl {
                name: "add".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
                body: vec![Statement::Return {
                    value: Expression::binary(BinaryOp::Add, ident("a"), ident("b")),
                }],
            })]
        );
    }

    #[test]
    fn test_unrecognized_tokens_are_skipped() {
        let program = parse("print(1); @ ) 42 print(2);").unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_header_is_inert() {
        let program = parse("#use <std>\nprint(1);").unwrap();
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_while_requires_terminators() {
        assert!(parse("while (x) { x = x - 1; print(x); }").is_ok());
        let err = parse("while (x) { print(x) }").unwrap_err();
        assert_eq!(err.to_string(), "Expected ';' after statement in while block");
    }

    #[test]
    fn test_for_requires_terminators() {
        let err = parse("for i = 1 to 3 { print(i) print(i); }").unwrap_err();
        assert_eq!(err.to_string(), "Expected ';' after statement in for block");
    }

    #[test]
    fn test_let_swallows_one_token_without_semicolon() {
        let program = parse("let x = 1 @ print(x);").unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_missing_closing_paren_is_fatal() {
        let err = parse("print(1;").unwrap_err();
        assert_eq!(err.to_string(), "Expected ')' after print expression");
        assert_eq!(err.position(), Some((1, 8)));
    }

    #[test]
    fn test_missing_semicolon_after_return() {
        let err = parse("func f() { return 1 }").unwrap_err();
        assert_eq!(err.to_string(), "Expected ';' after return statement");
    }

    #[test]
    fn test_missing_to_in_for() {
        let err = parse("for i = 1 3 { }").unwrap_err();
        assert_eq!(err.to_string(), "Expected 'to' after for loop start value");
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse("if (1) { print(1);").unwrap_err();
        assert_eq!(err.to_string(), "Expected '}' after if block");
    }

    #[test]
    fn test_bad_expression_start() {
        let err = parse("let x = ;").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected token in expression");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse("").unwrap(), Program::default());
        assert_eq!(parse("// only a comment").unwrap(), Program::default());
    }

    #[test]
    fn test_parser_accepts_tokens_without_eof() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "print", 1, 1),
            Token::new(TokenKind::LeftParen, "(", 1, 6),
            Token::new(TokenKind::Number, "1", 1, 7),
            Token::new(TokenKind::RightParen, ")", 1, 8),
        ];
        let program = Parser::new(tokens).parse().unwrap();
        assert_eq!(program.statements.len(), 1);
    }
}
