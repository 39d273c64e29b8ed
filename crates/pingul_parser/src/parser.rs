use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{
    BlockStatement, CallExpression, Expression, FunctionLiteral, IdentifierLiteral, IfExpression,
    IndexExpression, InfixExpression, InfixOperator, ListLiteral, PrefixExpression,
    PrefixOperator, Program, Statement,
};
use crate::span::WithSpan;
use crate::{lexer::Lexer, token::Token};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The next token was not the one the grammar requires (e.g. `var x 5`)
    #[error("expected next token to be `{expected}`, but got {} instead", .got.at_str())]
    Expected {
        expected: String,
        got: WithSpan<Token>,
    },
    /// A token that cannot start an expression (e.g. `)` or `;`)
    #[error("no prefix parse function for {}", .0.at_str())]
    NoPrefixParseFn(WithSpan<Token>),
    /// Something the lexer did not recognize
    #[error("illegal token {}", .0.at_str())]
    Illegal(WithSpan<Token>),
    /// An integer literal that does not fit in 64 bits
    #[error("could not parse {} as integer", .0.at_str())]
    InvalidInteger(WithSpan<Token>),
}

type ParseResult<T> = Result<T, ParseError>;

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> ParseResult<Expression>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expression) -> ParseResult<Expression>;

/// Binding power of operators, weakest first.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
enum Precedence {
    Lowest,
    /// or
    Or,
    /// and
    And,
    /// == !=
    Equals,
    /// > < >= <=
    Comparison,
    /// + -
    Sum,
    /// * / %
    Product,
    /// -x, not x
    Prefix,
    /// f(x)
    Call,
    /// list[i]
    Index,
}

impl Precedence {
    fn of(token: &Token) -> Precedence {
        match token {
            Token::Or => Precedence::Or,
            Token::And => Precedence::And,
            Token::EqualEqual | Token::BangEqual => Precedence::Equals,
            Token::LessThan | Token::GreaterThan | Token::LessEqual | Token::GreaterEqual => {
                Precedence::Comparison
            }
            Token::Plus | Token::Minus => Precedence::Sum,
            Token::Star | Token::Slash | Token::Percent => Precedence::Product,
            Token::LeftParen => Precedence::Call,
            Token::LeftBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,

    current_token: WithSpan<Token>,
    peek_token: WithSpan<Token>,

    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Parser<'a> {
        let cur = lexer.next_token();
        let next = lexer.next_token();
        Parser {
            lexer,
            current_token: cur,
            peek_token: next,
            errors: Vec::new(),
        }
    }

    /// Parse the whole input.
    ///
    /// This never fails: statements that do not parse are left out of the
    /// program and their errors are collected in [`Parser::errors`], which
    /// callers should check before trusting the result.
    pub fn parse_program(&mut self) -> Program {
        let statements = self.parse_statements(&Token::Eof);

        Program { statements }
    }

    /// Errors collected so far, in the order they were found.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse statements until `terminator` (or EOF) is the current token.
    /// This is the statement boundary where errors are recorded and skipped.
    fn parse_statements(&mut self, terminator: &Token) -> Vec<Statement> {
        let mut statements = Vec::new();

        while !self.current_token_is(terminator) && !self.current_token_is(&Token::Eof) {
            // Empty statement
            if self.current_token_is(&Token::Semicolon) {
                self.next_token();
                continue;
            }

            match self.parse_statement() {
                Ok(statement) => {
                    statements.push(statement);
                    self.next_token();
                }
                Err(error) => {
                    self.recover(error);

                    // A stray `}` at the top level would otherwise stall the loop
                    if self.current_token_is(&Token::RightBrace)
                        && !terminator.same_kind(&Token::RightBrace)
                    {
                        self.next_token();
                    }
                }
            }
        }

        statements
    }

    /// Record the error and skip to the start of the next statement:
    /// past the next `;`, or up to a closing `}` or EOF, stepping over
    /// any braces opened along the way.
    fn recover(&mut self, error: ParseError) {
        debug!(%error, "skipping malformed statement");
        self.errors.push(error);

        let mut depth = 0usize;
        loop {
            match self.current_token.value {
                Token::Eof => break,
                Token::Semicolon if depth == 0 => {
                    self.next_token();
                    break;
                }
                Token::RightBrace if depth == 0 => break,
                Token::RightBrace => depth -= 1,
                Token::LeftBrace => depth += 1,
                _ => {}
            }
            self.next_token();
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        trace!(token = %self.current_token.value, "parsing statement");

        match self.current_token.value {
            Token::Var => self.parse_var_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_var_statement(&mut self) -> ParseResult<Statement> {
        let name = self.expect_peek_identifier()?;

        self.expect_peek(Token::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Var {
            name: IdentifierLiteral::from(name),
            value,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        // Bare `return` gives back nil
        if self.peek_token_is(&Token::Semicolon)
            || self.peek_token_is(&Token::RightBrace)
            || self.peek_token_is(&Token::Eof)
        {
            self.skip_optional_semicolon();
            return Ok(Statement::Return {
                value: Expression::Nil,
            });
        }

        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Return { value })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Expression { expression })
    }

    fn parse_block_statement(&mut self) -> ParseResult<BlockStatement> {
        // Consume the `{`
        self.next_token();

        let statements = self.parse_statements(&Token::RightBrace);

        if !self.current_token_is(&Token::RightBrace) {
            return Err(ParseError::Expected {
                expected: Token::RightBrace.to_string(),
                got: self.current_token.clone(),
            });
        }

        Ok(BlockStatement { statements })
    }

    /// Pratt loop: keep folding infix operators into `left` while the next
    /// operator binds tighter than `precedence`.
    fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let prefix = match Self::prefix_parse_fn(&self.current_token.value) {
            Some(prefix) => prefix,
            None => return Err(self.no_prefix_parse_fn_error()),
        };

        let mut left = prefix(self)?;

        while !self.peek_token_is(&Token::Semicolon) && precedence < self.peek_precedence() {
            let infix = match Self::infix_parse_fn(&self.peek_token.value) {
                Some(infix) => infix,
                None => return Ok(left),
            };

            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn prefix_parse_fn(token: &Token) -> Option<PrefixParseFn<'a>> {
        match token {
            Token::Identifier(_) => Some(Self::parse_identifier),
            Token::Integer(_) => Some(Self::parse_integer_literal),
            Token::String(_) => Some(Self::parse_string_literal),
            Token::True | Token::False => Some(Self::parse_boolean),
            Token::Nil => Some(Self::parse_nil),
            Token::Minus | Token::Not => Some(Self::parse_prefix_expression),
            Token::LeftParen => Some(Self::parse_grouped_expression),
            Token::LeftBracket => Some(Self::parse_list_literal),
            Token::If => Some(Self::parse_if_expression),
            Token::Func => Some(Self::parse_function_literal),
            _ => None,
        }
    }

    fn infix_parse_fn(token: &Token) -> Option<InfixParseFn<'a>> {
        match token {
            Token::LeftParen => Some(Self::parse_call_expression),
            Token::LeftBracket => Some(Self::parse_index_expression),
            token if InfixOperator::from_token(token).is_some() => {
                Some(Self::parse_infix_expression)
            }
            _ => None,
        }
    }

    fn parse_identifier(&mut self) -> ParseResult<Expression> {
        match &self.current_token.value {
            Token::Identifier(name) => Ok(Expression::Identifier(IdentifierLiteral::from(
                name.as_str(),
            ))),
            _ => Err(self.no_prefix_parse_fn_error()),
        }
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Expression> {
        match &self.current_token.value {
            Token::Integer(digits) => digits
                .parse::<i64>()
                .map(Expression::Integer)
                .map_err(|_| ParseError::InvalidInteger(self.current_token.clone())),
            _ => Err(self.no_prefix_parse_fn_error()),
        }
    }

    fn parse_string_literal(&mut self) -> ParseResult<Expression> {
        match &self.current_token.value {
            Token::String(value) => Ok(Expression::String(value.clone())),
            _ => Err(self.no_prefix_parse_fn_error()),
        }
    }

    fn parse_boolean(&mut self) -> ParseResult<Expression> {
        Ok(Expression::Boolean(self.current_token_is(&Token::True)))
    }

    fn parse_nil(&mut self) -> ParseResult<Expression> {
        Ok(Expression::Nil)
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Expression> {
        let operator = match self.current_token.value {
            Token::Minus => PrefixOperator::Minus,
            Token::Not => PrefixOperator::Not,
            _ => return Err(self.no_prefix_parse_fn_error()),
        };

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(Box::new(PrefixExpression {
            operator,
            right,
        })))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let operator = match InfixOperator::from_token(&self.current_token.value) {
            Some(operator) => operator,
            None => return Err(self.no_prefix_parse_fn_error()),
        };

        let precedence = self.current_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(Box::new(InfixExpression {
            left,
            operator,
            right,
        })))
    }

    fn parse_grouped_expression(&mut self) -> ParseResult<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::RightParen)?;

        Ok(expression)
    }

    fn parse_list_literal(&mut self) -> ParseResult<Expression> {
        let elements = self.parse_expression_list(Token::RightBracket)?;

        Ok(Expression::List(Box::new(ListLiteral { elements })))
    }

    fn parse_if_expression(&mut self) -> ParseResult<Expression> {
        self.expect_peek(Token::LeftParen)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(Token::RightParen)?;
        self.expect_peek(Token::LeftBrace)?;

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(&Token::Else) {
            self.next_token();
            self.expect_peek(Token::LeftBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If(Box::new(IfExpression {
            condition,
            consequence,
            alternative,
        })))
    }

    fn parse_function_literal(&mut self) -> ParseResult<Expression> {
        self.expect_peek(Token::LeftParen)?;

        let parameters = self.parse_function_parameters()?;

        self.expect_peek(Token::LeftBrace)?;

        let body = self.parse_block_statement()?;

        Ok(Expression::Function(Box::new(FunctionLiteral {
            parameters,
            body: Rc::new(body),
        })))
    }

    fn parse_function_parameters(&mut self) -> ParseResult<Vec<IdentifierLiteral>> {
        let mut identifiers = Vec::new();

        if self.peek_token_is(&Token::RightParen) {
            self.next_token();
            return Ok(identifiers);
        }

        identifiers.push(IdentifierLiteral::from(self.expect_peek_identifier()?));

        while self.peek_token_is(&Token::Comma) {
            self.next_token();
            identifiers.push(IdentifierLiteral::from(self.expect_peek_identifier()?));
        }

        self.expect_peek(Token::RightParen)?;

        Ok(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> ParseResult<Expression> {
        let arguments = self.parse_expression_list(Token::RightParen)?;

        Ok(Expression::Call(Box::new(CallExpression {
            function,
            arguments,
        })))
    }

    fn parse_index_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::RightBracket)?;

        Ok(Expression::Index(Box::new(IndexExpression { left, index })))
    }

    /// Comma separated expressions up to `end`, which is consumed.
    fn parse_expression_list(&mut self, end: Token) -> ParseResult<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_token_is(&end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(&Token::Comma) {
            // Skip the comma
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;

        Ok(list)
    }

    fn next_token(&mut self) {
        self.current_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_token_is(&Token::Semicolon) {
            self.next_token();
        }
    }

    fn current_token_is(&self, token: &Token) -> bool {
        self.current_token.value.same_kind(token)
    }

    fn peek_token_is(&self, token: &Token) -> bool {
        self.peek_token.value.same_kind(token)
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::of(&self.current_token.value)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(&self.peek_token.value)
    }

    fn expect_peek(&mut self, token: Token) -> ParseResult<()> {
        if self.peek_token_is(&token) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected: token.to_string(),
                got: self.peek_token.clone(),
            })
        }
    }

    fn expect_peek_identifier(&mut self) -> ParseResult<String> {
        let name = match &self.peek_token.value {
            Token::Identifier(name) => name.to_owned(),
            _ => {
                return Err(ParseError::Expected {
                    expected: String::from("identifier"),
                    got: self.peek_token.clone(),
                })
            }
        };

        self.next_token();
        Ok(name)
    }

    fn no_prefix_parse_fn_error(&self) -> ParseError {
        match self.current_token.value {
            Token::Illegal(_) => ParseError::Illegal(self.current_token.clone()),
            _ => ParseError::NoPrefixParseFn(self.current_token.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{
        Expression, IdentifierLiteral, InfixExpression, InfixOperator, PrefixExpression,
        PrefixOperator, Program, Statement,
    };
    use crate::lexer::Lexer;
    use crate::parser::{ParseError, Parser};
    use crate::token::Token;

    #[test]
    fn test_var_statement() {
        let input = "\
        var age = 28;
        var name = \"SpongeBob\";
        var result = 10 * (20 / 2);";

        let prog = setup(input, 3);

        let tests = vec![
            ("age", "28"),
            ("name", "\"SpongeBob\""),
            ("result", "(10 * (20 / 2))"),
        ];

        for (statement, (name, value)) in prog.statements.iter().zip(tests.into_iter()) {
            match statement {
                Statement::Var {
                    name: ident,
                    value: expr,
                } => {
                    assert_eq!(ident.name, name);
                    assert_eq!(expr.to_string(), value);
                }
                stmt => panic!("expected var statement but got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_return_statement() {
        let input = "\
        return 5;
        return fubar;
        return if (power > 9000) { \"strong\" } else { \"weak\" };
        return;";

        let prog = setup(input, 4);

        let expected = vec![
            "5",
            "fubar",
            "if (power > 9000) {\"strong\"} else {\"weak\"}",
            "nil",
        ];

        for (statement, expected) in prog.statements.iter().zip(expected.into_iter()) {
            match statement {
                Statement::Return { value } => assert_eq!(value.to_string(), expected),
                stmt => panic!("expected return statement but got {:?}", stmt),
            }
            assert_eq!(statement.token_literal(), "return");
        }
    }

    #[test]
    fn test_literal_expressions() {
        let tests = vec![
            ("username;", Expression::Identifier("username".into())),
            ("69420;", Expression::Integer(69420)),
            ("\"hello\";", Expression::String("hello".to_owned())),
            ("true;", Expression::Boolean(true)),
            ("false", Expression::Boolean(false)),
            ("nil", Expression::Nil),
        ];

        for (input, expected) in tests {
            let prog = setup(input, 1);
            assert_eq!(
                prog.statements[0],
                Statement::Expression {
                    expression: expected
                }
            );
        }
    }

    #[test]
    fn test_prefix_expressions() {
        let tests = vec![
            ("not 5;", PrefixOperator::Not, Expression::Integer(5)),
            ("-15;", PrefixOperator::Minus, Expression::Integer(15)),
            ("not true", PrefixOperator::Not, Expression::Boolean(true)),
            ("-a", PrefixOperator::Minus, Expression::Identifier("a".into())),
        ];

        for (input, operator, right) in tests {
            let prog = setup(input, 1);
            assert_eq!(
                prog.statements[0],
                Statement::Expression {
                    expression: Expression::Prefix(Box::new(PrefixExpression { operator, right }))
                }
            );
        }
    }

    #[test]
    fn test_infix_expressions() {
        let tests = vec![
            ("5 + 5;", InfixOperator::Plus),
            ("5 - 5;", InfixOperator::Minus),
            ("5 * 5;", InfixOperator::Multiply),
            ("5 / 5;", InfixOperator::Divide),
            ("5 % 5;", InfixOperator::Modulo),
            ("5 > 5;", InfixOperator::GreaterThan),
            ("5 < 5;", InfixOperator::LessThan),
            ("5 >= 5;", InfixOperator::GreaterEqual),
            ("5 <= 5;", InfixOperator::LessEqual),
            ("5 == 5;", InfixOperator::Equal),
            ("5 != 5;", InfixOperator::NotEqual),
            ("5 and 5;", InfixOperator::And),
            ("5 or 5;", InfixOperator::Or),
        ];

        for (input, operator) in tests {
            let prog = setup(input, 1);
            assert_eq!(
                prog.statements[0],
                Statement::Expression {
                    expression: Expression::Infix(Box::new(InfixExpression {
                        left: Expression::Integer(5),
                        operator,
                        right: Expression::Integer(5),
                    }))
                }
            );
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("-a * b", "((-(a)) * b)"),
            ("a * -b", "(a * (-(b)))"),
            ("not -a", "(not((-(a))))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a - b - c", "((a - b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a * b % c", "((a * b) % c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-(5)) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("5 >= 4 == 3 <= 4", "((5 >= 4) == (3 <= 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("false", "false"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("3 * (2 - 6)", "(3 * (2 - 6))"),
            ("b / (a + c)", "(b / (a + c))"),
            ("not (a + b)", "(not((a + b)))"),
            ("not a + b", "((not(a)) + b)"),
            ("a + not b", "(a + (not(b)))"),
            ("not (true == false)", "(not((true == false)))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            ("f(x) + 1", "(f(x) + 1)"),
            ("-f(x)", "(-(f(x)))"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            ("make(5)(10)", "make(5)(10)"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
            ("a or b and c", "(a or (b and c))"),
            ("a and b or c", "((a and b) or c)"),
            ("a == b and c != d", "((a == b) and (c != d))"),
            ("not a and b", "((not(a)) and b)"),
        ];

        for (input, expected) in tests {
            let prog = setup(input, 0);
            assert_eq!(prog.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_if_expression() {
        let prog = setup("if (x < y) { x }", 1);

        match &prog.statements[0] {
            Statement::Expression {
                expression: Expression::If(if_expr),
            } => {
                assert_eq!(if_expr.condition.to_string(), "(x < y)");
                assert_eq!(if_expr.consequence.statements.len(), 1);
                assert_eq!(if_expr.consequence.to_string(), "{x}");
                assert!(if_expr.alternative.is_none());
            }
            stmt => panic!("expected if expression but got {:?}", stmt),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let prog = setup("if (x < y) { x } else { var z = y; z }", 1);

        match &prog.statements[0] {
            Statement::Expression {
                expression: Expression::If(if_expr),
            } => {
                let alternative = if_expr.alternative.as_ref().expect("missing else block");
                assert_eq!(alternative.statements.len(), 2);
                assert_eq!(alternative.to_string(), "{var z = y;z}");
            }
            stmt => panic!("expected if expression but got {:?}", stmt),
        }
    }

    #[test]
    fn test_function_literal() {
        let prog = setup("func(x, y) { x + y; }", 1);

        match &prog.statements[0] {
            Statement::Expression {
                expression: Expression::Function(func),
            } => {
                assert_eq!(
                    func.parameters,
                    vec![IdentifierLiteral::from("x"), IdentifierLiteral::from("y")]
                );
                assert_eq!(func.body.to_string(), "{(x + y)}");
            }
            stmt => panic!("expected function literal but got {:?}", stmt),
        }
    }

    #[test]
    fn test_function_parameters() {
        let tests = vec![
            ("func() {};", vec![]),
            ("func(x) {};", vec!["x"]),
            ("func(x, y, z) {};", vec!["x", "y", "z"]),
        ];

        for (input, expected) in tests {
            let prog = setup(input, 1);
            match &prog.statements[0] {
                Statement::Expression {
                    expression: Expression::Function(func),
                } => {
                    let names: Vec<&str> =
                        func.parameters.iter().map(|p| p.name.as_str()).collect();
                    assert_eq!(names, expected);
                }
                stmt => panic!("expected function literal but got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        let prog = setup("add(1, 2 * 3, 4 + 5);", 1);

        match &prog.statements[0] {
            Statement::Expression {
                expression: Expression::Call(call),
            } => {
                assert_eq!(call.function, Expression::Identifier("add".into()));
                let args: Vec<String> = call.arguments.iter().map(|a| a.to_string()).collect();
                assert_eq!(args, vec!["1", "(2 * 3)", "(4 + 5)"]);
            }
            stmt => panic!("expected call expression but got {:?}", stmt),
        }
    }

    #[test]
    fn test_immediately_invoked_function() {
        let prog = setup("func (x) { x % 2; }(5);", 1);
        assert_eq!(prog.to_string(), "func(x) {(x % 2)}(5)");
    }

    #[test]
    fn test_list_literal() {
        let prog = setup("[1, 2 * 2, 3 + 3]; []", 2);
        assert_eq!(prog.statements[0].to_string(), "[1, (2 * 2), (3 + 3)]");
        assert_eq!(prog.statements[1].to_string(), "[]");
    }

    #[test]
    fn test_index_expression() {
        let prog = setup("myList[1 + 1]", 1);
        assert_eq!(prog.to_string(), "(myList[(1 + 1)])");
    }

    #[test]
    fn test_empty_statements() {
        let prog = setup(";; var x = 1;; x;", 2);
        assert_eq!(prog.to_string(), "var x = 1;x");
    }

    #[test]
    fn test_parse_errors() {
        let (prog, errors) = parse_with_errors("var age = 28; var bob marley;");

        assert_eq!(prog.statements.len(), 1);
        assert_eq!(prog.to_string(), "var age = 28;");
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ParseError::Expected { expected, got } => {
                assert_eq!(expected, "=");
                assert_eq!(got.value, Token::Identifier("marley".to_owned()));
            }
            error => panic!("expected `Expected` error but got {:?}", error),
        }
    }

    #[test]
    fn test_error_recovery() {
        let tests = vec![
            // Missing name, parsing continues with the next statement
            ("var x = 5; var = 10; var y = 15;", "var x = 5;var y = 15;", 1),
            // Missing closing paren of a call
            ("add(1, 2; var x = 1;", "var x = 1;", 1),
            // Missing closing paren of a group
            ("(1 + 2; 3", "3", 1),
            // Unclosed block
            ("if (x) { 1", "", 1),
            // Missing parens around the condition, the whole if is skipped
            ("if x { 1 }; 2", "2", 1),
            // Missing braces around the else branch
            ("if (x) { 1 } else 2; 3", "3", 1),
            // Bad parameter list
            ("var f = func(x, 1) { x }; 4", "4", 1),
            // Errors inside a block only drop the offending statement
            ("var f = func() { 1 +; 2 }; f", "var f = func() {2};f", 1),
            // Stray closing brace
            ("} 5", "5", 1),
            // Every bad statement is reported
            ("var = 1; var = 2; 3", "3", 2),
        ];

        for (input, expected, error_count) in tests {
            let (prog, errors) = parse_with_errors(input);
            assert_eq!(prog.to_string(), expected, "input: {}", input);
            assert_eq!(errors.len(), error_count, "input: {} {:?}", input, errors);
        }
    }

    #[test]
    fn test_error_kinds() {
        let (_, errors) = parse_with_errors("var a = @;");
        assert!(matches!(errors[0], ParseError::Illegal(_)));

        let (_, errors) = parse_with_errors("99999999999999999999");
        assert!(matches!(errors[0], ParseError::InvalidInteger(_)));

        let (_, errors) = parse_with_errors(")");
        assert!(matches!(errors[0], ParseError::NoPrefixParseFn(_)));
    }

    #[test]
    fn test_error_messages() {
        let (_, errors) = parse_with_errors("var bob marley;");
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be `=`, but got marley (at 8:14) instead"
        );

        let (_, errors) = parse_with_errors("if (x) { 1");
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be `}`, but got EOF (at 10:10) instead"
        );
    }

    #[test]
    fn test_errors_can_be_read_repeatedly() {
        let mut p = Parser::new(Lexer::new("var = 1;"));
        p.parse_program();

        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors(), p.errors());
    }

    fn parse_with_errors(input: &str) -> (Program, Vec<ParseError>) {
        let l = Lexer::new(input);
        let mut p = Parser::new(l);
        let prog = p.parse_program();
        (prog, p.into_errors())
    }

    fn setup(input: &str, stmt_count: usize) -> Program {
        let (prog, errors) = parse_with_errors(input);

        if !errors.is_empty() {
            println!("parser had {} errors", errors.len());
            for error in errors {
                println!("parser error: {}", error);
            }
            panic!("parser errors for '{}'", input)
        }

        if stmt_count != 0 && prog.statements.len() != stmt_count {
            panic!(
                "expected {} statement(s) for '{}' but got {:?}",
                stmt_count, input, prog.statements
            )
        }

        prog
    }
}
