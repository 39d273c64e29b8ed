use crate::token::Token;
use std::{fmt::Display, rc::Rc};

#[derive(Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or_default()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub enum Statement {
    Var {
        /// The name/identifier of the variable
        name: IdentifierLiteral,
        /// The value being bound
        value: Expression,
    },
    Return {
        /// The value being returned
        value: Expression,
    },
    Expression {
        /// The expression for this statement
        expression: Expression,
    },
}

impl Statement {
    /// The lexeme of the token this statement starts with
    pub fn token_literal(&self) -> String {
        match self {
            Statement::Var { .. } => Token::Var.lexeme(),
            Statement::Return { .. } => Token::Return.lexeme(),
            Statement::Expression { expression } => expression.token_literal(),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;

        match self {
            Var { name, value } => write!(
                f,
                "{tok} {ident} = {val};",
                tok = Token::Var,
                ident = name,
                val = value
            ),
            Return { value } => write!(f, "{} {};", Token::Return, value),
            Expression { expression } => write!(f, "{}", expression),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Expression {
    // Literal
    Identifier(IdentifierLiteral),
    Integer(i64),
    Boolean(bool),
    String(String),
    Nil,

    // Complex
    List(Box<ListLiteral>),
    Prefix(Box<PrefixExpression>),
    Infix(Box<InfixExpression>),
    Index(Box<IndexExpression>),
    If(Box<IfExpression>),
    Function(Box<FunctionLiteral>),
    Call(Box<CallExpression>),
}

impl Expression {
    /// The lexeme of the token this expression was parsed from
    pub fn token_literal(&self) -> String {
        use Expression::*;

        match self {
            Identifier(ident) => ident.name.clone(),
            Integer(value) => value.to_string(),
            Boolean(value) => value.to_string(),
            String(value) => value.clone(),
            Nil => Token::Nil.lexeme(),

            List(_) => Token::LeftBracket.lexeme(),
            Prefix(prefix) => prefix.operator.to_string(),
            Infix(infix) => infix.operator.to_string(),
            Index(_) => Token::LeftBracket.lexeme(),
            If(_) => Token::If.lexeme(),
            Function(_) => Token::Func.lexeme(),
            Call(_) => Token::LeftParen.lexeme(),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;

        match self {
            Identifier(name) => write!(f, "{}", name),
            Integer(value) => write!(f, "{}", value),
            Boolean(value) => write!(f, "{}", value),
            String(value) => write!(f, "\"{}\"", escape(value)),
            Nil => write!(f, "nil"),

            List(list) => write!(f, "{}", list),
            Prefix(prefix) => write!(f, "{}", prefix),
            Infix(infix) => write!(f, "{}", infix),
            Index(index) => write!(f, "{}", index),
            If(if_exp) => write!(f, "{}", if_exp),
            Function(func) => write!(f, "{}", func),
            Call(call) => write!(f, "{}", call),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct IdentifierLiteral {
    pub name: String,
}

impl Display for IdentifierLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for IdentifierLiteral {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

impl From<String> for IdentifierLiteral {
    fn from(name: String) -> Self {
        Self { name }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PrefixOperator {
    /// `-x`
    Minus,
    /// `not x`
    Not,
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixOperator::Minus => write!(f, "{}", Token::Minus),
            PrefixOperator::Not => write!(f, "{}", Token::Not),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InfixOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,

    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,

    And,
    Or,
}

impl InfixOperator {
    pub fn from_token(token: &Token) -> Option<InfixOperator> {
        use InfixOperator::*;

        match token {
            Token::Plus => Some(Plus),
            Token::Minus => Some(Minus),
            Token::Star => Some(Multiply),
            Token::Slash => Some(Divide),
            Token::Percent => Some(Modulo),
            Token::EqualEqual => Some(Equal),
            Token::BangEqual => Some(NotEqual),
            Token::LessThan => Some(LessThan),
            Token::GreaterThan => Some(GreaterThan),
            Token::LessEqual => Some(LessEqual),
            Token::GreaterEqual => Some(GreaterEqual),
            Token::And => Some(And),
            Token::Or => Some(Or),
            _ => None,
        }
    }

    pub fn token(&self) -> Token {
        use InfixOperator::*;

        match self {
            Plus => Token::Plus,
            Minus => Token::Minus,
            Multiply => Token::Star,
            Divide => Token::Slash,
            Modulo => Token::Percent,
            Equal => Token::EqualEqual,
            NotEqual => Token::BangEqual,
            LessThan => Token::LessThan,
            GreaterThan => Token::GreaterThan,
            LessEqual => Token::LessEqual,
            GreaterEqual => Token::GreaterEqual,
            And => Token::And,
            Or => Token::Or,
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Debug, PartialEq)]
pub struct PrefixExpression {
    pub operator: PrefixOperator,
    pub right: Expression,
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({op}({r}))", op = self.operator, r = self.right)
    }
}

#[derive(Debug, PartialEq)]
pub struct InfixExpression {
    pub left: Expression,
    pub operator: InfixOperator,
    pub right: Expression,
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({l} {op} {r})",
            l = self.left,
            op = self.operator,
            r = self.right
        )
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    /// Whether this block binds names of its own (a `var` directly inside it)
    pub fn declares_bindings(&self) -> bool {
        self.statements
            .iter()
            .any(|stmt| matches!(stmt, Statement::Var { .. }))
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, PartialEq)]
pub struct IfExpression {
    pub condition: Expression,
    /// Block if condition is truthy
    pub consequence: BlockStatement,
    /// Block if condition is falsy
    pub alternative: Option<BlockStatement>,
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} {}", self.condition, self.consequence)?;

        if let Some(ref alt) = self.alternative {
            write!(f, " else {}", alt)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct FunctionLiteral {
    /// Parameter identifiers
    pub parameters: Vec<IdentifierLiteral>,
    /// Shared with every function value created from this literal
    pub body: Rc<BlockStatement>,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) {}",
            Token::Func,
            join(&self.parameters),
            self.body
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct CallExpression {
    pub function: Expression,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.function, join(&self.arguments))
    }
}

#[derive(Debug, PartialEq)]
pub struct ListLiteral {
    pub elements: Vec<Expression>,
}

impl Display for ListLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", join(&self.elements))
    }
}

#[derive(Debug, PartialEq)]
pub struct IndexExpression {
    pub left: Expression,
    pub index: Expression,
}

impl Display for IndexExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}

/// Undo the lexer's escape handling so a rendered string literal lexes back
/// to the same text
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}
