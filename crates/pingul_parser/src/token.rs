use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    EqualEqual,
    BangEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,

    // Delimiters
    Comma,
    Semicolon,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    // Identifiers & Literals
    Identifier(String),
    /// Digits as written; the parser decides whether they fit in an i64
    Integer(String),
    String(String),

    // Keywords
    True,
    False,
    Nil,
    Var,
    Func,
    Return,
    If,
    Else,
    And,
    Or,
    Not,

    // Special
    /// Anything the lexer could not make sense of (e.g. `@` or an unclosed string)
    Illegal(String),
    Eof,
}

impl Token {
    /// Get the Token for the given keyword, if valid.
    pub fn lookup_keyword(s: &str) -> Option<Token> {
        use Token::*;

        match s {
            "true" => Some(True),
            "false" => Some(False),
            "nil" => Some(Nil),
            "var" => Some(Var),
            "func" => Some(Func),
            "return" => Some(Return),
            "if" => Some(If),
            "else" => Some(Else),
            "and" => Some(And),
            "or" => Some(Or),
            "not" => Some(Not),
            _ => None,
        }
    }

    /// Whether both tokens are of the same kind, ignoring any payload.
    pub fn same_kind(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// The source text this token was read from.
    pub fn lexeme(&self) -> String {
        match self {
            Token::String(value) => value.clone(),
            Token::Eof => String::new(),
            token => token.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;

        match self {
            Assign => write!(f, "="),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            Percent => write!(f, "%"),

            EqualEqual => write!(f, "=="),
            BangEqual => write!(f, "!="),
            LessThan => write!(f, "<"),
            GreaterThan => write!(f, ">"),
            LessEqual => write!(f, "<="),
            GreaterEqual => write!(f, ">="),

            Comma => write!(f, ","),
            Semicolon => write!(f, ";"),

            LeftParen => write!(f, "("),
            RightParen => write!(f, ")"),
            LeftBrace => write!(f, "{{"),
            RightBrace => write!(f, "}}"),
            LeftBracket => write!(f, "["),
            RightBracket => write!(f, "]"),

            Identifier(name) => write!(f, "{}", name),
            Integer(digits) => write!(f, "{}", digits),
            String(value) => write!(f, "\"{}\"", value),

            True => write!(f, "true"),
            False => write!(f, "false"),
            Nil => write!(f, "nil"),
            Var => write!(f, "var"),
            Func => write!(f, "func"),
            Return => write!(f, "return"),
            If => write!(f, "if"),
            Else => write!(f, "else"),
            And => write!(f, "and"),
            Or => write!(f, "or"),
            Not => write!(f, "not"),

            Illegal(text) => write!(f, "{}", text),
            Eof => write!(f, "EOF"),
        }
    }
}
