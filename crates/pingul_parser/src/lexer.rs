use std::iter::Peekable;
use std::str::Chars;

use crate::span::{BytePos, Span, WithSpan};
use crate::token::Token;

pub struct Lexer<'a> {
    input_iter: Peekable<Chars<'a>>,
    current_position: BytePos,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input_iter: input.chars().peekable(),
            current_position: BytePos::new(0),
        }
    }

    /// Consume the next character from the list.
    fn read_char(&mut self) -> Option<char> {
        let next = self.input_iter.next();
        if let Some(c) = next {
            self.current_position = self.current_position.shift(c);
        }
        next
    }

    /// Get the next character from the list without consuming it.
    fn peek_char(&mut self) -> Option<&char> {
        self.input_iter.peek()
    }

    /// Consume the next character only if it is `expected`.
    fn read_char_if(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(&expected) {
            self.read_char();
            true
        } else {
            false
        }
    }

    /// Consume whitespace until a non-whitespace character is found.
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek_char() {
            if c.is_whitespace() {
                self.read_char();
            } else {
                break;
            }
        }
    }

    /// Read the next characters as a string.
    /// An unterminated string or unknown escape becomes an Illegal token.
    fn read_string(&mut self, opening: char) -> Token {
        let mut str = String::new();

        loop {
            match self.read_char() {
                Some(ch) if ch == opening => break,
                Some('\\') => match self.read_char() {
                    Some('\'') => str.push('\''),
                    Some('\"') => str.push('\"'),
                    Some('\\') => str.push('\\'),
                    Some('n') => str.push('\n'),
                    Some('r') => str.push('\r'),
                    Some('t') => str.push('\t'),
                    Some('0') => str.push('\0'),
                    Some(ch) => return Token::Illegal(format!("\\{}", ch)),
                    None => return Token::Illegal(format!("{}{}", opening, str)),
                },
                Some(ch) => str.push(ch),
                None => return Token::Illegal(format!("{}{}", opening, str)),
            }
        }

        Token::String(str)
    }

    /// Read the current and following digits as an integer token.
    fn read_number(&mut self, first: char) -> Token {
        let mut digits = String::new();
        digits.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_digit(ch) {
                digits.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        Token::Integer(digits)
    }

    /// Read the current and following characters as an identifier or a keyword (if it exists).
    fn read_identifier_or_keyword(&mut self, first: char) -> Token {
        let mut identifier = String::new();
        identifier.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_identifier_char(ch) || is_digit(ch) {
                identifier.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        Token::lookup_keyword(&identifier).unwrap_or(Token::Identifier(identifier))
    }

    /// Read a new token from the characters list.
    /// Once the input is exhausted every call returns `Token::Eof`.
    pub fn next_token(&mut self) -> WithSpan<Token> {
        self.skip_whitespace();

        let initial_position = self.current_position;

        let token = match self.read_char() {
            Some(c) => match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '%' => Token::Percent,

                '=' if self.read_char_if('=') => Token::EqualEqual,
                '=' => Token::Assign,
                '!' if self.read_char_if('=') => Token::BangEqual,
                '<' if self.read_char_if('=') => Token::LessEqual,
                '<' => Token::LessThan,
                '>' if self.read_char_if('=') => Token::GreaterEqual,
                '>' => Token::GreaterThan,

                ',' => Token::Comma,
                ';' => Token::Semicolon,

                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '{' => Token::LeftBrace,
                '}' => Token::RightBrace,
                '[' => Token::LeftBracket,
                ']' => Token::RightBracket,

                '"' | '\'' => self.read_string(c),

                c if is_digit(c) => self.read_number(c),
                c if is_identifier_char(c) => self.read_identifier_or_keyword(c),

                c => Token::Illegal(c.to_string()),
            },
            None => Token::Eof,
        };

        let span = Span::new(initial_position, self.current_position);

        WithSpan::new(token, span)
    }
}

/// Whether or not the given character is a digit
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Whether or not the given character can start an identifier
fn is_identifier_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::span::{BytePos, Span};
    use crate::token::Token;

    fn lex_all(input: &str) -> Vec<Token> {
        let mut lex = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lex.next_token().value;
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_operators() {
        let input = "= + - * / % == != < > <= >=";

        assert_eq!(
            lex_all(input),
            vec![
                Token::Assign,
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Percent,
                Token::EqualEqual,
                Token::BangEqual,
                Token::LessThan,
                Token::GreaterThan,
                Token::LessEqual,
                Token::GreaterEqual,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        let input = "=+(){},;[]";

        assert_eq!(
            lex_all(input),
            vec![
                Token::Assign,
                Token::Plus,
                Token::LeftParen,
                Token::RightParen,
                Token::LeftBrace,
                Token::RightBrace,
                Token::Comma,
                Token::Semicolon,
                Token::LeftBracket,
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_identifier() {
        let input = "hello _world x1 _hello_world_";

        assert_eq!(
            lex_all(input),
            vec![
                Token::Identifier("hello".to_owned()),
                Token::Identifier("_world".to_owned()),
                Token::Identifier("x1".to_owned()),
                Token::Identifier("_hello_world_".to_owned()),
            ]
        );
    }

    #[test]
    fn test_integer() {
        let input = "0 69420 99999999999999999999";

        assert_eq!(
            lex_all(input),
            vec![
                Token::Integer("0".to_owned()),
                Token::Integer("69420".to_owned()),
                // Range checking happens in the parser
                Token::Integer("99999999999999999999".to_owned()),
            ]
        );
    }

    #[test]
    fn test_string() {
        let input = "\"foobar\" \'foo bar\' \"tab\\there\" \"not closed";

        assert_eq!(
            lex_all(input),
            vec![
                Token::String("foobar".to_owned()),
                Token::String("foo bar".to_owned()),
                Token::String("tab\there".to_owned()),
                Token::Illegal("\"not closed".to_owned()),
            ]
        );
    }

    #[test]
    fn test_keywords() {
        let input = "true false nil var func return if else and or not";

        assert_eq!(
            lex_all(input),
            vec![
                Token::True,
                Token::False,
                Token::Nil,
                Token::Var,
                Token::Func,
                Token::Return,
                Token::If,
                Token::Else,
                Token::And,
                Token::Or,
                Token::Not,
            ]
        );
    }

    #[test]
    fn test_illegal() {
        assert_eq!(
            lex_all("a @ !b"),
            vec![
                Token::Identifier("a".to_owned()),
                Token::Illegal("@".to_owned()),
                Token::Illegal("!".to_owned()),
                Token::Identifier("b".to_owned()),
            ]
        );
    }

    #[test]
    fn test_program() {
        let input = "var add = func(x, y) { return x + y; };";

        assert_eq!(
            lex_all(input),
            vec![
                Token::Var,
                Token::Identifier("add".to_owned()),
                Token::Assign,
                Token::Func,
                Token::LeftParen,
                Token::Identifier("x".to_owned()),
                Token::Comma,
                Token::Identifier("y".to_owned()),
                Token::RightParen,
                Token::LeftBrace,
                Token::Return,
                Token::Identifier("x".to_owned()),
                Token::Plus,
                Token::Identifier("y".to_owned()),
                Token::Semicolon,
                Token::RightBrace,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_eof() {
        let mut lex = Lexer::new("");
        assert_eq!(lex.next_token().value, Token::Eof);
        assert_eq!(lex.next_token().value, Token::Eof);
    }

    #[test]
    fn test_spans_eof() {
        let input = "1";
        let mut lex = Lexer::new(input);

        // Skip the `1`
        lex.next_token();

        // Make sure that the span does not change upon hitting eof
        let final_span = Span::new(BytePos::new(1), BytePos::new(1));
        assert_eq!(lex.next_token().span, final_span);
        assert_eq!(lex.next_token().span, final_span);
    }

    #[test]
    fn test_spans() {
        let input = "abc 12 >= return";
        let mut lex = Lexer::new(input);

        assert_eq!(
            lex.next_token().span,
            Span::new(BytePos::new(0), BytePos::new(3))
        );
        assert_eq!(
            lex.next_token().span,
            Span::new(BytePos::new(4), BytePos::new(6))
        );
        assert_eq!(
            lex.next_token().span,
            Span::new(BytePos::new(7), BytePos::new(9))
        );
        assert_eq!(
            lex.next_token().span,
            Span::new(BytePos::new(10), BytePos::new(16))
        );
    }
}
