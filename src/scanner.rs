use peekmore::{PeekMore, PeekMoreIterator};
use std::str::Chars;

use crate::error::Reporter;
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Converts source text into a flat list of tokens, terminated by an `EOF`
/// sentinel. Walks the source one character at a time using a two-token
/// lookahead (`peek`/`peek_next`) so two-character operators, numbers, and
/// block comments can be recognized without backtracking.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start_line: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: vec![],
            start_line: 1,
            line: 1,
        }
    }

    /// Scans the whole source and returns the resulting token list.
    pub fn scan_tokens(&mut self, reporter: &mut Reporter) -> Vec<Token> {
        while !self.is_at_end() {
            self.start_line = self.line;
            self.scan_token(reporter);
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, self.line));
        std::mem::take(&mut self.tokens)
    }

    fn advance(&mut self) -> char {
        self.source.next().expect("advance called past end of source")
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.start_line));
    }

    /// Skips a block comment, having already consumed the opening `/*`.
    /// Block comments nest: every unmatched `/*` opens another level, and
    /// the comment only ends when the matching `*/` for the outermost `/*`
    /// is found. Newlines inside a nested comment still advance `self.line`
    /// so token line numbers downstream of the comment stay accurate.
    fn block_comment(&mut self, reporter: &mut Reporter) {
        let mut depth = 1;

        while depth > 0 {
            if self.is_at_end() {
                reporter.scan_error(self.start_line, "Unterminated comment");
                return;
            }

            let c = self.advance();
            match c {
                '\n' => self.line += 1,
                '/' if self.peek() == '*' => {
                    self.advance();
                    depth += 1;
                }
                '*' if self.peek() == '/' => {
                    self.advance();
                    depth -= 1;
                }
                _ => {}
            }
        }
    }

    fn string(&mut self, reporter: &mut Reporter) {
        let mut value = String::new();

        while self.peek() != '"' && !self.is_at_end() {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
            }
            value.push(c);
        }

        if self.is_at_end() {
            reporter.scan_error(self.start_line, "Unterminated string");
            return;
        }

        self.advance(); // Closing quote.

        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    fn number(&mut self) {
        let mut value = String::new();

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance()); // Consume the '.'.

            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }
        }

        let number: f64 = value.parse().expect("scanned digits to parse as a number");
        self.add_token(Type::Number, value, Some(Literal::Number(number)));
    }

    fn identifier(&mut self) {
        let mut value = String::new();

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            value.push(self.advance());
        }

        let r#type = match value.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(r#type, value, None);
    }

    fn scan_token(&mut self, reporter: &mut Reporter) {
        let c = self.advance();

        match c {
            '(' => self.add_token(Type::LeftParen, c.to_string(), None),
            ')' => self.add_token(Type::RightParen, c.to_string(), None),
            '{' => self.add_token(Type::LeftBrace, c.to_string(), None),
            '}' => self.add_token(Type::RightBrace, c.to_string(), None),
            ',' => self.add_token(Type::Comma, c.to_string(), None),
            '.' => self.add_token(Type::Dot, c.to_string(), None),
            '-' => self.add_token(Type::Minus, c.to_string(), None),
            '+' => self.add_token(Type::Plus, c.to_string(), None),
            ';' => self.add_token(Type::Semicolon, c.to_string(), None),
            '*' => self.add_token(Type::Star, c.to_string(), None),

            '!' => {
                if self.match_next('=') {
                    self.add_token(Type::BangEqual, "!=".to_string(), None);
                } else {
                    self.add_token(Type::Bang, c.to_string(), None);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_token(Type::EqualEqual, "==".to_string(), None);
                } else {
                    self.add_token(Type::Equal, c.to_string(), None);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_token(Type::LessEqual, "<=".to_string(), None);
                } else {
                    self.add_token(Type::Less, c.to_string(), None);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_token(Type::GreaterEqual, ">=".to_string(), None);
                } else {
                    self.add_token(Type::Greater, c.to_string(), None);
                }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_next('*') {
                    self.block_comment(reporter);
                } else {
                    self.add_token(Type::Slash, c.to_string(), None);
                }
            }

            ' ' | '\r' | '\t' => {}

            '\n' => self.line += 1,

            '"' => self.string(reporter),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            c => reporter.scan_error(self.start_line, &format!("Unexpected character '{c}'")),
        }
    }
}
