use std::fmt;

use crate::token::{Token, Type};

/// Aggregates whether a compile-time or runtime error occurred during a run,
/// and writes diagnostics to stderr. Constructed once per `Rocks` instance
/// and shared (by `&mut` reference) with the scanner, parser, resolver, and
/// interpreter for the duration of one `run()` call, instead of the
/// process-wide mutable statics a naive port of this pipeline would reach
/// for.
#[derive(Debug, Default)]
pub struct Reporter {
    had_compile_error: bool,
    had_runtime_error: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    pub fn had_compile_error(&self) -> bool {
        self.had_compile_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn had_error(&self) -> bool {
        self.had_compile_error || self.had_runtime_error
    }

    /// Clears both flags. The REPL calls this between prompt lines so a
    /// mistake on one line doesn't poison the rest of the session.
    pub fn reset(&mut self) {
        self.had_compile_error = false;
        self.had_runtime_error = false;
    }

    pub fn scan_error(&mut self, line: usize, message: &str) {
        eprintln!("[line {line}] Error: {message}");
        self.had_compile_error = true;
    }

    pub fn parse_error(&mut self, token: &Token, message: &str) {
        eprintln!("[line {}] Error{}: {message}", token.line, where_clause(token));
        self.had_compile_error = true;
    }

    pub fn resolve_error(&mut self, token: &Token, message: &str) {
        eprintln!("[line {}] Error{}: {message}", token.line, where_clause(token));
        self.had_compile_error = true;
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("[line {}] RuntimeError: {}", error.token.line, error.message);
        self.had_runtime_error = true;
    }
}

fn where_clause(token: &Token) -> String {
    if token.r#type == Type::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// A syntax error raised by the parser. `token` is whichever token the
/// parser was looking at when the production failed.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// A runtime error: type mismatch, undefined name, wrong arity, non-callable
/// call, non-class superclass. Carries the most specific token available so
/// the reporter can point at the right line.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] RuntimeError: {}", self.token.line, self.message)
    }
}

impl std::error::Error for RuntimeError {}
