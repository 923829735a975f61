#![allow(clippy::needless_return)]

//! Rocks is a programming language written in Rust. It is a dynamically typed language with
//! lexical scoping and first-class functions. Rocks is a tree-walk interpreter with a hand-written
//! recursive descent parser. Rocks is a hobby project and is not intended for production use.
//!
//! Rocks is a dynamically typed language. This means that the type of a variable is determined at
//! runtime. This is in contrast to statically typed languages, where the type of a variable is
//! determined at compile time. Dynamically typed languages are often easier to use, but are
//! generally slower than statically typed languages.
//!
//! Rocks is a tree-walk interpreter. This means that the interpreter walks the abstract syntax tree
//! (AST) and evaluates each node. This is in contrast to a compiler, which would convert the AST
//! into bytecode or machine code. Tree-walk interpreters are generally easier to implement than
//! compilers, but are generally slower than compilers.
//!
//! Rocks is a hobby project and is not intended for production use. The goal of this project is to
//! learn more about programming languages and interpreters. This project is inspired by the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book by Bob Nystrom.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string of
//! characters into a list of tokens. A token is a single unit of a programming language. For
//! example, the string `1 + 2` would be converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as an iterator over the characters
//! in the source code. It is a simple state machine that returns the next token in the source code
//! when called.
//!
//! The scanner reports syntax errors in the source code through [`Reporter::scan_error`](error::Reporter::scan_error).
//! These errors are trivial problems like an unterminated string literal or an unexpected character.
//! Scan errors are reported as soon as they are encountered. This means that the scanner will
//! continue scanning the source code even if it has already encountered a syntax error. This is
//! useful because it allows the user to fix multiple syntax errors at once.
//!
//! ## Parsing
//! The second step in the interpreter is parsing. Parsing is the process of converting a list of
//! tokens into an abstract syntax tree (AST). The parser is implemented in the [`parser`](parser)
//! module as a recursive descent parser. The parser transforms the list of tokens into expressions
//! and statements. [`Expressions`](expr::Expr) are pieces of code that produce a value, specifically an
//! [`Object`](object::Object). Objects are an umbrella term for all types of values in Rocks
//! including literals, functions, classes and instances. [`Statements`](stmt::Stmt) are pieces of code
//! that do not produce a value but instead perform some action. These actions modify the state of the
//! program and thus, are called side-effects. For example, a variable decleration or an if clause
//! would be classified as statements.
//!
//! The parser reports syntax errors in the source code as a [`ParseError`](error::ParseError).
//! Unlike the scanner, the parser catches errors that span multiple tokens. However, much like the
//! scanner, the parser will continue parsing the source code even after a syntax error using a
//! technique called synchronization, so a user can see more than one mistake per run.
//!
//! ## Resolving
//! The third step in the interpreter is resolving. Resolving is the process of statically analyzing
//! the AST to determine the scope of each variable. While this requires a pre-pass of the AST, it
//! is necessary to construct robust lexical scoping. The resolver is implemented in the
//! [`resolver`](resolver) module. It walks the tree exactly once, before any code runs, and hands
//! the interpreter a table of how many scopes to hop for each variable reference — rather than
//! re-walking scopes at every lookup. The resolver reports errors through
//! [`Reporter::resolve_error`](error::Reporter::resolve_error). These errors are syntactically valid but semantically invalid,
//! and therefore cannot be caught by the scanner or the parser. For example, the following is valid
//! Rocks syntax but is rejected by the resolver because `a` is declared twice in the same scope:
//! ```text
//! {
//!    var a = 1;
//!    var a = 2;
//! }
//! ```
//!
//! ## Interpreting
//! The final step in the interpreter is _interpreting_. Interpreting is the process of evaluating the
//! AST. The interpreter is implemented in the [`interpreter`](interpreter) module as a tree-walk
//! interpreter. Thanks to all the previous steps, the interpreter is able to evaluate the AST and produce
//! a result. The interpreter reports errors as a [`RuntimeError`](error::RuntimeError). While the
//! scanner, the parser and the resolver try to catch as many errors as possible before running the
//! code, most errors can only be caught at runtime. For example, the following expression is valid
//! Rocks syntax but it is semantically invalid because it tries to add a string and a number:
//! ```text
//! var a = "123";
//! var b = a + 123;
//! ```
//! The interpreter is also responsible for managing the environment. The environment is a mapping of
//! variable names to their values. The environment is implemented in the [`environment`](environment)
//! module as a chain of hash maps, one per lexical scope, so closures can keep a scope alive after
//! the block that created it has returned.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Reporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Drives one REPL/script session end to end: scan, parse, resolve, then
/// interpret, stopping early the moment any stage reports a compile error.
/// `print` output goes to whatever writer the caller hands in, so a script
/// can be run headless with its output captured (see `tests/common`).
#[allow(non_camel_case_types)]
pub struct rocks<'out> {
    interpreter: Interpreter<'out>,
    reporter: Reporter,
}

impl<'out> rocks<'out> {
    pub fn new(output: &'out mut dyn Write) -> Self {
        rocks {
            interpreter: Interpreter::new(output),
            reporter: Reporter::new(),
        }
    }

    /// Runs a script file, exiting the process with 65 on a compile error or
    /// 70 on a runtime error, matching the Unix `sysexits.h` convention
    /// spec.md §6 calls for.
    pub fn run_file(&mut self, path: impl AsRef<Path>) {
        let contents = fs::read_to_string(path).expect("should be able to read the script file");

        self.run_source(&contents);

        if self.reporter.had_compile_error() {
            process::exit(65);
        }
        if self.reporter.had_runtime_error() {
            process::exit(70);
        }
    }

    /// Runs an interactive prompt, reading one line at a time until EOF
    /// (`^D`). A mistake on one line does not poison later lines: the
    /// reporter's error flags are cleared between iterations.
    pub fn run_prompt(&mut self) {
        let mut editor = rustyline::Editor::<(), rustyline::history::DefaultHistory>::new()
            .expect("should be able to start the line editor");
        let history_path = history_path();
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline(":> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run_source(&line);
                    self.reporter.reset();
                }
                Err(rustyline::error::ReadlineError::Eof) | Err(rustyline::error::ReadlineError::Interrupted) => break,
                Err(_) => break,
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }
    }

    /// Runs one chunk of source through the whole pipeline. Public so
    /// embedders and tests can drive the interpreter without going through a
    /// file or the REPL.
    pub fn run_source(&mut self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens(&mut self.reporter);

        if self.reporter.had_compile_error() {
            return;
        }

        let statements = {
            let mut parser = Parser::new(tokens, &mut self.reporter);
            parser.parse()
        };

        if self.reporter.had_compile_error() {
            return;
        }

        let locals = Resolver::new(&mut self.reporter).resolve(&statements);

        if self.reporter.had_compile_error() {
            return;
        }

        self.interpreter.resolve(locals);
        self.interpreter.interpret(&statements, &mut self.reporter);
    }
}

/// `~/.rocks_history`, the same way the teacher locates its REPL history
/// file. Returns `None` (silently skipping history) if the home directory
/// can't be found rather than failing the whole REPL over it.
fn history_path() -> Option<std::path::PathBuf> {
    home::home_dir().map(|home| home.join(".rocks_history"))
}
