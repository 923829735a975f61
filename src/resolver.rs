use std::collections::HashMap;

use crate::error::Reporter;
use crate::expr::*;
use crate::stmt::*;
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// A static pass over the parsed tree that resolves every variable reference
/// to the number of scopes between its use and its binding, ahead of any
/// interpretation (spec.md §4.4). This also catches the scope errors that
/// can only be detected statically: duplicate locals, `this`/`super`/`return`
/// used outside of the context they require, and self-inheriting classes.
///
/// Unlike a tree-walking resolver that mutates the interpreter in place as it
/// goes, this one is standalone: it owns no reference to an `Interpreter` and
/// simply hands back the completed `NodeId -> distance` table for the driver
/// to install before interpreting starts.
pub struct Resolver<'a> {
    reporter: &'a mut Reporter,
    scopes: Vec<HashMap<String, bool>>,
    locals: HashMap<NodeId, usize>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(reporter: &'a mut Reporter) -> Self {
        Resolver {
            reporter,
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Resolves a whole program and returns the local-variable distance
    /// table for the interpreter to consult.
    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<NodeId, usize> {
        self.resolve_statements(statements);
        self.locals
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_function(&mut self, declaration: &FunctionData, kind: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(&declaration.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Marks `name` as declared-but-not-yet-defined in the innermost scope,
    /// so that `var a = a;` can be caught as a self-reference.
    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.reporter.resolve_error(name, "Already a variable with this name in this scope.");
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.lexeme.clone(), true);
    }

    fn resolve_local(&mut self, name: &Token, id: NodeId) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, depth);
                return;
            }
        }
        // Not found in any scope: treated as global, resolved at runtime.
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_assign_expr(&mut self, data: &AssignData) {
        self.resolve_expr(&data.value);
        self.resolve_local(&data.name, data.id);
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_call_expr(&mut self, data: &CallData) {
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) {
        self.resolve_expr(&data.object);
    }

    fn visit_set_expr(&mut self, data: &SetData) {
        self.resolve_expr(&data.value);
        self.resolve_expr(&data.object);
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_literal_expr(&mut self, _literal: &crate::literal::Literal) {}

    fn visit_logical_expr(&mut self, data: &LogicalData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_super_expr(&mut self, data: &SuperData) {
        match self.current_class {
            ClassType::None => {
                self.reporter.resolve_error(&data.keyword, "Can't use 'super' outside of a class.");
            }
            ClassType::Class => {
                self.reporter.resolve_error(&data.keyword, "Can't use 'super' in a class with no superclass.");
            }
            ClassType::Subclass => {}
        }

        self.resolve_local(&data.keyword, data.id);
    }

    fn visit_this_expr(&mut self, data: &ThisData) {
        if self.current_class == ClassType::None {
            self.reporter.resolve_error(&data.keyword, "Can't use 'this' outside of a class.");
            return;
        }

        self.resolve_local(&data.keyword, data.id);
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_variable_expr(&mut self, data: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&data.name.lexeme) == Some(&false) {
                self.reporter.resolve_error(&data.name, "Can't read local variable in its own initializer.");
            }
        }

        self.resolve_local(&data.name, data.id);
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_block_stmt(&mut self, data: &BlockData) {
        self.begin_scope();
        self.resolve_statements(&data.statements);
        self.end_scope();
    }

    fn visit_class_stmt(&mut self, data: &ClassData) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(Expr::Variable(superclass)) = &data.superclass {
            if superclass.name.lexeme == data.name.lexeme {
                self.reporter.resolve_error(&superclass.name, "A class can't inherit from itself.");
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expr(data.superclass.as_ref().expect("checked Some above"));
        }

        if data.superclass.is_some() {
            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &data.methods {
            let kind = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn visit_expression_stmt(&mut self, data: &ExpressionData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_function_stmt(&mut self, data: &std::rc::Rc<FunctionData>) {
        self.declare(&data.name);
        self.define(&data.name);
        self.resolve_function(data, FunctionType::Function);
    }

    fn visit_if_stmt(&mut self, data: &IfData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_print_stmt(&mut self, data: &PrintData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) {
        if self.current_function == FunctionType::None {
            self.reporter.resolve_error(&data.keyword, "Can't return from top-level code.");
        }

        if let Some(value) = &data.value {
            if self.current_function == FunctionType::Initializer {
                self.reporter.resolve_error(&data.keyword, "Can't return a value from an initializer.");
            }
            self.resolve_expr(value);
        }
    }

    fn visit_var_stmt(&mut self, data: &VarData) {
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_while_stmt(&mut self, data: &WhileData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve(source: &str) -> (HashMap<NodeId, usize>, Reporter) {
        let mut reporter = Reporter::new();
        let tokens = Scanner::new(source).scan_tokens(&mut reporter);
        let statements = Parser::new(tokens, &mut reporter).parse();
        let locals = Resolver::new(&mut reporter).resolve(&statements);
        (locals, reporter)
    }

    #[test]
    fn resolves_local_in_nested_block() {
        let (locals, reporter) = resolve("{ var a = 1; { print a; } }");
        assert!(!reporter.had_compile_error());
        assert_eq!(locals.len(), 1);
        assert_eq!(*locals.values().next().unwrap(), 1);
    }

    #[test]
    fn self_reference_in_initializer_is_an_error() {
        let (_, reporter) = resolve("{ var a = a; }");
        assert!(reporter.had_compile_error());
    }

    #[test]
    fn duplicate_local_is_an_error() {
        let (_, reporter) = resolve("{ var a = 1; var a = 2; }");
        assert!(reporter.had_compile_error());
    }

    #[test]
    fn return_at_top_level_is_an_error() {
        let (_, reporter) = resolve("return 1;");
        assert!(reporter.had_compile_error());
    }

    #[test]
    fn return_value_in_initializer_is_an_error() {
        let (_, reporter) = resolve("class A { init() { return 1; } }");
        assert!(reporter.had_compile_error());
    }

    #[test]
    fn this_outside_class_is_an_error() {
        let (_, reporter) = resolve("print this;");
        assert!(reporter.had_compile_error());
    }

    #[test]
    fn class_inheriting_itself_is_an_error() {
        let (_, reporter) = resolve("class A < A {}");
        assert!(reporter.had_compile_error());
    }

    #[test]
    fn super_without_superclass_is_an_error() {
        let (_, reporter) = resolve("class A { m() { super.m(); } }");
        assert!(reporter.had_compile_error());
    }
}
