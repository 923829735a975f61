use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Reporter, RuntimeError};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{is_truthy, Callable, Object};
use crate::stmt::*;
use crate::token::{Token, Type};

/// A statement's outcome: either it fell through normally, or a `return`
/// somewhere inside it produced a value that needs to keep propagating up
/// through every enclosing block and loop until it reaches the call that
/// invoked the function (spec.md §9 Design Notes prefers this over unwinding
/// through a `Result::Err`-shaped "control exception").
#[derive(Debug, Clone)]
pub enum Flow {
    Normal,
    Return(Object),
}

/// Walks the parsed tree and executes it directly, without a separate
/// compilation step. Holds the global environment, the current lexical
/// environment, the resolver's `NodeId -> distance` table, and the writer
/// that `print` sends its output to — injected rather than hardcoded to
/// stdout so a test can capture what a script prints (spec.md §5 "Output").
pub struct Interpreter<'out> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    pub fn new(output: &'out mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Object::NativeFunction(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Installs the local-variable distance table the resolver computed.
    /// Must be called before `interpret` for scripts with any locals at all.
    pub fn resolve(&mut self, locals: HashMap<NodeId, usize>) {
        self.locals = locals;
    }

    /// Executes a whole program, reporting (and stopping at) the first
    /// runtime error (spec.md §6).
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut Reporter) {
        for statement in statements {
            match self.execute(statement) {
                Ok(_) => {}
                Err(error) => {
                    reporter.runtime_error(&error);
                    return;
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Runs `statements` in a fresh child environment, then restores
    /// whatever environment was active before the call, whether or not
    /// execution succeeded.
    pub fn execute_block(&mut self, statements: &[Stmt], env: Rc<RefCell<Environment>>) -> Result<Flow, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, env);

        let mut result = Ok(Flow::Normal);
        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => continue,
                Ok(flow @ Flow::Return(_)) => {
                    result = Ok(flow);
                    break;
                }
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, name: &Token, id: NodeId) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => Environment::get_at(&self.environment, *distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn call_value(&mut self, callee: Object, paren: &Token, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        match callee {
            Object::Function(function) => {
                check_arity(paren, function.arity(), arguments.len())?;
                function.call(self, arguments)
            }
            Object::NativeFunction(function) => {
                check_arity(paren, function.arity(), arguments.len())?;
                function.call(self, arguments)
            }
            Object::Class(class) => {
                let arity = class.borrow().arity();
                check_arity(paren, arity, arguments.len())?;

                let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(&class))));
                if let Some(initializer) = class.borrow().find_method("init") {
                    initializer.bind(Object::Instance(Rc::clone(&instance))).call(self, arguments)?;
                }

                Ok(Object::Instance(instance))
            }
            _ => Err(RuntimeError { token: paren.clone(), message: "Can only call functions and classes.".to_string() }),
        }
    }
}

fn check_arity(paren: &Token, arity: usize, got: usize) -> Result<(), RuntimeError> {
    if arity != got {
        return Err(RuntimeError {
            token: paren.clone(),
            message: format!("Expected {arity} arguments but got {got}."),
        });
    }
    Ok(())
}

fn check_number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
    match operand {
        Object::Literal(Literal::Number(n)) => Ok(*n),
        _ => Err(RuntimeError { token: operator.clone(), message: "Operand must be a number.".to_string() }),
    }
}

fn check_number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok((*l, *r)),
        _ => Err(RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() }),
    }
}

impl<'out> ExprVisitor<Result<Object, RuntimeError>> for Interpreter<'out> {
    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(distance) => Environment::assign_at(&self.environment, *distance, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        match data.operator.r#type {
            Type::Minus => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l - r))
            }
            Type::Slash => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l / r))
            }
            Type::Star => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l * r))
            }
            Type::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok(Object::from(l + r)),
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Ok(Object::from(format!("{l}{r}")))
                }
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::Greater => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l > r))
            }
            Type::GreaterEqual => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l >= r))
            }
            Type::Less => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l < r))
            }
            Type::LessEqual => {
                let (l, r) = check_number_operands(&data.operator, &left, &right)?;
                Ok(Object::from(l <= r))
            }
            Type::BangEqual => Ok(Object::from(left != right)),
            Type::EqualEqual => Ok(Object::from(left == right)),
            _ => unreachable!("parser never produces a binary expression with this operator"),
        }
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        self.call_value(callee, &data.paren, arguments)
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        match object {
            Object::Instance(instance) => Instance::get(&instance, &data.name),
            _ => Err(RuntimeError { token: data.name.clone(), message: "Only instances have properties.".to_string() }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError { token: data.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<Object, RuntimeError> {
        self.evaluate(&data.expr)
    }

    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::Literal(literal.clone()))
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        if data.operator.r#type == Type::Or {
            if is_truthy(&left) {
                return Ok(left);
            }
        } else if !is_truthy(&left) {
            return Ok(left);
        }

        self.evaluate(&data.right)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<Object, RuntimeError> {
        let distance = *self.locals.get(&data.id).expect("resolver always resolves 'super'");
        let superclass = Environment::get_at(&self.environment, distance, &data.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to a class")
        };

        let instance = Environment::get_at(&self.environment, distance - 1, &Token::from("this"))?;

        let method = superclass.borrow().find_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'.", data.method.lexeme),
        })?;

        Ok(Object::Function(method.bind(instance)))
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<Object, RuntimeError> {
        self.lookup_variable(&data.keyword, data.id)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => {
                let n = check_number_operand(&data.operator, &right)?;
                Ok(Object::from(-n))
            }
            Type::Bang => Ok(Object::from(!is_truthy(&right))),
            _ => unreachable!("parser never produces a unary expression with this operator"),
        }
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Object, RuntimeError> {
        self.lookup_variable(&data.name, data.id)
    }
}

impl<'out> StmtVisitor<Result<Flow, RuntimeError>> for Interpreter<'out> {
    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<Flow, RuntimeError> {
        let env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, env)
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<Flow, RuntimeError> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Object::Class(class) = value else {
                    let Expr::Variable(variable) = expr else { unreachable!("superclass expr is always a Variable") };
                    return Err(RuntimeError { token: variable.name.clone(), message: "Superclass must be a class.".to_string() });
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::Literal(Literal::Nil));

        let method_env = if let Some(superclass) = &superclass {
            let env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            env.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            env
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::clone(method), Rc::clone(&method_env), is_initializer);
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Class::new(data.name.lexeme.clone(), superclass, methods);
        self.environment.borrow_mut().assign(&data.name, Object::Class(Rc::new(RefCell::new(class))))?;

        Ok(Flow::Normal)
    }

    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<Flow, RuntimeError> {
        self.evaluate(&data.expr)?;
        Ok(Flow::Normal)
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionData>) -> Result<Flow, RuntimeError> {
        let function = Function::new(Rc::clone(data), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::Function(function));
        Ok(Flow::Normal)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<Flow, RuntimeError> {
        if is_truthy(&self.evaluate(&data.condition)?) {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<Flow, RuntimeError> {
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("writing to the configured output should not fail");
        Ok(Flow::Normal)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<Flow, RuntimeError> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::Literal(Literal::Nil),
        };

        Ok(Flow::Return(value))
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<Flow, RuntimeError> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::Literal(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(Flow::Normal)
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<Flow, RuntimeError> {
        while is_truthy(&self.evaluate(&data.condition)?) {
            match self.execute(&data.body)? {
                Flow::Normal => continue,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> (String, Reporter) {
        let mut reporter = Reporter::new();
        let tokens = Scanner::new(source).scan_tokens(&mut reporter);
        let statements = Parser::new(tokens, &mut reporter).parse();
        let locals = Resolver::new(&mut reporter).resolve(&statements);

        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);
        interpreter.resolve(locals);
        interpreter.interpret(&statements, &mut reporter);

        (String::from_utf8(output).expect("interpreter only ever writes valid UTF-8"), reporter)
    }

    #[test]
    fn prints_arithmetic_result() {
        let (output, reporter) = run("print 1 + 2 * 3;");
        assert!(!reporter.had_error());
        assert_eq!(output, "7\n");
    }

    #[test]
    fn string_concatenation() {
        let (output, reporter) = run(r#"print "a" + "b";"#);
        assert!(!reporter.had_error());
        assert_eq!(output, "ab\n");
    }

    #[test]
    fn adding_number_and_string_is_a_runtime_error() {
        let (_, reporter) = run(r#"print 1 + "a";"#);
        assert!(reporter.had_runtime_error());
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let (output, reporter) = run(
            "fun makeCounter() { var i = 0; fun count() { i = i + 1; print i; } return count; } \
             var counter = makeCounter(); counter(); counter();",
        );
        assert!(!reporter.had_error());
        assert_eq!(output, "1\n2\n");
    }

    #[test]
    fn while_loop_accumulates() {
        let (output, reporter) = run("var i = 0; while (i < 3) { print i; i = i + 1; }");
        assert!(!reporter.had_error());
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn class_instance_fields_and_methods() {
        let (output, reporter) = run(
            "class Point { init(x) { this.x = x; } getX() { return this.x; } } \
             var p = Point(3); print p.getX();",
        );
        assert!(!reporter.had_error());
        assert_eq!(output, "3\n");
    }

    #[test]
    fn inherited_method_dispatches_through_super() {
        let (output, reporter) = run(
            "class A { say() { print \"A\"; } } \
             class B < A { say() { super.say(); print \"B\"; } } \
             B().say();",
        );
        assert!(!reporter.had_error());
        assert_eq!(output, "A\nB\n");
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let (_, reporter) = run("var a = 1; a();");
        assert!(reporter.had_runtime_error());
    }

    #[test]
    fn wrong_arity_is_a_runtime_error() {
        let (_, reporter) = run("fun f(a) { return a; } f(1, 2);");
        assert!(reporter.had_runtime_error());
    }

    #[test]
    fn truthiness_rules() {
        let (output, reporter) = run(
            "if (nil) print \"x\"; else print \"a\"; \
             if (0) print \"b\"; else print \"x\"; \
             if (\"\") print \"c\"; else print \"x\";",
        );
        assert!(!reporter.had_error());
        assert_eq!(output, "a\nb\nc\n");
    }
}
