use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Flow, Interpreter};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::Token;

/// A user-defined function or method, paired with the environment it
/// closed over at definition time. `is_initializer` marks an instance's
/// `init` method specifically: its return value is always forced to `this`.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Produces a new closure identical to this one except that its
    /// environment is a fresh frame, layered over this function's own
    /// closure, binding `this` to `instance`. This is how `a.m` yields a
    /// callable whose body sees the right receiver no matter how many
    /// variables it's passed through before being called.
    pub fn bind(&self, instance: Object) -> Function {
        let env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        env.borrow_mut().define("this", instance);
        Function::new(Rc::clone(&self.declaration), env, self.is_initializer)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        for (param, arg) in self.declaration.params.iter().zip(arguments) {
            env.borrow_mut().define(&param.lexeme, arg);
        }

        let flow = interpreter.execute_block(&self.declaration.body, env)?;

        if self.is_initializer {
            return Environment::get_at(&self.closure, 0, &Token::from("this"));
        }

        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Object::Literal(Literal::Nil)),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A host-provided builtin, exposed to user code as an ordinary callable.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter<'_>, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    /// The globals every interpreter starts with. spec.md names exactly one:
    /// `clock()`, returning wall-clock seconds as a double.
    pub fn globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: "clock",
            arity: 0,
            function: |_, _| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock to be after the unix epoch");
                Ok(Object::from(now.as_secs_f64()))
            },
        }]
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.function as usize == other.function as usize
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
