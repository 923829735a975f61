use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::object::Object;
use crate::token::Token;

/// A class value. Calling it (handled in `Interpreter::call_value`, not
/// through `Callable` — see object.rs) allocates an `Instance` holding a
/// shared handle back to this class.
#[derive(Clone)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<RefCell<Class>>>, methods: HashMap<String, Function>) -> Self {
        Class { name, superclass, methods }
    }

    /// Looks up a method by name, falling back through the superclass
    /// chain. Does not bind `this` — callers bind against the instance
    /// they actually have.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        self.superclass.as_ref().and_then(|superclass| superclass.borrow().find_method(name))
    }

    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |initializer| initializer.declaration.params.len())
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An instance of a class: a bag of fields, backed by the class's methods
/// for anything not shadowed by a field. `get` takes the instance's own
/// `Rc` handle (not just `&self`) because binding a method closes over the
/// instance as a first-class `Object::Instance(Rc<RefCell<Instance>>)`.
#[derive(Clone)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    pub fn get(handle: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(field) = handle.borrow().fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = handle.borrow().class.borrow().find_method(&name.lexeme) {
            return Ok(Object::Function(method.bind(Object::Instance(Rc::clone(handle)))));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class.borrow().name)
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}
