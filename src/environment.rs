use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// One lexical scope frame: a name-to-value map plus a link to the
/// enclosing frame. Frames are shared by reference (`Rc<RefCell<_>>`)
/// because closures retain their defining environment, and a block's frame
/// must keep living as long as any closure captured from inside it does.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Object>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { values: HashMap::new(), enclosing }
    }

    /// Unconditionally binds `name` in this frame. Shadowing is allowed at
    /// the global frame (the REPL relies on re-`var`-ing a name); the
    /// resolver is what prevents it in inner scopes.
    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let parent = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver-computed distance to stay within the enclosing chain");
            current = parent;
        }
        current
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(undefined(name))
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(undefined(name))
    }

    /// Reads `name` from the frame exactly `distance` hops up, as computed
    /// by the resolver. No fallback to an enclosing frame: the resolver
    /// guarantees the name exists there.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        Environment::ancestor(env, distance)
            .borrow()
            .values
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| undefined(name))
    }

    pub fn assign_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token, value: Object) {
        Environment::ancestor(env, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError {
        token: name.clone(),
        message: format!("Undefined variable '{}'.", name.lexeme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;

    fn token(name: &str) -> Token {
        Token::from(name)
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new(None);
        env.define("a", Object::Literal(Literal::Number(1.0)));
        assert_eq!(env.get(&token("a")).unwrap(), Object::Literal(Literal::Number(1.0)));
    }

    #[test]
    fn get_falls_through_to_enclosing() {
        let global = Rc::new(RefCell::new(Environment::new(None)));
        global.borrow_mut().define("a", Object::Literal(Literal::Number(1.0)));
        let inner = Environment::new(Some(Rc::clone(&global)));
        assert_eq!(inner.get(&token("a")).unwrap(), Object::Literal(Literal::Number(1.0)));
    }

    #[test]
    fn undefined_variable_errors() {
        let env = Environment::new(None);
        assert!(env.get(&token("missing")).is_err());
    }

    #[test]
    fn assign_at_distance_writes_exact_frame() {
        let global = Rc::new(RefCell::new(Environment::new(None)));
        global.borrow_mut().define("a", Object::Literal(Literal::Number(1.0)));
        let inner = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&global)))));

        Environment::assign_at(&inner, 1, &token("a"), Object::Literal(Literal::Number(2.0)));
        assert_eq!(
            Environment::get_at(&global, 0, &token("a")).unwrap(),
            Object::Literal(Literal::Number(2.0))
        );
    }
}
