use std::{cell::RefCell, fmt, fmt::Display, rc::Rc};

use crate::{builtin::Builtin, scope::Scope};

use pingul_parser::ast::{BlockStatement, IdentifierLiteral};

#[derive(Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Nil,
    List(List),
    Function(Function),
    Builtin(Builtin),
    /// Special object to encapsulate a return-ed value while it goes up scopes.
    /// This is never seen by the user.
    ReturnValue(Rc<Object>),
}

/// The type tag of an [`Object`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Integer,
    Boolean,
    String,
    Nil,
    List,
    Function,
    Builtin,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Integer => "integer",
            ObjectKind::Boolean => "boolean",
            ObjectKind::String => "string",
            ObjectKind::Nil => "nil",
            ObjectKind::List => "list",
            ObjectKind::Function => "function",
            ObjectKind::Builtin => "builtin",
        };
        write!(f, "{}", name)
    }
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        use Object::*;

        match self {
            Integer(_) => ObjectKind::Integer,
            Boolean(_) => ObjectKind::Boolean,
            String(_) => ObjectKind::String,
            Nil => ObjectKind::Nil,
            List(_) => ObjectKind::List,
            Function(_) => ObjectKind::Function,
            Builtin(_) => ObjectKind::Builtin,
            ReturnValue(obj) => obj.kind(),
        }
    }

    /// Truthiness used by `if`, `not`, `and`/`or` and the boolean operators.
    pub fn is_truthy(&self) -> bool {
        use Object::*;

        match self {
            Integer(value) => *value != 0,
            Boolean(value) => *value,
            String(value) => !value.is_empty(),
            Nil => false,
            List(list) => !list.is_empty(),
            Function(_) | Builtin(_) => true,
            ReturnValue(obj) => obj.is_truthy(),
        }
    }

    pub fn is_return_value(&self) -> bool {
        matches!(self, Self::ReturnValue(_))
    }

    /// Converts the given value to a string (in the format of a code object).
    ///
    /// Use this anywhere a programmer expects to see the code-version of an object (e.g. in the REPL).
    /// # Examples
    /// ```rust
    /// use pingul_interpreter::object::Object;
    ///
    /// let obj = Object::String("hello world".to_string());
    ///
    /// assert_eq!(obj.to_code_string(), "\"hello world\"");
    /// ```
    pub fn to_code_string(&self) -> String {
        use Object::*;

        match self {
            String(value) => format!("\"{}\"", value),
            ReturnValue(obj) => obj.to_code_string(),
            value => value.to_string(),
        }
    }
}

impl Display for Object {
    /// toString() form at runtime
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Object::*;

        match self {
            Integer(value) => write!(f, "{}", value),
            Boolean(value) => write!(f, "{}", value),
            String(value) => write!(f, "{}", value),
            Nil => write!(f, "nil"),
            List(list) => write!(f, "{}", list),
            Function(func) => write!(f, "{}", func),
            Builtin(builtin) => write!(f, "{}", builtin),
            ReturnValue(obj) => write!(f, "{}", obj),
        }
    }
}

/// A list is shared, not copied, when it is bound to another name or passed
/// to a function, so `pop` and `shift` are visible through every alias.
#[derive(Debug, Default, PartialEq)]
pub struct List {
    pub elements: RefCell<Vec<Rc<Object>>>,
}

impl List {
    pub fn new(elements: Vec<Rc<Object>>) -> Self {
        List {
            elements: RefCell::new(elements),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }
}

impl Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<String> = self
            .elements
            .borrow()
            .iter()
            .map(|e| e.to_code_string())
            .collect();
        write!(f, "[{}]", elements.join(", "))
    }
}

pub struct Function {
    pub parameters: Vec<IdentifierLiteral>,
    pub body: Rc<BlockStatement>,
    /// Scope the function was created in
    pub env: Rc<RefCell<Scope>>,
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();

        write!(f, "func({}) {}", params.join(", "), self.body)
    }
}

impl fmt::Debug for Function {
    // The captured scope usually holds this function itself
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    /// Two function values are equal when they come from the same literal
    /// evaluated in the same scope.
    fn eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && Rc::ptr_eq(&self.env, &other.env)
    }
}
