use std::{collections::HashMap, fmt, fmt::Display, io::Write, rc::Rc};

use crate::{
    error::RuntimeError,
    object::{List, Object},
};

/// Signature shared by every builtin: the evaluator's output sink and the
/// already-evaluated arguments.
pub type BuiltinFn = fn(&mut dyn Write, Vec<Rc<Object>>) -> Result<Rc<Object>, RuntimeError>;

#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: &'static str, func: BuiltinFn) -> Self {
        Builtin { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(
        &self,
        out: &mut dyn Write,
        args: Vec<Rc<Object>>,
    ) -> Result<Rc<Object>, RuntimeError> {
        (self.func)(out, args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Builtin) -> bool {
        self.name == other.name
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin function {}", self.name)
    }
}

/// The table of functions every program can call without defining them.
///
/// Builtins are looked up before any scope, so a user binding named `len`
/// never hides the builtin of the same name.
pub struct Builtins {
    table: HashMap<&'static str, Rc<Object>>,
}

impl Builtins {
    /// An empty table
    pub fn new() -> Self {
        Builtins {
            table: HashMap::new(),
        }
    }

    /// The table with `print`, `len`, `head`, `tail`, `append`, `prepend`,
    /// `pop`, `shift` and `type`
    pub fn standard() -> Self {
        let mut builtins = Builtins::new();
        builtins.register("print", print);
        builtins.register("len", len);
        builtins.register("head", head);
        builtins.register("tail", tail);
        builtins.register("append", append);
        builtins.register("prepend", prepend);
        builtins.register("pop", pop);
        builtins.register("shift", shift);
        builtins.register("type", type_of);
        builtins
    }

    /// Add (or replace) a builtin
    pub fn register(&mut self, name: &'static str, func: BuiltinFn) {
        self.table
            .insert(name, Rc::new(Object::Builtin(Builtin::new(name, func))));
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<Object>> {
        self.table.get(name).map(Rc::clone)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Builtins::standard()
    }
}

type BuiltinResult = Result<Rc<Object>, RuntimeError>;

fn check_args(args: &[Rc<Object>], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::BadArity {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn expect_list<'o>(builtin: &'static str, arg: &'o Rc<Object>) -> Result<&'o List, RuntimeError> {
    match arg.as_ref() {
        Object::List(list) => Ok(list),
        _ => Err(RuntimeError::InvalidArgumentType {
            builtin,
            arg: Rc::clone(arg),
        }),
    }
}

fn print(out: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    for arg in &args {
        writeln!(out, "{}", arg).map_err(|err| RuntimeError::Output(err.to_string()))?;
    }
    Ok(Rc::new(Object::Nil))
}

fn len(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 1)?;

    let length = match args[0].as_ref() {
        Object::String(str) => str.chars().count(),
        Object::List(list) => list.len(),
        _ => {
            return Err(RuntimeError::InvalidArgumentType {
                builtin: "len",
                arg: Rc::clone(&args[0]),
            })
        }
    };
    Ok(Rc::new(Object::Integer(length as i64)))
}

fn head(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 1)?;
    let list = expect_list("head", &args[0])?;

    let first = list.elements.borrow().first().cloned();
    first.ok_or(RuntimeError::EmptyList("head"))
}

fn tail(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 1)?;
    let list = expect_list("tail", &args[0])?;

    let elements = list.elements.borrow();
    if elements.is_empty() {
        return Err(RuntimeError::EmptyList("tail"));
    }
    Ok(Rc::new(Object::List(List::new(elements[1..].to_vec()))))
}

fn append(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 2)?;
    let list = expect_list("append", &args[0])?;

    let mut elements = list.elements.borrow().clone();
    elements.push(Rc::clone(&args[1]));
    Ok(Rc::new(Object::List(List::new(elements))))
}

fn prepend(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 2)?;
    let list = expect_list("prepend", &args[0])?;

    let mut elements = Vec::with_capacity(list.len() + 1);
    elements.push(Rc::clone(&args[1]));
    elements.extend(list.elements.borrow().iter().cloned());
    Ok(Rc::new(Object::List(List::new(elements))))
}

fn pop(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 1)?;
    let list = expect_list("pop", &args[0])?;

    let last = list.elements.borrow_mut().pop();
    last.ok_or(RuntimeError::EmptyList("pop"))
}

fn shift(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 1)?;
    let list = expect_list("shift", &args[0])?;

    let mut elements = list.elements.borrow_mut();
    if elements.is_empty() {
        return Err(RuntimeError::EmptyList("shift"));
    }
    Ok(elements.remove(0))
}

fn type_of(_: &mut dyn Write, args: Vec<Rc<Object>>) -> BuiltinResult {
    check_args(&args, 1)?;
    Ok(Rc::new(Object::String(args[0].kind().to_string())))
}
