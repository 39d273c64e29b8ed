use std::{
    cell::RefCell,
    convert::TryFrom,
    io::{self, Write},
    rc::Rc,
};

use tracing::{debug, trace};

use crate::{
    builtin::Builtins,
    error::RuntimeError,
    object::{Function, List, Object},
    options::{Arity, Options, UnsetVariables},
    scope::Scope,
};

use pingul_parser::ast::{
    BlockStatement, Expression, IdentifierLiteral, IfExpression, InfixOperator, PrefixOperator,
    Program, Statement,
};

/// Walks a [`Program`] and produces its value.
///
/// Evaluation never fails: anything that cannot be computed becomes `nil`.
/// The reason is kept in [`Evaluator::diagnostics`].
pub struct Evaluator<'a> {
    builtins: &'a Builtins,
    options: Options,
    output: Box<dyn Write + 'a>,
    diagnostics: Vec<RuntimeError>,
}

impl<'a> Evaluator<'a> {
    /// An evaluator printing to stdout with the default options
    pub fn new(builtins: &'a Builtins) -> Self {
        Evaluator {
            builtins,
            options: Options::default(),
            output: Box::new(io::stdout()),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Send everything `print` writes to `output` instead of stdout
    pub fn with_output(mut self, output: impl Write + 'a) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Everything that degraded to `nil` since the last [`Evaluator::take_diagnostics`]
    pub fn diagnostics(&self) -> &[RuntimeError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<RuntimeError> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn eval(&mut self, prog: &Program, env: &Rc<RefCell<Scope>>) -> Rc<Object> {
        let mut result = Rc::new(Object::Nil);

        for stmt in &prog.statements {
            let val = self.eval_statement(stmt, env);

            match val.as_ref() {
                // If a return value is found, immediately return and stop evaluating statements
                // Unwrap the return value into a final value so the program can use it
                Object::ReturnValue(inner_value) => return Rc::clone(inner_value),
                _ => result = val,
            }
        }

        result
    }

    // Similar to eval (for programs) but doesn't unwrap return values
    fn eval_block_statement(
        &mut self,
        block: &BlockStatement,
        env: &Rc<RefCell<Scope>>,
    ) -> Rc<Object> {
        let mut result = Rc::new(Object::Nil);

        for stmt in &block.statements {
            let val = self.eval_statement(stmt, env);

            // Don't unwrap the return value, we might be in a nested block which also needs to return
            if val.is_return_value() {
                return val;
            }
            result = val;
        }

        result
    }

    /// Branches of an `if` get their own scope, but only when they bind something
    fn eval_branch(&mut self, block: &BlockStatement, env: &Rc<RefCell<Scope>>) -> Rc<Object> {
        if block.declares_bindings() {
            let scope = Rc::new(RefCell::new(Scope::new_enclosed(Rc::clone(env))));
            self.eval_block_statement(block, &scope)
        } else {
            self.eval_block_statement(block, env)
        }
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Rc<RefCell<Scope>>) -> Rc<Object> {
        match stmt {
            Statement::Expression { expression } => self.eval_expression(expression, env),
            Statement::Return { value } => {
                let obj = self.eval_expression(value, env);
                // Already on its way out
                if obj.is_return_value() {
                    return obj;
                }

                Rc::new(Object::ReturnValue(obj))
            }
            Statement::Var { name, value } => {
                let obj = self.eval_expression(value, env);
                if obj.is_return_value() {
                    return obj;
                }

                trace!(name = %name, value = %obj, depth = env.borrow().depth(), "binding");
                env.borrow_mut().set(name.name.clone(), obj)
            }
        }
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Rc<RefCell<Scope>>) -> Rc<Object> {
        match expr {
            Expression::Integer(value) => Rc::new(Object::Integer(*value)),
            Expression::Boolean(value) => Rc::new(Object::Boolean(*value)),
            Expression::String(value) => Rc::new(Object::String(value.clone())),
            Expression::Nil => Rc::new(Object::Nil),
            Expression::Identifier(identifier) => self.eval_identifier(identifier, env),

            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right, env);
                // A `return` inside an operand leaves the enclosing function
                if right.is_return_value() {
                    return right;
                }
                self.eval_prefix_expression(prefix.operator, right)
            }
            Expression::Infix(infix) => {
                // Short circuiting operators have a different handler
                if matches!(infix.operator, InfixOperator::And | InfixOperator::Or) {
                    return self.eval_infix_expression_with_short_circuiting(
                        infix.operator,
                        &infix.left,
                        &infix.right,
                        env,
                    );
                }

                let left = self.eval_expression(&infix.left, env);
                if left.is_return_value() {
                    return left;
                }
                let right = self.eval_expression(&infix.right, env);
                if right.is_return_value() {
                    return right;
                }
                self.eval_infix_expression(infix.operator, &left, &right)
            }

            Expression::If(if_expr) => self.eval_if_expression(if_expr, env),

            Expression::List(list) => match self.eval_expressions(&list.elements, env) {
                Ok(elements) => Rc::new(Object::List(List::new(elements))),
                Err(returned) => returned,
            },
            Expression::Index(expr) => {
                let left = self.eval_expression(&expr.left, env);
                if left.is_return_value() {
                    return left;
                }
                let index = self.eval_expression(&expr.index, env);
                if index.is_return_value() {
                    return index;
                }
                self.eval_index_expression(left, index)
            }

            Expression::Function(func) => Rc::new(Object::Function(Function {
                parameters: func.parameters.clone(),
                body: Rc::clone(&func.body),
                env: Rc::clone(env),
            })),
            Expression::Call(call) => {
                let func = self.eval_expression(&call.function, env);
                if func.is_return_value() {
                    return func;
                }
                let args = match self.eval_expressions(&call.arguments, env) {
                    Ok(args) => args,
                    Err(returned) => return returned,
                };

                self.apply_function(func, args)
            }
        }
    }

    /// Evaluate left to right, stopping at the first `return` encountered
    fn eval_expressions(
        &mut self,
        exprs: &[Expression],
        env: &Rc<RefCell<Scope>>,
    ) -> Result<Vec<Rc<Object>>, Rc<Object>> {
        let mut result = Vec::with_capacity(exprs.len());
        for expr in exprs {
            let evaluated = self.eval_expression(expr, env);
            if evaluated.is_return_value() {
                return Err(evaluated);
            }
            result.push(evaluated);
        }
        Ok(result)
    }

    /// The one place names are resolved: builtins first, then the scope
    /// chain from the inside out, then the unset-variable policy.
    fn eval_identifier(
        &mut self,
        identifier: &IdentifierLiteral,
        env: &Rc<RefCell<Scope>>,
    ) -> Rc<Object> {
        if let Some(builtin) = self.builtins.lookup(&identifier.name) {
            return builtin;
        }

        let found = env.borrow().get(&identifier.name);
        match found {
            Some(obj) => obj,
            None => {
                self.note(RuntimeError::IdentifierNotFound(identifier.name.clone()));

                let nil = Rc::new(Object::Nil);
                if self.options.unset_variables == UnsetVariables::Vivify {
                    env.borrow_mut()
                        .set_global(identifier.name.clone(), Rc::clone(&nil));
                }
                nil
            }
        }
    }

    fn eval_prefix_expression(&mut self, operator: PrefixOperator, right: Rc<Object>) -> Rc<Object> {
        match operator {
            PrefixOperator::Not => Rc::new(Object::Boolean(!right.is_truthy())),
            PrefixOperator::Minus => match *right {
                Object::Integer(value) => Rc::new(Object::Integer(value.wrapping_neg())),
                _ => self.degrade(RuntimeError::InvalidPrefixOperandType { operator, right }),
            },
        }
    }

    fn eval_infix_expression_with_short_circuiting(
        &mut self,
        operator: InfixOperator,
        left_expr: &Expression,
        right_expr: &Expression,
        env: &Rc<RefCell<Scope>>,
    ) -> Rc<Object> {
        let left = self.eval_expression(left_expr, env);
        if left.is_return_value() {
            return left;
        }

        let left_value = left.is_truthy();
        match (left_value, operator) {
            // Short-circuiting cases
            (false, InfixOperator::And) => Rc::new(Object::Boolean(false)),
            (true, InfixOperator::Or) => Rc::new(Object::Boolean(true)),

            _ => {
                let right = self.eval_expression(right_expr, env);
                if right.is_return_value() {
                    return right;
                }
                logical(operator, left_value, right.is_truthy())
            }
        }
    }

    fn eval_infix_expression(
        &mut self,
        operator: InfixOperator,
        left: &Rc<Object>,
        right: &Rc<Object>,
    ) -> Rc<Object> {
        match (left.as_ref(), right.as_ref()) {
            (Object::String(left_value), Object::String(right_value))
                if operator == InfixOperator::Plus =>
            {
                Rc::new(Object::String(format!("{}{}", left_value, right_value)))
            }

            (Object::Integer(left_value), Object::Integer(right_value)) => {
                self.eval_integer_infix_expression(operator, *left_value, *right_value)
            }
            // A boolean on the right of an integer counts as 0 or 1
            (Object::Integer(left_value), Object::Boolean(right_value)) => {
                self.eval_integer_infix_expression(operator, *left_value, *right_value as i64)
            }

            _ => self.eval_boolean_infix_expression(operator, left, right),
        }
    }

    fn eval_integer_infix_expression(
        &mut self,
        operator: InfixOperator,
        left_value: i64,
        right_value: i64,
    ) -> Rc<Object> {
        use InfixOperator::*;

        match operator {
            Plus => Rc::new(Object::Integer(left_value.wrapping_add(right_value))),
            Minus => Rc::new(Object::Integer(left_value.wrapping_sub(right_value))),
            Multiply => Rc::new(Object::Integer(left_value.wrapping_mul(right_value))),
            Divide | Modulo if right_value == 0 => self.degrade(RuntimeError::DivisionByZero {
                operator,
                left: left_value,
            }),
            Divide => Rc::new(Object::Integer(left_value.wrapping_div(right_value))),
            Modulo => Rc::new(Object::Integer(left_value.wrapping_rem(right_value))),

            LessThan => Rc::new(Object::Boolean(left_value < right_value)),
            LessEqual => Rc::new(Object::Boolean(left_value <= right_value)),
            GreaterThan => Rc::new(Object::Boolean(left_value > right_value)),
            GreaterEqual => Rc::new(Object::Boolean(left_value >= right_value)),
            Equal => Rc::new(Object::Boolean(left_value == right_value)),
            NotEqual => Rc::new(Object::Boolean(left_value != right_value)),

            And | Or => logical(operator, left_value != 0, right_value != 0),
        }
    }

    /// Everything else compares truthiness
    fn eval_boolean_infix_expression(
        &mut self,
        operator: InfixOperator,
        left: &Rc<Object>,
        right: &Rc<Object>,
    ) -> Rc<Object> {
        let left_value = left.is_truthy();
        let right_value = right.is_truthy();

        match operator {
            InfixOperator::Equal => Rc::new(Object::Boolean(left_value == right_value)),
            InfixOperator::NotEqual => Rc::new(Object::Boolean(left_value != right_value)),
            InfixOperator::And | InfixOperator::Or => logical(operator, left_value, right_value),

            operator => self.degrade(RuntimeError::InvalidInfixOperandType {
                operator,
                left: Rc::clone(left),
                right: Rc::clone(right),
            }),
        }
    }

    fn eval_if_expression(
        &mut self,
        if_expr: &IfExpression,
        env: &Rc<RefCell<Scope>>,
    ) -> Rc<Object> {
        let condition = self.eval_expression(&if_expr.condition, env);
        if condition.is_return_value() {
            return condition;
        }

        if condition.is_truthy() {
            self.eval_branch(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_branch(alternative, env)
        } else {
            Rc::new(Object::Nil)
        }
    }

    fn eval_index_expression(&mut self, left: Rc<Object>, index: Rc<Object>) -> Rc<Object> {
        match (left.as_ref(), index.as_ref()) {
            (Object::List(list), Object::Integer(position)) => {
                let position = *position;
                let element = usize::try_from(position)
                    .ok()
                    .and_then(|i| list.elements.borrow().get(i).cloned());

                match element {
                    Some(element) => element,
                    None => self.degrade(RuntimeError::IndexOutOfBounds {
                        list: Rc::clone(&left),
                        index: position,
                    }),
                }
            }
            (Object::List(_), _) => self.degrade(RuntimeError::InvalidIndexOperandType(
                Rc::clone(&index),
            )),
            _ => self.degrade(RuntimeError::IndexNotSupported(Rc::clone(&left))),
        }
    }

    fn apply_function(&mut self, func: Rc<Object>, args: Vec<Rc<Object>>) -> Rc<Object> {
        match func.as_ref() {
            Object::Function(function) => {
                if let Err(error) = check_arity(function, args.len()) {
                    if self.options.arity == Arity::Strict {
                        return self.degrade(error);
                    }
                    self.note(error);
                }

                let mut scope = Scope::new_enclosed(Rc::clone(&function.env));
                let mut args = args.into_iter();
                for param in &function.parameters {
                    // Missing arguments are nil, extra ones are dropped
                    let value = args.next().unwrap_or_else(|| Rc::new(Object::Nil));
                    scope.set(param.name.clone(), value);
                }
                let scope = Rc::new(RefCell::new(scope));

                trace!(function = %function, depth = scope.borrow().depth(), "calling");
                let evaluated = self.eval_block_statement(&function.body, &scope);

                // Unwrap return value so that it does not propagate
                match evaluated.as_ref() {
                    Object::ReturnValue(inner_value) => Rc::clone(inner_value),
                    _ => evaluated,
                }
            }
            Object::Builtin(builtin) => match builtin.apply(self.output.as_mut(), args) {
                Ok(obj) => obj,
                Err(error) => self.degrade(error),
            },
            _ => self.degrade(RuntimeError::NotAFunction(Rc::clone(&func))),
        }
    }

    /// Record why something went wrong without changing the result
    fn note(&mut self, error: RuntimeError) {
        debug!(%error, "runtime diagnostic");
        self.diagnostics.push(error);
    }

    /// Record why something went wrong and evaluate to `nil`
    fn degrade(&mut self, error: RuntimeError) -> Rc<Object> {
        self.note(error);
        Rc::new(Object::Nil)
    }
}

/// `and`/`or` over truthiness; any other operator is treated as `or`
fn logical(operator: InfixOperator, left: bool, right: bool) -> Rc<Object> {
    let value = match operator {
        InfixOperator::And => left && right,
        _ => left || right,
    };
    Rc::new(Object::Boolean(value))
}

/// Whether `got` arguments fit the parameters of `function`
pub fn check_arity(function: &Function, got: usize) -> Result<(), RuntimeError> {
    let expected = function.parameters.len();
    if expected == got {
        Ok(())
    } else {
        Err(RuntimeError::BadArity { expected, got })
    }
}
