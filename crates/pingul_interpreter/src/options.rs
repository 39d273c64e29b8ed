/// Knobs for the behaviors that are deliberately configurable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub unset_variables: UnsetVariables,
    pub arity: Arity,
}

/// What reading a name that was never bound does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetVariables {
    /// Evaluate to `nil` and bind the name to `nil` in the global scope
    Vivify,
    /// Evaluate to `nil` and leave every scope untouched
    Nil,
}

impl Default for UnsetVariables {
    fn default() -> Self {
        UnsetVariables::Vivify
    }
}

/// How calls to user functions treat a mismatched argument count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Missing parameters are bound to `nil`, extra arguments are ignored
    Lenient,
    /// The call evaluates to `nil` without running the body
    Strict,
}

impl Default for Arity {
    fn default() -> Self {
        Arity::Lenient
    }
}
