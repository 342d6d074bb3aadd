use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::value::{Value, ValueType};

/// Errors raised while evaluating a ground expression.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("`{name}` expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("`{name}` expected a {expected} value, found {found}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("relation `{name}` returned a non-boolean {found} value")]
    NonBoolean { name: String, found: ValueType },

    #[error("`{0}` has no evaluator")]
    Opaque(String),

    #[error("variable `{0}` is not bound in the environment")]
    Unbound(String),

    #[error("`{0}` cannot be evaluated")]
    NotEvaluable(String),
}

/// Host callable backing an evaluable function or relation.
pub type Evaluator =
    Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// Argument and result types of an evaluable symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub args: Vec<ValueType>,
    pub returns: ValueType,
}

/// A named function of fixed arity.
///
/// Functions declared only by name and arity are opaque: they take part in
/// parsing, CNF conversion and unification, but evaluating them fails.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    signature: Option<Signature>,
    evaluator: Option<Evaluator>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, signature: Signature, evaluator: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: signature.args.len(),
            signature: Some(signature),
            evaluator: Some(Arc::new(evaluator)),
        }
    }

    pub fn opaque(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            signature: None,
            evaluator: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_evaluable(&self) -> bool {
        self.evaluator.is_some()
    }

    /// Check the arguments and run the evaluator.
    pub fn evaluate(&self, args: &[Value]) -> Result<Value, EvalError> {
        let result = self.invoke(args)?;
        if let Some(signature) = &self.signature {
            if result.value_type() != signature.returns {
                return Err(EvalError::TypeMismatch {
                    name: self.name.clone(),
                    expected: signature.returns,
                    found: result.value_type(),
                });
            }
        }
        Ok(result)
    }

    fn invoke(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() != self.arity {
            return Err(EvalError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity,
                found: args.len(),
            });
        }
        if let Some(signature) = &self.signature {
            for (expected, value) in signature.args.iter().zip(args) {
                if *expected != value.value_type() {
                    return Err(EvalError::TypeMismatch {
                        name: self.name.clone(),
                        expected: *expected,
                        found: value.value_type(),
                    });
                }
            }
        }
        match &self.evaluator {
            Some(evaluator) => evaluator(args),
            None => Err(EvalError::Opaque(self.name.clone())),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("signature", &self.signature)
            .field("evaluable", &self.evaluator.is_some())
            .finish()
    }
}

/// A function whose evaluation must produce a boolean.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    function: Function,
}

impl Relation {
    pub fn new<F>(name: impl Into<String>, args: Vec<ValueType>, evaluator: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        let signature = Signature {
            args,
            returns: ValueType::Bool,
        };
        Self {
            function: Function::new(name, signature, evaluator),
        }
    }

    pub fn opaque(name: impl Into<String>, arity: usize) -> Self {
        Self {
            function: Function::opaque(name, arity),
        }
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn arity(&self) -> usize {
        self.function.arity()
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn evaluate(&self, args: &[Value]) -> Result<bool, EvalError> {
        match self.function.invoke(args)? {
            Value::Bool(holds) => Ok(holds),
            other => Err(EvalError::NonBoolean {
                name: self.name().to_string(),
                found: other.value_type(),
            }),
        }
    }
}
