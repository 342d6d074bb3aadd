use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Errors raised while reading or applying `name=value` assignments.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParameterError {
    #[error("expected `name=value`, found `{0}`")]
    InvalidAssignment(String),

    #[error("unknown parameter `{0}`")]
    Unknown(String),

    #[error("parameter `{name}` expects {expected}, found `{found}`")]
    WrongType {
        name: String,
        expected: &'static str,
        found: ParameterValue,
    },
}

/// Values maintained in the parameter table.
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Integers first, then floats, otherwise text.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Ok(value) = text.parse::<i64>() {
            ParameterValue::Integer(value)
        } else if let Ok(value) = text.parse::<f64>() {
            ParameterValue::Float(value)
        } else {
            ParameterValue::Text(text.to_string())
        }
    }
}

impl Default for ParameterValue {
    fn default() -> Self {
        ParameterValue::Integer(0)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Integer(value) => write!(f, "{}", value),
            ParameterValue::Float(value) => write!(f, "{:?}", value),
            ParameterValue::Text(value) => f.write_str(value),
        }
    }
}

/// Parameter collection keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    parameters: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.parameters.insert(name.into(), value);
    }

    /// Record a `name=value` assignment.
    pub fn assign(&mut self, assignment: &str) -> Result<(), ParameterError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ParameterError::InvalidAssignment(assignment.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ParameterError::InvalidAssignment(assignment.to_string()));
        }
        self.set(name, ParameterValue::parse(value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ParameterValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ParameterValue::Float(v)) => Some(*v),
            Some(ParameterValue::Integer(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParameterValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// A non-negative integer parameter, if set.
    pub fn get_count(&self, name: &str) -> Result<Option<usize>, ParameterError> {
        match self.get(name) {
            None => Ok(None),
            Some(ParameterValue::Integer(v)) if *v >= 0 => Ok(Some(*v as usize)),
            Some(other) => Err(ParameterError::WrongType {
                name: name.to_string(),
                expected: "a non-negative integer",
                found: other.clone(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.parameters.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::{ParameterError, ParameterSet, ParameterValue};

    #[test]
    fn store_and_fetch_parameters() {
        let mut params = ParameterSet::new();
        params.set("max_seconds", ParameterValue::Integer(42));
        params.set("epsilon", ParameterValue::Float(0.5));
        params.set("name", ParameterValue::Text("prover".into()));
        assert_eq!(params.get_int("max_seconds"), Some(42));
        assert!(params.get_int("missing").is_none());
        assert_eq!(params.get_float("epsilon"), Some(0.5));
        assert_eq!(params.get_float("max_seconds"), Some(42.0));
        assert_eq!(params.get_text("name"), Some("prover"));
    }

    #[test]
    fn assignments_are_typed() {
        let mut params = ParameterSet::new();
        params.assign("max_rounds=40").expect("integer");
        params.assign("ratio = 0.25").expect("float");
        params.assign("label=socrates").expect("text");
        assert_eq!(params.get_int("max_rounds"), Some(40));
        assert_eq!(params.get_float("ratio"), Some(0.25));
        assert_eq!(params.get_text("label"), Some("socrates"));
        assert_eq!(
            params.assign("max_rounds"),
            Err(ParameterError::InvalidAssignment("max_rounds".into()))
        );
        assert!(params.assign("=3").is_err());
    }

    #[test]
    fn counts_must_be_non_negative_integers() {
        let mut params = ParameterSet::new();
        params.assign("a=3").expect("assign");
        params.assign("b=-1").expect("assign");
        params.assign("c=x").expect("assign");
        assert_eq!(params.get_count("a"), Ok(Some(3)));
        assert_eq!(params.get_count("missing"), Ok(None));
        assert!(matches!(params.get_count("b"), Err(ParameterError::WrongType { .. })));
        assert!(matches!(params.get_count("c"), Err(ParameterError::WrongType { .. })));
    }
}
