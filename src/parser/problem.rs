//! Line oriented problem files.
//!
//! ```text
//! # comments start with `#` or `%`
//! constant Socrates
//! constant answer = 42
//! relation Human(1)
//! function father(1)
//! assign max_rounds = 50
//! axiom FORALL x, Human(x) => Mortal(x)
//! prove Mortal(Socrates)
//! ```
//!
//! Declarations must come before the statements that use them. Declared
//! symbols carry no evaluator; they are opaque to evaluation but fully
//! usable by the prover.

use log::debug;
use thiserror::Error;

use super::ParseError;
use crate::config::{ParameterError, ParameterSet};
use crate::data::{Constant, Function, Relation, SymbolTracker, Value};
use crate::log::targets;
use crate::statement::Statement;

#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: {source}")]
    Parameter {
        line: usize,
        #[source]
        source: ParameterError,
    },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl ProblemError {
    pub fn line(&self) -> usize {
        match self {
            ProblemError::Parse { line, .. }
            | ProblemError::Parameter { line, .. }
            | ProblemError::Syntax { line, .. } => *line,
        }
    }
}

/// Declarations, axioms and goals read from a problem file. Statements are
/// parsed against `tracker`, which must be used for every later conversion.
#[derive(Debug, Default)]
pub struct Problem {
    pub tracker: SymbolTracker,
    pub axioms: Vec<Statement>,
    pub goals: Vec<Statement>,
    pub parameters: ParameterSet,
}

impl Problem {
    pub fn parse_str(text: &str) -> Result<Self, ProblemError> {
        let mut problem = Problem::default();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = strip_comment(raw).trim();
            if content.is_empty() {
                continue;
            }
            let (keyword, rest) = match content.split_once(char::is_whitespace) {
                Some((keyword, rest)) => (keyword, rest.trim()),
                None => (content, ""),
            };
            problem.directive(line, keyword, rest)?;
        }
        debug!(
            target: targets::PARSER,
            "problem: {} axioms, {} goals",
            problem.axioms.len(),
            problem.goals.len()
        );
        Ok(problem)
    }

    fn directive(&mut self, line: usize, keyword: &str, rest: &str) -> Result<(), ProblemError> {
        let syntax = |message: String| ProblemError::Syntax { line, message };
        match keyword {
            "axiom" | "prove" => {
                if rest.is_empty() {
                    return Err(syntax(format!("`{}` needs a statement", keyword)));
                }
                let statement = Statement::parse(rest, &mut self.tracker)
                    .map_err(|source| ProblemError::Parse { line, source })?;
                if keyword == "axiom" {
                    self.axioms.push(statement);
                } else {
                    self.goals.push(statement);
                }
            }
            "constant" => {
                let (name, value) = match rest.split_once('=') {
                    Some((name, literal)) => {
                        let value = parse_literal(literal.trim())
                            .ok_or_else(|| syntax(format!("invalid literal `{}`", literal.trim())))?;
                        (name.trim(), value)
                    }
                    None => (rest, Value::Text(rest.to_string())),
                };
                self.declare(line, name)?;
                self.tracker.add_constant(Constant::new(name, value));
            }
            "function" | "relation" => {
                let (name, arity) = parse_declaration(rest)
                    .ok_or_else(|| syntax(format!("expected `name(arity)`, found `{}`", rest)))?;
                self.declare(line, name)?;
                if keyword == "function" {
                    self.tracker.add_function(Function::opaque(name, arity));
                } else {
                    self.tracker.add_relation(Relation::opaque(name, arity));
                }
            }
            "assign" => self
                .parameters
                .assign(rest)
                .map_err(|source| ProblemError::Parameter { line, source })?,
            other => return Err(syntax(format!("unknown directive `{}`", other))),
        }
        Ok(())
    }

    fn declare(&self, line: usize, name: &str) -> Result<(), ProblemError> {
        if !is_identifier(name) {
            return Err(ProblemError::Syntax {
                line,
                message: format!("`{}` is not a valid name", name),
            });
        }
        if self.tracker.lookup(name).is_some() {
            return Err(ProblemError::Syntax {
                line,
                message: format!("`{}` is already declared", name),
            });
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(['#', '%']) {
        Some(index) => &line[..index],
        None => line,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// `name(arity)`
fn parse_declaration(text: &str) -> Option<(&str, usize)> {
    let (name, rest) = text.split_once('(')?;
    let arity = rest.strip_suffix(')')?.trim().parse().ok()?;
    Some((name.trim(), arity))
}

fn parse_literal(text: &str) -> Option<Value> {
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return Some(Value::Text(inner.to_string()));
    }
    match text {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if let Ok(value) = text.parse::<i64>() {
        return Some(Value::Integer(value));
    }
    text.parse::<f64>().ok().map(Value::Float)
}
