use log::debug;

use crate::data::{format_postfix, CnfError, EvalError, StatementCnf, Symbol, SymbolTracker, Value};
use crate::log::targets;
use crate::normalize;
use crate::parser::{infix_to_postfix, tokenize, Environment, ExpressionNode, ParseError};

/// A parsed first-order statement.
///
/// The postfix form is what the statement is; the tree is built from it
/// once, on construction, and every conversion starts from a copy of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    postfix: Vec<Symbol>,
    tree: ExpressionNode,
}

impl Statement {
    /// Parse infix text, resolving names through `tracker`.
    pub fn parse(text: &str, tracker: &mut SymbolTracker) -> Result<Self, ParseError> {
        let tokens = tokenize(text, tracker)?;
        let postfix = infix_to_postfix(&tokens)?;
        let statement = Self::from_postfix(postfix)?;
        debug!(target: targets::PARSER, "parsed `{}` as {}", text.trim(), statement);
        Ok(statement)
    }

    pub fn from_postfix(postfix: Vec<Symbol>) -> Result<Self, ParseError> {
        let tree = ExpressionNode::from_postfix(&postfix)?;
        Ok(Self { postfix, tree })
    }

    pub fn postfix(&self) -> &[Symbol] {
        &self.postfix
    }

    pub fn expression_tree(&self) -> &ExpressionNode {
        &self.tree
    }

    pub fn evaluate(&self, env: &Environment) -> Result<Value, EvalError> {
        self.tree.evaluate(env)
    }

    pub fn cnf_tree(&self, tracker: &mut SymbolTracker) -> ExpressionNode {
        normalize::to_cnf(self.tree.clone(), tracker)
    }

    pub fn cnf_postfix(&self, tracker: &mut SymbolTracker) -> Vec<Symbol> {
        self.cnf_tree(tracker).to_postfix()
    }

    pub fn cnf(&self, tracker: &mut SymbolTracker) -> Result<StatementCnf, CnfError> {
        StatementCnf::from_postfix(&self.cnf_postfix(tracker))
    }

    /// CNF of the negation of this statement.
    pub fn negated_cnf(&self, tracker: &mut SymbolTracker) -> Result<StatementCnf, CnfError> {
        let tree = normalize::to_cnf(self.tree.clone().negate(), tracker);
        StatementCnf::from_postfix(&tree.to_postfix())
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_postfix(&self.postfix))
    }
}
