//! Spellings of operators, quantifiers and punctuation.
//!
//! Symbolic spellings are matched longest first, so `<=>` wins over `=>`
//! and `!=` over `!`. Word spellings are only recognised as whole
//! identifiers and are case sensitive.

use std::collections::HashMap;

use crate::data::{Operator, Quantifier, Symbol};

/// Table mapping source spellings to the symbols they denote.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorTable {
    /// Symbolic spellings, longest first.
    punctuation: Vec<(String, Symbol)>,
    keywords: HashMap<String, Symbol>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorTable {
    /// Create a table with the default spellings.
    pub fn new() -> Self {
        let mut table = Self {
            punctuation: Vec::new(),
            keywords: HashMap::new(),
        };

        let op = Symbol::Operator;
        let quantifier = Symbol::Quantifier;

        table.add_punctuation("(", Symbol::LeftParen);
        table.add_punctuation(")", Symbol::RightParen);
        table.add_punctuation(",", Symbol::Comma);
        table.add_punctuation(":", Symbol::SuchThat);
        table.add_punctuation(".", Symbol::SuchThat);

        table.add_punctuation("!", op(Operator::Not));
        table.add_punctuation("¬", op(Operator::Not));
        table.add_punctuation("==", op(Operator::Equals));
        table.add_punctuation("!=", op(Operator::NotEquals));
        table.add_punctuation("&&", op(Operator::And));
        table.add_punctuation("∧", op(Operator::And));
        table.add_punctuation("||", op(Operator::Or));
        table.add_punctuation("∨", op(Operator::Or));
        table.add_punctuation("=>", op(Operator::Implication));
        table.add_punctuation("→", op(Operator::Implication));
        table.add_punctuation("<=>", op(Operator::Biconditional));
        table.add_punctuation("↔", op(Operator::Biconditional));
        table.add_punctuation("∀", quantifier(Quantifier::Forall));
        table.add_punctuation("∃", quantifier(Quantifier::Exists));

        table.add_keyword("NOT", op(Operator::Not));
        table.add_keyword("EQUALS", op(Operator::Equals));
        table.add_keyword("NEQUALS", op(Operator::NotEquals));
        table.add_keyword("AND", op(Operator::And));
        table.add_keyword("OR", op(Operator::Or));
        table.add_keyword("IMPLICATION", op(Operator::Implication));
        table.add_keyword("BICONDITIONAL", op(Operator::Biconditional));
        table.add_keyword("FORALL", quantifier(Quantifier::Forall));
        table.add_keyword("EXISTS", quantifier(Quantifier::Exists));

        table
    }

    /// Add a symbolic spelling. Later additions with the same text replace
    /// earlier ones.
    pub fn add_punctuation(&mut self, text: &str, symbol: Symbol) {
        self.punctuation.retain(|(existing, _)| existing != text);
        self.punctuation.push((text.to_string(), symbol));
        self.punctuation
            .sort_by(|(a, _), (b, _)| b.chars().count().cmp(&a.chars().count()));
    }

    pub fn add_keyword(&mut self, word: &str, symbol: Symbol) {
        self.keywords.insert(word.to_string(), symbol);
    }

    /// Longest symbolic spelling at the start of `text`, with its byte
    /// length.
    pub fn match_punctuation(&self, text: &str) -> Option<(Symbol, usize)> {
        self.punctuation
            .iter()
            .find(|(spelling, _)| text.starts_with(spelling.as_str()))
            .map(|(spelling, symbol)| (symbol.clone(), spelling.len()))
    }

    pub fn keyword(&self, word: &str) -> Option<Symbol> {
        self.keywords.get(word).cloned()
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains_key(word)
    }
}
