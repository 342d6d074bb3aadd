//! Statement text to tokens.
//!
//! Names are resolved while lexing. A name following a quantifier always
//! introduces a fresh variable whose binding lasts until the parenthesis
//! group enclosing the quantifier closes, or to the end of the statement.
//! Other names resolve, in order, to the innermost quantifier binding, a
//! declared relation, function or constant, or a free variable of the
//! statement.

use std::collections::HashMap;

use log::trace;

use super::operator::OperatorTable;
use super::ParseError;
use crate::data::{Constant, Symbol, SymbolTracker, Value, Variable};
use crate::log::targets;

/// Tokenize `text` with the default spellings.
pub fn tokenize(text: &str, tracker: &mut SymbolTracker) -> Result<Vec<Symbol>, ParseError> {
    let table = OperatorTable::new();
    Lexer::new(text, &table, tracker).tokenize()
}

/// Names bound by one quantifier, released when its group closes.
struct Scope {
    depth: usize,
    names: Vec<String>,
}

/// Where the lexer stands relative to a quantifier's variable list.
enum Header {
    Closed,
    /// A quantifier was just emitted.
    Opened,
    /// Inside `FORALL(` ... `)`.
    List(Vec<String>),
}

pub struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    table: &'a OperatorTable,
    tracker: &'a mut SymbolTracker,
    depth: usize,
    scopes: Vec<Scope>,
    header: Header,
    free: HashMap<String, Variable>,
}

impl<'a> Lexer<'a> {
    pub fn new(
        text: &'a str,
        table: &'a OperatorTable,
        tracker: &'a mut SymbolTracker,
    ) -> Self {
        Self {
            text,
            offset: 0,
            table,
            tracker,
            depth: 0,
            scopes: Vec::new(),
            header: Header::Closed,
            free: HashMap::new(),
        }
    }

    /// Consume the whole text. Every binding made along the way is
    /// released again, whether or not lexing succeeds.
    pub fn tokenize(mut self) -> Result<Vec<Symbol>, ParseError> {
        let mut tokens = Vec::new();
        let result = self.run(&mut tokens);
        self.close_scopes_deeper_than(None);
        if let Header::List(names) = std::mem::replace(&mut self.header, Header::Closed) {
            self.release(&names);
        }
        result.map(|()| tokens)
    }

    fn run(&mut self, tokens: &mut Vec<Symbol>) -> Result<(), ParseError> {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.offset += ch.len_utf8();
                continue;
            }
            let start = self.offset;
            let symbol = if ch.is_alphabetic() || ch == '_' {
                let word = self.take_while(|c| c.is_alphanumeric() || c == '_');
                self.word(word)?
            } else if ch.is_ascii_digit() {
                self.number()?
            } else if ch == '"' {
                self.string()?
            } else if let Some((symbol, len)) =
                self.table.match_punctuation(&self.text[self.offset..])
            {
                self.offset += len;
                symbol
            } else {
                return Err(ParseError::UnexpectedCharacter {
                    character: ch,
                    offset: start,
                });
            };
            trace!(target: targets::PARSER, "token `{}` at {}", symbol, start);
            self.accept(symbol, tokens)?;
        }
        Ok(())
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let text = self.text;
        let rest = &text[self.offset..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !keep(*c))
            .map(|(index, _)| index)
            .unwrap_or(rest.len());
        self.offset += len;
        &rest[..len]
    }

    fn next_is_call(&self) -> bool {
        self.text[self.offset..].trim_start().starts_with('(')
    }

    fn word(&mut self, word: &str) -> Result<Symbol, ParseError> {
        if let Some(symbol) = self.table.keyword(word) {
            return Ok(symbol);
        }
        if !matches!(self.header, Header::Closed) {
            return Ok(Symbol::Variable(self.tracker.new_variable(word)));
        }
        if let Some(variable) = self.tracker.variable_by_name(word) {
            return Ok(Symbol::Variable(variable.clone()));
        }
        if let Some(symbol) = self.tracker.lookup(word) {
            return Ok(symbol);
        }
        if let Some(variable) = self.free.get(word) {
            return Ok(Symbol::Variable(variable.clone()));
        }
        if self.next_is_call() {
            return Err(ParseError::UnknownFunction(word.to_string()));
        }
        let variable = self.tracker.fresh_variable(word);
        self.free.insert(word.to_string(), variable.clone());
        Ok(Symbol::Variable(variable))
    }

    fn number(&mut self) -> Result<Symbol, ParseError> {
        let start = self.offset;
        self.take_while(|c| c.is_ascii_digit());
        let rest = &self.text[self.offset..];
        let fractional = rest.starts_with('.')
            && rest[1..].chars().next().is_some_and(|c| c.is_ascii_digit());
        if fractional {
            self.offset += 1;
            self.take_while(|c| c.is_ascii_digit());
        }
        let text = &self.text[start..self.offset];
        let value = if fractional {
            text.parse().map(Value::Float).ok()
        } else {
            text.parse().map(Value::Integer).ok()
        };
        let value = value.ok_or_else(|| ParseError::InvalidNumber(text.to_string()))?;
        Ok(Symbol::Constant(Constant::new(text, value)))
    }

    fn string(&mut self) -> Result<Symbol, ParseError> {
        let start = self.offset;
        let body_start = start + 1;
        let end = self.text[body_start..]
            .find('"')
            .map(|index| body_start + index)
            .ok_or(ParseError::UnterminatedString(start))?;
        self.offset = end + 1;
        let body = &self.text[body_start..end];
        Ok(Symbol::Constant(Constant::new(
            &self.text[start..self.offset],
            Value::Text(body.to_string()),
        )))
    }

    /// Track parenthesis depth and quantifier scopes, then emit.
    fn accept(&mut self, symbol: Symbol, tokens: &mut Vec<Symbol>) -> Result<(), ParseError> {
        match std::mem::replace(&mut self.header, Header::Closed) {
            Header::Opened => match &symbol {
                Symbol::Variable(variable) => {
                    self.open_scope(vec![variable.name.clone()]);
                    tokens.push(symbol);
                    return Ok(());
                }
                Symbol::LeftParen => {
                    self.header = Header::List(Vec::new());
                    tokens.push(symbol);
                    return Ok(());
                }
                _ => {}
            },
            Header::List(mut names) => {
                match &symbol {
                    Symbol::Variable(variable) => {
                        names.push(variable.name.clone());
                        self.header = Header::List(names);
                    }
                    Symbol::Comma => self.header = Header::List(names),
                    Symbol::RightParen => self.open_scope(names),
                    other => {
                        self.release(&names);
                        return Err(ParseError::UnexpectedToken(other.to_string()));
                    }
                }
                tokens.push(symbol);
                return Ok(());
            }
            Header::Closed => {}
        }

        match &symbol {
            Symbol::LeftParen => self.depth += 1,
            Symbol::RightParen => {
                self.depth = self.depth.saturating_sub(1);
                self.close_scopes_deeper_than(Some(self.depth));
            }
            Symbol::Quantifier(_) => self.header = Header::Opened,
            _ => {}
        }
        tokens.push(symbol);
        Ok(())
    }

    fn open_scope(&mut self, names: Vec<String>) {
        self.scopes.push(Scope {
            depth: self.depth,
            names,
        });
    }

    /// Release scopes opened deeper than `depth`; all of them for `None`.
    fn close_scopes_deeper_than(&mut self, depth: Option<usize>) {
        while let Some(scope) = self.scopes.last() {
            if depth.is_some_and(|depth| scope.depth <= depth) {
                break;
            }
            if let Some(scope) = self.scopes.pop() {
                self.release(&scope.names);
            }
        }
    }

    fn release(&mut self, names: &[String]) {
        for name in names.iter().rev() {
            self.tracker.pop_binding(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{format_postfix, Function, Operator, Quantifier, Relation};

    fn tracker() -> SymbolTracker {
        let mut tracker = SymbolTracker::new();
        tracker.add_relation(Relation::opaque("Human", 1));
        tracker.add_function(Function::opaque("f", 1));
        tracker.add_function(Function::opaque("zero", 0));
        tracker
    }

    fn variable_ids(tokens: &[Symbol]) -> Vec<usize> {
        tokens
            .iter()
            .filter_map(|token| match token {
                Symbol::Variable(variable) => Some(variable.id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn word_and_symbol_spellings_agree() {
        let mut tracker = tracker();
        let words = tokenize("NOT p AND q OR r IMPLICATION s BICONDITIONAL t", &mut tracker)
            .expect("lex words");
        let mut tracker = self::tracker();
        let symbols = tokenize("!p && q || r => s <=> t", &mut tracker).expect("lex symbols");
        assert_eq!(format_postfix(&words), format_postfix(&symbols));
        assert_eq!(words[0], Symbol::Operator(Operator::Not));
    }

    #[test]
    fn quantifier_bindings_are_scoped() {
        let mut tracker = tracker();
        let tokens = tokenize("EXISTS(x)(EXISTS(x) x) AND x", &mut tracker).expect("lex");
        // outer binder, inner binder, inner use, outer use
        let ids = variable_ids(&tokens);
        assert_eq!(ids.len(), 4);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);
        assert_eq!(ids[0], ids[3]);
        assert!(tracker.variable_by_name("x").is_none(), "bindings released");
    }

    #[test]
    fn free_variables_are_shared_within_a_statement() {
        let mut tracker = tracker();
        let tokens = tokenize("Human(y) && y == y", &mut tracker).expect("lex");
        let ids = variable_ids(&tokens);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[test]
    fn declared_symbols_resolve() {
        let mut tracker = tracker();
        let tokens = tokenize("∀x Human(f(x)) ∧ zero == 2.5", &mut tracker).expect("lex");
        assert_eq!(tokens[0], Symbol::Quantifier(Quantifier::Forall));
        assert!(matches!(tokens[2], Symbol::Relation(_)));
        assert!(matches!(tokens[4], Symbol::Function(_)));
        assert!(matches!(
            tokens.last(),
            Some(Symbol::Constant(Constant { value: Value::Float(v), .. })) if *v == 2.5
        ));
    }

    #[test]
    fn literals_become_constants() {
        let mut tracker = tracker();
        let tokens = tokenize("x == \"hello world\" || 42 == x", &mut tracker).expect("lex");
        assert_eq!(
            tokens[2],
            Symbol::Constant(Constant::new("\"hello world\"", Value::Text("hello world".into())))
        );
        assert_eq!(tokens[4], Symbol::Constant(Constant::new("42", Value::Integer(42))));
    }

    #[test]
    fn unknown_calls_are_rejected() {
        let mut tracker = tracker();
        assert_eq!(
            tokenize("Mortal(x)", &mut tracker),
            Err(ParseError::UnknownFunction("Mortal".into()))
        );
        assert!(matches!(
            tokenize("x = y", &mut tracker),
            Err(ParseError::UnexpectedCharacter { character: '=', offset: 2 })
        ));
        assert_eq!(
            tokenize("x == \"open", &mut tracker),
            Err(ParseError::UnterminatedString(5))
        );
    }

    #[test]
    fn failed_lexing_releases_bindings() {
        let mut tracker = tracker();
        let result = tokenize("FORALL x, Mortal(x)", &mut tracker);
        assert!(result.is_err());
        assert!(tracker.variable_by_name("x").is_none());
    }
}
