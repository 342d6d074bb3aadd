//! Infix tokens to postfix, by shunting-yard.
//!
//! Besides the usual operator handling this deals with function calls
//! (argument counting against the declared arity), prefix negation and
//! quantifiers. A quantifier and its variable list become one
//! [`QuantifierList`] symbol that scopes over everything up to the end of
//! the enclosing parenthesis group, so it is emitted only when that group
//! closes.

use log::debug;

use super::ParseError;
use crate::data::{format_postfix, Operator, Quantifier, QuantifierList, Symbol};
use crate::log::targets;

/// Entries of the operator stack.
enum Pending {
    Operator(Operator),
    /// A function or relation waiting for its argument group to close.
    Application(Symbol),
    Group {
        call: bool,
        commas: usize,
        /// No token seen since the group opened or since the last comma.
        empty: bool,
    },
    Scope(QuantifierList),
}

pub fn infix_to_postfix(tokens: &[Symbol]) -> Result<Vec<Symbol>, ParseError> {
    let mut output = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        index += 1;
        match token {
            Symbol::Comma => {
                flush_group(&mut pending, &mut output);
                match pending.last_mut() {
                    Some(Pending::Group {
                        call: true,
                        commas,
                        empty,
                    }) => {
                        if *empty {
                            return Err(ParseError::MissingOperand(",".into()));
                        }
                        *commas += 1;
                        *empty = true;
                    }
                    _ => return Err(ParseError::UnexpectedToken(",".into())),
                }
                continue;
            }
            Symbol::RightParen => {
                if !flush_group(&mut pending, &mut output) {
                    return Err(ParseError::MissingLeftParenthesis);
                }
                close_group(&mut pending, &mut output)?;
                continue;
            }
            _ => mark_filled(&mut pending),
        }

        match token {
            Symbol::Variable(_) | Symbol::Constant(_) | Symbol::SkolemFunction(_) => {
                output.push(token.clone());
            }
            Symbol::Function(_) | Symbol::Relation(_) => {
                if matches!(tokens.get(index), Some(Symbol::LeftParen)) {
                    index += 1;
                    pending.push(Pending::Application(token.clone()));
                    pending.push(Pending::Group {
                        call: true,
                        commas: 0,
                        empty: true,
                    });
                } else {
                    check_arity(token, 0)?;
                    output.push(token.clone());
                }
            }
            Symbol::LeftParen => pending.push(Pending::Group {
                call: false,
                commas: 0,
                empty: true,
            }),
            Symbol::Operator(Operator::Not) => pending.push(Pending::Operator(Operator::Not)),
            Symbol::Operator(op) => {
                while let Some(Pending::Operator(top)) = pending.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Symbol::Operator(*top));
                    pending.pop();
                }
                pending.push(Pending::Operator(*op));
            }
            Symbol::Quantifier(kind) => {
                let (list, consumed) = read_quantifier(*kind, &tokens[index..])?;
                index += consumed;
                pending.push(Pending::Scope(list));
            }
            Symbol::QuantifierList(list) => pending.push(Pending::Scope(list.clone())),
            Symbol::SuchThat | Symbol::Comma | Symbol::RightParen => {
                return Err(ParseError::UnexpectedToken(token.to_string()));
            }
        }
    }

    while let Some(entry) = pending.pop() {
        match entry {
            Pending::Operator(op) => output.push(Symbol::Operator(op)),
            Pending::Scope(list) => output.push(Symbol::QuantifierList(list)),
            Pending::Group { .. } | Pending::Application(_) => {
                return Err(ParseError::MissingRightParenthesis);
            }
        }
    }

    debug!(target: targets::PARSER, "postfix: {}", format_postfix(&output));
    Ok(output)
}

/// The innermost open group now has content.
fn mark_filled(pending: &mut [Pending]) {
    let group = pending
        .iter_mut()
        .rev()
        .find(|entry| matches!(entry, Pending::Group { .. }));
    if let Some(Pending::Group { empty, .. }) = group {
        *empty = false;
    }
}

/// Emit operators and scopes down to the innermost group. Returns whether
/// a group was found.
fn flush_group(pending: &mut Vec<Pending>, output: &mut Vec<Symbol>) -> bool {
    loop {
        match pending.last() {
            Some(Pending::Group { .. }) => return true,
            None => return false,
            Some(_) => {}
        }
        match pending.pop() {
            Some(Pending::Operator(op)) => output.push(Symbol::Operator(op)),
            Some(Pending::Scope(list)) => output.push(Symbol::QuantifierList(list)),
            Some(Pending::Application(symbol)) => output.push(symbol),
            Some(Pending::Group { .. }) | None => return false,
        }
    }
}

fn close_group(pending: &mut Vec<Pending>, output: &mut Vec<Symbol>) -> Result<(), ParseError> {
    let Some(Pending::Group {
        call,
        commas,
        empty,
    }) = pending.pop()
    else {
        return Err(ParseError::MissingLeftParenthesis);
    };

    if !call {
        return if empty {
            Err(ParseError::EmptyExpression)
        } else {
            Ok(())
        };
    }

    if empty && commas > 0 {
        return Err(ParseError::MissingOperand(",".into()));
    }
    let found = if empty { 0 } else { commas + 1 };
    match pending.pop() {
        Some(Pending::Application(symbol)) => {
            check_arity(&symbol, found)?;
            output.push(symbol);
            Ok(())
        }
        _ => Err(ParseError::MissingLeftParenthesis),
    }
}

fn check_arity(symbol: &Symbol, found: usize) -> Result<(), ParseError> {
    let expected = symbol.arity().unwrap_or(0);
    if expected == found {
        Ok(())
    } else {
        Err(ParseError::ArityMismatch {
            name: symbol.to_string(),
            expected,
            found,
        })
    }
}

/// Read the variable list after a quantifier: a single variable or a
/// parenthesized, comma separated list, then an optional `,` or such-that
/// separator. Returns the list and how many tokens it used.
fn read_quantifier(
    kind: Quantifier,
    rest: &[Symbol],
) -> Result<(QuantifierList, usize), ParseError> {
    let mut variables = Vec::new();
    let mut consumed = 0;

    match rest.first() {
        Some(Symbol::Variable(variable)) => {
            variables.push(variable.clone());
            consumed = 1;
        }
        Some(Symbol::LeftParen) => {
            consumed = 1;
            loop {
                match rest.get(consumed) {
                    Some(Symbol::Variable(variable)) => variables.push(variable.clone()),
                    Some(other) => return Err(ParseError::UnexpectedToken(other.to_string())),
                    None => return Err(ParseError::MissingRightParenthesis),
                }
                match rest.get(consumed + 1) {
                    Some(Symbol::Comma) => consumed += 2,
                    Some(Symbol::RightParen) => {
                        consumed += 2;
                        break;
                    }
                    Some(other) => return Err(ParseError::UnexpectedToken(other.to_string())),
                    None => return Err(ParseError::MissingRightParenthesis),
                }
            }
        }
        _ => {}
    }

    if variables.is_empty() {
        return Err(ParseError::EmptyQuantifier(kind.to_string()));
    }
    if matches!(rest.get(consumed), Some(Symbol::Comma | Symbol::SuchThat)) {
        consumed += 1;
    }
    Ok((QuantifierList::new(kind, variables), consumed))
}
