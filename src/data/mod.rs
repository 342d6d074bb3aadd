//! Core data structures: the symbol model, the symbol tracker, and the
//! term/clause representation the resolver works on.

pub mod clause;
pub mod clause_store;
pub mod function;
pub mod symbol;
pub mod term;
pub mod tracker;
pub mod value;

pub use clause::{CnfError, Disjunction, StatementCnf};
pub use clause_store::{ClauseArena, ClauseId, Resolvent};
pub use function::{EvalError, Evaluator, Function, Relation, Signature};
pub use symbol::{
    format_postfix, Constant, Operator, Quantifier, QuantifierList,
    SkolemFunction, Symbol, Variable,
};
pub use term::{Term, TermKind};
pub use tracker::SymbolTracker;
pub use value::{Value, ValueType};
