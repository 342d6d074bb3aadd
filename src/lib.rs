//! First-order statement processing and resolution refutation.
//!
//! Statements are parsed from infix text into postfix symbol streams and
//! expression trees, rewritten into conjunctive normal form by five
//! ordered passes, flattened into clauses, and handed to a saturating
//! resolution prover that decides whether a hypothesis follows from a
//! knowledge base.
//!
//! ```
//! use fol_prover::{Constant, Relation, Resolver, Statement, SymbolTracker, Value};
//!
//! let mut tracker = SymbolTracker::new();
//! tracker.add_constant(Constant::new("Socrates", Value::Text("Socrates".into())));
//! tracker.add_relation(Relation::opaque("Human", 1));
//! tracker.add_relation(Relation::opaque("Mortal", 1));
//!
//! let rule = Statement::parse("FORALL x, Human(x) => Mortal(x)", &mut tracker).unwrap();
//! let fact = Statement::parse("Human(Socrates)", &mut tracker).unwrap();
//! let goal = Statement::parse("EXISTS y, Mortal(y)", &mut tracker).unwrap();
//!
//! let result = Resolver::default().prove(&[rule, fact], &goal, &mut tracker).unwrap();
//! assert!(result.is_proof());
//! ```

pub mod config;
pub mod data;
pub mod inference;
pub mod log;
pub mod normalize;
pub mod parser;
pub mod statement;

pub use config::{ParameterError, ParameterSet, ParameterValue, Statistics};
pub use data::{
    ClauseArena, ClauseId, CnfError, Constant, Disjunction, EvalError, Function, Operator,
    Quantifier, QuantifierList, Relation, Resolvent, Signature, SkolemFunction, StatementCnf,
    Symbol, SymbolTracker, Term, TermKind, Value, ValueType, Variable,
};
pub use inference::{
    factor_clause, resolve, unify, Limit, ProofResult, Resolver, ResolverConfig, Substitution,
    UnificationError, Unifier,
};
pub use parser::{Environment, ExpressionNode, ParseError, Problem, ProblemError};
pub use statement::Statement;
