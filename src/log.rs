//! Targets used with the [log] macros throughout the crate.
//!
//! No logger is installed by the library. The binary initialises
//! `env_logger`, so e.g. `RUST_LOG=resolution=trace` shows every resolvent.

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Lexing, infix to postfix conversion and tree building.
    pub const PARSER: &str = "parser";

    /// The CNF passes.
    pub const NORMALIZE: &str = "normalize";

    /// Rounds of the resolution search.
    pub const RESOLUTION: &str = "resolution";

    /// Unification and factoring.
    pub const UNIFY: &str = "unify";
}
