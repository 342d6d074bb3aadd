//! Parameters read from the command line and counters kept during search.

mod params;
mod stats;

pub use params::{ParameterError, ParameterSet, ParameterValue};
pub use stats::{counters, Statistics};
