use std::collections::BTreeMap;
use std::fmt;

/// Names of the counters kept by the resolver.
pub mod counters {
    pub const ROUNDS: &str = "rounds";
    pub const PAIRS_TRIED: &str = "pairs_tried";
    pub const RESOLVENTS: &str = "resolvents";
    pub const DUPLICATES: &str = "duplicates";
    pub const KEPT: &str = "kept";
}

/// Named counters, listed in name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    counters: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: u64) {
        self.counters.insert(name.into(), value);
    }

    pub fn increment(&mut self, name: impl Into<String>) -> u64 {
        self.increment_by(name, 1)
    }

    pub fn increment_by(&mut self, name: impl Into<String>, amount: u64) -> u64 {
        let entry = self.counters.entry(name.into()).or_insert(0);
        *entry += amount;
        *entry
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    /// Zero when the counter was never touched.
    pub fn count(&self, name: &str) -> u64 {
        self.get(name).unwrap_or(0)
    }

    pub fn reset(&mut self, name: &str) {
        self.counters.remove(name);
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}
