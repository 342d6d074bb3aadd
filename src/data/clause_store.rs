use super::clause::Disjunction;

/// Identifier for clauses held by the resolution search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseId(pub usize);

impl std::fmt::Display for ClauseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clause together with where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolvent {
    pub id: ClauseId,
    pub clause: Disjunction,
    /// The two clauses it was resolved from; `None` for input clauses.
    pub parents: Option<(ClauseId, ClauseId)>,
}

/// Storage for clauses that also assigns unique identifiers.
///
/// Ids start at 1 and follow insertion order, so lookup is an index.
#[derive(Default, Debug, Clone)]
pub struct ClauseArena {
    resolvents: Vec<Resolvent>,
}

impl ClauseArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        clause: Disjunction,
        parents: Option<(ClauseId, ClauseId)>,
    ) -> ClauseId {
        let id = ClauseId(self.resolvents.len() + 1);
        self.resolvents.push(Resolvent {
            id,
            clause,
            parents,
        });
        id
    }

    pub fn get(&self, id: ClauseId) -> Option<&Resolvent> {
        let index = id.0.checked_sub(1)?;
        self.resolvents.get(index)
    }

    pub fn len(&self) -> usize {
        self.resolvents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resolvent> {
        self.resolvents.iter()
    }

    /// Every clause `id` depends on, parents before children, ending with
    /// `id` itself.
    pub fn derivation(&self, id: ClauseId) -> Vec<&Resolvent> {
        let mut seen = vec![false; self.resolvents.len() + 1];
        let mut order = Vec::new();
        let mut pending = vec![(id, false)];
        while let Some((current, expanded)) = pending.pop() {
            let Some(resolvent) = self.get(current) else {
                continue;
            };
            if expanded {
                order.push(resolvent);
                continue;
            }
            if seen[current.0] {
                continue;
            }
            seen[current.0] = true;
            pending.push((current, true));
            if let Some((left, right)) = resolvent.parents {
                pending.push((right, false));
                pending.push((left, false));
            }
        }
        order
    }
}
