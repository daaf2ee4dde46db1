use evotrack_engine::{Agent, AgentId, DecisionPolicy};

/// One preserved parent: the identity, frozen fitness, and policy of a
/// historically well-performing agent.
#[derive(Debug, Clone)]
pub struct ArchiveEntry<P> {
    id: AgentId,
    fitness: f64,
    policy: P,
}

impl<P> ArchiveEntry<P> {
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

/// Size-capped pool of the best agents seen across the whole run, ordered
/// by descending fitness.
///
/// The archive is the parent pool for reproduction. It is append-only
/// except for eviction: absorbing beyond the cap drops the weakest
/// entries. An agent already present (by identity) is never absorbed
/// twice.
#[derive(Debug)]
pub struct EliteArchive<P> {
    cap: usize,
    entries: Vec<ArchiveEntry<P>>,
}

impl<P> EliteArchive<P>
where
    P: DecisionPolicy,
{
    #[must_use]
    pub fn new(cap: usize) -> Self {
        debug_assert!(cap > 0);
        Self {
            cap,
            entries: Vec::with_capacity(cap + 1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// All entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry<P>] {
        &self.entries
    }

    /// The strongest `n` entries (fewer if the archive is smaller).
    #[must_use]
    pub fn first(&self, n: usize) -> &[ArchiveEntry<P>] {
        &self.entries[..n.min(self.entries.len())]
    }

    #[must_use]
    pub fn contains(&self, id: AgentId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    #[must_use]
    pub fn best(&self) -> Option<&ArchiveEntry<P>> {
        self.entries.first()
    }

    /// Adjusts the cap, evicting the weakest entries if it shrank.
    pub(crate) fn apply_cap(&mut self, cap: usize) {
        debug_assert!(cap > 0);
        self.cap = cap;
        self.entries.truncate(cap);
    }

    /// Copies an agent's identity, fitness, and policy into the archive.
    ///
    /// Skips agents already present. Insertion keeps descending fitness
    /// order (new entries rank after existing equals, so the order is
    /// stable); if the cap is exceeded, the lowest-fitness entries are
    /// evicted. Returns whether the agent was absorbed.
    pub fn absorb(&mut self, agent: &Agent<P>) -> bool {
        if self.contains(agent.id()) {
            return false;
        }
        let entry = ArchiveEntry {
            id: agent.id(),
            fitness: agent.fitness(),
            policy: agent.policy().clone(),
        };
        let at = self
            .entries
            .partition_point(|e| e.fitness >= entry.fitness);
        self.entries.insert(at, entry);
        self.entries.truncate(self.cap);
        true
    }
}
