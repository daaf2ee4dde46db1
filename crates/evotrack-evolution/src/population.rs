use evotrack_engine::{Agent, DecisionPolicy};

/// The two disjoint partitions of a generation's agents.
///
/// `active` agents are alive and under simulation; `terminated` agents are
/// dead and awaiting the next genetic pass. An agent belongs to exactly
/// one partition at a time. The union holds the configured population size
/// right after repopulation and only shrinks during a generation as agents
/// are retired (it never grows mid-generation).
#[derive(Debug)]
pub struct Population<P> {
    active: Vec<Agent<P>>,
    terminated: Vec<Agent<P>>,
}

impl<P> Population<P>
where
    P: DecisionPolicy,
{
    #[must_use]
    pub fn new(active: Vec<Agent<P>>) -> Self {
        Self {
            active,
            terminated: Vec::new(),
        }
    }

    #[must_use]
    pub fn active(&self) -> &[Agent<P>] {
        &self.active
    }

    #[must_use]
    pub fn terminated(&self) -> &[Agent<P>] {
        &self.terminated
    }

    /// Whether no agents remain under simulation.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.active.is_empty()
    }

    pub(crate) fn active_mut(&mut self) -> &mut Vec<Agent<P>> {
        &mut self.active
    }

    /// Moves every dead agent from `active` to `terminated`.
    ///
    /// This is the second phase of the scan-then-move death handling: the
    /// collision pass only marks agents dead, and this applies the
    /// partition moves once iteration is over. Returns how many agents
    /// moved; each moved agent appears in `terminated` exactly once.
    pub(crate) fn retire_dead(&mut self) -> usize {
        let before = self.terminated.len();
        let mut still_alive = Vec::with_capacity(self.active.len());
        for agent in self.active.drain(..) {
            if agent.is_alive() {
                still_alive.push(agent);
            } else {
                self.terminated.push(agent);
            }
        }
        self.active = still_alive;
        self.terminated.len() - before
    }

    /// Kills every remaining active agent at simulated time `now`.
    ///
    /// Used at the generation cutoff, when the time budget expires before
    /// the population goes extinct.
    pub(crate) fn force_terminate_all(&mut self, now: f64) {
        for agent in &mut self.active {
            agent.force_terminate(now);
        }
    }

    /// Hands the terminated partition to the genetic pass, leaving it
    /// empty.
    pub(crate) fn take_terminated(&mut self) -> Vec<Agent<P>> {
        std::mem::take(&mut self.terminated)
    }

    /// Installs the next generation's agents as the active partition.
    pub(crate) fn install(&mut self, next: Vec<Agent<P>>) {
        debug_assert!(self.terminated.is_empty());
        self.active = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{open_track, scripted_agent, small_config};

    #[test]
    fn test_retire_dead_moves_only_dead_agents() {
        let track = open_track();
        let config = small_config(4);
        let mut population = Population::new(vec![
            scripted_agent(&track, &config, 1.0),
            scripted_agent(&track, &config, 2.0),
            scripted_agent(&track, &config, 3.0),
        ]);
        population.active_mut()[1].force_terminate(0.5);

        let moved = population.retire_dead();
        assert_eq!(moved, 1);
        assert_eq!(population.active().len(), 2);
        assert_eq!(population.terminated().len(), 1);
        assert!(!population.terminated()[0].is_alive());
        assert!(population.active().iter().all(Agent::is_alive));
    }

    #[test]
    fn test_retire_dead_is_idempotent() {
        let track = open_track();
        let config = small_config(4);
        let mut population = Population::new(vec![scripted_agent(&track, &config, 1.0)]);
        population.active_mut()[0].force_terminate(0.1);
        assert_eq!(population.retire_dead(), 1);
        assert_eq!(population.retire_dead(), 0);
        assert_eq!(population.terminated().len(), 1);
    }

    #[test]
    fn test_union_size_is_preserved_by_moves() {
        let track = open_track();
        let config = small_config(4);
        let mut population = Population::new(vec![
            scripted_agent(&track, &config, 1.0),
            scripted_agent(&track, &config, 2.0),
        ]);
        population.force_terminate_all(1.0);
        population.retire_dead();
        assert!(population.is_extinct());
        assert_eq!(population.terminated().len(), 2);
    }
}
