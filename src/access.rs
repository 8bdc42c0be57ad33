//! Accessibility analysis: forward-reachable (`Ac`), marked-reaching
//! (`CoAc`), and the combination of the two (`trim`).

use im::OrdSet;

use crate::automaton::Automaton;
use crate::error::AutomatonResult;
use crate::id::State;

impl Automaton {
    /// The accessible part: keep only the states forward-reachable from the
    /// initial set, computed as a fixed point of the step evaluator over
    /// each frontier's enabled events.
    pub fn accessible(&self) -> AutomatonResult<Automaton> {
        let mut reached = self.closure(&self.initial)?;
        loop {
            let next = self.step_all(&reached, &self.enabled(&reached)?)?;
            if next
                .clone()
                .relative_complement(reached.clone())
                .is_empty()
            {
                break;
            }
            reached = reached.union(next);
            tracing::trace!(reached = reached.len(), "accessibility frontier grew");
        }
        let unreachable: OrdSet<State> = self
            .states
            .keys()
            .filter(|x| !reached.contains(*x))
            .cloned()
            .collect();
        self.remove_states(&unreachable)
    }

    /// The co-accessible part: keep only the states able to reach a marked
    /// state. A candidate joins as soon as its own step evaluator over its
    /// enabled events intersects the current co-accessible set; iterated
    /// to a fixed point.
    pub fn coaccessible(&self) -> AutomatonResult<Automaton> {
        let mut coacc = self.marked();
        loop {
            let mut grew = false;
            for x in self.states.keys() {
                if coacc.contains(x) {
                    continue;
                }
                let seed = OrdSet::unit(x.clone());
                let reachable = self.step_all(&seed, &self.enabled(&seed)?)?;
                if !reachable.intersection(coacc.clone()).is_empty() {
                    coacc.insert(x.clone());
                    grew = true;
                }
            }
            if !grew {
                break;
            }
            tracing::trace!(coaccessible = coacc.len(), "co-accessible set grew");
        }
        let blocking: OrdSet<State> = self
            .states
            .keys()
            .filter(|x| !coacc.contains(*x))
            .cloned()
            .collect();
        self.remove_states(&blocking)
    }

    /// Accessible then co-accessible. The order matters: co-accessibility
    /// is computed over the already-restricted accessible universe.
    pub fn trim(&self) -> AutomatonResult<Automaton> {
        self.accessible()?.coaccessible()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::automaton::fixtures::linear;
    use crate::id::Event;
    use super::*;

    fn states(names: &[&str]) -> OrdSet<State> {
        names.iter().map(|s| State::from(*s)).collect()
    }

    #[test]
    fn already_trim_automaton_is_unchanged() {
        let a = linear();
        assert_eq!(a.accessible().unwrap(), a);
        assert_eq!(a.coaccessible().unwrap(), a);
        assert_eq!(a.trim().unwrap(), a);
    }

    #[test]
    fn accessible_drops_states_with_no_incoming_path() {
        let mut a = linear();
        a.add_state("s3");
        a.add_transition("s3", "a", "s3").unwrap();

        let b = a.accessible().unwrap();
        assert_eq!(b.states(), states(&["s0", "s1", "s2"]));
        assert_eq!(b, linear());
    }

    #[test]
    fn coaccessible_drops_states_that_cannot_reach_marking() {
        let mut a = linear();
        a.add_state("s4");
        a.add_event("c");
        a.add_transition("s0", "c", "s4").unwrap();

        let b = a.coaccessible().unwrap();
        assert_eq!(b.states(), states(&["s0", "s1", "s2"]));
        // The `c` entry at s0 must be gone entirely, not left empty.
        assert!(!b
            .transitions_from(&State::from("s0"))
            .unwrap()
            .contains_key(&Event::from("c")));
    }

    #[test]
    fn coaccessible_propagates_backwards_over_chains() {
        let mut a = linear();
        a.add_state("t0");
        a.add_state("t1");
        a.add_event("c");
        a.add_transition("t0", "c", "t1").unwrap();
        a.add_transition("t1", "c", "s2").unwrap();

        // t0 reaches marking only through t1; both must survive.
        let b = a.coaccessible().unwrap();
        assert_eq!(b.states(), states(&["s0", "s1", "s2", "t0", "t1"]));
    }

    #[test]
    fn coaccessible_counts_silent_paths_to_marking() {
        let mut a = linear();
        a.add_state("s5");
        a.add_transition("s5", "", "s2").unwrap();

        let b = a.coaccessible().unwrap();
        assert!(b.contains_state(&State::from("s5")));
    }

    #[test]
    fn trim_is_idempotent() {
        let mut a = linear();
        a.add_state("s3");
        a.add_transition("s3", "a", "s3").unwrap();
        a.add_state("s4");
        a.add_event("c");
        a.add_transition("s0", "c", "s4").unwrap();

        let once = a.trim().unwrap();
        let twice = once.trim().unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.states(), states(&["s0", "s1", "s2"]));
    }

    #[test]
    fn trim_of_unmarked_automaton_is_empty() {
        let mut a = Automaton::new();
        a.add_state("x");
        a.add_initial("x").unwrap();

        let b = a.trim().unwrap();
        assert!(b.states().is_empty());
        assert!(b.initial().is_empty());
    }
}
