//! Determinization by subset construction.
//!
//! Macro-states are sets of underlying states, memoized by a canonical
//! order-independent name so the worklist terminates within the power set
//! of the original state set. The result has no silent transitions and at
//! most one successor per event per state.

use im::{OrdMap, OrdSet};
use itertools::Itertools;

use crate::automaton::Automaton;
use crate::error::{AutomatonError, AutomatonResult};
use crate::id::{State, Tags};

/// The default macro-state namer: member display names sorted and joined
/// with a single space. Order-independent because the member set is
/// ordered.
pub fn sorted_join(members: &OrdSet<State>) -> State {
    State::from(members.iter().map(State::as_str).join(" "))
}

impl Automaton {
    /// A deterministic automaton accepting the same event strings,
    /// produced by subset construction with the [`sorted_join`] namer.
    pub fn determinize(&self) -> AutomatonResult<Automaton> {
        self.determinize_with(sorted_join)
    }

    /// Subset construction with a caller-supplied canonical macro-state
    /// namer. The namer must be a pure function of the member set.
    ///
    /// Macro-state tags are the union of member tags, so a macro-state is
    /// marked exactly when it contains a marked state. Events enter the
    /// result's event set on first occurrence, carrying their source tags.
    pub fn determinize_with(
        &self,
        namer: impl Fn(&OrdSet<State>) -> State,
    ) -> AutomatonResult<Automaton> {
        if self.initial.is_empty() {
            return Err(AutomatonError::NoInitialState);
        }
        let start = self.closure(&self.initial)?;
        let mut out = Automaton::default();
        out.initial = OrdSet::unit(namer(&start));

        let mut pending: Vec<OrdSet<State>> = vec![start];
        while let Some(members) = pending.pop() {
            let name = namer(&members);
            if out.delta.contains_key(&name) {
                continue;
            }
            let mut row: OrdMap<_, OrdSet<State>> = OrdMap::new();
            for e in self.enabled(&members)?.iter() {
                if e.is_silent() {
                    continue;
                }
                let successor = self.step_all(&members, &OrdSet::unit(e.clone()))?;
                if let Some(tags) = self.events.get(e) {
                    out.events.insert(e.clone(), tags.clone());
                }
                row.insert(e.clone(), OrdSet::unit(namer(&successor)));
                pending.push(successor);
            }
            let tags = members
                .iter()
                .filter_map(|x| self.states.get(x))
                .fold(Tags::default(), |acc, t| acc.union(t.clone()));
            out.states.insert(name.clone(), tags);
            out.delta.insert(name, row);
            tracing::debug!(
                macro_states = out.delta.len(),
                queued = pending.len(),
                "subset construction step"
            );
        }
        Ok(out)
    }
}
