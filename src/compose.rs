//! Composition: synchronous product (`cross`) and asynchronous parallel
//! composition. Composite states are discovered by a worklist seeded with
//! the pair of initial states, deduplicated on the component pair.

use im::{OrdMap, OrdSet};

use crate::automaton::Automaton;
use crate::error::{AutomatonError, AutomatonResult};
use crate::id::{Event, State, Tags};

/// Composite identifier for a pair of component states.
fn join(a: &State, b: &State) -> State {
    State::from(format!("{a}|{b}"))
}

impl Automaton {
    /// Synchronous product. The event set is the intersection of the
    /// operands' event sets; a composite transition exists only where the
    /// same event is enabled in both components, and each component step
    /// must be locally deterministic for that event or the composition
    /// fails with a [`AutomatonError::DeterminismViolation`].
    ///
    /// Composite tags are the union of the component tags, so a product
    /// state is marked when either component is.
    pub fn cross(&self, other: &Automaton) -> AutomatonResult<Automaton> {
        let shared: OrdMap<Event, Tags> = self
            .events
            .iter()
            .filter(|(e, _)| other.events.contains_key(*e))
            .map(|(e, tags)| (e.clone(), tags.clone()))
            .collect();

        let a0 = self
            .initial
            .get_min()
            .cloned()
            .ok_or(AutomatonError::NoInitialState)?;
        let b0 = other
            .initial
            .get_min()
            .cloned()
            .ok_or(AutomatonError::NoInitialState)?;

        let mut out = Automaton {
            events: shared,
            ..Automaton::default()
        };
        out.initial = OrdSet::unit(join(&a0, &b0));

        let mut seen: OrdSet<(State, State)> = OrdSet::new();
        let mut pending: Vec<(State, State)> = vec![(a0, b0)];
        while let Some(pair) = pending.pop() {
            if seen.insert(pair.clone()).is_some() {
                continue;
            }
            let (a, b) = &pair;
            let name = join(a, b);

            let enabled_a = self.enabled(&OrdSet::unit(a.clone()))?;
            let enabled_b = other.enabled(&OrdSet::unit(b.clone()))?;
            let mut row: OrdMap<Event, OrdSet<State>> = OrdMap::new();
            for e in enabled_a.intersection(enabled_b).iter() {
                if e.is_silent() {
                    continue;
                }
                let next_a = self.step(a, e)?;
                let next_b = other.step(b, e)?;
                row.insert(e.clone(), OrdSet::unit(join(&next_a, &next_b)));
                pending.push((next_a, next_b));
            }
            out.delta.insert(name.clone(), row);

            let tags = self
                .states
                .get(a)
                .cloned()
                .unwrap_or_default()
                .union(other.states.get(b).cloned().unwrap_or_default());
            out.states.insert(name, tags);
            tracing::debug!(
                discovered = out.states.len(),
                queued = pending.len(),
                "product expansion step"
            );
        }
        Ok(out)
    }

    /// Asynchronous parallel composition. Each operand is extended with
    /// self-loops on every event private to the other, then the synchronous
    /// product is taken: shared events synchronize, private events proceed
    /// independently.
    pub fn parallel(&self, other: &Automaton) -> AutomatonResult<Automaton> {
        let a = self.with_foreign_self_loops(other);
        let b = other.with_foreign_self_loops(self);
        a.cross(&b)
    }

    /// Extend this automaton with self-loops on every event the other
    /// automaton declares and this one does not.
    fn with_foreign_self_loops(&self, other: &Automaton) -> Automaton {
        let foreign: Vec<Event> = other
            .events
            .keys()
            .filter(|e| !self.events.contains_key(*e))
            .cloned()
            .collect();
        let mut out = self.clone();
        for e in &foreign {
            out.events.insert(e.clone(), Tags::default());
        }
        let mut delta = crate::automaton::Delta::new();
        for (x, row) in self.delta.iter() {
            let mut row = row.clone();
            for e in &foreign {
                row.insert(e.clone(), OrdSet::unit(x.clone()));
            }
            delta.insert(x.clone(), row);
        }
        out.delta = delta;
        out
    }
}
