//! The automaton model and its epsilon-closure-based step evaluators.
//!
//! An [`Automaton`] is a finite state set, a finite event set, a
//! nondeterministic transition relation, a set of initial states, and a
//! marking expressed as per-state tags. All tables are `im` collections, so
//! every transform clones its input in O(1) and returns a freshly built
//! value; inputs and derived automata never share mutable structure.

use im::{OrdMap, OrdSet};

use crate::error::{AutomatonError, AutomatonResult};
use crate::id::{Event, State, Tags, MARKED};

/// Transition relation: source state → event → non-empty target set.
///
/// Invariants: an entry exists for every declared state, every endpoint is
/// a declared state, and no event maps to an empty target set.
pub type Delta = OrdMap<State, OrdMap<Event, OrdSet<State>>>;

/// A finite automaton modelling a discrete-event system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Automaton {
    pub(crate) events: OrdMap<Event, Tags>,
    pub(crate) states: OrdMap<State, Tags>,
    pub(crate) delta: Delta,
    pub(crate) initial: OrdSet<State>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a state with no tags. Re-declaring is a no-op.
    pub fn add_state(&mut self, state: impl Into<State>) {
        self.add_state_tagged(state, Tags::default());
    }

    /// Declare a state carrying the given tags.
    pub fn add_state_tagged(&mut self, state: impl Into<State>, tags: Tags) {
        let state = state.into();
        if !self.delta.contains_key(&state) {
            self.delta.insert(state.clone(), OrdMap::new());
        }
        self.states.insert(state, tags);
    }

    /// Declare a state tagged with the default marking tag.
    pub fn add_marked_state(&mut self, state: impl Into<State>) {
        self.add_state_tagged(state, Tags::unit(MARKED.to_string()));
    }

    /// Declare an event with no tags. The silent event is never declared;
    /// silent transitions live only in the transition relation.
    pub fn add_event(&mut self, event: impl Into<Event>) {
        self.add_event_tagged(event, Tags::default());
    }

    /// Declare an event carrying the given tags.
    pub fn add_event_tagged(&mut self, event: impl Into<Event>, tags: Tags) {
        let event = event.into();
        if !event.is_silent() {
            self.events.insert(event, tags);
        }
    }

    /// Add a state to the initial set. The state must already be declared.
    pub fn add_initial(&mut self, state: impl Into<State>) -> AutomatonResult<()> {
        let state = state.into();
        if !self.states.contains_key(&state) {
            return Err(AutomatonError::UnknownState(state));
        }
        self.initial.insert(state);
        Ok(())
    }

    /// Add a transition. Both endpoints must be declared states, and the
    /// event must be declared or silent.
    pub fn add_transition(
        &mut self,
        src: impl Into<State>,
        event: impl Into<Event>,
        dst: impl Into<State>,
    ) -> AutomatonResult<()> {
        let (src, event, dst) = (src.into(), event.into(), dst.into());
        if !self.states.contains_key(&src) {
            return Err(AutomatonError::UnknownState(src));
        }
        if !self.states.contains_key(&dst) {
            return Err(AutomatonError::UnknownState(dst));
        }
        if !event.is_silent() && !self.events.contains_key(&event) {
            return Err(AutomatonError::UnknownEvent(event));
        }
        let mut row = self.delta.get(&src).cloned().unwrap_or_default();
        let mut targets = row.get(&event).cloned().unwrap_or_default();
        targets.insert(dst);
        row.insert(event, targets);
        self.delta.insert(src, row);
        Ok(())
    }

    /// The declared state set `X`.
    pub fn states(&self) -> OrdSet<State> {
        self.states.keys().cloned().collect()
    }

    /// The declared event set `E`. Never contains the silent event.
    pub fn events(&self) -> OrdSet<Event> {
        self.events.keys().cloned().collect()
    }

    /// The initial state set `X0`.
    pub fn initial(&self) -> &OrdSet<State> {
        &self.initial
    }

    /// States tagged with the default marking tag `"M"`.
    pub fn marked(&self) -> OrdSet<State> {
        self.marked_by(MARKED)
    }

    /// States tagged with the given tag.
    pub fn marked_by(&self, tag: &str) -> OrdSet<State> {
        let tag = tag.to_string();
        self.states
            .iter()
            .filter(|(_, tags)| tags.contains(&tag))
            .map(|(x, _)| x.clone())
            .collect()
    }

    pub fn contains_state(&self, state: &State) -> bool {
        self.states.contains_key(state)
    }

    pub fn contains_event(&self, event: &Event) -> bool {
        self.events.contains_key(event)
    }

    /// Tags carried by a declared state.
    pub fn state_tags(&self, state: &State) -> AutomatonResult<&Tags> {
        self.states
            .get(state)
            .ok_or_else(|| AutomatonError::UnknownState(state.clone()))
    }

    /// Tags carried by a declared event.
    pub fn event_tags(&self, event: &Event) -> AutomatonResult<&Tags> {
        self.events
            .get(event)
            .ok_or_else(|| AutomatonError::UnknownEvent(event.clone()))
    }

    /// Outgoing transitions of a declared state.
    pub fn transitions_from(
        &self,
        state: &State,
    ) -> AutomatonResult<&OrdMap<Event, OrdSet<State>>> {
        self.delta
            .get(state)
            .ok_or_else(|| AutomatonError::UnknownState(state.clone()))
    }

    /// Every (source, event, target) triple of the transition relation.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Event, &State)> + '_ {
        self.delta.iter().flat_map(|(x, row)| {
            row.iter()
                .flat_map(move |(e, targets)| targets.iter().map(move |t| (x, e, t)))
        })
    }

    /// Number of (state, event) entries in the transition relation.
    pub fn arc_count(&self) -> usize {
        self.delta.values().map(|row| row.len()).sum()
    }

    /// The set of states reachable from `seed` via silent transitions alone,
    /// including `seed` itself. Idempotent and monotone; silent cycles
    /// terminate because visited states never re-enter the frontier.
    pub fn closure(&self, seed: &OrdSet<State>) -> AutomatonResult<OrdSet<State>> {
        let silent = Event::silent();
        let mut reached: OrdSet<State> = OrdSet::new();
        let mut frontier = seed.clone();
        while !frontier.is_empty() {
            let mut next: OrdSet<State> = OrdSet::new();
            for x in frontier.iter() {
                for t in self.transitions_from(x)?.get(&silent).into_iter().flatten() {
                    next.insert(t.clone());
                }
            }
            reached = reached.union(frontier);
            frontier = next.relative_complement(reached.clone());
        }
        Ok(reached)
    }

    /// `L`: the union of outgoing event labels over the closure of `seed`.
    /// Includes the silent label wherever a silent transition exists.
    pub fn enabled(&self, seed: &OrdSet<State>) -> AutomatonResult<OrdSet<Event>> {
        let mut labels: OrdSet<Event> = OrdSet::new();
        for x in self.closure(seed)?.iter() {
            for e in self.transitions_from(x)?.keys() {
                labels.insert(e.clone());
            }
        }
        Ok(labels)
    }

    /// `FFF`: all states reachable from `seed` by taking any single event
    /// from `events`, with closure applied before and after the step.
    /// Total over declared identifiers; may return the empty set.
    pub fn step_all(
        &self,
        seed: &OrdSet<State>,
        events: &OrdSet<Event>,
    ) -> AutomatonResult<OrdSet<State>> {
        for e in events.iter() {
            if !e.is_silent() && !self.events.contains_key(e) {
                return Err(AutomatonError::UnknownEvent(e.clone()));
            }
        }
        let source = self.closure(seed)?;
        let mut targets: OrdSet<State> = OrdSet::new();
        for x in source.iter() {
            let row = self.transitions_from(x)?;
            for e in events.iter() {
                for t in row.get(e).into_iter().flatten() {
                    targets.insert(t.clone());
                }
            }
        }
        self.closure(&targets)
    }

    /// `F`: the deterministic step evaluator. Fails with
    /// [`AutomatonError::DeterminismViolation`] unless the step yields
    /// exactly one state.
    pub fn step(&self, state: &State, event: &Event) -> AutomatonResult<State> {
        let result = self.step_all(
            &OrdSet::unit(state.clone()),
            &OrdSet::unit(event.clone()),
        )?;
        let mut iter = result.iter();
        match (iter.next(), iter.next()) {
            (Some(x), None) => Ok(x.clone()),
            _ => Err(AutomatonError::DeterminismViolation {
                state: state.clone(),
                event: event.clone(),
                count: result.len(),
            }),
        }
    }

    /// Run an event string from the initial states, folding `FFF` over it.
    /// Returns the (possibly empty) set of states reached.
    pub fn run(&self, word: impl IntoIterator<Item = Event>) -> AutomatonResult<OrdSet<State>> {
        let mut current = self.initial.clone();
        for event in word {
            current = self.step_all(&current, &OrdSet::unit(event))?;
        }
        Ok(current)
    }

    /// True when no state has more than one target per event and every
    /// silent entry is a self-loop. The silent self-loop is bookkeeping,
    /// not nondeterminism.
    pub fn is_deterministic(&self) -> bool {
        for (x, row) in self.delta.iter() {
            for (e, targets) in row.iter() {
                if e.is_silent() {
                    if targets.len() != 1 || !targets.contains(x) {
                        return false;
                    }
                } else if targets.len() > 1 {
                    return false;
                }
            }
        }
        true
    }
}
