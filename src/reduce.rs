//! Structural reduction: state/event removal, projection, prioritization,
//! and state renaming. Every operation builds a fresh automaton.

use im::{OrdMap, OrdSet};

use crate::automaton::{Automaton, Delta};
use crate::error::{AutomatonError, AutomatonResult};
use crate::id::{Event, State};

impl Automaton {
    /// Delete the given states along with their outgoing entries, and strip
    /// them from every remaining target set and from the initial set. An
    /// event entry whose target set empties is removed outright, so no
    /// dangling empty-target entry ever survives.
    pub fn remove_states(&self, removed: &OrdSet<State>) -> AutomatonResult<Automaton> {
        for x in removed.iter() {
            if !self.states.contains_key(x) {
                return Err(AutomatonError::UnknownState(x.clone()));
            }
        }
        let mut delta = Delta::new();
        for (x, row) in self.delta.iter() {
            if removed.contains(x) {
                continue;
            }
            let mut kept_row: OrdMap<Event, OrdSet<State>> = OrdMap::new();
            for (e, targets) in row.iter() {
                let kept = targets.clone().relative_complement(removed.clone());
                if !kept.is_empty() {
                    kept_row.insert(e.clone(), kept);
                }
            }
            delta.insert(x.clone(), kept_row);
        }
        let states = self
            .states
            .iter()
            .filter(|(x, _)| !removed.contains(*x))
            .map(|(x, tags)| (x.clone(), tags.clone()))
            .collect();
        let initial = self.initial.clone().relative_complement(removed.clone());
        Ok(Automaton {
            events: self.events.clone(),
            states,
            delta,
            initial,
        })
    }

    /// Hide the given events: their transitions merge into the silent event
    /// per source state (union, not overwrite) and the events leave the
    /// declared set. The result is usually nondeterministic.
    pub fn remove_events(&self, removed: &OrdSet<Event>) -> AutomatonResult<Automaton> {
        for e in removed.iter() {
            if !self.events.contains_key(e) {
                return Err(AutomatonError::UnknownEvent(e.clone()));
            }
        }
        let silent = Event::silent();
        let mut events = self.events.clone();
        for e in removed.iter() {
            events.remove(e);
        }
        let mut delta = Delta::new();
        for (x, row) in self.delta.iter() {
            let mut kept_row: OrdMap<Event, OrdSet<State>> = OrdMap::new();
            let mut silent_targets = row.get(&silent).cloned().unwrap_or_default();
            for (e, targets) in row.iter() {
                if e.is_silent() {
                    continue;
                }
                if removed.contains(e) {
                    silent_targets = silent_targets.union(targets.clone());
                } else {
                    kept_row.insert(e.clone(), targets.clone());
                }
            }
            if !silent_targets.is_empty() {
                kept_row.insert(silent.clone(), silent_targets);
            }
            delta.insert(x.clone(), kept_row);
        }
        Ok(Automaton {
            events,
            states: self.states.clone(),
            delta,
            initial: self.initial.clone(),
        })
    }

    /// Natural projection: hide every event except the kept set.
    pub fn project(&self, kept: &OrdSet<Event>) -> AutomatonResult<Automaton> {
        for e in kept.iter() {
            if !self.events.contains_key(e) {
                return Err(AutomatonError::UnknownEvent(e.clone()));
            }
        }
        let hidden: OrdSet<Event> = self
            .events
            .keys()
            .filter(|e| !kept.contains(*e))
            .cloned()
            .collect();
        self.remove_events(&hidden)
    }

    /// Give one event priority: at every state where it is enabled, every
    /// other outgoing entry is discarded.
    pub fn prioritize(&self, event: &Event) -> AutomatonResult<Automaton> {
        if !self.events.contains_key(event) {
            return Err(AutomatonError::UnknownEvent(event.clone()));
        }
        let mut delta = Delta::new();
        for (x, row) in self.delta.iter() {
            let kept_row = match row.get(event) {
                Some(targets) => {
                    let mut only: OrdMap<Event, OrdSet<State>> = OrdMap::new();
                    only.insert(event.clone(), targets.clone());
                    only
                }
                None => row.clone(),
            };
            delta.insert(x.clone(), kept_row);
        }
        Ok(Automaton {
            events: self.events.clone(),
            states: self.states.clone(),
            delta,
            initial: self.initial.clone(),
        })
    }

    /// Apply an identifier mapping to every state occurrence: declarations,
    /// transition sources and targets, and the initial set. The mapping
    /// must be total over the states in use; `None` for any of them is an
    /// [`AutomatonError::InvalidMapping`].
    pub fn rename_states(
        &self,
        rename: impl Fn(&State) -> Option<State>,
    ) -> AutomatonResult<Automaton> {
        let map = |x: &State| rename(x).ok_or_else(|| AutomatonError::InvalidMapping(x.clone()));

        let mut states = OrdMap::new();
        for (x, tags) in self.states.iter() {
            states.insert(map(x)?, tags.clone());
        }
        let mut delta = Delta::new();
        for (x, row) in self.delta.iter() {
            let mut mapped_row: OrdMap<Event, OrdSet<State>> = OrdMap::new();
            for (e, targets) in row.iter() {
                let mut mapped = OrdSet::new();
                for t in targets.iter() {
                    mapped.insert(map(t)?);
                }
                mapped_row.insert(e.clone(), mapped);
            }
            delta.insert(map(x)?, mapped_row);
        }
        let mut initial = OrdSet::new();
        for x in self.initial.iter() {
            initial.insert(map(x)?);
        }
        Ok(Automaton {
            events: self.events.clone(),
            states,
            delta,
            initial,
        })
    }
}
