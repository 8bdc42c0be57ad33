//! Interned identifiers for states and events, and the tag sets carried by both.
//!
//! Identifiers are opaque handles: cheap to clone, ordered, hashable, and
//! displayable for export. The empty event identifier is the distinguished
//! silent (epsilon) label.

use std::fmt;
use std::sync::Arc;

use im::OrdSet;

/// The default tag designating a marked ("goal") state.
pub const MARKED: &str = "M";

/// A structured set of tags annotating a state or an event.
pub type Tags = OrdSet<String>;

/// An opaque state identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct State(Arc<str>);

impl State {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        State(Arc::from(s))
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        State(Arc::from(s.as_str()))
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.0)
    }
}

/// An event identifier. The empty identifier is the silent (epsilon) event.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event(Arc<str>);

impl Event {
    /// The silent event, labelling transitions taken without an observable event.
    pub fn silent() -> Self {
        Event(Arc::from(""))
    }

    pub fn is_silent(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Event {
    fn from(s: &str) -> Self {
        Event(Arc::from(s))
    }
}

impl From<String> for Event {
    fn from(s: String) -> Self {
        Event(Arc::from(s.as_str()))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_silent() {
            f.write_str("ε")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_event_is_the_empty_identifier() {
        assert!(Event::silent().is_silent());
        assert!(Event::from("").is_silent());
        assert!(!Event::from("a").is_silent());
        assert_eq!(Event::silent(), Event::from(""));
    }

    #[test]
    fn silent_event_displays_as_epsilon() {
        assert_eq!(Event::silent().to_string(), "ε");
        assert_eq!(Event::from("open").to_string(), "open");
    }

    #[test]
    fn identifiers_order_by_name() {
        let mut set: OrdSet<State> = OrdSet::new();
        set.insert(State::from("s1"));
        set.insert(State::from("s0"));
        let names: Vec<_> = set.iter().map(State::as_str).collect();
        assert_eq!(names, vec!["s0", "s1"]);
    }
}
