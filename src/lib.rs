//! Finite-automaton algebra for discrete-event systems.
//!
//! An [`Automaton`] is a finite state set, event set, nondeterministic
//! transition relation, initial set, and tag-based marking. Everything is
//! built on the epsilon-closure reachability engine: step evaluators,
//! accessibility trimming, event hiding and projection, synchronous and
//! parallel composition, and determinization by subset construction.
//!
//! Every transform returns a freshly constructed automaton; sources are
//! never modified, so operations compose without cross-contamination.
//!
//! ```
//! use trellis::prelude::*;
//!
//! let mut plant = Automaton::new();
//! plant.add_state("idle");
//! plant.add_state("busy");
//! plant.add_marked_state("done");
//! plant.add_event("start");
//! plant.add_event("finish");
//! plant.add_initial("idle")?;
//! plant.add_transition("idle", "start", "busy")?;
//! plant.add_transition("busy", "finish", "done")?;
//!
//! assert!(plant.is_deterministic());
//! assert_eq!(plant.trim()?, plant);
//! # Ok::<(), AutomatonError>(())
//! ```

pub mod automaton;
pub mod diagram;
pub mod error;
pub mod id;
pub mod table;

mod access;
mod compose;
mod determinize;
mod reduce;

pub use automaton::Automaton;
pub use determinize::sorted_join;
pub use error::{AutomatonError, AutomatonResult};

pub mod prelude {
    pub use crate::automaton::Automaton;
    pub use crate::error::{AutomatonError, AutomatonResult};
    pub use crate::id::{Event, State, Tags, MARKED};
    pub use crate::table::Table;
}
