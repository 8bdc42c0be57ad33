//! Error types shared by queries, transforms, and exporters.

use crate::id::{Event, State};

/// Everything that can go wrong while querying or transforming an automaton.
///
/// All operations are pure computations, so there is nothing to retry:
/// failures propagate to the caller unmodified and no partial result is
/// ever substituted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    /// A deterministic step was requested where the underlying relation is
    /// ambiguous (zero or multiple targets).
    #[error("deterministic step F({state}, {event}) yielded {count} states, expected exactly one")]
    DeterminismViolation {
        state: State,
        event: Event,
        count: usize,
    },

    /// A query referenced a state absent from the declared state set.
    #[error("unknown state `{0}`")]
    UnknownState(State),

    /// A query referenced an event absent from the declared event set.
    #[error("unknown event `{0}`")]
    UnknownEvent(Event),

    /// An operation requiring an initial state was applied to an automaton
    /// without one.
    #[error("automaton has no initial state")]
    NoInitialState,

    /// An exporter's precondition does not hold for this automaton.
    #[error("export precondition failed: {0}")]
    ExportPrecondition(String),

    /// A state renaming was not total over the states in use.
    #[error("renaming is not defined for state `{0}`")]
    InvalidMapping(State),

    /// An ingestion table did not have the expected shape.
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

pub type AutomatonResult<T> = Result<T, AutomatonError>;
