//! Ingestion of the normalized automaton table.
//!
//! The core accepts a fully populated two-dimensional table of strings:
//!
//! | cell        | meaning                                          |
//! |-------------|--------------------------------------------------|
//! | (0, 0)      | comma-separated initial state identifier(s)      |
//! | (0, c ≥ 2)  | event name                                       |
//! | (1, c ≥ 2)  | event tags, comma-separated                      |
//! | (r ≥ 2, 0)  | state name                                       |
//! | (r ≥ 2, 1)  | state tags, comma-separated                      |
//! | (r ≥ 2, c ≥ 2) | comma-separated transition target(s), or empty |
//!
//! Decoding file formats is the caller's job; [`Table::from_tsv`] covers
//! the tab-separated case.

use crate::automaton::Automaton;
use crate::error::{AutomatonError, AutomatonResult};
use crate::id::{Event, State, Tags};

/// A normalized two-dimensional table of strings. Rows may be ragged;
/// missing cells read as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Split tab-separated text into a table, trimming each cell.
    pub fn from_tsv(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(|line| line.split('\t').map(|cell| cell.trim().to_string()).collect())
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Split a comma-separated cell into its non-empty trimmed parts.
fn split_cell(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn parse_tags(cell: &str) -> Tags {
    split_cell(cell).map(String::from).collect()
}

impl Automaton {
    /// Build an automaton from a normalized table. Targets and initial
    /// states must reference declared states; duplicates and shape
    /// problems are [`AutomatonError::InvalidTable`].
    pub fn from_table(table: &Table) -> AutomatonResult<Automaton> {
        let rows = table.row_count();
        let columns = table.column_count();
        if rows < 2 || columns < 2 {
            return Err(AutomatonError::InvalidTable(format!(
                "expected two header rows and two leading columns, got {rows}x{columns}"
            )));
        }

        let mut automaton = Automaton::new();

        // Row 0/1 from column 2 on: event names and tags. An empty event
        // name declares a silent-transition column.
        let mut column_events = Vec::with_capacity(columns.saturating_sub(2));
        for c in 2..columns {
            let event = Event::from(table.cell(0, c));
            if !event.is_silent() {
                if automaton.contains_event(&event) {
                    return Err(AutomatonError::InvalidTable(format!(
                        "duplicate event `{event}` in column {c}"
                    )));
                }
                automaton.add_event_tagged(event.clone(), parse_tags(table.cell(1, c)));
            }
            column_events.push(event);
        }

        // Column 0/1 from row 2 on: state names and tags.
        for r in 2..rows {
            let name = table.cell(r, 0);
            if name.is_empty() {
                return Err(AutomatonError::InvalidTable(format!(
                    "empty state name in row {r}"
                )));
            }
            let state = State::from(name);
            if automaton.contains_state(&state) {
                return Err(AutomatonError::InvalidTable(format!(
                    "duplicate state `{state}` in row {r}"
                )));
            }
            automaton.add_state_tagged(state, parse_tags(table.cell(r, 1)));
        }

        // Body: comma-separated targets per state/event cell.
        for r in 2..rows {
            let src = State::from(table.cell(r, 0));
            for (i, event) in column_events.iter().enumerate() {
                for target in split_cell(table.cell(r, i + 2)) {
                    automaton.add_transition(src.clone(), event.clone(), target)?;
                }
            }
        }

        for x0 in split_cell(table.cell(0, 0)) {
            automaton.add_initial(x0)?;
        }
        if automaton.initial().is_empty() {
            return Err(AutomatonError::InvalidTable(
                "no initial state declared".into(),
            ));
        }

        Ok(automaton)
    }
}
