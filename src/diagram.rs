//! Read-only exporters: Graphviz dot, PlantUML state diagrams, and
//! decision-table code for deterministic automata.
//!
//! Raw identifiers may be illegal in the target syntax, so every exporter
//! takes a caller-supplied sanitizer. [`strip_braces`] and [`c_ident`] are
//! provided as defaults for dot and decision-table output respectively.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::automaton::Automaton;
use crate::error::{AutomatonError, AutomatonResult};

#[cfg(feature = "diagrams")]
pub use graph::{state_graph, to_dot, write_dot, DotNode};

/// Graph-level layout attributes for dot output.
#[derive(Clone, Debug)]
pub struct DotConfig {
    pub rankdir: String,
    pub layout: String,
    pub overlap: bool,
    pub splines: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            rankdir: "LR".into(),
            layout: "dot".into(),
            overlap: false,
            splines: true,
        }
    }
}

/// Strip `{` and `}` from an identifier, the default dot sanitizer.
pub fn strip_braces(raw: &str) -> String {
    raw.replace(['{', '}'], "")
}

/// Reduce an identifier to a C-compatible one by replacing every
/// non-identifier character with `_`.
pub fn c_ident(raw: &str) -> String {
    static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());
    NON_IDENT.replace_all(raw, "_").into_owned()
}

#[cfg(feature = "diagrams")]
mod graph {
    use std::collections::BTreeMap;
    use std::fmt;
    use std::io;
    use std::path::Path;

    use petgraph::dot::Dot;
    use petgraph::graph::DiGraph;

    use super::DotConfig;
    use crate::automaton::Automaton;

    /// A node of the exported state graph: a proper state, or the synthetic
    /// entry point in front of an initial state.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DotNode {
        State { label: String, marked: bool },
        Entry,
    }

    impl fmt::Display for DotNode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                DotNode::State { label, .. } => f.write_str(label),
                DotNode::Entry => Ok(()),
            }
        }
    }

    /// One node per state (marked or not), one entry node per initial state
    /// with an edge into it, one labeled edge per (source, event, target)
    /// triple.
    pub fn state_graph(
        automaton: &Automaton,
        sanitize: impl Fn(&str) -> String,
    ) -> DiGraph<DotNode, String> {
        let mut graph = DiGraph::new();
        let marked = automaton.marked();
        let mut index = BTreeMap::new();
        for x in automaton.states().iter() {
            let node = graph.add_node(DotNode::State {
                label: sanitize(x.as_str()),
                marked: marked.contains(x),
            });
            index.insert(x.clone(), node);
        }
        for x0 in automaton.initial().iter() {
            let entry = graph.add_node(DotNode::Entry);
            if let Some(&node) = index.get(x0) {
                graph.add_edge(entry, node, String::new());
            }
        }
        for (src, event, dst) in automaton.transitions() {
            if let (Some(&s), Some(&d)) = (index.get(src), index.get(dst)) {
                graph.add_edge(s, d, sanitize(&event.to_string()));
            }
        }
        graph
    }

    /// Render the state graph as Graphviz dot text. Marked states get a
    /// `doublecircle` outline, entry nodes are invisible.
    pub fn to_dot(
        automaton: &Automaton,
        config: &DotConfig,
        sanitize: impl Fn(&str) -> String,
    ) -> String {
        let graph = state_graph(automaton, sanitize);
        let dot = format!(
            "{}",
            Dot::with_attr_getters(
                &graph,
                &[],
                &|_, _| String::new(),
                &|_, (_, node)| match node {
                    DotNode::State { marked: true, .. } => "shape=doublecircle".to_string(),
                    DotNode::State { marked: false, .. } => "shape=circle".to_string(),
                    DotNode::Entry => "shape=none".to_string(),
                },
            )
        );
        let header = format!(
            "digraph {{\n    rankdir=\"{}\"\n    layout=\"{}\"\n    overlap=\"{}\"\n    splines=\"{}\"",
            config.rankdir, config.layout, config.overlap, config.splines,
        );
        dot.replacen("digraph {", &header, 1)
    }

    /// Write the dot rendering to a file.
    pub fn write_dot(
        path: impl AsRef<Path>,
        automaton: &Automaton,
        config: &DotConfig,
        sanitize: impl Fn(&str) -> String,
    ) -> io::Result<()> {
        std::fs::write(path, to_dot(automaton, config, sanitize))
    }
}

/// Render the automaton as a PlantUML state diagram: one initial arrow per
/// initial state, one arrow per (source, event, target) triple.
pub fn to_plantuml(automaton: &Automaton, sanitize: impl Fn(&str) -> String) -> String {
    let mut out = String::from("@startuml\nhide empty description\n");
    for x0 in automaton.initial().iter() {
        out.push_str(&format!("[*] --> {}\n", sanitize(x0.as_str())));
    }
    for (src, event, dst) in automaton.transitions() {
        out.push_str(&format!(
            "{} --> {} : {}\n",
            sanitize(src.as_str()),
            sanitize(dst.as_str()),
            sanitize(&event.to_string()),
        ));
    }
    out.push_str("@enduml\n");
    out
}

/// Emit C-like decision-table code: a state enum plus an `update` function
/// with one case per state and one conditional per enabled event, falling
/// through to the default initial state when nothing fires.
///
/// Requires a deterministic automaton; silent self-loops are bookkeeping
/// and are skipped.
pub fn to_decision_code(
    automaton: &Automaton,
    sanitize: impl Fn(&str) -> String,
) -> AutomatonResult<String> {
    if !automaton.is_deterministic() {
        return Err(AutomatonError::ExportPrecondition(
            "decision-table export requires a deterministic automaton".into(),
        ));
    }
    let fallback = automaton
        .initial()
        .get_min()
        .ok_or(AutomatonError::NoInitialState)?;

    let mut out = String::from("enum State_t {\n");
    for x in automaton.states().iter() {
        let tags = automaton.state_tags(x)?;
        out.push_str(&format!(
            "\t{}, // {}\n",
            sanitize(x.as_str()),
            tags.iter().join(",")
        ));
    }
    out.push_str("};\n\nState_t update(State_t x) {\n\tswitch(x) {\n");
    for x in automaton.states().iter() {
        out.push_str(&format!("\tcase ({}): {{\n", sanitize(x.as_str())));
        for (event, targets) in automaton.transitions_from(x)?.iter() {
            if event.is_silent() {
                continue;
            }
            // Determinism guarantees exactly one target.
            let Some(successor) = targets.get_min() else {
                continue;
            };
            out.push_str(&format!(
                "\t\tif (Event_{}()) return {};\n",
                sanitize(event.as_str()),
                sanitize(successor.as_str()),
            ));
        }
        out.push_str("\t\tbreak;\n\t}\n");
    }
    out.push_str(&format!(
        "\tdefault: return {};\n\t}}\n\treturn x;\n}}\n",
        sanitize(fallback.as_str())
    ));
    Ok(out)
}
