//! End-to-end exercises of the automaton algebra, from table ingestion
//! through trimming, composition, determinization, and export.

use im::OrdSet;
use pretty_assertions::assert_eq;

use trellis::diagram;
use trellis::prelude::*;
use trellis::sorted_join;

fn states(names: &[&str]) -> OrdSet<State> {
    names.iter().map(|s| State::from(*s)).collect()
}

/// A small plant with an unreachable state and a blocking branch:
///
/// ```text
///        a        b
///   s0 ----> s1 ----> s2 (marked)
///    \ c
///     `--> s4          s3 --a--> s3   (unreachable)
/// ```
fn plant_tsv() -> String {
    [
        "s0\t\ta\tb\tc",
        "\t\t\t\t",
        "s0\t\ts1\t\ts4",
        "s1\t\t\ts2\t",
        "s2\tM\t\t\t",
        "s3\t\ts3\t\t",
        "s4\t\t\t\t",
    ]
    .join("\n")
}

#[test]
fn ingest_trim_export_pipeline() {
    let plant = Automaton::from_table(&Table::from_tsv(&plant_tsv())).unwrap();
    assert_eq!(plant.states().len(), 5);

    // Forward reachability drops s3, backward-to-marked drops s4.
    let accessible = plant.accessible().unwrap();
    assert_eq!(accessible.states(), states(&["s0", "s1", "s2", "s4"]));

    let trimmed = plant.trim().unwrap();
    assert_eq!(trimmed.states(), states(&["s0", "s1", "s2"]));
    assert!(!trimmed
        .transitions_from(&State::from("s0"))
        .unwrap()
        .contains_key(&Event::from("c")));

    // Trimming again changes nothing.
    assert_eq!(trimmed.trim().unwrap(), trimmed);

    // The trimmed plant is deterministic, so decision-table export works.
    let code = diagram::to_decision_code(&trimmed, diagram::c_ident).unwrap();
    assert!(code.contains("case (s0)"));
    assert!(code.contains("default: return s0;"));

    let uml = diagram::to_plantuml(&trimmed, |s| s.to_string());
    assert!(uml.contains("s0 --> s1 : a"));
}

#[test]
fn hide_then_determinize_like_the_worked_example() {
    let plant = Automaton::from_table(&Table::from_tsv(&plant_tsv())).unwrap();

    // Hiding `a` leaves silent steps behind; the result is generally
    // nondeterministic and must round-trip through subset construction.
    let hidden = plant
        .remove_events(&OrdSet::unit(Event::from("a")))
        .unwrap();
    assert!(!hidden.events().contains(&Event::from("a")));

    let det = hidden.determinize().unwrap();
    assert!(det.is_deterministic());
    assert_eq!(det.initial().clone(), states(&["s0 s1"]));

    // The deterministic run tracks the closure of the nondeterministic run.
    for word in [vec!["b"], vec!["c"], vec!["b", "b"]] {
        let word: Vec<Event> = word.into_iter().map(Event::from).collect();
        let nd = hidden.run(word.clone()).unwrap();
        let d = det.run(word).unwrap();
        if nd.is_empty() {
            assert!(d.is_empty() || d == OrdSet::unit(sorted_join(&nd)));
        } else {
            assert_eq!(d, OrdSet::unit(sorted_join(&nd)));
        }
    }
}

#[test]
fn projection_keeps_only_observable_events() {
    let plant = Automaton::from_table(&Table::from_tsv(&plant_tsv())).unwrap();
    let observed = plant
        .project(&[Event::from("b")].into_iter().collect())
        .unwrap();
    assert_eq!(observed.events(), OrdSet::unit(Event::from("b")));

    // s1 is now silently reachable from s0, so `b` fires immediately.
    assert_eq!(
        observed.run([Event::from("b")]).unwrap(),
        states(&["s2"])
    );
}

#[test]
fn supervisor_product_restricts_the_plant() {
    let plant = Automaton::from_table(&Table::from_tsv(&plant_tsv()))
        .unwrap()
        .trim()
        .unwrap();

    // A supervisor over {a, b} that only ever allows a single `a`.
    let mut supervisor = Automaton::new();
    supervisor.add_marked_state("q0");
    supervisor.add_marked_state("q1");
    supervisor.add_event("a");
    supervisor.add_event("b");
    supervisor.add_initial("q0").unwrap();
    supervisor.add_transition("q0", "a", "q1").unwrap();
    supervisor.add_transition("q1", "b", "q1").unwrap();

    let closed_loop = plant.cross(&supervisor).unwrap();
    assert_eq!(closed_loop.initial().clone(), states(&["s0|q0"]));
    assert_eq!(
        closed_loop.run([Event::from("a"), Event::from("b")]).unwrap(),
        states(&["s2|q1"]),
    );
}

#[test]
fn parallel_composition_of_independent_machines() {
    let mut producer = Automaton::new();
    producer.add_state("empty");
    producer.add_marked_state("full");
    producer.add_event("produce");
    producer.add_initial("empty").unwrap();
    producer
        .add_transition("empty", "produce", "full")
        .unwrap();

    let mut consumer = Automaton::new();
    consumer.add_state("hungry");
    consumer.add_marked_state("fed");
    consumer.add_event("consume");
    consumer.add_initial("hungry").unwrap();
    consumer
        .add_transition("hungry", "consume", "fed")
        .unwrap();

    let system = producer.parallel(&consumer).unwrap();

    // Private events interleave freely: all four joint states exist and
    // both orders reach the joint goal.
    assert_eq!(system.states().len(), 4);
    for word in [
        vec!["produce", "consume"],
        vec!["consume", "produce"],
    ] {
        let word: Vec<Event> = word.into_iter().map(Event::from).collect();
        assert_eq!(system.run(word).unwrap(), states(&["full|fed"]));
    }
}

#[test]
fn rename_states_round_trip() {
    let plant = Automaton::from_table(&Table::from_tsv(&plant_tsv()))
        .unwrap()
        .trim()
        .unwrap();

    let renamed = plant
        .rename_states(|x| Some(State::from(x.as_str().to_uppercase())))
        .unwrap();
    assert_eq!(renamed.states(), states(&["S0", "S1", "S2"]));
    assert_eq!(renamed.marked(), states(&["S2"]));

    // Renaming back recovers the original automaton exactly.
    let back = renamed
        .rename_states(|x| Some(State::from(x.as_str().to_lowercase())))
        .unwrap();
    assert_eq!(back, plant);
}

#[cfg(feature = "diagrams")]
#[test]
fn dot_export_of_the_trimmed_plant() {
    let plant = Automaton::from_table(&Table::from_tsv(&plant_tsv()))
        .unwrap()
        .trim()
        .unwrap();
    let dot = diagram::to_dot(&plant, &diagram::DotConfig::default(), diagram::strip_braces);
    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("doublecircle"));
    assert!(dot.contains("s1"));
}
