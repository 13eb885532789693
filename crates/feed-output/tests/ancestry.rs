//! Tests for category ancestor expansion.

use std::collections::HashSet;

use proptest::prelude::*;

use feed_output::{AncestryError, CategoryEntry, CategoryTable, expand_ancestry};

fn table(entries: &[(&str, Option<&str>)]) -> CategoryTable {
    let mut categories = CategoryTable::new();
    for (id, parent) in entries {
        categories.upsert(
            *id,
            CategoryEntry::new(id.to_uppercase(), parent.map(str::to_string)),
        );
    }
    categories
}

fn chain() -> CategoryTable {
    table(&[("A", None), ("B", Some("A")), ("C", Some("B"))])
}

#[test]
fn root_expands_to_itself() {
    assert_eq!(expand_ancestry(&chain(), ["A"]).unwrap(), vec!["A"]);
}

#[test]
fn chain_expands_leaf_first() {
    assert_eq!(expand_ancestry(&chain(), ["C"]).unwrap(), vec!["C", "B", "A"]);
}

#[test]
fn overlapping_assignments_are_deduplicated() {
    assert_eq!(
        expand_ancestry(&chain(), ["C", "B"]).unwrap(),
        vec!["C", "B", "A"]
    );
    assert_eq!(
        expand_ancestry(&chain(), ["B", "C"]).unwrap(),
        vec!["B", "A", "C"]
    );
}

#[test]
fn separate_branches_keep_discovery_order() {
    let categories = table(&[
        ("root", None),
        ("left", Some("root")),
        ("right", Some("root")),
        ("other", None),
    ]);
    assert_eq!(
        expand_ancestry(&categories, ["right", "other", "left"]).unwrap(),
        vec!["right", "root", "other", "left"]
    );
}

#[test]
fn no_assignment_expands_to_nothing() {
    assert!(expand_ancestry(&chain(), []).unwrap().is_empty());
}

#[test]
fn unknown_category_is_reported() {
    assert_eq!(
        expand_ancestry(&chain(), ["Z"]).unwrap_err(),
        AncestryError::UnknownCategory("Z".to_string())
    );
}

#[test]
fn unknown_parent_is_reported() {
    let categories = table(&[("B", Some("A"))]);
    assert_eq!(
        expand_ancestry(&categories, ["B"]).unwrap_err(),
        AncestryError::UnknownParent {
            category: "B".to_string(),
            parent: "A".to_string(),
        }
    );
}

#[test]
fn cycles_are_reported() {
    let categories = table(&[("A", Some("C")), ("B", Some("A")), ("C", Some("B"))]);
    assert!(matches!(
        expand_ancestry(&categories, ["B"]),
        Err(AncestryError::Cycle(_))
    ));
    let self_parent = table(&[("A", Some("A"))]);
    assert_eq!(
        expand_ancestry(&self_parent, ["A"]).unwrap_err(),
        AncestryError::Cycle("A".to_string())
    );
}

/// A forest where node `i` has a parent with a smaller index, or none.
fn forest() -> impl Strategy<Value = Vec<Option<usize>>> {
    (1usize..24).prop_flat_map(|size| {
        (0..size)
            .map(|index| {
                if index == 0 {
                    Just(None).boxed()
                } else {
                    prop::option::of(0..index).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn forest_table(parents: &[Option<usize>]) -> CategoryTable {
    let mut categories = CategoryTable::new();
    for (index, parent) in parents.iter().enumerate() {
        categories.upsert(
            format!("c{index}"),
            CategoryEntry::new(format!("Category {index}"), parent.map(|p| format!("c{p}"))),
        );
    }
    categories
}

fn ancestors(parents: &[Option<usize>], mut index: usize) -> Vec<String> {
    let mut out = vec![format!("c{index}")];
    while let Some(parent) = parents[index] {
        out.push(format!("c{parent}"));
        index = parent;
    }
    out
}

proptest! {
    #[test]
    fn expansion_is_the_deduplicated_union_of_chains(
        (parents, picks) in forest().prop_flat_map(|parents| {
            let size = parents.len();
            (Just(parents), prop::collection::vec(0..size, 0..6))
        })
    ) {
        let categories = forest_table(&parents);
        let assigned: Vec<String> = picks.iter().map(|index| format!("c{index}")).collect();
        let expanded = expand_ancestry(&categories, assigned.iter().map(String::as_str))
            .expect("forest has no cycles");

        let unique: HashSet<&String> = expanded.iter().collect();
        prop_assert_eq!(unique.len(), expanded.len());

        let mut expected = Vec::new();
        for index in &picks {
            for id in ancestors(&parents, *index) {
                if !expected.contains(&id) {
                    expected.push(id);
                }
            }
        }
        prop_assert_eq!(expanded, expected);
    }

    #[test]
    fn expansion_is_idempotent(
        (parents, pick) in forest().prop_flat_map(|parents| {
            let size = parents.len();
            (Just(parents), 0..size)
        })
    ) {
        let categories = forest_table(&parents);
        let once = expand_ancestry(&categories, [format!("c{pick}").as_str()])
            .expect("expand");
        let again = expand_ancestry(&categories, once.iter().map(String::as_str))
            .expect("expand again");
        prop_assert_eq!(again, once);
    }
}
