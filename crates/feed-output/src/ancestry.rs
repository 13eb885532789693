//! Category ancestor expansion.

use std::collections::HashSet;

use thiserror::Error;

use crate::tables::CategoryTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AncestryError {
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("category `{category}` has unknown parent `{parent}`")]
    UnknownParent { category: String, parent: String },
    #[error("category `{0}` is part of a parent cycle")]
    Cycle(String),
}

/// Expand assigned category ids into the ids plus all their ancestors.
///
/// Each assigned id contributes itself and then its parent chain up to a
/// root. Ids are collected once, in first-discovery order across all
/// assignments: assigning `C` and `B` where `C -> B -> A` yields `[C, B, A]`.
pub fn expand_ancestry<'a, I>(
    categories: &CategoryTable,
    assigned: I,
) -> Result<Vec<String>, AncestryError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut expanded = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for id in assigned {
        let Some(mut entry) = categories.get(id) else {
            return Err(AncestryError::UnknownCategory(id.to_string()));
        };
        let mut current: &str = id;
        let mut chain: HashSet<&str> = HashSet::new();
        loop {
            if seen.contains(current) {
                // Everything above an expanded id is already collected.
                break;
            }
            if !chain.insert(current) {
                return Err(AncestryError::Cycle(current.to_string()));
            }
            expanded.push(current.to_string());
            let Some(parent) = entry.parent_id.as_deref() else {
                break;
            };
            entry = match categories.get(parent) {
                Some(parent_entry) => parent_entry,
                None => {
                    return Err(AncestryError::UnknownParent {
                        category: current.to_string(),
                        parent: parent.to_string(),
                    });
                }
            };
            current = parent;
        }
        seen.extend(chain);
    }

    Ok(expanded)
}
