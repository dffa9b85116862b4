//! Group-aware selection expansion.
//!
//! The selection set is always a union of whole groups and/or standalone
//! layers; a group can never be partially selected. Every selection the
//! document store builds goes through these helpers to keep that invariant.

use crate::layer::{Layer, LayerId};

/// Expand a single layer id to its whole group.
///
/// Grouped layers expand to every member sharing the same group id;
/// standalone layers expand to the singleton set. Unknown ids expand to the
/// empty set, which makes selection of a stale id a silent no-op.
pub fn expand_to_group(layers: &[Layer], id: LayerId) -> Vec<LayerId> {
    let Some(layer) = layers.iter().find(|l| l.id() == id) else {
        return Vec::new();
    };
    match layer.group_id() {
        Some(group_id) => layers
            .iter()
            .filter(|l| l.group_id() == Some(group_id))
            .map(|l| l.id())
            .collect(),
        None => vec![id],
    }
}

/// Expand a list of ids (e.g. a marquee hit set) per the group rule, union
/// the results and deduplicate, preserving first-seen order.
pub fn expand_selection(layers: &[Layer], ids: &[LayerId]) -> Vec<LayerId> {
    let mut expanded = Vec::new();
    for &id in ids {
        for member in expand_to_group(layers, id) {
            if !expanded.contains(&member) {
                expanded.push(member);
            }
        }
    }
    expanded
}
