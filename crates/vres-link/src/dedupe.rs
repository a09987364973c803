//! # Credential Deduplication
//!
//! A section item's credential list is unique by `id`. When an id repeats,
//! the output keeps the slot of its **first** occurrence but stores the
//! value of its **last** occurrence, i.e. insertion-ordered map semantics
//! with overwrite. Re-attaching a credential therefore refreshes its
//! content without moving it in the list.

use std::collections::HashMap;

use crate::credential::SelectedCredential;

/// Canonicalize a credential list by `id`.
///
/// Idempotent: `dedupe(&dedupe(xs)) == dedupe(xs)`.
pub fn dedupe(items: &[SelectedCredential]) -> Vec<SelectedCredential> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    let mut out: Vec<SelectedCredential> = Vec::with_capacity(items.len());
    for item in items {
        match slots.get(item.id.as_str()) {
            Some(&slot) => out[slot] = item.clone(),
            None => {
                slots.insert(item.id.as_str(), out.len());
                out.push(item.clone());
            }
        }
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn credential() -> impl Strategy<Value = SelectedCredential> {
        ("[a-d]", "[a-z]{0,4}").prop_map(|(id, name)| SelectedCredential {
            id: id.clone(),
            file_id: id,
            name,
            credential: None,
        })
    }

    proptest! {
        #[test]
        fn dedupe_is_idempotent(items in prop::collection::vec(credential(), 0..12)) {
            let once = dedupe(&items);
            prop_assert_eq!(dedupe(&once), once);
        }

        #[test]
        fn dedupe_output_ids_unique_and_last_value_wins(
            items in prop::collection::vec(credential(), 0..12)
        ) {
            let out = dedupe(&items);
            let mut seen = std::collections::HashSet::new();
            for c in &out {
                prop_assert!(seen.insert(c.id.clone()));
                let last = items.iter().rev().find(|i| i.id == c.id).unwrap();
                prop_assert_eq!(c, last);
            }
        }
    }
}
