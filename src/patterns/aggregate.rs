// src/patterns/aggregate.rs
use super::types::{CanonicalKey, CodePattern, PatternKind};
use std::collections::HashMap;

/// Merges structurally equivalent patterns.
///
/// Two patterns merge when they share a kind and a canonical key. The first
/// occurrence keeps its name and structure; later ones only add to the
/// occurrence count and the location list. Output order is the order of
/// first occurrence.
#[must_use]
pub fn aggregate(patterns: impl IntoIterator<Item = CodePattern>) -> Vec<CodePattern> {
    let mut merged: Vec<CodePattern> = Vec::new();
    let mut index: HashMap<(PatternKind, CanonicalKey), usize> = HashMap::new();
    let mut raw = 0usize;

    for pattern in patterns {
        raw += 1;
        let key = (pattern.kind(), pattern.structure.canonical_key());
        if let Some(&slot) = index.get(&key) {
            let entry = &mut merged[slot];
            entry.occurrence_count += pattern.occurrence_count;
            entry.locations.extend(pattern.locations);
        } else {
            index.insert(key, merged.len());
            merged.push(pattern);
        }
    }

    tracing::debug!(raw, unique = merged.len(), "aggregated patterns");
    merged
}
