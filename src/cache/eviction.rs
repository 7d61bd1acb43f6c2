//! Eviction Module
//!
//! Picks which entries to drop when an insertion would overflow the byte budget.

use crate::cache::EntryMeta;

// == Select Victims ==
/// Returns the keys to evict to free at least `required_bytes`.
///
/// Entries are ordered oldest insertion first. `entries` must be in index
/// order so that equal timestamps keep their insertion order (stable sort).
/// Keys are collected until the freed total reaches `required_bytes`; if the
/// list runs out first, every key is returned.
///
/// # Arguments
/// * `entries` - Metadata of every indexed entry, in index order
/// * `required_bytes` - Headroom requested by the pending insertion
pub fn select_victims(entries: &[EntryMeta], required_bytes: u64) -> Vec<String> {
    let mut ordered: Vec<&EntryMeta> = entries.iter().collect();
    ordered.sort_by_key(|meta| meta.created_at);

    let mut freed: u64 = 0;
    let mut victims = Vec::new();

    for meta in ordered {
        if freed >= required_bytes {
            break;
        }
        victims.push(meta.key.clone());
        freed += meta.size_bytes;
    }

    victims
}
