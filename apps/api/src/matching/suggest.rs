use crate::matching::catalog::ROLE_CATALOG;

/// Maximum number of autocomplete candidates returned for one query.
pub const MAX_SUGGESTIONS: usize = 7;

/// Autocomplete over the role catalog.
///
/// An empty (or whitespace-only) query yields the first catalog entries in
/// declared order. Otherwise entries are kept, in catalog order, when their
/// lowercase form contains the lowercase trimmed query.
pub fn suggest(query: &str) -> Vec<String> {
    let q = query.trim().to_lowercase();

    ROLE_CATALOG
        .iter()
        .filter(|role| q.is_empty() || role.to_lowercase().contains(&q))
        .take(MAX_SUGGESTIONS)
        .map(|role| role.to_string())
        .collect()
}
