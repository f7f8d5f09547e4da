use crate::matching::catalog::{DEMO_ROLES, MATCH_TABLE, ROLE_CATALOG};
use crate::models::role::MatchRecord;

/// Shown when a role resolves to no records.
pub fn no_matches_message() -> String {
    format!(
        "No matches yet for that role (in this demo). Try {}, {}, or {}.",
        DEMO_ROLES[0], DEMO_ROLES[1], DEMO_ROLES[2]
    )
}

/// Looks up match records for a resolved role name.
///
/// Exact key first, then the catalog entry equal to `role` ignoring case.
/// Absence is an empty vec. Callers must reject an empty role beforehand.
pub fn resolve(role: &str) -> Vec<MatchRecord> {
    if let Some(records) = MATCH_TABLE.get(role).filter(|r| !r.is_empty()) {
        return records.clone();
    }

    canonical_role(role)
        .and_then(|canonical| MATCH_TABLE.get(canonical))
        .cloned()
        .unwrap_or_default()
}

/// Returns the catalog spelling of `role`, compared case-insensitively.
pub fn canonical_role(role: &str) -> Option<&'static str> {
    let lower = role.to_lowercase();
    ROLE_CATALOG
        .iter()
        .copied()
        .find(|entry| entry.to_lowercase() == lower)
}
