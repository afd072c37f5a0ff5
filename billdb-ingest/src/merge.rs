//! Named merge strategies
//!
//! Three "prefer the non-null value" policies recur in this pipeline with
//! different tie-break rules, and they are deliberately kept as distinct
//! named strategies rather than inline conditionals:
//!
//! - [`fill_missing`]: ordered-source fallback. Used by the identity
//!   resolver: each successive source (content, filename, directories) only
//!   fills fields the earlier sources left empty.
//! - [`first_wins`]: in-batch observation merge. Used by the cosponsor
//!   reducer: within one flush batch the first non-null observation of a
//!   field is kept and later non-null observations are discarded, so a
//!   single bulk statement never carries two conflicting values for a key.
//! - [`promote_true`]: tri-state boolean promotion. Once any observation
//!   says true, the merged value is true; otherwise the first non-null
//!   observation stands.
//!
//! The fourth policy of the family, cross-run coalesce against *existing
//! storage* (incoming non-null wins, stored value kept when the incoming
//! field is null), lives in the conflict clauses of the SQL statements in
//! [`crate::db`], not here. Within a batch the first value wins; across
//! runs the newest non-null wins. That asymmetry is intentional.

/// Ordered-source fallback: fill `slot` only if it is still empty.
pub fn fill_missing<T>(slot: &mut Option<T>, candidate: Option<T>) {
    if slot.is_none() {
        *slot = candidate;
    }
}

/// In-batch first-wins: keep the first non-null observation of a field.
pub fn first_wins<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if slot.is_none() {
        *slot = incoming;
    }
}

/// Tri-state OR-promotion: any true observation makes the merged value
/// true; otherwise the first non-null observation is kept.
pub fn promote_true(slot: &mut Option<bool>, incoming: Option<bool>) {
    if incoming == Some(true) {
        *slot = Some(true);
    } else if slot.is_none() {
        *slot = incoming;
    }
}
