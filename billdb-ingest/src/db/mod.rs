//! Store writes for the three billdb relations
//!
//! Statement shapes implement the cross-run merge policy: chamber is
//! overwritten unconditionally, actions are append-only with duplicates
//! ignored, and every other field coalesces against existing storage so a
//! populated field never regresses to null.

pub mod actions;
pub mod bills;
pub mod cosponsors;
