//! Beat timeline reconciliation.
//!
//! Turns per-beat media facts into one authoritative `duration`/`start_at`/`silence_duration`
//! per beat. Pure and single-threaded: every beat depends on the running totals of the beats
//! before it.

/// Beat grouping scan.
pub mod grouping;
/// Gap policy.
pub mod padding;
/// Reconciliation walk.
pub mod reconcile;
