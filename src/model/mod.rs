//! Core data structures of the correlation engine.
//!
//! - [`types`] – Elements, hybridization, experiment kinds, axes and signs.
//! - [`signal`] – Read-only spectral signal snapshot fed into a rebuild.
//! - [`correlation`] – Correlations, their links and proton-count candidates.
//! - [`formula`] – Target molecular formula as per-element atom counts.
//! - [`state`] – Per-atom-type diagnostics produced after a rebuild.
//!
//! Signals describe what was measured; correlations describe what the engine
//! concluded from them. The [`crate::engine`] pipeline turns the former into the
//! latter, carrying manual edits over from the previous correlation list.

pub mod correlation;
pub mod formula;
pub mod signal;
pub mod state;
pub mod types;
