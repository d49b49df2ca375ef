//! Error types for the correlation engine.
//!
//! A rebuild itself never fails: data-quality problems surface through the
//! diagnostics. Errors here cover configuration loading and manual edits
//! addressed to correlations that do not exist.

use crate::model::types::Element;
use thiserror::Error;

/// Errors raised while configuring the engine or editing a correlation list.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse the TOML configuration.
    #[error("failed to parse correlation options: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A tolerance was negative, infinite or NaN.
    #[error("invalid tolerance {value} for atom type '{atom_type}': must be finite and non-negative")]
    InvalidTolerance {
        /// Atom type the tolerance was meant for.
        atom_type: Element,
        /// The rejected value.
        value: f64,
    },

    /// An edit addressed a correlation index outside the list.
    #[error("correlation index {index} is out of range (list has {len} correlations)")]
    CorrelationIndex {
        /// Requested index.
        index: usize,
        /// Length of the correlation list.
        len: usize,
    },

    /// A manual equivalence count was negative or not finite.
    #[error("invalid equivalence count {0}: must be finite and non-negative")]
    InvalidEquivalences(f64),

    /// A manual link was requested from a correlation to itself.
    #[error("cannot link correlation {0} to itself")]
    SelfLink(usize),
}

impl Error {
    /// Creates a [`CorrelationIndex`](Error::CorrelationIndex) error.
    pub fn correlation_index(index: usize, len: usize) -> Self {
        Self::CorrelationIndex { index, len }
    }
}
