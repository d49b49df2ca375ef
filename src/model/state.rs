use super::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Problems found for one atom type. Index lists refer to final correlation indices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateError {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub incomplete: bool,
    /// Proton correlations attached to nothing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_attached: Vec<usize>,
    /// Proton correlations attached to more than one heavy atom.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_attachment: Vec<usize>,
    /// Real correlations beyond the number of atoms the formula allows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub out_of_limit: Vec<usize>,
}

impl StateError {
    pub fn is_empty(&self) -> bool {
        !self.incomplete
            && self.not_attached.is_empty()
            && self.ambiguous_attachment.is_empty()
            && self.out_of_limit.is_empty()
    }
}

/// Assignment progress for one atom type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomTypeState {
    pub current: f64,
    pub total: usize,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StateError>,
}

impl AtomTypeState {
    pub fn has_errors(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.is_empty())
    }
}

pub type State = BTreeMap<Element, AtomTypeState>;
