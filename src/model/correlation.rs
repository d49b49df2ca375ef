use super::signal::AxisShift;
use super::types::{Axis, Element, ExperimentType, Hybridization, Sign};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Candidate numbers of protons attached to a heavy atom.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub enum ProtonsCount {
    #[default]
    Unknown,
    Resolved(u8),
    /// Two or more candidates, kept sorted and distinct.
    Ambiguous(Vec<u8>),
}

impl ProtonsCount {
    pub fn from_candidates(candidates: impl IntoIterator<Item = u8>) -> Self {
        let set: BTreeSet<u8> = candidates.into_iter().collect();
        let mut values: Vec<u8> = set.into_iter().collect();
        match values.len() {
            0 => ProtonsCount::Unknown,
            1 => ProtonsCount::Resolved(values.remove(0)),
            _ => ProtonsCount::Ambiguous(values),
        }
    }

    /// The single resolved count, if unambiguous.
    pub fn resolved(&self) -> Option<u8> {
        match self {
            ProtonsCount::Resolved(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ProtonsCount::Unknown)
    }

    pub fn candidates(&self) -> Vec<u8> {
        match self {
            ProtonsCount::Unknown => Vec::new(),
            ProtonsCount::Resolved(n) => vec![*n],
            ProtonsCount::Ambiguous(values) => values.clone(),
        }
    }
}

impl From<Vec<u8>> for ProtonsCount {
    fn from(values: Vec<u8>) -> Self {
        ProtonsCount::from_candidates(values)
    }
}

impl From<ProtonsCount> for Vec<u8> {
    fn from(count: ProtonsCount) -> Self {
        count.candidates()
    }
}

/// Shift (and phase, for 2D-derived entries) of a real correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSignal {
    pub id: String,
    pub delta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<Sign>,
}

/// Where a correlation comes from: an observed signal, or nowhere (placeholder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Origin {
    #[serde(rename_all = "camelCase")]
    Real {
        experiment_type: ExperimentType,
        #[serde(rename = "experimentID")]
        experiment_id: String,
        /// Axis of the originating 2D signal; `None` for 1D signals.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        axis: Option<Axis>,
        signal: CorrelationSignal,
    },
    Pseudo,
}

/// Fields the user overrode by hand. The engine never recomputes a flagged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Edited {
    pub equivalences: bool,
    pub protons_count: bool,
    pub hybridization: bool,
}

impl Edited {
    pub fn any(&self) -> bool {
        self.equivalences || self.protons_count || self.hybridization
    }
}

/// One connection between correlations observed in a single 2D signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub experiment_type: ExperimentType,
    #[serde(rename = "experimentID")]
    pub experiment_id: String,
    #[serde(rename = "signalID")]
    pub signal_id: String,
    pub axis: Axis,
    /// Atom types on the `[x, y]` axes of the originating experiment.
    pub atom_type: [Element; 2],
    pub signal: AxisShift,
    /// Indices of the correlations on the opposite axis this link resolves to.
    #[serde(default)]
    pub matches: Vec<usize>,
    #[serde(default)]
    pub pseudo: bool,
}

impl Link {
    /// Atom type on the other end of the link.
    #[inline]
    pub fn other_atom_type(&self) -> Element {
        self.atom_type[self.axis.opposite().position()]
    }

    /// Returns `true` if both links refer to the same axis of the same signal.
    pub fn same_origin(&self, other: &Link) -> bool {
        self.axis == other.axis && self.pairs_with(other, self.axis)
    }

    /// Returns `true` if `other` is the half of the same signal observed on `axis`.
    pub fn pairs_with(&self, other: &Link, axis: Axis) -> bool {
        other.axis == axis
            && self.experiment_type == other.experiment_type
            && self.experiment_id == other.experiment_id
            && self.signal_id == other.signal_id
    }
}

/// One real or placeholder atom-level assignment entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub id: u64,
    pub atom_type: Element,
    pub origin: Origin,
    #[serde(default)]
    pub equivalences: f64,
    #[serde(default)]
    pub protons_count: ProtonsCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybridization: Option<Hybridization>,
    #[serde(default)]
    pub edited: Edited,
    #[serde(default)]
    pub attachments: BTreeMap<Element, Vec<usize>>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub label: String,
}

impl Correlation {
    fn with_origin(id: u64, atom_type: Element, origin: Origin) -> Self {
        Self {
            id,
            atom_type,
            origin,
            equivalences: 0.0,
            protons_count: ProtonsCount::Unknown,
            hybridization: None,
            edited: Edited::default(),
            attachments: BTreeMap::new(),
            links: Vec::new(),
            index: 0,
            label: String::new(),
        }
    }

    /// Creates a correlation backed by an observed signal.
    pub fn real(
        id: u64,
        atom_type: Element,
        experiment_type: ExperimentType,
        experiment_id: impl Into<String>,
        axis: Option<Axis>,
        signal: CorrelationSignal,
    ) -> Self {
        Self::with_origin(
            id,
            atom_type,
            Origin::Real {
                experiment_type,
                experiment_id: experiment_id.into(),
                axis,
                signal,
            },
        )
    }

    /// Creates an empty placeholder correlation.
    pub fn pseudo(id: u64, atom_type: Element) -> Self {
        Self::with_origin(id, atom_type, Origin::Pseudo)
    }

    #[inline]
    pub fn is_pseudo(&self) -> bool {
        matches!(self.origin, Origin::Pseudo)
    }

    /// A placeholder nothing refers to: no links and no manual edits.
    pub fn is_empty_pseudo(&self) -> bool {
        self.is_pseudo() && self.links.is_empty() && !self.edited.any()
    }

    pub fn signal(&self) -> Option<&CorrelationSignal> {
        match &self.origin {
            Origin::Real { signal, .. } => Some(signal),
            Origin::Pseudo => None,
        }
    }

    pub fn delta(&self) -> Option<f64> {
        self.signal().map(|s| s.delta)
    }

    pub fn experiment_type(&self) -> Option<ExperimentType> {
        match &self.origin {
            Origin::Real {
                experiment_type, ..
            } => Some(*experiment_type),
            Origin::Pseudo => None,
        }
    }

    /// Number of atoms this entry stands for.
    #[inline]
    pub fn multiplicity(&self) -> f64 {
        1.0 + self.equivalences
    }

    /// Adds `link` unless an identical one is already recorded.
    pub fn add_link(&mut self, link: Link) -> bool {
        if self.links.iter().any(|l| l.same_origin(&link)) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Total number of correlations this entry is attached to.
    pub fn attachment_count(&self) -> usize {
        self.attachments.values().map(Vec::len).sum()
    }
}
