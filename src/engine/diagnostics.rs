use crate::model::correlation::Correlation;
use crate::model::formula::Formula;
use crate::model::state::{AtomTypeState, State, StateError};
use crate::model::types::Element;
use std::collections::BTreeSet;

const EPSILON: f64 = 1e-6;

/// Computes per-atom-type completeness and error diagnostics.
///
/// Returns an empty state when `formula` is empty, i.e. when no target is known.
pub fn build_state(correlations: &[Correlation], formula: &Formula) -> State {
    let mut state = State::new();
    if formula.is_empty() {
        return state;
    }

    let mut atom_types: BTreeSet<Element> = formula.elements().collect();
    atom_types.extend(correlations.iter().map(|c| c.atom_type));

    for atom_type in atom_types {
        let total = formula.count(atom_type);
        let current = current_count(correlations, atom_type);

        let mut error = StateError {
            incomplete: (current - total as f64).abs() > EPSILON,
            out_of_limit: out_of_limit(correlations, atom_type, total),
            ..StateError::default()
        };
        if atom_type.is_proton() {
            error.not_attached = not_attached(correlations);
            error.ambiguous_attachment = ambiguous_attachment(correlations);
        }

        let complete = !error.incomplete;
        let error = (!error.is_empty()).then_some(error);
        state.insert(
            atom_type,
            AtomTypeState {
                current,
                total,
                complete,
                error,
            },
        );
    }

    tracing::debug!(atom_types = state.len(), "built correlation state");
    state
}

/// Atoms of `atom_type` represented by real correlations.
///
/// Protons also include the resolved counts of placeholder heavy atoms without
/// proton attachments, which stand for protons not observed yet.
fn current_count(correlations: &[Correlation], atom_type: Element) -> f64 {
    let mut current: f64 = correlations
        .iter()
        .filter(|c| c.atom_type == atom_type && !c.is_pseudo())
        .map(Correlation::multiplicity)
        .sum();

    if atom_type.is_proton() {
        current += correlations
            .iter()
            .filter(|c| c.is_pseudo() && !c.atom_type.is_proton())
            .filter(|c| c.attachments.get(&Element::H).is_none_or(Vec::is_empty))
            .filter_map(|c| c.protons_count.resolved())
            .map(f64::from)
            .sum::<f64>();
    }
    current
}

fn real_protons(correlations: &[Correlation]) -> impl Iterator<Item = (usize, &Correlation)> {
    correlations
        .iter()
        .enumerate()
        .filter(|(_, c)| c.atom_type.is_proton() && !c.is_pseudo())
}

fn not_attached(correlations: &[Correlation]) -> Vec<usize> {
    real_protons(correlations)
        .filter(|(_, c)| c.attachment_count() == 0)
        .map(|(index, _)| index)
        .collect()
}

fn ambiguous_attachment(correlations: &[Correlation]) -> Vec<usize> {
    real_protons(correlations)
        .filter(|(_, c)| c.attachments.len() > 1 || c.attachments.values().any(|v| v.len() > 1))
        .map(|(index, _)| index)
        .collect()
}

/// Real correlations ranked at or past `total` within their atom type.
///
/// The rank is the position among all correlations of `atom_type`, pseudo ones
/// included, in list order.
fn out_of_limit(correlations: &[Correlation], atom_type: Element, total: usize) -> Vec<usize> {
    correlations
        .iter()
        .enumerate()
        .filter(|(_, c)| c.atom_type == atom_type)
        .enumerate()
        .filter(|&(rank, (_, c))| rank >= total && !c.is_pseudo())
        .map(|(_, (index, _))| index)
        .collect()
}
