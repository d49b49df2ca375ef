//! Manual overrides on a finalized correlation list.
//!
//! Every setter flags the matching field in [`Edited`](crate::model::correlation::Edited)
//! so that later rebuilds keep the value instead of recomputing it. Edits
//! address correlations by their position in the list returned by the last
//! rebuild.

use super::error::Error;
use crate::model::correlation::{Correlation, Link, ProtonsCount};
use crate::model::signal::AxisShift;
use crate::model::types::{Axis, ExperimentType, Hybridization};

/// Experiment id shared by all manually asserted links.
pub const PSEUDO_EXPERIMENT_ID: &str = "pseudo";

fn get_mut(list: &mut [Correlation], index: usize) -> Result<&mut Correlation, Error> {
    let len = list.len();
    list.get_mut(index)
        .ok_or_else(|| Error::correlation_index(index, len))
}

/// Overrides the candidate proton counts of one correlation.
pub fn set_protons_count(
    list: &mut [Correlation],
    index: usize,
    counts: impl IntoIterator<Item = u8>,
) -> Result<(), Error> {
    let correlation = get_mut(list, index)?;
    correlation.protons_count = ProtonsCount::from_candidates(counts);
    correlation.edited.protons_count = true;
    Ok(())
}

/// Overrides the number of additional equivalent atoms of one correlation.
///
/// # Errors
///
/// Returns [`Error::InvalidEquivalences`] for negative or non-finite values.
pub fn set_equivalences(list: &mut [Correlation], index: usize, value: f64) -> Result<(), Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidEquivalences(value));
    }
    let correlation = get_mut(list, index)?;
    correlation.equivalences = value;
    correlation.edited.equivalences = true;
    Ok(())
}

pub fn set_hybridization(
    list: &mut [Correlation],
    index: usize,
    hybridization: Hybridization,
) -> Result<(), Error> {
    let correlation = get_mut(list, index)?;
    correlation.hybridization = Some(hybridization);
    correlation.edited.hybridization = true;
    Ok(())
}

/// Drops every manual flag of one correlation; the next rebuild recomputes the values.
pub fn clear_edits(list: &mut [Correlation], index: usize) -> Result<(), Error> {
    let correlation = get_mut(list, index)?;
    correlation.edited = Default::default();
    Ok(())
}

/// Asserts a correlation between `from` and `to` that no spectrum shows.
///
/// Both correlations receive one half of a synthetic 2D signal: `from` on the
/// `x` axis, `to` on the `y` axis. The halves are resolved like observed links
/// on every rebuild; with a one-bond `experiment_type` they also define an
/// attachment. Returns the synthetic signal id.
///
/// # Errors
///
/// Returns [`Error::CorrelationIndex`] if either index is out of range and
/// [`Error::SelfLink`] if both refer to the same correlation.
pub fn add_pseudo_link(
    list: &mut [Correlation],
    from: usize,
    to: usize,
    experiment_type: ExperimentType,
) -> Result<String, Error> {
    let len = list.len();
    if from >= len {
        return Err(Error::correlation_index(from, len));
    }
    if to >= len {
        return Err(Error::correlation_index(to, len));
    }
    if from == to {
        return Err(Error::SelfLink(from));
    }

    let atom_type = [list[from].atom_type, list[to].atom_type];
    let signal_id = format!("pseudo-{}-{}", list[from].id, list[to].id);
    let half = |correlation: &Correlation, axis: Axis, other: usize| Link {
        experiment_type,
        experiment_id: PSEUDO_EXPERIMENT_ID.to_string(),
        signal_id: signal_id.clone(),
        axis,
        atom_type,
        signal: AxisShift {
            delta: correlation.delta().unwrap_or(0.0),
            sign: None,
        },
        matches: vec![other],
        pseudo: true,
    };

    let x = half(&list[from], Axis::X, to);
    let y = half(&list[to], Axis::Y, from);
    list[from].add_link(x);
    list[to].add_link(y);

    tracing::debug!(from, to, %signal_id, "added manual link");
    Ok(signal_id)
}

/// Removes both halves of the manual link `signal_id` held by the correlation at `index`.
///
/// Returns the number of links removed; links derived from spectra are never touched.
pub fn remove_pseudo_link(
    list: &mut [Correlation],
    index: usize,
    signal_id: &str,
) -> Result<usize, Error> {
    get_mut(list, index)?;

    let mut removed = 0;
    for correlation in list.iter_mut() {
        let before = correlation.links.len();
        correlation
            .links
            .retain(|link| !(link.pseudo && link.signal_id == signal_id));
        removed += before - correlation.links.len();
    }
    Ok(removed)
}
