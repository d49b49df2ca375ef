use super::config::Tolerance;
use crate::model::correlation::{Correlation, ProtonsCount};
use crate::model::signal::{EditingSignal, EditingSignals};
use crate::model::types::{EditingKind, Element, Hybridization, Sign};

/// Assigns candidate proton counts to heavy-atom correlations from editing evidence.
///
/// Correlations with a manually edited proton count, proton correlations and
/// pseudo correlations (no shift to match) are left untouched.
pub fn infer_protons_counts(
    correlations: &mut [Correlation],
    evidence: &EditingSignals,
    tolerance: &Tolerance,
) {
    let mut resolved = 0usize;

    for correlation in correlations.iter_mut() {
        if correlation.edited.protons_count || correlation.atom_type.is_proton() {
            continue;
        }
        let Some(delta) = correlation.delta() else {
            continue;
        };

        let (count, hybridization) = decide(correlation.atom_type, delta, evidence, tolerance);
        if count.resolved().is_some() {
            resolved += 1;
        }
        correlation.protons_count = count;

        if let Some(hybridization) = hybridization
            && !correlation.edited.hybridization
        {
            correlation.hybridization = Some(hybridization);
        }
    }

    tracing::debug!(resolved, "inferred proton counts");
}

fn signals_for(
    evidence: &EditingSignals,
    kind: EditingKind,
    atom_type: Element,
) -> Vec<&EditingSignal> {
    evidence
        .get(&kind)
        .into_iter()
        .flatten()
        .filter(|s| s.atom_type == atom_type)
        .collect()
}

/// Decision table, checked in order:
///
/// 1. positive 90° signal at the shift → CH
/// 2. 135° signal at the shift: positive → CH3 when 90° data exists (a CH would
///    have shown up there), otherwise CH or CH3; negative → CH2
/// 3. 135° data exists but has nothing at the shift → quaternary
/// 4. no 135° data at all → unknown
fn decide(
    atom_type: Element,
    delta: f64,
    evidence: &EditingSignals,
    tolerance: &Tolerance,
) -> (ProtonsCount, Option<Hybridization>) {
    let dept90 = signals_for(evidence, EditingKind::Dept90, atom_type);
    let dept135 = signals_for(evidence, EditingKind::Dept135, atom_type);
    let at_shift = |s: &&EditingSignal| tolerance.matches(atom_type, s.signal.delta, delta);

    if dept90
        .iter()
        .any(|s| s.signal.sign == Sign::Positive && at_shift(s))
    {
        return (ProtonsCount::Resolved(1), None);
    }

    if let Some(signal) = dept135.iter().find(|s| at_shift(s)) {
        return match signal.signal.sign {
            Sign::Positive if !dept90.is_empty() => {
                (ProtonsCount::Resolved(3), Some(Hybridization::SP3))
            }
            Sign::Positive => (ProtonsCount::Ambiguous(vec![1, 3]), None),
            Sign::Negative => (ProtonsCount::Resolved(2), None),
        };
    }

    // Quaternary only when a 135° spectrum exists for this atom type.
    // TODO: allow a quaternary call from DEPT-90 data alone once 90°-only input is supported.
    if !dept135.is_empty() {
        return (ProtonsCount::Resolved(0), None);
    }

    (ProtonsCount::Unknown, None)
}
