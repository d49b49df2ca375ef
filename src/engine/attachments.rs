use crate::model::correlation::Correlation;
use crate::model::types::Element;

/// Derives heavy-atom ↔ proton attachments from resolved one-bond links.
///
/// Attachments are rebuilt from scratch: for each HSQC/HMQC link, the matched
/// correlations are recorded under the atom type on the other end of the link.
pub fn infer_attachments(correlations: &mut [Correlation]) {
    let mut attached = 0usize;

    for correlation in correlations.iter_mut() {
        correlation.attachments.clear();

        for link in &correlation.links {
            if !link.experiment_type.is_one_bond() {
                continue;
            }
            correlation
                .attachments
                .entry(link.other_atom_type())
                .or_default()
                .extend(link.matches.iter().copied());
        }

        for indices in correlation.attachments.values_mut() {
            indices.sort_unstable();
            indices.dedup();
        }
        correlation.attachments.retain(|_, indices| !indices.is_empty());
        attached += correlation.attachment_count();
    }

    tracing::debug!(attached, "inferred one-bond attachments");
}

/// Number of protons beyond the first carried by a heavy atom with `count` protons.
fn extra_protons(count: u8) -> f64 {
    match count {
        3 => 2.0,
        2 => 1.0,
        _ => 0.0,
    }
}

/// Shares the equivalence of resolved CH/CH2/CH3 groups among their protons.
///
/// A heavy atom standing for `1 + e` atoms with a resolved proton count `n`
/// shares `(1 + e) * (1 + x)` over its `k` attached proton correlations, where
/// `x` is 2 for CH3, 1 for CH2 and 0 otherwise. Each receives
/// `(1 + e) * (1 + x) / k - 1` equivalences, floored at 0 (a CH with two
/// attached protons would get -0.5). Proton equivalences not set by hand are
/// recomputed from zero on every call; manually edited ones are kept.
pub fn distribute_equivalences(correlations: &mut [Correlation]) {
    for correlation in correlations.iter_mut() {
        if correlation.atom_type.is_proton() && !correlation.edited.equivalences {
            correlation.equivalences = 0.0;
        }
    }

    let mut shares: Vec<(usize, f64)> = Vec::new();
    for heavy in correlations.iter() {
        if heavy.atom_type.is_proton() {
            continue;
        }
        let Some(count) = heavy.protons_count.resolved() else {
            continue;
        };
        let Some(protons) = heavy.attachments.get(&Element::H) else {
            continue;
        };
        if protons.is_empty() {
            continue;
        }

        let share =
            heavy.multiplicity() * (1.0 + extra_protons(count)) / protons.len() as f64 - 1.0;
        let share = share.max(0.0);
        shares.extend(protons.iter().map(|&index| (index, share)));
    }

    let mut distributed = 0usize;
    for (index, share) in shares {
        let Some(proton) = correlations.get_mut(index) else {
            continue;
        };
        if proton.edited.equivalences {
            continue;
        }
        proton.equivalences = share;
        distributed += 1;
    }

    tracing::debug!(distributed, "distributed proton equivalences");
}
