use super::context::BuildContext;
use crate::model::formula::Formula;
use crate::model::types::Element;
use std::collections::BTreeSet;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub added: usize,
    pub removed: usize,
}

/// Pads or trims placeholder correlations so that every atom type tracks `formula`.
///
/// For each element, the atoms already accounted for are the number of
/// correlations of that type (real and pseudo) plus the rounded sum of
/// equivalences carried by the real ones. A shortfall is filled with new empty
/// pseudo correlations appended to the list; a surplus removes empty pseudo
/// correlations starting from the end of the list. Pseudo correlations that
/// carry links or manual edits are never removed.
///
/// Atom types absent from `formula` expect zero atoms, so their empty pseudo
/// correlations are dropped.
pub fn reconcile(ctx: &mut BuildContext, formula: &Formula) -> Reconciled {
    let mut elements: BTreeSet<Element> = formula.elements().collect();
    elements.extend(
        ctx.correlations
            .iter()
            .filter(|c| c.is_pseudo())
            .map(|c| c.atom_type),
    );

    let mut outcome = Reconciled::default();
    for element in elements {
        let expected = formula.count(element) as i64;
        let need = expected - accounted_for(ctx, element);

        if need > 0 {
            for _ in 0..need {
                ctx.push_pseudo(element);
            }
            outcome.added += need as usize;
        } else if need < 0 {
            let surplus: Vec<usize> = ctx
                .correlations
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, c)| c.atom_type == element && c.is_empty_pseudo())
                .map(|(index, _)| index)
                .take(need.unsigned_abs() as usize)
                .collect();
            outcome.removed += surplus.len();
            ctx.remove(&surplus);
        }
    }

    tracing::debug!(
        added = outcome.added,
        removed = outcome.removed,
        "reconciled pseudo correlations"
    );
    outcome
}

fn accounted_for(ctx: &BuildContext, element: Element) -> i64 {
    let (entries, equivalences) = ctx
        .correlations
        .iter()
        .filter(|c| c.atom_type == element)
        .fold((0i64, 0.0f64), |(n, eq), c| {
            let eq = if c.is_pseudo() { eq } else { eq + c.equivalences };
            (n + 1, eq)
        });
    entries + equivalences.round() as i64
}
