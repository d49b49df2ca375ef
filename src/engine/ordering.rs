use super::context::BuildContext;
use crate::model::correlation::Correlation;
use crate::model::types::Element;
use std::cmp::Ordering;

/// Sorts the correlation list into its presentation order and labels it.
///
/// Atom types keep the order in which they first appear. Within a type,
/// correlations are ordered by ascending shift; pseudo correlations have no
/// shift and go last, keeping their relative order. `index` becomes the final
/// position and `label` a per-type running name such as `C3`.
pub fn finalize(ctx: &mut BuildContext) {
    let mut groups: Vec<Element> = Vec::new();
    for correlation in &ctx.correlations {
        if !groups.contains(&correlation.atom_type) {
            groups.push(correlation.atom_type);
        }
    }

    let mut order: Vec<usize> = (0..ctx.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&ctx.correlations[a], &ctx.correlations[b]);
        group_rank(&groups, a)
            .cmp(&group_rank(&groups, b))
            .then_with(|| by_shift(a, b))
    });
    ctx.permute(&order);

    let mut counters: Vec<(Element, usize)> = Vec::with_capacity(groups.len());
    for (index, correlation) in ctx.correlations.iter_mut().enumerate() {
        let n = match counters.iter_mut().find(|(e, _)| *e == correlation.atom_type) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                counters.push((correlation.atom_type, 1));
                1
            }
        };
        correlation.index = index;
        correlation.label = format!("{}{n}", correlation.atom_type);
    }
}

fn group_rank(groups: &[Element], correlation: &Correlation) -> usize {
    groups
        .iter()
        .position(|&e| e == correlation.atom_type)
        .unwrap_or(groups.len())
}

fn by_shift(a: &Correlation, b: &Correlation) -> Ordering {
    match (a.delta(), b.delta()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
