use crate::model::correlation::{Correlation, Link};

/// Rebuilds the `matches` of every link and prunes links that match nothing.
///
/// A link on axis `a` of some 2D signal matches every correlation of the
/// complementary atom type holding a link to the same signal on the opposite
/// axis. Since pairing is symmetric, a match from A to B always has a
/// counterpart match from B to A. Returns the number of pruned links.
pub fn resolve_links(correlations: &mut [Correlation]) -> usize {
    let resolved: Vec<Vec<Vec<usize>>> = correlations
        .iter()
        .map(|c| {
            c.links
                .iter()
                .map(|link| find_matches(correlations, link))
                .collect()
        })
        .collect();

    let mut pruned = 0;
    for (correlation, matches) in correlations.iter_mut().zip(resolved) {
        for (link, found) in correlation.links.iter_mut().zip(matches) {
            link.matches = found;
        }
        let before = correlation.links.len();
        correlation.links.retain(|link| !link.matches.is_empty());
        pruned += before - correlation.links.len();
    }

    tracing::debug!(pruned, "resolved correlation links");
    pruned
}

fn find_matches(correlations: &[Correlation], link: &Link) -> Vec<usize> {
    let other_type = link.other_atom_type();
    let other_axis = link.axis.opposite();

    correlations
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            c.atom_type == other_type && c.links.iter().any(|l| link.pairs_with(l, other_axis))
        })
        .map(|(index, _)| index)
        .collect()
}
