//! Working state of one rebuild.
//!
//! The [`BuildContext`] owns the correlation list for the duration of a
//! rebuild. Stages refer to correlations by position; whenever positions change
//! (pseudo removal, final sort) the context remaps every stored index so that
//! link matches and attachments stay valid.

use crate::model::correlation::{Correlation, CorrelationSignal, Origin};
use crate::model::signal::SignalSnapshot;
use crate::model::types::{Axis, Element, ExperimentType};

/// Correlation arena plus the id allocator of a single rebuild.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Correlations in working order.
    pub correlations: Vec<Correlation>,
    next_id: u64,
}

impl BuildContext {
    /// Wraps an existing list without reconciling it against any snapshot.
    #[cfg(test)]
    pub fn from_correlations(correlations: Vec<Correlation>) -> Self {
        let next_id = next_free_id(&correlations);
        Self {
            correlations,
            next_id,
        }
    }

    /// Carries the previous correlation list over into a new rebuild.
    ///
    /// Pseudo correlations are kept as they are. Real correlations survive only
    /// while the signal they were created from is still part of `snapshot`; their
    /// shift and phase are refreshed from it. Links derived from spectra are
    /// dropped to be derived again, manually asserted (pseudo) links are kept.
    /// Manual edits, equivalences and proton counts carry over unchanged.
    /// Ids continue from `next_id` or past the largest previous id, whichever
    /// is higher.
    pub fn seed(previous: &[Correlation], next_id: u64, snapshot: &SignalSnapshot) -> Self {
        let next_id = next_id.max(next_free_id(previous));
        let mut correlations = Vec::with_capacity(previous.len());
        let mut dropped = 0usize;

        for prev in previous {
            let mut correlation = prev.clone();

            if let Origin::Real {
                experiment_type,
                experiment_id,
                axis,
                signal,
            } = &mut correlation.origin
            {
                let Some(current) = snapshot.find_origin(
                    *experiment_type,
                    experiment_id,
                    &signal.id,
                    prev.atom_type,
                    *axis,
                ) else {
                    dropped += 1;
                    continue;
                };
                signal.delta = current.delta;
                signal.sign = current.sign;
            }

            correlation.links.retain(|link| link.pseudo);
            for link in &mut correlation.links {
                link.matches.clear();
            }
            correlation.attachments.clear();
            correlations.push(correlation);
        }

        tracing::debug!(
            kept = correlations.len(),
            dropped,
            "seeded rebuild from previous correlations"
        );

        Self {
            correlations,
            next_id,
        }
    }

    /// Returns a fresh correlation id, never handed out before in this lineage.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.correlations.len()
    }

    /// Real correlation of `atom_type` whose shift lies within `tolerance` of `delta`.
    ///
    /// Among several candidates the lowest shift wins, earlier position breaking
    /// ties. That is the first candidate in finalized order, so the choice does
    /// not depend on whether the list was sorted yet.
    pub fn find_real(&self, atom_type: Element, delta: f64, tolerance: f64) -> Option<usize> {
        self.correlations
            .iter()
            .enumerate()
            .filter(|(_, c)| c.atom_type == atom_type)
            .filter_map(|(index, c)| c.delta().map(|d| (index, d)))
            .filter(|&(_, d)| (d - delta).abs() <= tolerance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
    }

    /// Creates a real correlation for an unmatched observation.
    ///
    /// The first empty pseudo correlation of the same atom type is replaced in
    /// place; without one, the new correlation is appended. Returns its position.
    pub fn insert_real(
        &mut self,
        atom_type: Element,
        experiment_type: ExperimentType,
        experiment_id: &str,
        axis: Option<Axis>,
        signal: CorrelationSignal,
    ) -> usize {
        let id = self.allocate_id();
        let correlation =
            Correlation::real(id, atom_type, experiment_type, experiment_id, axis, signal);

        match self
            .correlations
            .iter()
            .position(|c| c.atom_type == atom_type && c.is_empty_pseudo())
        {
            Some(index) => {
                self.correlations[index] = correlation;
                index
            }
            None => {
                self.correlations.push(correlation);
                self.correlations.len() - 1
            }
        }
    }

    /// Appends an empty pseudo correlation and returns its position.
    pub fn push_pseudo(&mut self, atom_type: Element) -> usize {
        let id = self.allocate_id();
        self.correlations.push(Correlation::pseudo(id, atom_type));
        self.correlations.len() - 1
    }

    /// Removes the correlations at `positions`, remapping stored indices.
    pub fn remove(&mut self, positions: &[usize]) {
        if positions.is_empty() {
            return;
        }

        let mut old_to_new = Vec::with_capacity(self.correlations.len());
        let mut next = 0usize;
        for i in 0..self.correlations.len() {
            if positions.contains(&i) {
                old_to_new.push(None);
            } else {
                old_to_new.push(Some(next));
                next += 1;
            }
        }

        let mut position = 0usize;
        self.correlations.retain(|_| {
            let keep = old_to_new[position].is_some();
            position += 1;
            keep
        });
        self.remap(&old_to_new);
    }

    /// Reorders correlations so that the new position `i` holds old position `order[i]`.
    ///
    /// `order` must be a permutation of `0..len`.
    pub fn permute(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.correlations.len());

        let mut old_to_new = vec![None; self.correlations.len()];
        for (new, &old) in order.iter().enumerate() {
            old_to_new[old] = Some(new);
        }

        let mut slots: Vec<Option<Correlation>> =
            std::mem::take(&mut self.correlations).into_iter().map(Some).collect();
        self.correlations = order.iter().filter_map(|&old| slots[old].take()).collect();
        self.remap(&old_to_new);
    }

    fn remap(&mut self, old_to_new: &[Option<usize>]) {
        let map = |indices: &mut Vec<usize>| {
            *indices = indices
                .iter()
                .filter_map(|&i| old_to_new.get(i).copied().flatten())
                .collect();
            indices.sort_unstable();
        };

        for correlation in &mut self.correlations {
            for link in &mut correlation.links {
                map(&mut link.matches);
            }
            for indices in correlation.attachments.values_mut() {
                map(indices);
            }
            correlation.attachments.retain(|_, indices| !indices.is_empty());
        }
    }

    /// Final list plus the id high-water mark.
    pub fn into_parts(self) -> (Vec<Correlation>, u64) {
        (self.correlations, self.next_id)
    }
}

fn next_free_id(correlations: &[Correlation]) -> u64 {
    correlations
        .iter()
        .map(|c| c.id + 1)
        .max()
        .unwrap_or(1)
}
