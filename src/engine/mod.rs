mod attachments;
mod config;
mod context;
mod diagnostics;
pub mod edit;
mod error;
mod links;
mod matcher;
mod ordering;
mod protons;
mod pseudo;

pub use config::{CorrelationConfig, Tolerance};
pub use diagnostics::build_state;
pub use error::Error;

use context::BuildContext;
use crate::model::correlation::Correlation;
use crate::model::signal::SignalSnapshot;
use crate::model::state::State;
use serde::{Deserialize, Serialize};

/// Result of one rebuild: the finalized correlation list and its diagnostics.
///
/// A `Rebuild` is also the input of the next rebuild, so that the id high-water
/// mark travels with the list. Start a new lineage from [`Rebuild::default`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rebuild {
    pub correlations: Vec<Correlation>,
    #[serde(default)]
    pub state: State,
    /// Next correlation id to hand out; ids below it were used in this lineage.
    #[serde(default, rename = "nextID", alias = "nextId")]
    pub next_id: u64,
}

impl Rebuild {
    /// Wraps a bare correlation list, e.g. one edited outside this crate.
    ///
    /// The high-water mark is recovered from the largest id in `correlations`,
    /// so ids of entries removed before the list was saved may be handed out again.
    pub fn from_correlations(correlations: Vec<Correlation>) -> Self {
        Self {
            correlations,
            ..Self::default()
        }
    }
}

/// Re-derives the correlation list from the current signals.
///
/// `previous` is the result of the last rebuild (or [`Rebuild::default`]);
/// only its pseudo correlations, manual links, manual edits and id high-water
/// mark influence the result, everything else is recomputed from `snapshot`.
/// The function is pure and never fails: incomplete or ambiguous data shows up
/// in [`Rebuild::state`].
pub fn rebuild(snapshot: &SignalSnapshot, previous: &Rebuild, config: &CorrelationConfig) -> Rebuild {
    let formula = config.formula();
    let tolerance = &config.tolerance;

    let mut ctx = BuildContext::seed(&previous.correlations, previous.next_id, snapshot);

    matcher::match_signals(&mut ctx, snapshot, tolerance);
    links::resolve_links(&mut ctx.correlations);
    attachments::infer_attachments(&mut ctx.correlations);
    protons::infer_protons_counts(&mut ctx.correlations, &snapshot.editing_evidence(), tolerance);
    attachments::distribute_equivalences(&mut ctx.correlations);
    pseudo::reconcile(&mut ctx, &formula);
    ordering::finalize(&mut ctx);

    let (correlations, next_id) = ctx.into_parts();
    let state = build_state(&correlations, &formula);

    tracing::debug!(
        correlations = correlations.len(),
        next_id,
        formula = %formula,
        "rebuilt correlations"
    );

    Rebuild {
        correlations,
        state,
        next_id,
    }
}
