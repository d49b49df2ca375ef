use super::config::Tolerance;
use super::context::BuildContext;
use crate::model::correlation::{CorrelationSignal, Link};
use crate::model::signal::{SignalSnapshot, Signals1D, Signals2D};
use crate::model::types::{Axis, ExperimentType};

/// Folds every 1D and 2D observation of `snapshot` into the correlation list.
///
/// An observation within tolerance of an existing real correlation of the same
/// atom type is already represented; when windows overlap, the candidate with
/// the lowest shift wins. Otherwise a new correlation is created (see
/// [`BuildContext::insert_real`]). Each axis of a 2D signal additionally
/// records a [`Link`] on the correlation it landed on.
pub fn match_signals(ctx: &mut BuildContext, snapshot: &SignalSnapshot, tolerance: &Tolerance) {
    let before = ctx.len();
    let created_1d = match_1d(ctx, &snapshot.signals_1d, tolerance);
    let (created_2d, linked) = match_2d(ctx, &snapshot.signals_2d, tolerance);

    tracing::debug!(
        before,
        after = ctx.len(),
        created_1d,
        created_2d,
        linked,
        "matched signals against correlations"
    );
}

fn match_1d(ctx: &mut BuildContext, signals: &Signals1D, tolerance: &Tolerance) -> usize {
    let mut created = 0;
    for (&atom_type, observations) in signals {
        let window = tolerance.get(atom_type);
        for observation in observations {
            if ctx
                .find_real(atom_type, observation.signal.delta, window)
                .is_some()
            {
                continue;
            }
            ctx.insert_real(
                atom_type,
                ExperimentType::OneD,
                &observation.experiment_id,
                None,
                CorrelationSignal {
                    id: observation.signal.id.clone(),
                    delta: observation.signal.delta,
                    sign: None,
                },
            );
            created += 1;
        }
    }
    created
}

fn match_2d(ctx: &mut BuildContext, signals: &Signals2D, tolerance: &Tolerance) -> (usize, usize) {
    let mut created = 0;
    let mut linked = 0;

    for (&experiment_type, observations) in signals {
        for observation in observations {
            for axis in [Axis::X, Axis::Y] {
                let atom_type = observation.atom_type[axis.position()];
                let shift = observation.signal.axis(axis);

                let index = match ctx.find_real(atom_type, shift.delta, tolerance.get(atom_type)) {
                    Some(index) => index,
                    None => {
                        created += 1;
                        ctx.insert_real(
                            atom_type,
                            experiment_type,
                            &observation.experiment_id,
                            Some(axis),
                            CorrelationSignal {
                                id: observation.signal.id.clone(),
                                delta: shift.delta,
                                sign: shift.sign,
                            },
                        )
                    }
                };

                let link = Link {
                    experiment_type,
                    experiment_id: observation.experiment_id.clone(),
                    signal_id: observation.signal.id.clone(),
                    axis,
                    atom_type: observation.atom_type,
                    signal: shift.clone(),
                    matches: Vec::new(),
                    pseudo: false,
                };
                if ctx.correlations[index].add_link(link) {
                    linked += 1;
                }
            }
        }
    }

    (created, linked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::correlation::Correlation;
    use crate::model::signal::{AxisShift, Peak2D, Signal2D};
    use crate::model::types::{Element, Sign};

    fn hsqc(id: &str, h: f64, c: f64, sign: Option<Sign>) -> Signal2D {
        Signal2D {
            experiment_id: "hsqc".to_string(),
            atom_type: [Element::H, Element::C],
            signal: Peak2D {
                id: id.to_string(),
                x: AxisShift {
                    delta: h,
                    sign: None,
                },
                y: AxisShift { delta: c, sign },
            },
        }
    }

    #[test]
    fn creates_one_correlation_per_distinct_1d_signal() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_1d(Element::C, "c13", "r1", 14.0);
        snapshot.add_1d(Element::C, "c13", "r2", 14.1);
        snapshot.add_1d(Element::C, "c13", "r3", 30.0);

        let mut ctx = BuildContext::default();
        match_signals(&mut ctx, &snapshot, &Tolerance::default());

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.correlations[0].delta(), Some(14.0));
        assert_eq!(ctx.correlations[1].delta(), Some(30.0));
    }

    #[test]
    fn replaces_empty_pseudo_in_place() {
        let mut ctx = BuildContext::from_correlations(vec![
            Correlation::pseudo(1, Element::C),
            Correlation::pseudo(2, Element::C),
        ]);
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_1d(Element::C, "c13", "r1", 14.0);

        match_signals(&mut ctx, &snapshot, &Tolerance::default());

        assert_eq!(ctx.len(), 2);
        assert!(!ctx.correlations[0].is_pseudo());
        assert_eq!(ctx.correlations[0].id, 3);
        assert!(ctx.correlations[1].is_pseudo());
    }

    #[test]
    fn links_both_axes_of_2d_signal() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_1d(Element::C, "c13", "r1", 14.0);
        snapshot.add_2d(
            ExperimentType::Hsqc,
            hsqc("z1", 0.9, 14.1, Some(Sign::Positive)),
        );

        let mut ctx = BuildContext::default();
        match_signals(&mut ctx, &snapshot, &Tolerance::default());

        assert_eq!(ctx.len(), 2);
        let carbon = &ctx.correlations[0];
        assert_eq!(carbon.experiment_type(), Some(ExperimentType::OneD));
        assert_eq!(carbon.links.len(), 1);
        assert_eq!(carbon.links[0].axis, Axis::Y);

        let proton = &ctx.correlations[1];
        assert_eq!(proton.atom_type, Element::H);
        assert_eq!(proton.experiment_type(), Some(ExperimentType::Hsqc));
        assert_eq!(proton.delta(), Some(0.9));
        assert_eq!(proton.links[0].axis, Axis::X);
    }

    #[test]
    fn carbon_from_2d_keeps_sign() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_2d(
            ExperimentType::Hsqc,
            hsqc("z1", 0.9, 14.0, Some(Sign::Negative)),
        );

        let mut ctx = BuildContext::default();
        match_signals(&mut ctx, &snapshot, &Tolerance::default());

        let carbon = ctx
            .correlations
            .iter()
            .find(|c| c.atom_type == Element::C)
            .unwrap();
        assert_eq!(carbon.signal().unwrap().sign, Some(Sign::Negative));
    }

    #[test]
    fn rematching_does_not_duplicate_links() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_2d(ExperimentType::Hsqc, hsqc("z1", 0.9, 14.0, None));

        let mut ctx = BuildContext::default();
        match_signals(&mut ctx, &snapshot, &Tolerance::default());
        match_signals(&mut ctx, &snapshot, &Tolerance::default());

        assert_eq!(ctx.len(), 2);
        assert!(ctx.correlations.iter().all(|c| c.links.len() == 1));
    }

    #[test]
    fn zero_tolerance_requires_exact_shift() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_1d(Element::C, "c13", "r1", 14.0);
        snapshot.add_1d(Element::C, "c13", "r2", 14.01);

        let mut ctx = BuildContext::default();
        match_signals(&mut ctx, &snapshot, &Tolerance::exact());
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn overlapping_windows_pick_the_lowest_shift() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_1d(Element::H, "h1", "r1", 1.03);
        snapshot.add_1d(Element::H, "h1", "r2", 1.00);
        snapshot.add_2d(ExperimentType::Hsqc, hsqc("z1", 1.015, 14.0, None));

        let mut ctx = BuildContext::default();
        match_signals(&mut ctx, &snapshot, &Tolerance::default());

        assert_eq!(ctx.len(), 3);
        assert!(ctx.correlations[0].links.is_empty());
        assert_eq!(ctx.correlations[1].delta(), Some(1.00));
        assert_eq!(ctx.correlations[1].links.len(), 1);
    }
}
