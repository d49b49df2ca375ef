//! Spectral signal observations consumed by the correlation engine.
//!
//! These mirror what range/zone detection produces upstream: 1D signals per
//! atom type, 2D signals per experiment type, and edited (DEPT-style) signals
//! per flip angle. The engine never mutates them.

use super::types::{Axis, EditingKind, Element, ExperimentType, Sign};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single observed shift of a 1D signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak1D {
    pub id: String,
    pub delta: f64,
}

/// One signal from a 1D experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal1D {
    #[serde(rename = "experimentID", alias = "experimentId")]
    pub experiment_id: String,
    pub signal: Peak1D,
}

/// Shift (and optional phase) on one axis of a 2D signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisShift {
    pub delta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<Sign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak2D {
    pub id: String,
    pub x: AxisShift,
    pub y: AxisShift,
}

impl Peak2D {
    pub fn axis(&self, axis: Axis) -> &AxisShift {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

/// One cross peak from a 2D experiment. `atom_type` is `[x, y]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal2D {
    #[serde(rename = "experimentID", alias = "experimentId")]
    pub experiment_id: String,
    pub atom_type: [Element; 2],
    pub signal: Peak2D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedPeak {
    pub delta: f64,
    pub sign: Sign,
}

/// One signal from a spectral editing experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingSignal {
    pub atom_type: Element,
    pub signal: EditedPeak,
}

impl EditingSignal {
    pub fn new(atom_type: Element, delta: f64, sign: Sign) -> Self {
        Self {
            atom_type,
            signal: EditedPeak { delta, sign },
        }
    }
}

pub type Signals1D = BTreeMap<Element, Vec<Signal1D>>;
pub type Signals2D = BTreeMap<ExperimentType, Vec<Signal2D>>;
pub type EditingSignals = BTreeMap<EditingKind, Vec<EditingSignal>>;

/// Full signal snapshot the engine rebuilds from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSnapshot {
    #[serde(default, rename = "signals1D")]
    pub signals_1d: Signals1D,
    #[serde(default, rename = "signals2D")]
    pub signals_2d: Signals2D,
    #[serde(default)]
    pub editing: EditingSignals,
}

impl SignalSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_1d(&mut self, atom_type: Element, experiment_id: &str, id: &str, delta: f64) {
        self.signals_1d.entry(atom_type).or_default().push(Signal1D {
            experiment_id: experiment_id.to_string(),
            signal: Peak1D {
                id: id.to_string(),
                delta,
            },
        });
    }

    pub fn add_2d(&mut self, experiment_type: ExperimentType, signal: Signal2D) {
        self.signals_2d
            .entry(experiment_type)
            .or_default()
            .push(signal);
    }

    pub fn add_editing(&mut self, kind: EditingKind, signal: EditingSignal) {
        self.editing.entry(kind).or_default().push(signal);
    }

    /// Looks up the signal a real correlation was created from and returns its
    /// current shift, or `None` once the signal has been deleted.
    pub fn find_origin(
        &self,
        experiment_type: ExperimentType,
        experiment_id: &str,
        signal_id: &str,
        atom_type: Element,
        axis: Option<Axis>,
    ) -> Option<AxisShift> {
        if experiment_type == ExperimentType::OneD {
            return self
                .signals_1d
                .get(&atom_type)?
                .iter()
                .find(|s| s.experiment_id == experiment_id && s.signal.id == signal_id)
                .map(|s| AxisShift {
                    delta: s.signal.delta,
                    sign: None,
                });
        }

        let signal = self
            .signals_2d
            .get(&experiment_type)?
            .iter()
            .find(|s| s.experiment_id == experiment_id && s.signal.id == signal_id)?;
        let axis = match axis {
            Some(axis) => axis,
            None => [Axis::X, Axis::Y]
                .into_iter()
                .find(|axis| signal.atom_type[axis.position()] == atom_type)?,
        };
        (signal.atom_type[axis.position()] == atom_type).then(|| signal.signal.axis(axis).clone())
    }

    /// Editing evidence for proton-count inference.
    ///
    /// When no editing experiment contributed any signal, signed cross peaks of
    /// one-bond 2D experiments (edited HSQC/HMQC) stand in as 135° evidence for
    /// their `y` atom type.
    pub fn editing_evidence(&self) -> EditingSignals {
        if self.editing.values().any(|signals| !signals.is_empty()) {
            return self.editing.clone();
        }

        let edited: Vec<EditingSignal> = self
            .signals_2d
            .iter()
            .filter(|(experiment_type, _)| experiment_type.is_one_bond())
            .flat_map(|(_, signals)| signals)
            .filter_map(|s| {
                let sign = s.signal.y.sign?;
                Some(EditingSignal::new(s.atom_type[1], s.signal.y.delta, sign))
            })
            .collect();

        let mut evidence = EditingSignals::new();
        if !edited.is_empty() {
            evidence.insert(EditingKind::Dept135, edited);
        }
        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsqc(id: &str, h: f64, c: f64, sign: Option<Sign>) -> Signal2D {
        Signal2D {
            experiment_id: "hsqc-1".to_string(),
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
    fn editing_evidence_prefers_editing_experiments() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_2d(
            ExperimentType::Hsqc,
            hsqc("z1", 0.9, 14.0, Some(Sign::Negative)),
        );
        snapshot.add_editing(
            EditingKind::Dept90,
            EditingSignal::new(Element::C, 30.0, Sign::Positive),
        );

        let evidence = snapshot.editing_evidence();
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[&EditingKind::Dept90].len(), 1);
    }

    #[test]
    fn editing_evidence_falls_back_to_edited_hsqc() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_2d(
            ExperimentType::Hsqc,
            hsqc("z1", 0.9, 14.0, Some(Sign::Negative)),
        );
        snapshot.add_2d(ExperimentType::Hsqc, hsqc("z2", 1.2, 22.0, None));
        snapshot.add_2d(
            ExperimentType::Hmbc,
            hsqc("z3", 1.2, 40.0, Some(Sign::Positive)),
        );

        let evidence = snapshot.editing_evidence();
        let dept135 = &evidence[&EditingKind::Dept135];
        assert_eq!(dept135.len(), 1);
        assert_eq!(dept135[0].atom_type, Element::C);
        assert_eq!(dept135[0].signal.delta, 14.0);
        assert_eq!(dept135[0].signal.sign, Sign::Negative);
        assert!(!evidence.contains_key(&EditingKind::Dept90));
    }

    #[test]
    fn editing_evidence_is_empty_without_signed_data() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_2d(ExperimentType::Hsqc, hsqc("z1", 0.9, 14.0, None));
        assert!(snapshot.editing_evidence().is_empty());
    }

    #[test]
    fn find_origin_locates_1d_and_2d_signals() {
        let mut snapshot = SignalSnapshot::new();
        snapshot.add_1d(Element::C, "c13", "r1", 14.1);
        snapshot.add_2d(
            ExperimentType::Hsqc,
            hsqc("z1", 0.9, 14.0, Some(Sign::Positive)),
        );

        let one_d = snapshot
            .find_origin(ExperimentType::OneD, "c13", "r1", Element::C, None)
            .unwrap();
        assert_eq!(one_d.delta, 14.1);

        let x = snapshot
            .find_origin(ExperimentType::Hsqc, "hsqc-1", "z1", Element::H, Some(Axis::X))
            .unwrap();
        assert_eq!(x.delta, 0.9);
        let y = snapshot
            .find_origin(ExperimentType::Hsqc, "hsqc-1", "z1", Element::C, None)
            .unwrap();
        assert_eq!(y.sign, Some(Sign::Positive));

        assert!(
            snapshot
                .find_origin(ExperimentType::OneD, "c13", "gone", Element::C, None)
                .is_none()
        );
        assert!(
            snapshot
                .find_origin(ExperimentType::Hsqc, "hsqc-1", "z1", Element::C, Some(Axis::X))
                .is_none()
        );
    }

    #[test]
    fn snapshot_deserializes_from_json() {
        let json = r#"{
            "signals1D": { "C": [ { "experimentId": "c13", "signal": { "id": "r1", "delta": 14.0 } } ] },
            "signals2D": { "hsqc": [ {
                "experimentId": "e2", "atomType": ["H", "C"],
                "signal": { "id": "z1", "x": { "delta": 0.9 }, "y": { "delta": 14.0, "sign": 1 } }
            } ] },
            "editing": { "135": [ { "atomType": "C", "signal": { "delta": 14.0, "sign": 1 } } ] }
        }"#;
        let snapshot: SignalSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.signals_1d[&Element::C].len(), 1);
        assert_eq!(
            snapshot.signals_2d[&ExperimentType::Hsqc][0].signal.y.sign,
            Some(Sign::Positive)
        );
        assert_eq!(snapshot.editing[&EditingKind::Dept135].len(), 1);
    }
}
