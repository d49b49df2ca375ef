use nmr_correlate::edit;
use nmr_correlate::{
    AxisShift, Correlation, CorrelationConfig, EditingKind, EditingSignal, Element,
    ExperimentType, Hybridization, Peak2D, ProtonsCount, Rebuild, Sign, Signal2D, SignalSnapshot,
    rebuild,
};

fn cross_peak(
    experiment_id: &str,
    id: &str,
    atom_type: [Element; 2],
    x: f64,
    y: f64,
    sign: Option<Sign>,
) -> Signal2D {
    Signal2D {
        experiment_id: experiment_id.to_string(),
        atom_type,
        signal: Peak2D {
            id: id.to_string(),
            x: AxisShift {
                delta: x,
                sign: None,
            },
            y: AxisShift { delta: y, sign },
        },
    }
}

const HC: [Element; 2] = [Element::H, Element::C];
const HH: [Element; 2] = [Element::H, Element::H];

/// Isopropanol, (CH3)2CHOH: one methyl signal standing for two carbons.
fn isopropanol() -> SignalSnapshot {
    let mut s = SignalSnapshot::new();
    s.add_1d(Element::C, "13c", "r1", 25.0);
    s.add_1d(Element::C, "13c", "r2", 64.0);
    s.add_2d(
        ExperimentType::Hsqc,
        cross_peak("hsqc", "z1", HC, 1.2, 25.0, None),
    );
    s.add_2d(
        ExperimentType::Hsqc,
        cross_peak("hsqc", "z2", HC, 4.0, 64.0, None),
    );
    s.add_2d(
        ExperimentType::Hmbc,
        cross_peak("hmbc", "m1", HC, 1.2, 64.0, None),
    );
    s.add_2d(
        ExperimentType::Cosy,
        cross_peak("cosy", "c1", HH, 1.2, 4.0, None),
    );
    s.add_editing(
        EditingKind::Dept90,
        EditingSignal::new(Element::C, 64.0, Sign::Positive),
    );
    s.add_editing(
        EditingKind::Dept135,
        EditingSignal::new(Element::C, 25.0, Sign::Positive),
    );
    s.add_editing(
        EditingKind::Dept135,
        EditingSignal::new(Element::C, 64.0, Sign::Positive),
    );
    s
}

fn config(formula: &str) -> CorrelationConfig {
    CorrelationConfig::with_formula(formula)
}

fn at_shift(list: &[Correlation], atom_type: Element, delta: f64) -> usize {
    list.iter()
        .position(|c| c.atom_type == atom_type && c.delta() == Some(delta))
        .unwrap_or_else(|| panic!("no {atom_type} correlation at {delta}"))
}

fn pseudo_count(list: &[Correlation], atom_type: Element) -> usize {
    list.iter()
        .filter(|c| c.atom_type == atom_type && c.is_pseudo())
        .count()
}

/// Builds isopropanol with the methyl carbon marked as two equivalent atoms.
fn settled_isopropanol() -> (SignalSnapshot, CorrelationConfig, Rebuild) {
    let snapshot = isopropanol();
    let config = config("C3H8O");
    let mut first = rebuild(&snapshot, &Rebuild::default(), &config);

    let methyl = at_shift(&first.correlations, Element::C, 25.0);
    edit::set_equivalences(&mut first.correlations, methyl, 1.0).unwrap();

    let settled = rebuild(&snapshot, &first, &config);
    (snapshot, config, settled)
}

#[test]
fn rebuild_is_deterministic() {
    let snapshot = isopropanol();
    let config = config("C3H8O");

    let a = rebuild(&snapshot, &Rebuild::default(), &config);
    let b = rebuild(&snapshot, &Rebuild::default(), &config);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn rebuild_is_idempotent_on_its_own_output() {
    let (snapshot, config, settled) = settled_isopropanol();
    let again = rebuild(&snapshot, &settled, &config);
    assert_eq!(again, settled);

    let first = rebuild(&snapshot, &Rebuild::default(), &config);
    let first_again = rebuild(&snapshot, &first, &config);
    assert_eq!(first_again, first);
}

#[test]
fn atom_counts_are_conserved() {
    let (_, config, settled) = settled_isopropanol();
    let formula = config.formula();

    for element in formula.elements() {
        let real: f64 = settled
            .correlations
            .iter()
            .filter(|c| c.atom_type == element && !c.is_pseudo())
            .map(|c| 1.0 + c.equivalences)
            .sum();
        let pseudo = pseudo_count(&settled.correlations, element) as f64;
        assert_eq!(real + pseudo, formula.count(element) as f64, "{element}");
    }
}

#[test]
fn links_are_symmetric() {
    let (_, _, settled) = settled_isopropanol();
    let list = &settled.correlations;

    let mut checked = 0;
    for (i, c) in list.iter().enumerate() {
        for link in &c.links {
            assert!(!link.matches.is_empty());
            for &m in &link.matches {
                let back = list[m]
                    .links
                    .iter()
                    .find(|l| link.pairs_with(l, link.axis.opposite()))
                    .expect("matched correlation has the other half of the signal");
                assert!(back.matches.contains(&i));
                checked += 1;
            }
        }
    }
    assert_eq!(checked, 8);
}

#[test]
fn infers_multiplicity_attachments_and_equivalences() {
    let (_, _, settled) = settled_isopropanol();
    let list = &settled.correlations;

    let methyl = &list[at_shift(list, Element::C, 25.0)];
    assert_eq!(methyl.protons_count, ProtonsCount::Resolved(3));
    assert_eq!(methyl.hybridization, Some(Hybridization::SP3));

    let methine = &list[at_shift(list, Element::C, 64.0)];
    assert_eq!(methine.protons_count, ProtonsCount::Resolved(1));

    let methyl_h = at_shift(list, Element::H, 1.2);
    assert_eq!(methyl.attachments[&Element::H], vec![methyl_h]);
    assert_eq!(list[methyl_h].equivalences, 5.0);
    assert_eq!(list[at_shift(list, Element::H, 4.0)].equivalences, 0.0);

    assert_eq!(pseudo_count(list, Element::C), 0);
    assert_eq!(pseudo_count(list, Element::H), 1);
    assert_eq!(pseudo_count(list, Element::O), 1);

    let labels: Vec<&str> = list.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["C1", "C2", "H1", "H2", "H3", "O1"]);
}

#[test]
fn settled_state_reports_the_missing_hydroxyl() {
    let (_, _, settled) = settled_isopropanol();
    let state = &settled.state;

    assert!(state[&Element::C].complete);
    assert!(state[&Element::C].error.is_none());

    let hydrogen = &state[&Element::H];
    assert_eq!((hydrogen.current, hydrogen.total), (7.0, 8));
    assert!(hydrogen.error.as_ref().unwrap().incomplete);

    let oxygen = &state[&Element::O];
    assert_eq!((oxygen.current, oxygen.total), (0.0, 1));
}

#[test]
fn manual_proton_count_survives_conflicting_evidence() {
    let (snapshot, config, mut settled) = settled_isopropanol();
    let methine = at_shift(&settled.correlations, Element::C, 64.0);
    edit::set_protons_count(&mut settled.correlations, methine, [0]).unwrap();

    let result = rebuild(&snapshot, &settled, &config);
    let methine = &result.correlations[at_shift(&result.correlations, Element::C, 64.0)];
    assert_eq!(methine.protons_count, ProtonsCount::Resolved(0));
    assert!(methine.edited.protons_count);
}

#[test]
fn deleted_signal_drops_its_correlation() {
    let (_, config, settled) = settled_isopropanol();

    let mut snapshot = isopropanol();
    if let Some(hsqc) = snapshot.signals_2d.get_mut(&ExperimentType::Hsqc) {
        hsqc.retain(|s| s.signal.id != "z2");
    }
    if let Some(cosy) = snapshot.signals_2d.get_mut(&ExperimentType::Cosy) {
        cosy.clear();
    }

    let result = rebuild(&snapshot, &settled, &config);
    let list = &result.correlations;
    assert!(list.iter().all(|c| c.delta() != Some(4.0)));

    let methine = &list[at_shift(list, Element::C, 64.0)];
    assert!(methine.attachments.is_empty());
    assert_eq!(methine.links.len(), 1);
    assert_eq!(methine.links[0].experiment_type, ExperimentType::Hmbc);
}

#[test]
fn manual_link_defines_an_attachment() {
    let (snapshot, config, mut settled) = settled_isopropanol();
    let list = &mut settled.correlations;

    let oxygen = list
        .iter()
        .position(|c| c.atom_type == Element::O)
        .unwrap();
    let proton = list
        .iter()
        .position(|c| c.atom_type == Element::H && c.is_pseudo())
        .unwrap();
    let signal_id =
        edit::add_pseudo_link(list, oxygen, proton, ExperimentType::Hsqc).unwrap();

    let mut result = rebuild(&snapshot, &settled, &config);
    let list = &result.correlations;
    let oxygen = list.iter().position(|c| c.atom_type == Element::O).unwrap();
    let proton = list
        .iter()
        .position(|c| c.atom_type == Element::H && c.is_pseudo())
        .unwrap();

    assert_eq!(list[oxygen].attachments[&Element::H], vec![proton]);
    assert_eq!(list[proton].attachments[&Element::O], vec![oxygen]);
    assert!(list[proton].links.iter().all(|l| l.pseudo && l.signal_id == signal_id));

    assert_eq!(
        edit::remove_pseudo_link(&mut result.correlations, oxygen, &signal_id).unwrap(),
        2
    );
    let cleared = rebuild(&snapshot, &result, &config);
    assert_eq!(cleared, settled_isopropanol().2);
}

#[test]
fn ethane_with_one_carbon_signal() {
    let mut snapshot = SignalSnapshot::new();
    snapshot.add_1d(Element::C, "13c", "r1", 14.0);

    let result = rebuild(&snapshot, &Rebuild::default(), &config("C2H6"));
    let carbons: Vec<&Correlation> = result
        .correlations
        .iter()
        .filter(|c| c.atom_type == Element::C)
        .collect();
    assert_eq!(carbons.len(), 2);
    assert!(!carbons[0].is_pseudo());
    assert_eq!(carbons[0].delta(), Some(14.0));
    assert!(carbons[0].protons_count.is_unknown());
    assert!(carbons[1].is_pseudo());

    let carbon = &result.state[&Element::C];
    assert_eq!(carbon.current, 1.0);
    assert_eq!(carbon.total, 2);
    assert!(!carbon.complete);
    let error = carbon.error.as_ref().unwrap();
    assert!(error.incomplete);
    assert!(error.not_attached.is_empty());
    assert!(error.ambiguous_attachment.is_empty());
    assert!(error.out_of_limit.is_empty());
}

#[test]
fn positive_dept135_without_dept90_stays_ambiguous() {
    let mut snapshot = SignalSnapshot::new();
    snapshot.add_1d(Element::C, "13c", "r1", 14.0);
    snapshot.add_2d(
        ExperimentType::Hsqc,
        cross_peak("hsqc", "z1", HC, 0.9, 14.0, Some(Sign::Positive)),
    );

    let config = config("C2H6");
    let result = rebuild(&snapshot, &Rebuild::default(), &config);
    let list = &result.correlations;
    let carbon = &list[at_shift(list, Element::C, 14.0)];
    assert_eq!(carbon.protons_count, ProtonsCount::Ambiguous(vec![1, 3]));
    assert_eq!(carbon.hybridization, None);
    assert_eq!(
        carbon.attachments[&Element::H],
        vec![at_shift(list, Element::H, 0.9)]
    );

    snapshot.add_editing(
        EditingKind::Dept135,
        EditingSignal::new(Element::C, 14.0, Sign::Positive),
    );
    let explicit = rebuild(&snapshot, &Rebuild::default(), &config);
    let carbon = &explicit.correlations[at_shift(&explicit.correlations, Element::C, 14.0)];
    assert_eq!(carbon.protons_count, ProtonsCount::Ambiguous(vec![1, 3]));
}

#[test]
fn equivalent_carbons_make_placeholders_redundant() {
    let mut snapshot = SignalSnapshot::new();
    snapshot.add_1d(Element::C, "13c", "r1", 14.0);
    snapshot.add_1d(Element::C, "13c", "r2", 30.0);
    let config = config("C6");

    let mut first = rebuild(&snapshot, &Rebuild::default(), &config);
    assert_eq!(pseudo_count(&first.correlations, Element::C), 4);

    for delta in [14.0, 30.0] {
        let index = at_shift(&first.correlations, Element::C, delta);
        edit::set_equivalences(&mut first.correlations, index, 2.0).unwrap();
    }

    let result = rebuild(&snapshot, &first, &config);
    assert_eq!(result.correlations.len(), 2);
    assert_eq!(pseudo_count(&result.correlations, Element::C), 0);
    assert!(result.state[&Element::C].complete);
}

#[test]
fn ids_are_never_reused() {
    let mut snapshot = SignalSnapshot::new();
    snapshot.add_1d(Element::C, "13c", "r1", 14.0);
    snapshot.add_1d(Element::C, "13c", "r2", 30.0);
    let config = CorrelationConfig::default();

    let first = rebuild(&snapshot, &Rebuild::default(), &config);
    let ids: Vec<u64> = first.correlations.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);

    snapshot.signals_1d.get_mut(&Element::C).unwrap().pop();
    let second = rebuild(&snapshot, &first, &config);
    assert_eq!(second.correlations.len(), 1);
    assert_eq!(second.next_id, 3);

    snapshot.add_1d(Element::C, "13c", "r9", 80.0);
    let third = rebuild(&snapshot, &second, &config);
    let ids: Vec<(u64, Option<f64>)> = third
        .correlations
        .iter()
        .map(|c| (c.id, c.delta()))
        .collect();
    assert_eq!(ids, vec![(1, Some(14.0)), (3, Some(80.0))]);
}

#[test]
fn placeholders_take_fresh_ids() {
    let mut snapshot = SignalSnapshot::new();
    snapshot.add_1d(Element::C, "13c", "r1", 14.0);
    snapshot.add_1d(Element::C, "13c", "r2", 30.0);
    let config = config("C2");

    let first = rebuild(&snapshot, &Rebuild::default(), &config);
    snapshot.signals_1d.get_mut(&Element::C).unwrap().pop();
    let second = rebuild(&snapshot, &first, &config);

    let placeholder = second
        .correlations
        .iter()
        .find(|c| c.is_pseudo())
        .unwrap();
    assert_eq!(placeholder.id, 3);
}

#[test]
fn overlapping_windows_link_the_same_proton_every_time() {
    let mut snapshot = SignalSnapshot::new();
    snapshot.add_1d(Element::H, "1h", "r1", 1.03);
    snapshot.add_1d(Element::H, "1h", "r2", 1.00);
    snapshot.add_2d(
        ExperimentType::Hsqc,
        cross_peak("hsqc", "z1", HC, 1.015, 14.0, None),
    );
    let config = CorrelationConfig::default();

    let first = rebuild(&snapshot, &Rebuild::default(), &config);
    let linked: Vec<Option<f64>> = first
        .correlations
        .iter()
        .filter(|c| c.atom_type == Element::H && !c.links.is_empty())
        .map(Correlation::delta)
        .collect();
    assert_eq!(linked, vec![Some(1.00)]);

    let second = rebuild(&snapshot, &first, &config);
    assert_eq!(second, first);
}
