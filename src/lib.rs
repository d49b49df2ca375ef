//! A deterministic engine that turns NMR signal observations into a
//! cross-experiment structural-assignment table.
//!
//! Signals from 1D, 2D and spectral editing (DEPT-style) experiments are matched
//! against candidate atoms of a target molecule. The engine links correlations
//! observed in the same 2D signal, infers heavy-atom/proton attachments and
//! proton multiplicities, pads the table with placeholders until it matches the
//! molecular formula, and reports what is still incomplete or ambiguous.
//!
//! # Features
//!
//! - **Signal matching** — 1D and 2D observations are folded into correlations
//!   within per-atom-type shift tolerances
//! - **Link resolution** — symmetric cross-references between correlations
//!   seen in the same 2D cross peak
//! - **Attachment & multiplicity inference** — one-bond attachments from
//!   HSQC/HMQC, proton counts from DEPT-90/135 or edited HSQC phases, and
//!   equivalence sharing among methyl/methylene protons
//! - **Formula reconciliation** — placeholder ("pseudo") correlations track
//!   the atom counts of the target formula
//! - **Diagnostics** — per-atom-type progress with incompleteness, attachment
//!   and overflow errors
//! - **Manual edits** — overridden values survive every rebuild
//!
//! # Quick Start
//!
//! The main entry point is [`rebuild`], which takes the current
//! [`SignalSnapshot`], the [`Rebuild`] returned by the previous call, and a
//! [`CorrelationConfig`]:
//!
//! ```
//! use nmr_correlate::{CorrelationConfig, Element, Rebuild, SignalSnapshot, rebuild};
//!
//! // Ethane, with a single carbon signal observed so far
//! let mut snapshot = SignalSnapshot::new();
//! snapshot.add_1d(Element::C, "13C", "r1", 14.0);
//!
//! let config = CorrelationConfig::with_formula("C2H6");
//! let result = rebuild(&snapshot, &Rebuild::default(), &config);
//!
//! // One real carbon, one placeholder carbon and six placeholder protons
//! assert_eq!(result.correlations.len(), 8);
//! assert_eq!(result.correlations[0].label, "C1");
//! assert!(!result.correlations[0].is_pseudo());
//! assert!(result.correlations[1].is_pseudo());
//!
//! let carbon = &result.state[&Element::C];
//! assert_eq!((carbon.current, carbon.total), (1.0, 2));
//! assert!(!carbon.complete);
//!
//! // Feeding the result back in changes nothing
//! let again = rebuild(&snapshot, &result, &config);
//! assert_eq!(again, result);
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — JSON reading and writing of snapshots and correlation lists
//! - [`edit`] — Manual overrides and user-asserted links
//! - [`rebuild`] — The full pipeline
//!
//! # Data Types
//!
//! ## Input Structures
//!
//! - [`SignalSnapshot`] — 1D, 2D and editing signals of all experiments
//! - [`CorrelationConfig`] — Shift tolerances and the target formula
//! - [`Formula`] — Parsed molecular formula
//!
//! ## Output Structures
//!
//! - [`Rebuild`] — Finalized correlations plus diagnostics
//! - [`Correlation`] — One real or placeholder atom entry
//! - [`Link`] — One half of a 2D cross peak connecting two correlations
//! - [`ProtonsCount`] — Unknown, resolved or ambiguous proton multiplicity
//! - [`State`] / [`AtomTypeState`] — Per-atom-type progress and errors

mod engine;
mod model;

pub mod io;

pub use model::correlation::{
    Correlation, CorrelationSignal, Edited, Link, Origin, ProtonsCount,
};
pub use model::formula::{Formula, ParseFormulaError};
pub use model::signal::{
    AxisShift, EditedPeak, EditingSignal, EditingSignals, Peak1D, Peak2D, Signal1D, Signal2D,
    SignalSnapshot, Signals1D, Signals2D,
};
pub use model::state::{AtomTypeState, State, StateError};
pub use model::types::{
    Axis, EditingKind, Element, ExperimentType, Hybridization, ParseElementError,
    ParseExperimentTypeError, ParseHybridizationError, Sign,
};

pub use engine::{CorrelationConfig, Rebuild, Tolerance, build_state, edit, rebuild};

pub use engine::Error as CorrelationError;
