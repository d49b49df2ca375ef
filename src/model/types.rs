use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hybridization string: '{0}'")]
pub struct ParseHybridizationError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid experiment type: '{0}'")]
pub struct ParseExperimentTypeError(String);

/// Chemical element, used as the atom type of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Element {
    H = 1, He, Li, Be, B, C, N, O, F, Ne, Na, Mg, Al, Si, P, S, Cl, Ar, K, Ca,
    Sc, Ti, V, Cr, Mn, Fe, Co, Ni, Cu, Zn, Ga, Ge, As, Se, Br, Kr, Rb, Sr, Y, Zr,
    Nb, Mo, Tc, Ru, Rh, Pd, Ag, Cd, In, Sn, Sb, Te, I, Xe, Cs, Ba, La, Ce, Pr, Nd,
    Pm, Sm, Eu, Gd, Tb, Dy, Ho, Er, Tm, Yb, Lu, Hf, Ta, W, Re, Os, Ir, Pt, Au, Hg,
    Tl, Pb, Bi, Po, At, Rn, Fr, Ra, Ac, Th, Pa, U, Np, Pu, Am, Cm, Bk, Cf, Es, Fm,
    Md, No, Lr, Rf, Db, Sg, Bh, Hs, Mt, Ds, Rg, Cn, Nh, Fl, Mc, Lv, Ts, Og = 118,
}

#[rustfmt::skip]
const ELEMENTS: [Element; 118] = {
    use Element::*;
    [
        H, He, Li, Be, B, C, N, O, F, Ne, Na, Mg, Al, Si, P, S, Cl, Ar, K, Ca,
        Sc, Ti, V, Cr, Mn, Fe, Co, Ni, Cu, Zn, Ga, Ge, As, Se, Br, Kr, Rb, Sr, Y, Zr,
        Nb, Mo, Tc, Ru, Rh, Pd, Ag, Cd, In, Sn, Sb, Te, I, Xe, Cs, Ba, La, Ce, Pr, Nd,
        Pm, Sm, Eu, Gd, Tb, Dy, Ho, Er, Tm, Yb, Lu, Hf, Ta, W, Re, Os, Ir, Pt, Au, Hg,
        Tl, Pb, Bi, Po, At, Rn, Fr, Ra, Ac, Th, Pa, U, Np, Pu, Am, Cm, Bk, Cf, Es, Fm,
        Md, No, Lr, Rf, Db, Sg, Bh, Hs, Mt, Ds, Rg, Cn, Nh, Fl, Mc, Lv, Ts, Og,
    ]
};

#[rustfmt::skip]
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga",
    "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd",
    "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm",
    "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os",
    "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa",
    "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg",
    "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[usize::from(self.atomic_number()) - 1]
    }

    pub fn from_atomic_number(z: u8) -> Option<Self> {
        ELEMENTS.get(usize::from(z).checked_sub(1)?).copied()
    }

    /// Returns `true` for hydrogen, the only atom type that attaches to heavy atoms
    /// rather than carrying its own proton count.
    #[inline]
    pub fn is_proton(&self) -> bool {
        *self == Element::H
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYMBOLS
            .iter()
            .position(|symbol| *symbol == s)
            .map(|i| ELEMENTS[i])
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hybridization classification of a heavy atom, set manually or inferred
/// from unambiguous CH3 evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hybridization {
    SP,
    SP2,
    SP3,
    Resonant,
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hybridization::SP => write!(f, "SP"),
            Hybridization::SP2 => write!(f, "SP2"),
            Hybridization::SP3 => write!(f, "SP3"),
            Hybridization::Resonant => write!(f, "Resonant"),
        }
    }
}

impl FromStr for Hybridization {
    type Err = ParseHybridizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sp" | "1" => Ok(Hybridization::SP),
            "sp2" | "2" => Ok(Hybridization::SP2),
            "sp3" | "3" => Ok(Hybridization::SP3),
            "resonant" | "r" => Ok(Hybridization::Resonant),
            _ => Err(ParseHybridizationError(s.to_string())),
        }
    }
}

/// Phase of an edited signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn value(&self) -> i8 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value.signum() {
            1 => Some(Sign::Positive),
            -1 => Some(Sign::Negative),
            _ => None,
        }
    }
}

impl Serialize for Sign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

impl<'de> Deserialize<'de> for Sign {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Sign::from_value(value)
            .ok_or_else(|| serde::de::Error::custom(format!("sign must be 1 or -1, got {value}")))
    }
}

/// Kind of NMR experiment a signal was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentType {
    #[serde(rename = "1d")]
    OneD,
    Hsqc,
    Hmqc,
    Hmbc,
    Cosy,
    Tocsy,
    Noesy,
    Roesy,
    Inadequate,
    Adequate,
}

impl ExperimentType {
    /// Direct one-bond heteronuclear experiments, the only ones that define attachments.
    #[inline]
    pub fn is_one_bond(&self) -> bool {
        matches!(self, ExperimentType::Hsqc | ExperimentType::Hmqc)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExperimentType::OneD => "1d",
            ExperimentType::Hsqc => "hsqc",
            ExperimentType::Hmqc => "hmqc",
            ExperimentType::Hmbc => "hmbc",
            ExperimentType::Cosy => "cosy",
            ExperimentType::Tocsy => "tocsy",
            ExperimentType::Noesy => "noesy",
            ExperimentType::Roesy => "roesy",
            ExperimentType::Inadequate => "inadequate",
            ExperimentType::Adequate => "adequate",
        }
    }
}

impl fmt::Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExperimentType {
    type Err = ParseExperimentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(ExperimentType::OneD),
            "hsqc" => Ok(ExperimentType::Hsqc),
            "hmqc" => Ok(ExperimentType::Hmqc),
            "hmbc" => Ok(ExperimentType::Hmbc),
            "cosy" => Ok(ExperimentType::Cosy),
            "tocsy" => Ok(ExperimentType::Tocsy),
            "noesy" => Ok(ExperimentType::Noesy),
            "roesy" => Ok(ExperimentType::Roesy),
            "inadequate" => Ok(ExperimentType::Inadequate),
            "adequate" => Ok(ExperimentType::Adequate),
            _ => Err(ParseExperimentTypeError(s.to_string())),
        }
    }
}

/// Spectral editing experiment, keyed by its flip angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EditingKind {
    #[serde(rename = "90")]
    Dept90,
    #[serde(rename = "135")]
    Dept135,
}

impl fmt::Display for EditingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditingKind::Dept90 => write!(f, "DEPT-90"),
            EditingKind::Dept135 => write!(f, "DEPT-135"),
        }
    }
}

/// Axis of a 2D experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn opposite(&self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Position of this axis in a `[x, y]` atom type pair.
    #[inline]
    pub fn position(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}
