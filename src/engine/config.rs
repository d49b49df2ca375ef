//! Options for the correlation engine.
//!
//! A [`CorrelationConfig`] holds the per-atom-type shift tolerances and the
//! target molecular formula. It can be built in code or loaded from TOML:
//!
//! ```toml
//! formula = "C2H6"
//!
//! [tolerance]
//! C = 0.25
//! H = 0.02
//! ```

use super::error::Error;
use crate::model::formula::Formula;
use crate::model::types::Element;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Per-atom-type window (in ppm) within which two shifts count as the same signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerance {
    values: BTreeMap<Element, f64>,
}

impl Tolerance {
    /// An empty tolerance map: every atom type matches exactly.
    pub fn exact() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Tolerance for `atom_type`, `0.0` when none is configured.
    #[inline]
    pub fn get(&self, atom_type: Element) -> f64 {
        self.values.get(&atom_type).copied().unwrap_or(0.0)
    }

    /// Sets the tolerance for one atom type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTolerance`] for negative or non-finite values.
    pub fn set(&mut self, atom_type: Element, value: f64) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidTolerance { atom_type, value });
        }
        self.values.insert(atom_type, value);
        Ok(())
    }

    /// Returns `true` if `a` and `b` lie within the window of `atom_type`.
    #[inline]
    pub fn matches(&self, atom_type: Element, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.get(atom_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.values.iter().map(|(e, v)| (*e, *v))
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        let values = [
            (Element::C, 0.25),
            (Element::H, 0.02),
            (Element::N, 0.25),
            (Element::F, 0.25),
            (Element::Si, 0.25),
            (Element::P, 0.25),
        ]
        .into_iter()
        .collect();
        Self { values }
    }
}

/// Main configuration of a correlation rebuild.
///
/// # Examples
///
/// ```
/// use nmr_correlate::{CorrelationConfig, Element};
///
/// let config = CorrelationConfig::with_formula("C2H6");
/// assert_eq!(config.tolerance.get(Element::H), 0.02);
/// assert_eq!(config.formula().count(Element::C), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationConfig {
    /// Shift matching windows per atom type.
    pub tolerance: Tolerance,

    /// Target molecular formula. Empty or malformed formulas disable
    /// pseudo-correlation padding and diagnostics.
    pub formula: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    formula: Option<String>,
    #[serde(default)]
    tolerance: BTreeMap<Element, f64>,
}

impl CorrelationConfig {
    pub fn with_formula(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML configuration; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for invalid TOML and
    /// [`Error::InvalidTolerance`] for negative or non-finite tolerances.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut config = Self::default();
        if let Some(formula) = raw.formula {
            config.formula = formula;
        }
        for (atom_type, value) in raw.tolerance {
            config.tolerance.set(atom_type, value)?;
        }
        Ok(config)
    }

    /// Parsed target formula; malformed input yields an empty formula.
    pub fn formula(&self) -> Formula {
        Formula::parse_lenient(&self.formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = CorrelationConfig::default();
        assert!(config.formula.is_empty());
        assert!(config.formula().is_empty());
        assert_eq!(config.tolerance.get(Element::C), 0.25);
        assert_eq!(config.tolerance.get(Element::H), 0.02);
        assert_eq!(config.tolerance.get(Element::O), 0.0);
    }

    #[test]
    fn tolerance_window_is_inclusive() {
        let tol = Tolerance::default();
        assert!(tol.matches(Element::C, 14.0, 14.25));
        assert!(!tol.matches(Element::C, 14.0, 14.26));
        assert!(tol.matches(Element::O, 60.0, 60.0));
        assert!(!tol.matches(Element::O, 60.0, 60.01));
    }

    #[test]
    fn tolerance_rejects_negative_values() {
        let mut tol = Tolerance::exact();
        assert!(matches!(
            tol.set(Element::C, -0.1),
            Err(Error::InvalidTolerance {
                atom_type: Element::C,
                ..
            })
        ));
        assert!(tol.set(Element::C, f64::NAN).is_err());
        assert!(tol.set(Element::C, 0.0).is_ok());
    }

    #[test]
    fn parses_toml_config() {
        let config = CorrelationConfig::from_toml(
            r#"
            formula = "C6H12O6"

            [tolerance]
            C = 0.5
            O = 0.3
            "#,
        )
        .unwrap();
        assert_eq!(config.formula, "C6H12O6");
        assert_eq!(config.tolerance.get(Element::C), 0.5);
        assert_eq!(config.tolerance.get(Element::O), 0.3);
        assert_eq!(config.tolerance.get(Element::H), 0.02);
    }

    #[test]
    fn empty_toml_keeps_defaults() {
        let config = CorrelationConfig::from_toml("").unwrap();
        assert_eq!(config, CorrelationConfig::default());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let result = CorrelationConfig::from_toml("formula = [[[");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn unknown_element_in_tolerance_fails() {
        let result = CorrelationConfig::from_toml("[tolerance]\nXx = 0.1\n");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn negative_tolerance_in_toml_fails() {
        let result = CorrelationConfig::from_toml("[tolerance]\nC = -1.0\n");
        assert!(matches!(result, Err(Error::InvalidTolerance { .. })));
    }
}
