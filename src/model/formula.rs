//! Molecular formula parsing.
//!
//! The correlation engine only needs expected atom counts per element, so a
//! [`Formula`] is little more than a sorted element → count map built from a
//! Hill-style string such as `C2H6`, `C6H5NO2` or `(CH3)3N`.

use super::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};
use thiserror::Error;

/// Largest count accepted per element; each atom may become one placeholder.
pub const MAX_ATOM_COUNT: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFormulaError {
    #[error("unknown element symbol '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unbalanced parentheses in formula")]
    UnbalancedParentheses,

    #[error("atom count exceeds {} in formula", MAX_ATOM_COUNT)]
    Overflow,
}

/// Atom counts of a target molecule, ordered by atomic number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    counts: BTreeMap<Element, usize>,
}

impl Formula {
    /// Number of atoms of `element` in the formula (0 when absent).
    pub fn count(&self, element: Element) -> usize {
        self.counts.get(&element).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<Element, usize> {
        &self.counts
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.counts.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Parses `input`, treating malformed text as an empty formula.
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_else(|e| {
            tracing::warn!(formula = input, error = %e, "ignoring malformed molecular formula");
            Self::default()
        })
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hill order: C, H, then alphabetical.
        let mut order: Vec<Element> = self.counts.keys().copied().collect();
        let has_carbon = self.counts.contains_key(&Element::C);
        order.sort_by_key(|e| {
            let rank = match (has_carbon, e) {
                (true, Element::C) => 0,
                (true, Element::H) => 1,
                _ => 2,
            };
            (rank, e.symbol())
        });
        for element in order {
            match self.counts[&element] {
                1 => write!(f, "{element}")?,
                n => write!(f, "{element}{n}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Formula {
    type Err = ParseFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            chars: s.chars().peekable(),
            position: 0,
        };
        let counts = parser.group(0)?;
        if parser.chars.peek().is_some() {
            return Err(ParseFormulaError::UnbalancedParentheses);
        }
        Ok(Self {
            counts: counts.into_iter().filter(|(_, n)| *n > 0).collect(),
        })
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl Parser<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += 1;
        Some(c)
    }

    fn group(&mut self, depth: usize) -> Result<BTreeMap<Element, usize>, ParseFormulaError> {
        let mut counts = BTreeMap::new();

        while let Some(&c) = self.chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '(' | '[' => {
                    self.bump();
                    let inner = self.group(depth + 1)?;
                    match self.bump() {
                        Some(')' | ']') => {}
                        _ => return Err(ParseFormulaError::UnbalancedParentheses),
                    }
                    let multiplier = self.number()?.unwrap_or(1);
                    for (element, n) in inner {
                        let scaled = n.checked_mul(multiplier).ok_or(ParseFormulaError::Overflow)?;
                        add(&mut counts, element, scaled)?;
                    }
                }
                ')' | ']' => {
                    if depth == 0 {
                        return Err(ParseFormulaError::UnbalancedParentheses);
                    }
                    return Ok(counts);
                }
                c if c.is_ascii_uppercase() => {
                    let start = self.position;
                    let mut symbol = String::new();
                    symbol.extend(self.bump());
                    while let Some(&next) = self.chars.peek() {
                        if !next.is_ascii_lowercase() {
                            break;
                        }
                        symbol.extend(self.bump());
                    }
                    let element = symbol.parse::<Element>().map_err(|_| {
                        ParseFormulaError::UnknownElement {
                            symbol: symbol.clone(),
                            position: start,
                        }
                    })?;
                    let n = self.number()?.unwrap_or(1);
                    add(&mut counts, element, n)?;
                }
                found => {
                    return Err(ParseFormulaError::UnexpectedChar {
                        found,
                        position: self.position,
                    });
                }
            }
        }

        if depth > 0 {
            return Err(ParseFormulaError::UnbalancedParentheses);
        }
        Ok(counts)
    }

    fn number(&mut self) -> Result<Option<usize>, ParseFormulaError> {
        let mut value: Option<usize> = None;
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as usize))
                .ok_or(ParseFormulaError::Overflow)?;
            value = Some(next);
        }
        Ok(value)
    }
}

fn add(
    counts: &mut BTreeMap<Element, usize>,
    element: Element,
    n: usize,
) -> Result<(), ParseFormulaError> {
    let entry = counts.entry(element).or_insert(0);
    *entry = entry
        .checked_add(n)
        .filter(|&total| total <= MAX_ATOM_COUNT)
        .ok_or(ParseFormulaError::Overflow)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Formula {
        s.parse().unwrap()
    }

    #[test]
    fn parses_simple_formula() {
        let f = parse("C2H6");
        assert_eq!(f.count(Element::C), 2);
        assert_eq!(f.count(Element::H), 6);
        assert_eq!(f.count(Element::O), 0);
    }

    #[test]
    fn implicit_count_is_one() {
        let f = parse("C6H5NO2");
        assert_eq!(f.count(Element::N), 1);
        assert_eq!(f.count(Element::O), 2);
    }

    #[test]
    fn repeated_symbols_accumulate() {
        let f = parse("CH3CH2OH");
        assert_eq!(f.count(Element::C), 2);
        assert_eq!(f.count(Element::H), 6);
        assert_eq!(f.count(Element::O), 1);
    }

    #[test]
    fn parenthesized_groups_are_multiplied() {
        let f = parse("(CH3)3N");
        assert_eq!(f.count(Element::C), 3);
        assert_eq!(f.count(Element::H), 9);
        assert_eq!(f.count(Element::N), 1);
    }

    #[test]
    fn two_letter_symbols_and_whitespace() {
        let f = parse(" C2 H5 Cl ");
        assert_eq!(f.count(Element::Cl), 1);
        assert_eq!(f.count(Element::C), 2);
    }

    #[test]
    fn empty_input_is_empty_formula() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn rejects_unknown_element() {
        let err = "C2Xx".parse::<Formula>().unwrap_err();
        assert_eq!(
            err,
            ParseFormulaError::UnknownElement {
                symbol: "Xx".to_string(),
                position: 2
            }
        );
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        assert_eq!(
            "(CH3".parse::<Formula>().unwrap_err(),
            ParseFormulaError::UnbalancedParentheses
        );
        assert_eq!(
            "CH3)".parse::<Formula>().unwrap_err(),
            ParseFormulaError::UnbalancedParentheses
        );
    }

    #[test]
    fn rejects_stray_characters() {
        assert!(matches!(
            "C2-H6".parse::<Formula>(),
            Err(ParseFormulaError::UnexpectedChar { found: '-', .. })
        ));
    }

    #[test]
    fn rejects_counts_above_the_cap() {
        assert_eq!(parse("C10000").count(Element::C), MAX_ATOM_COUNT);
        assert_eq!(
            "C10001".parse::<Formula>().unwrap_err(),
            ParseFormulaError::Overflow
        );
        assert_eq!(
            "(C5000)3".parse::<Formula>().unwrap_err(),
            ParseFormulaError::Overflow
        );
        assert_eq!(
            "C1000000000".parse::<Formula>().unwrap_err(),
            ParseFormulaError::Overflow
        );
        assert!(Formula::parse_lenient("C99999999999999999999999").is_empty());
    }

    #[test]
    fn lenient_parse_absorbs_errors() {
        assert!(Formula::parse_lenient("not a formula").is_empty());
        assert_eq!(Formula::parse_lenient("CH4").count(Element::H), 4);
    }

    #[test]
    fn displays_in_hill_order() {
        assert_eq!(parse("OH2C2H4").to_string(), "C2H6O");
        assert_eq!(parse("ClNa").to_string(), "ClNa");
    }
}
