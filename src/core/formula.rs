// core/formula.rs
// Chemical formula parsing and the stoichiometry histogram.

use std::collections::BTreeMap;

use crate::error::{FigureError, Result};

const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

pub const MAX_ELEMENTS: usize = 7;

pub const STOICHIOMETRY_LABELS: [&str; MAX_ELEMENTS] = [
    "Elemental",
    "Binary",
    "Ternary",
    "Quaternary",
    "Pentanary",
    "Hexanary",
    "Heptanary",
];

fn element_symbol(s: &str) -> Option<&'static str> {
    ELEMENTS.iter().copied().find(|e| *e == s)
}

struct FormulaParser<'a> {
    chars: Vec<char>,
    pos: usize,
    text: &'a str,
}

impl<'a> FormulaParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            text,
        }
    }

    fn error(&self, message: impl std::fmt::Display) -> FigureError {
        FigureError::Formula {
            formula: self.text.to_string(),
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn amount(&mut self) -> Result<Option<f64>> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let decimal_point =
                c == '.' && self.chars.get(self.pos + 1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_digit() || decimal_point {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Ok(None);
        }
        let s: String = self.chars[start..self.pos].iter().collect();
        s.parse::<f64>()
            .map(Some)
            .map_err(|e| self.error(format!("bad amount `{s}`: {e}")))
    }

    fn group(&mut self, close: Option<char>, out: &mut BTreeMap<&'static str, f64>) -> Result<()> {
        while let Some(c) = self.peek() {
            match c {
                'A'..='Z' => {
                    let start = self.pos;
                    self.pos += 1;
                    while self.peek().is_some_and(|n| n.is_ascii_lowercase()) {
                        self.pos += 1;
                    }
                    let sym: String = self.chars[start..self.pos].iter().collect();
                    let element = element_symbol(&sym)
                        .ok_or_else(|| self.error(format!("unknown element `{sym}`")))?;
                    let n = self.amount()?.unwrap_or(1.0);
                    *out.entry(element).or_insert(0.0) += n;
                }
                '(' | '[' => {
                    self.pos += 1;
                    let inner_close = if c == '(' { ')' } else { ']' };
                    let mut inner = BTreeMap::new();
                    self.group(Some(inner_close), &mut inner)?;
                    let n = self.amount()?.unwrap_or(1.0);
                    for (el, v) in inner {
                        *out.entry(el).or_insert(0.0) += v * n;
                    }
                }
                ')' | ']' => {
                    return if close == Some(c) {
                        self.pos += 1;
                        Ok(())
                    } else {
                        Err(self.error(format!("unbalanced `{c}`")))
                    };
                }
                // Hydrate separator: CuSO4·5H2O
                '·' | '*' => {
                    self.pos += 1;
                    let n = self.amount()?.unwrap_or(1.0);
                    let mut rest = BTreeMap::new();
                    self.group(close, &mut rest)?;
                    for (el, v) in rest {
                        *out.entry(el).or_insert(0.0) += v * n;
                    }
                    return Ok(());
                }
                c if c.is_whitespace() => self.pos += 1,
                other => return Err(self.error(format!("unexpected `{other}`"))),
            }
        }
        match close {
            Some(c) => Err(self.error(format!("missing `{c}`"))),
            None => Ok(()),
        }
    }
}

/// Element amounts of a formula, keyed by symbol. Zero amounts are dropped.
pub fn composition(formula: &str) -> Result<BTreeMap<&'static str, f64>> {
    let mut parser = FormulaParser::new(formula);
    let mut out = BTreeMap::new();
    parser.group(None, &mut out)?;
    out.retain(|_, v| *v > 0.0);
    if out.is_empty() {
        return Err(parser.error("no elements"));
    }
    Ok(out)
}

/// Number of distinct elements in `formula`.
pub fn element_count(formula: &str) -> Result<usize> {
    composition(formula).map(|c| c.len())
}

/// Formulas tallied by number of distinct elements; slot `n` holds the
/// `n`-element compounds and slot 0 stays empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoichiometryCounts {
    slots: [u64; MAX_ELEMENTS + 1],
}

impl StoichiometryCounts {
    pub fn from_formulas<'a, I>(formulas: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = Self::default();
        for formula in formulas {
            let n = element_count(formula)?;
            if n > MAX_ELEMENTS {
                return Err(FigureError::validation(format!(
                    "formula `{formula}` has {n} elements; at most {MAX_ELEMENTS} are tallied"
                )));
            }
            out.slots[n] += 1;
        }
        Ok(out)
    }

    /// Count of compounds with `n_elements` distinct elements.
    pub fn get(&self, n_elements: usize) -> u64 {
        self.slots.get(n_elements).copied().unwrap_or(0)
    }

    pub fn slots(&self) -> &[u64; MAX_ELEMENTS + 1] {
        &self.slots
    }

    pub fn total(&self) -> u64 {
        self.slots.iter().sum()
    }

    /// Highest element count seen, or 0 for an empty tally.
    pub fn max_elements(&self) -> usize {
        (1..=MAX_ELEMENTS).rev().find(|&n| self.slots[n] > 0).unwrap_or(0)
    }
}
