//! Loop counts computed from earlier fields

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::parameters::ParameterTable;

/// A named loop count formula
///
/// Each formula reads specific, conventionally named fields from the parameter table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Formula {
    /// `(NPART+1)*(NPART)/2`
    TriangularNpart,
    /// `(NUMOPG+1)*(NUMOPG)/2`
    TriangularNumopg,
    /// `NPAR*NPARO`
    NparTimesNparo,
    /// `NPLN-1`
    NplnMinusOne,
}

impl Formula {
    /// Parse `formula` and evaluate it in one step
    pub fn compute(formula: &str, params: &ParameterTable) -> Result<i64> {
        formula.parse::<Formula>()?.evaluate(params)
    }

    /// Evaluate against the values processed so far
    pub fn evaluate(&self, params: &ParameterTable) -> Result<i64> {
        let result = match self {
            Formula::TriangularNpart => triangular(params.get_long("NPART")?),
            Formula::TriangularNumopg => triangular(params.get_long("NUMOPG")?),
            Formula::NparTimesNparo => params
                .get_long("NPAR")?
                .checked_mul(params.get_long("NPARO")?),
            Formula::NplnMinusOne => params.get_long("NPLN")?.checked_sub(1),
        };

        result.ok_or_else(|| Error::FormulaOverflow(self.as_str().to_owned()))
    }

    /// The formula as written in schemas
    pub fn as_str(&self) -> &'static str {
        match self {
            Formula::TriangularNpart => "(NPART+1)*(NPART)/2",
            Formula::TriangularNumopg => "(NUMOPG+1)*(NUMOPG)/2",
            Formula::NparTimesNparo => "NPAR*NPARO",
            Formula::NplnMinusOne => "NPLN-1",
        }
    }
}

fn triangular(n: i64) -> Option<i64> {
    n.checked_add(1)?.checked_mul(n).map(|product| product / 2)
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [
            Formula::TriangularNpart,
            Formula::TriangularNumopg,
            Formula::NparTimesNparo,
            Formula::NplnMinusOne,
        ]
        .into_iter()
        .find(|formula| formula.as_str() == s.trim())
        .ok_or_else(|| Error::UnknownFormula(s.to_owned()))
    }
}
