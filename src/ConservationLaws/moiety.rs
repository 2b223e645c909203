use super::MIN;
use super::sparse_row::SparseRow;
use serde::{Deserialize, Serialize};

/// A conservation law: left null vector of the stoichiometric matrix, any signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationLaw {
    /// species indices, ascending
    pub species: Vec<usize>,
    pub coefficients: Vec<f64>,
}

impl ConservationLaw {
    pub fn from_row(row: &SparseRow) -> Self {
        let (species, coefficients) = row.iter().unzip();
        Self {
            species,
            coefficients,
        }
    }
    /// all coefficients share the sign of the first one
    pub fn is_same_signed(&self) -> bool {
        match self.coefficients.first() {
            Some(&first) => self.coefficients.iter().all(|&c| c * first > 0.0),
            None => false,
        }
    }
}

/// Conserved moiety: positive coefficients, the smallest one normalised to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservedMoiety {
    species: Vec<usize>,
    coefficients: Vec<f64>,
}

impl ConservedMoiety {
    /// Builds a moiety from (species, coefficient) pairs.
    ///
    /// Pairs are sorted by species, coefficients taken by magnitude and divided by
    /// the smallest magnitude. Entries with magnitude not above `MIN` are dropped.
    pub fn from_pairs(pairs: Vec<(usize, f64)>) -> Self {
        let mut pairs: Vec<(usize, f64)> = pairs
            .into_iter()
            .filter(|(_, c)| c.abs() > MIN)
            .map(|(s, c)| (s, c.abs()))
            .collect();
        pairs.sort_by_key(|(s, _)| *s);
        let mut moiety = Self {
            species: pairs.iter().map(|(s, _)| *s).collect(),
            coefficients: pairs.iter().map(|(_, c)| *c).collect(),
        };
        moiety.normalize();
        moiety
    }
    /// same-signed conservation law as a moiety
    pub fn from_law(law: &ConservationLaw) -> Self {
        Self::from_pairs(
            law.species
                .iter()
                .copied()
                .zip(law.coefficients.iter().copied())
                .collect(),
        )
    }
    /// raw coefficients of a nonnegative row, not normalised
    pub(crate) fn from_row_unnormalized(row: &SparseRow) -> Self {
        let (species, coefficients) = row.iter().unzip();
        Self {
            species,
            coefficients,
        }
    }
    /// divides every coefficient by the smallest one
    pub fn normalize(&mut self) {
        let min = self
            .coefficients
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() && min > 0.0 {
            for c in self.coefficients.iter_mut() {
                *c /= min;
            }
        }
    }

    pub fn species(&self) -> &[usize] {
        &self.species
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn to_row(&self) -> SparseRow {
        SparseRow::from_entries(
            self.species
                .iter()
                .copied()
                .zip(self.coefficients.iter().copied())
                .collect(),
        )
    }
}
