use super::conservation_errors::ConservationError;
use super::sparse_row::SparseRow;
use super::MIN;
use nalgebra::DMatrix;

/// Stoichiometric matrix of a reaction network: reactions x metabolites.
///
/// Stored densely in row-major (reaction, metabolite) order, as handed over by
/// the importer. All algorithms work on the sparse per-species view returned by
/// [`StoichiometricMatrix::species_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoichiometricMatrix {
    values: Vec<f64>,
    number_of_metabolites: usize,
    number_of_reactions: usize,
}

impl StoichiometricMatrix {
    /// flat row-major (reaction, metabolite) sequence
    pub fn from_flat(
        values: Vec<f64>,
        number_of_metabolites: usize,
        number_of_reactions: usize,
    ) -> Result<Self, ConservationError> {
        if values.len() != number_of_metabolites * number_of_reactions {
            return Err(ConservationError::DimensionMismatch(format!(
                "matrix has {} entries, expected {} metabolites x {} reactions = {}",
                values.len(),
                number_of_metabolites,
                number_of_reactions,
                number_of_metabolites * number_of_reactions
            )));
        }
        Ok(Self {
            values,
            number_of_metabolites,
            number_of_reactions,
        })
    }
    /// vector of reactions, each a vector of substance coefficients
    /// (the layout of a stoichiometric analysis of reaction equations)
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ConservationError> {
        let number_of_metabolites = rows.first().map_or(0, |row| row.len());
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != number_of_metabolites)
        {
            return Err(ConservationError::DimensionMismatch(format!(
                "reaction {} has {} coefficients, reaction 0 has {}",
                i,
                row.len(),
                number_of_metabolites
            )));
        }
        let values: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_flat(values, number_of_metabolites, rows.len())
    }

    pub fn from_dmatrix(matrix: &DMatrix<f64>) -> Self {
        let (number_of_reactions, number_of_metabolites) = matrix.shape();
        let mut values = Vec::with_capacity(number_of_reactions * number_of_metabolites);
        for r in 0..number_of_reactions {
            for s in 0..number_of_metabolites {
                values.push(matrix[(r, s)]);
            }
        }
        Self {
            values,
            number_of_metabolites,
            number_of_reactions,
        }
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(
            self.number_of_reactions,
            self.number_of_metabolites,
            &self.values,
        )
    }

    pub fn number_of_metabolites(&self) -> usize {
        self.number_of_metabolites
    }

    pub fn number_of_reactions(&self) -> usize {
        self.number_of_reactions
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, reaction: usize, metabolite: usize) -> f64 {
        self.values[reaction * self.number_of_metabolites + metabolite]
    }

    /// One sparse row per metabolite with (reaction, coefficient) for every nonzero entry.
    pub fn species_rows(&self) -> Vec<SparseRow> {
        let mut rows = vec![SparseRow::new(); self.number_of_metabolites];
        for (k, &value) in self.values.iter().enumerate() {
            if value != 0.0 {
                let reaction = k / self.number_of_metabolites;
                let metabolite = k % self.number_of_metabolites;
                rows[metabolite].push(reaction, value);
            }
        }
        rows
    }

    /// sparse rows of the given metabolites, in the given order
    pub fn species_rows_for(&self, species: &[usize]) -> Vec<SparseRow> {
        let all_rows = self.species_rows();
        species.iter().map(|&s| all_rows[s].clone()).collect()
    }

    /// `sum_i v[i] * S[r][i]` for every reaction `r`
    pub fn dot_with_reactions(&self, species: &[usize], coefficients: &[f64]) -> Vec<f64> {
        (0..self.number_of_reactions)
            .map(|r| {
                species
                    .iter()
                    .zip(coefficients)
                    .map(|(&s, &c)| c * self.get(r, s))
                    .sum()
            })
            .collect()
    }

    /// Largest violation of `sum_i v[i] * S[r][i] = 0` over all reactions `r`.
    ///
    /// The residual of every reaction is divided by `1 + sum_i |v[i] * S[r][i]|`, so
    /// the result compares against `MIN` independently of coefficient magnitudes.
    pub fn max_relative_residual(&self, species: &[usize], coefficients: &[f64]) -> f64 {
        let mut worst: f64 = 0.0;
        for r in 0..self.number_of_reactions {
            let mut residual = 0.0;
            let mut magnitude = 0.0;
            for (&s, &c) in species.iter().zip(coefficients) {
                let term = c * self.get(r, s);
                residual += term;
                magnitude += term.abs();
            }
            worst = worst.max(residual.abs() / (1.0 + magnitude));
        }
        worst
    }

    /// true if the species vector is a left null vector of the matrix within `MIN`
    pub fn is_conserved(&self, species: &[usize], coefficients: &[f64]) -> bool {
        self.max_relative_residual(species, coefficients) <= MIN
    }
}
