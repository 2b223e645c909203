//! # Relaxation fallback
//!
//! Decides whether a further moiety can exist once the annealing search keeps
//! failing. Let `C` be the species covered by the moieties found so far and `U`
//! the rest. A new moiety exists iff some `y >= 0, y != 0` over `U` has `y S_U` in
//! the row space of `S_C` (adding a large multiple of the known moieties makes the
//! covered part positive). By Gordan's alternative that happens iff there is no
//! flux `x` with `S_C x = 0` and `S_U x > 0`.
//!
//! The flux is written in a basis of the null space of `S_C`, obtained by
//! elimination to reduced echelon form, and the strict system is searched with
//! Motzkin's relaxation method in the homogenised form `B v >= 1`.
use super::MIN;
use super::elimination::Elimination;
use super::moiety_config::MoietyConfig;
use super::sparse_row::SparseRow;
use super::species_set::SpeciesSet;
use super::stoichiometric_matrix::StoichiometricMatrix;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationOutcome {
    /// a separating flux exists: no moiety beyond the covered species
    Feasible { iterations: usize },
    /// no separating flux within the budget: a further moiety exists or the budget ran out
    Infeasible { iterations: usize },
}

impl RelaxationOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, RelaxationOutcome::Feasible { .. })
    }

    pub fn iterations(&self) -> usize {
        match self {
            RelaxationOutcome::Feasible { iterations } | RelaxationOutcome::Infeasible { iterations } => {
                *iterations
            }
        }
    }
}

pub fn relax(
    matrix: &StoichiometricMatrix,
    covered: &SpeciesSet,
    config: &MoietyConfig,
) -> RelaxationOutcome {
    let covered_rows = matrix.species_rows_for(&covered.to_vec());
    let basis = null_space_basis(covered_rows, matrix.number_of_reactions());
    let species_rows = matrix.species_rows();
    let mut constraints = Vec::new();
    for (species, row) in species_rows.iter().enumerate() {
        if covered.contains(species) {
            continue;
        }
        let projected: Vec<(usize, f64)> = basis
            .iter()
            .enumerate()
            .map(|(i, x)| (i, row.dot(x)))
            .filter(|(_, value)| value.abs() > MIN)
            .collect();
        if projected.is_empty() {
            // S_j x = 0 for every admissible flux, the strict inequality cannot hold
            debug!(
                "species {} lies in the span of the covered species, relaxation infeasible",
                species
            );
            return RelaxationOutcome::Infeasible { iterations: 0 };
        }
        constraints.push(SparseRow::from_entries(projected));
    }
    debug!(
        "relaxation over {} free fluxes and {} uncovered species",
        basis.len(),
        constraints.len()
    );
    motzkin(&constraints, basis.len(), config)
}

/// Basis of `{x : row . x = 0 for every row}` over `columns` variables.
///
/// The rows are eliminated to echelon form, normalised so every pivot is 1 and
/// back-substituted bottom-up to reduced echelon form. Pivot columns are the
/// dependent variables; every free column `f` yields the vector with `x_f = 1`
/// and `x_p = -R_t[f]` for the row `t` pivoting on `p`.
pub fn null_space_basis(rows: Vec<SparseRow>, columns: usize) -> Vec<SparseRow> {
    let mut elimination = Elimination::new(rows);
    elimination.run();
    let (rows, _) = elimination.into_parts();
    let mut echelon: Vec<SparseRow> = rows.into_iter().filter(|row| !row.is_empty()).collect();
    echelon.sort_by_key(|row| row.pivot_key());
    for row in echelon.iter_mut() {
        row.normalize_lead();
    }
    for k in (0..echelon.len()).rev() {
        for t in (k + 1)..echelon.len() {
            let Some(pivot) = echelon[t].pivot() else {
                continue;
            };
            let factor = echelon[k].get(pivot);
            if factor != 0.0 {
                echelon[k] = echelon[k].sub_scaled(&echelon[t], factor);
            }
        }
    }

    let mut is_pivot = vec![false; columns];
    for row in &echelon {
        if let Some(pivot) = row.pivot() {
            is_pivot[pivot] = true;
        }
    }
    (0..columns)
        .filter(|&free| !is_pivot[free])
        .map(|free| {
            let mut entries = vec![(free, 1.0)];
            for row in &echelon {
                let value = row.get(free);
                if value != 0.0 {
                    if let Some(pivot) = row.pivot() {
                        entries.push((pivot, -value));
                    }
                }
            }
            SparseRow::from_entries(entries)
        })
        .collect()
}

/// Motzkin's relaxation for `row . v >= 1` over all rows, starting from `v = MIN`.
fn motzkin(constraints: &[SparseRow], dim: usize, config: &MoietyConfig) -> RelaxationOutcome {
    let mut var = vec![MIN; dim];
    let norms: Vec<f64> = constraints.iter().map(|row| row.dot(row)).collect();
    let mut iterations = 0;
    while iterations < config.relaxation_max {
        iterations += 1;
        let worst = constraints
            .iter()
            .enumerate()
            .map(|(j, row)| (j, row.iter().map(|(i, v)| v * var[i]).sum::<f64>() - 1.0))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match worst {
            Some((j, violation)) if violation < 0.0 => {
                let alpha = (-config.relaxation_step * violation / norms[j]).max(1e-9 * MIN);
                for (i, v) in constraints[j].iter() {
                    var[i] += alpha * v;
                }
            }
            _ => {
                debug!("relaxation feasible after {} iterations", iterations);
                return RelaxationOutcome::Feasible { iterations };
            }
        }
    }
    debug!("relaxation budget of {} iterations exhausted", iterations);
    RelaxationOutcome::Infeasible { iterations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> MoietyConfig {
        MoietyConfig {
            relaxation_max: 10_000,
            ..MoietyConfig::default()
        }
    }

    fn enzyme() -> StoichiometricMatrix {
        // E + S -> ES, ES -> E + P
        StoichiometricMatrix::from_flat(vec![-1.0, -1.0, 1.0, 0.0, 1.0, 0.0, -1.0, 1.0], 4, 2)
            .unwrap()
    }

    #[test]
    fn test_null_space_basis() {
        // x0 + x1 + x2 = 0, x1 - x3 = 0
        let rows = vec![
            SparseRow::from_entries(vec![(0, 1.0), (1, 1.0), (2, 1.0)]),
            SparseRow::from_entries(vec![(1, 1.0), (3, -1.0)]),
        ];
        let basis = null_space_basis(rows.clone(), 4);
        assert_eq!(basis.len(), 2);
        for x in &basis {
            for row in &rows {
                assert_relative_eq!(row.dot(x), 0.0, epsilon = 1e-12);
            }
        }
        assert_eq!(null_space_basis(Vec::new(), 3).len(), 3);
    }

    #[test]
    fn test_source_of_two_species_is_feasible() {
        // -> A + B: only the mixed law A - B, no moiety
        let matrix = StoichiometricMatrix::from_flat(vec![1.0, 1.0], 2, 1).unwrap();
        let outcome = relax(&matrix, &SpeciesSet::new(), &config());
        assert!(outcome.is_feasible());
        // one projection, then the check passes
        assert_eq!(outcome.iterations(), 2);
    }

    #[test]
    fn test_single_reaction_is_infeasible() {
        // A -> B: A + B is a moiety nobody has covered yet
        let matrix = StoichiometricMatrix::from_flat(vec![-1.0, 1.0], 2, 1).unwrap();
        let outcome = relax(&matrix, &SpeciesSet::new(), &config());
        assert_eq!(outcome, RelaxationOutcome::Infeasible { iterations: 10_000 });
    }

    #[test]
    fn test_enzyme_with_partial_cover_is_infeasible() {
        // S + ES + P known, E + ES still missing
        let covered: SpeciesSet = [1, 2, 3].into_iter().collect();
        let outcome = relax(&enzyme(), &covered, &config());
        assert!(!outcome.is_feasible());
    }

    #[test]
    fn test_full_cover_is_feasible() {
        let covered: SpeciesSet = [0, 1, 2, 3].into_iter().collect();
        let outcome = relax(&enzyme(), &covered, &config());
        assert!(outcome.is_feasible());
    }
}
