use super::MIN;
use super::stoichiometric_matrix::StoichiometricMatrix;
use std::collections::BTreeMap;

/// Quadratic coupling between matched species.
///
/// For species positions `i != j` in the matched list the coupling is
/// `J_ij = sum_r S[r][i] * S[r][j]`, kept only when `|J_ij| > MIN`; the diagonal
/// `sum_r S[r][i]^2` is the field of `i`. The energy of an integer assignment
/// `num` is then `|S^T num|^2`, which vanishes exactly on left null vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionGraph {
    neighbours: Vec<Vec<(usize, f64)>>,
    fields: Vec<f64>,
}

impl InteractionGraph {
    /// Builds the graph over `matched` (positions in the slice become graph nodes).
    pub fn build(matrix: &StoichiometricMatrix, matched: &[usize]) -> Self {
        let dim = matched.len();
        let rows = matrix.species_rows_for(matched);
        // reaction -> (position, coefficient) of the matched species taking part in it
        let mut participants: Vec<Vec<(usize, f64)>> = vec![Vec::new(); matrix.number_of_reactions()];
        for (position, row) in rows.iter().enumerate() {
            for (reaction, coefficient) in row.iter() {
                participants[reaction].push((position, coefficient));
            }
        }
        let mut fields = vec![0.0; dim];
        let mut couplings: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for members in participants.iter() {
            for (a, &(i, ci)) in members.iter().enumerate() {
                fields[i] += ci * ci;
                for &(j, cj) in &members[a + 1..] {
                    let key = if i < j { (i, j) } else { (j, i) };
                    *couplings.entry(key).or_insert(0.0) += ci * cj;
                }
            }
        }
        let mut neighbours = vec![Vec::new(); dim];
        for ((i, j), weight) in couplings {
            if weight.abs() > MIN {
                neighbours[i].push((j, weight));
                neighbours[j].push((i, weight));
            }
        }
        for list in neighbours.iter_mut() {
            list.sort_by_key(|(j, _)| *j);
        }
        Self { neighbours, fields }
    }

    pub fn dim(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, i: usize) -> f64 {
        self.fields[i]
    }

    pub fn neighbours(&self, i: usize) -> &[(usize, f64)] {
        &self.neighbours[i]
    }

    pub fn has_neighbours(&self, i: usize) -> bool {
        !self.neighbours[i].is_empty()
    }
    /// positions with at least one neighbour
    pub fn active_species(&self) -> Vec<usize> {
        (0..self.dim()).filter(|&i| self.has_neighbours(i)).collect()
    }

    /// `H(num) = sum_i field_i num_i^2 + sum_i sum_{j in adj(i)} J_ij num_i num_j`
    pub fn energy(&self, num: &[i64]) -> f64 {
        let mut h = 0.0;
        for i in 0..self.dim() {
            let ni = num[i] as f64;
            h += self.fields[i] * ni * ni;
            for &(j, weight) in &self.neighbours[i] {
                h += weight * ni * num[j] as f64;
            }
        }
        h
    }

    /// Energy change of `num[i] += p` for `p = +-1`.
    pub fn delta(&self, num: &[i64], i: usize, p: i64) -> f64 {
        let mut local = self.fields[i] * num[i] as f64;
        for &(j, weight) in &self.neighbours[i] {
            local += weight * num[j] as f64;
        }
        2.0 * p as f64 * local + self.fields[i]
    }
}
