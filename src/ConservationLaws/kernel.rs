use super::elimination::Elimination;
use super::moiety::{ConservationLaw, ConservedMoiety};
use super::species_set::SpeciesSet;
use super::stoichiometric_matrix::StoichiometricMatrix;
use log::{debug, info};

/// Left null space of the stoichiometric matrix and the moieties read off it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelBasis {
    /// number of linearly independent conservation laws
    pub kernel_dim: usize,
    /// species engaged by any conservation law, ascending
    pub matched: Vec<usize>,
    /// number of conservation laws that are already moieties
    pub int_kernel_dim: usize,
    /// species engaged by those moieties
    pub int_matched: SpeciesSet,
    /// basis of the left null space
    pub conservation_laws: Vec<ConservationLaw>,
    /// same-signed basis vectors, normalised
    pub moieties: Vec<ConservedMoiety>,
}

/// Computes the left null space of `matrix` by sparse Gaussian elimination.
///
/// Every metabolite row is extended by a bookkeeping column `M + i` holding 1, so
/// after elimination a row whose reaction part vanished carries, in its
/// bookkeeping columns, the combination of metabolites that produced it: one
/// conservation law. Laws whose coefficients all share one sign are moieties.
pub fn compute_kernel(matrix: &StoichiometricMatrix) -> KernelBasis {
    let number_of_reactions = matrix.number_of_reactions();
    let mut rows = matrix.species_rows();
    for (i, row) in rows.iter_mut().enumerate() {
        row.push(number_of_reactions + i, 1.0);
    }
    let mut elimination = Elimination::new(rows);
    let merges = elimination.run();
    debug!("kernel elimination finished after {} row merges", merges);

    let mut conservation_laws = Vec::new();
    for row in elimination.rows() {
        if row.is_empty() || row.iter().any(|(col, _)| col < number_of_reactions) {
            continue;
        }
        let shifted: Vec<(usize, f64)> = row
            .iter()
            .map(|(col, value)| (col - number_of_reactions, value))
            .collect();
        conservation_laws.push(ConservationLaw {
            species: shifted.iter().map(|(s, _)| *s).collect(),
            coefficients: shifted.iter().map(|(_, c)| *c).collect(),
        });
    }

    let matched: SpeciesSet = conservation_laws
        .iter()
        .flat_map(|law| law.species.iter().copied())
        .collect();
    let mut int_matched = SpeciesSet::new();
    let mut moieties = Vec::new();
    for law in conservation_laws.iter().filter(|law| law.is_same_signed()) {
        let moiety = ConservedMoiety::from_law(law);
        int_matched.extend(moiety.species().iter().copied());
        moieties.push(moiety);
    }
    let kernel_dim = conservation_laws.len();
    let int_kernel_dim = moieties.len();
    debug_assert!(int_kernel_dim <= kernel_dim);
    info!(
        "There are {} conservation laws engaging {} metabolites, {} of them are moieties engaging {} metabolites",
        kernel_dim,
        matched.len(),
        int_kernel_dim,
        int_matched.len()
    );
    KernelBasis {
        kernel_dim,
        matched: matched.to_vec(),
        int_kernel_dim,
        int_matched,
        conservation_laws,
        moieties,
    }
}
