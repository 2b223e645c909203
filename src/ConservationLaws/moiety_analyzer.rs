use super::conservation_errors::ConservationError;
use super::independence::moieties_are_independent;
use super::interaction_graph::InteractionGraph;
use super::kernel::{KernelBasis, compute_kernel};
use super::moiety::ConservedMoiety;
use super::moiety_config::MoietyConfig;
use super::moiety_output::{DiscoveryStatus, MoietyReport};
use super::monte_carlo::{MoietySearch, SearchOutcome};
use super::reduce::reduce_moieties;
use super::relaxation::relax;
use super::species_set::SpeciesSet;
use super::stoichiometric_matrix::StoichiometricMatrix;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

/// Drives the moiety discovery for one stoichiometric matrix.
///
/// Owns the random generator, the moiety list and the covered-species set; they
/// only change through [`MoietyAnalyzer::compute`].
pub struct MoietyAnalyzer {
    matrix: StoichiometricMatrix,
    config: MoietyConfig,
    rng: StdRng,
    moieties: Vec<ConservedMoiety>,
    int_matched: SpeciesSet,
    /// (moieties, covered species) after every accepted moiety
    progress: Vec<(usize, usize)>,
    relaxation_rounds: usize,
}

impl MoietyAnalyzer {
    pub fn new(matrix: StoichiometricMatrix, config: MoietyConfig) -> Result<Self, ConservationError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            matrix,
            config,
            rng,
            moieties: Vec::new(),
            int_matched: SpeciesSet::new(),
            progress: Vec::new(),
            relaxation_rounds: 0,
        })
    }

    pub fn matrix(&self) -> &StoichiometricMatrix {
        &self.matrix
    }

    pub fn moieties(&self) -> &[ConservedMoiety] {
        &self.moieties
    }

    pub fn progress(&self) -> &[(usize, usize)] {
        &self.progress
    }

    pub fn relaxation_rounds(&self) -> usize {
        self.relaxation_rounds
    }

    /// Computes the conservation laws and as many independent moieties as the search finds.
    pub fn compute(&mut self) -> Result<MoietyReport, ConservationError> {
        let start = Instant::now();
        let kernel = compute_kernel(&self.matrix);
        self.moieties = kernel.moieties.clone();
        self.int_matched = kernel.int_matched.clone();
        self.progress = vec![(self.moieties.len(), self.int_matched.len())];
        self.relaxation_rounds = 0;

        if self.moieties.len() < kernel.kernel_dim {
            self.search_moieties(&kernel)?;
        }

        let report = self.report(&kernel);
        info!(
            "moiety analysis of {} metabolites and {} reactions took {:?}",
            self.matrix.number_of_metabolites(),
            self.matrix.number_of_reactions(),
            start.elapsed()
        );
        if !report.is_complete() {
            warn!(
                "only {} of {} conservation laws are expressed as moieties",
                report.int_kernel_dim, report.kernel_dim
            );
        }
        Ok(report)
    }

    fn search_moieties(&mut self, kernel: &KernelBasis) -> Result<(), ConservationError> {
        let graph = InteractionGraph::build(&self.matrix, &kernel.matched);
        let search = MoietySearch::new(&graph, &kernel.matched, &self.config);
        let mut timer = 0;
        while self.moieties.len() < kernel.kernel_dim {
            match search.run(&self.moieties, &mut self.rng) {
                SearchOutcome::Found(moiety) => {
                    self.accept(moiety, kernel.kernel_dim)?;
                    timer = 0;
                }
                SearchOutcome::Exhausted => timer += 1,
            }
            if timer >= self.config.max_num_monte_carlo && self.moieties.len() < kernel.kernel_dim {
                timer = 0;
                self.relaxation_rounds += 1;
                let outcome = relax(&self.matrix, &self.int_matched, &self.config);
                if outcome.is_feasible() {
                    info!(
                        "relaxation after {} iterations shows no moiety beyond the {} found",
                        outcome.iterations(),
                        self.moieties.len()
                    );
                    break;
                }
                if self.relaxation_rounds >= self.config.max_relaxation_rounds {
                    warn!(
                        "stopping the moiety search after {} relaxation rounds",
                        self.relaxation_rounds
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    fn accept(&mut self, moiety: ConservedMoiety, kernel_dim: usize) -> Result<(), ConservationError> {
        self.moieties.push(moiety);
        reduce_moieties(&mut self.moieties);
        for moiety in self.moieties.iter_mut() {
            moiety.normalize();
        }
        if let Some(broken) = self
            .moieties
            .iter()
            .find(|m| !self.matrix.is_conserved(m.species(), m.coefficients()))
        {
            let message = format!(
                "moiety on species {:?} is not conserved, residual {:e}",
                broken.species(),
                self.matrix
                    .max_relative_residual(broken.species(), broken.coefficients())
            );
            error!("{}", message);
            return Err(ConservationError::InternalConsistency(message));
        }
        if !moieties_are_independent(&self.moieties) {
            let message = format!(
                "the {} moieties became linearly dependent after reduction",
                self.moieties.len()
            );
            error!("{}", message);
            return Err(ConservationError::InternalConsistency(message));
        }
        if self.moieties.len() > kernel_dim {
            let message = format!(
                "{} independent moieties exceed the {} conservation laws",
                self.moieties.len(),
                kernel_dim
            );
            error!("{}", message);
            return Err(ConservationError::InternalConsistency(message));
        }
        for moiety in &self.moieties {
            self.int_matched.extend(moiety.species().iter().copied());
        }
        self.progress.push((self.moieties.len(), self.int_matched.len()));
        info!(
            "Found linearly independent moiety, now there are {} engaging {} metabolites",
            self.moieties.len(),
            self.int_matched.len()
        );
        Ok(())
    }

    fn report(&self, kernel: &KernelBasis) -> MoietyReport {
        let status = if self.moieties.len() == kernel.kernel_dim {
            DiscoveryStatus::Complete
        } else {
            DiscoveryStatus::Partial
        };
        MoietyReport {
            kernel_dim: kernel.kernel_dim,
            matched: kernel.matched.clone(),
            int_kernel_dim: self.moieties.len(),
            int_matched: self.int_matched.to_vec(),
            species_indices: self.moieties.iter().map(|m| m.species().to_vec()).collect(),
            coefficients: self
                .moieties
                .iter()
                .map(|m| m.coefficients().to_vec())
                .collect(),
            conservation_laws: kernel.conservation_laws.clone(),
            status,
        }
    }
}

/// One-call entry point: flat row-major (reaction, metabolite) values.
pub fn compute_moiety_conservation_laws(
    values: Vec<f64>,
    number_of_metabolites: usize,
    number_of_reactions: usize,
    config: MoietyConfig,
) -> Result<MoietyReport, ConservationError> {
    let matrix = StoichiometricMatrix::from_flat(values, number_of_metabolites, number_of_reactions)?;
    MoietyAnalyzer::new(matrix, config)?.compute()
}
