//! eng
//! Conservation laws of a chemical reaction network and the conserved moieties among them.
//! A conservation law is a left null vector v of the stoichiometric matrix S (v^T S = 0): the amount
//! sum_i v_i c_i stays constant whatever the reaction rates are. A conserved moiety is a conservation law
//! with nonnegative integer coefficients, a chemical group that is only passed from one species to another.
//! The computation goes as follows:
//! 1) the left null space is found by sparse Gaussian elimination, same-signed basis vectors are moieties already
//! 2) the remaining moieties are searched by simulated annealing over nonnegative integer vectors on the
//! quadratic form |S^T num|^2
//! 3) every found moiety is checked for independence and the whole set is reduced to a canonical form
//! 4) when the annealing keeps failing, a Motzkin relaxation decides whether any moiety is left to find
//!
//! Example
//! ```rust, ignore
//! use ConservedMoieties::ConservationLaws::moiety_analyzer::compute_moiety_conservation_laws;
//! use ConservedMoieties::ConservationLaws::moiety_config::MoietyConfig;
//! // E + S -> ES, ES -> E + P, row-major (reaction, metabolite)
//! let values = vec![-1.0, -1.0, 1.0, 0.0, 1.0, 0.0, -1.0, 1.0];
//! let report = compute_moiety_conservation_laws(values, 4, 2, MoietyConfig::new().with_seed(42)).unwrap();
//! assert_eq!(report.kernel_dim, 2);
//! for line in report.summary() {
//!     println!("{}", line);
//! }
//! ```

/// error types of the analysis
pub mod conservation_errors;
/// sorted sparse row with the row operations of the elimination
pub mod sparse_row;
/// iterative pivot ordering of row indices
pub mod ordering;
/// pivot-merging Gaussian elimination shared by kernel, independence check and relaxation
pub mod elimination;
pub mod species_set;
/// input matrix: reactions x metabolites
pub mod stoichiometric_matrix;
pub mod moiety;
/// left null space of the stoichiometric matrix
pub mod kernel;
pub mod interaction_graph;
pub mod independence;
/// canonical form of a moiety set
pub mod reduce;
/// simulated annealing search of moieties
pub mod monte_carlo;
/// Motzkin relaxation fallback
pub mod relaxation;
pub mod moiety_config;
pub mod moiety_output;
/// driver of the whole discovery
pub mod moiety_analyzer;

/// magnitude under which a coefficient counts as zero
pub const MIN: f64 = 1e-9;
/// pivot key of an empty row, sorts after every column index
pub const NO_PIVOT: i64 = 1_000_000_000;
