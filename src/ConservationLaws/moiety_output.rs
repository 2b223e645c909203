use super::conservation_errors::ConservationError;
use super::moiety::ConservationLaw;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::fs;

/// Whether the found moieties explain every conservation law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryStatus {
    /// `int_kernel_dim == kernel_dim`
    Complete,
    /// the search stopped with fewer moieties than conservation laws
    Partial,
}

/// Result of the moiety analysis, in the parallel-array layout consumed by model
/// reduction: `species_indices[k]` and `coefficients[k]` describe moiety `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoietyReport {
    pub kernel_dim: usize,
    pub matched: Vec<usize>,
    pub int_kernel_dim: usize,
    pub int_matched: Vec<usize>,
    pub species_indices: Vec<Vec<usize>>,
    pub coefficients: Vec<Vec<f64>>,
    pub conservation_laws: Vec<ConservationLaw>,
    pub status: DiscoveryStatus,
}

impl MoietyReport {
    pub fn is_complete(&self) -> bool {
        self.status == DiscoveryStatus::Complete
    }

    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "There are {} linearly independent conserved moieties, engaging {} metabolites",
                self.int_kernel_dim,
                self.int_matched.len()
            ),
            format!(
                "There are {} conservation laws, engaging {} metabolites",
                self.kernel_dim,
                self.matched.len()
            ),
        ];
        if self.is_complete() {
            lines.push("They generate all the conservation laws".to_string());
        } else {
            lines.push(format!(
                "They don't generate all the conservation laws, {} of them are not reducible to moieties",
                self.kernel_dim - self.int_kernel_dim
            ));
        }
        lines
    }

    fn species_label(species: usize, names: Option<&[String]>) -> String {
        match names.and_then(|names| names.get(species)) {
            Some(name) => name.clone(),
            None => species.to_string(),
        }
    }

    /// one table per moiety plus a header table with the dimensions
    pub fn pretty_print(&self, names: Option<&[String]>) {
        println!("\n=== CONSERVED MOIETIES ===");
        let mut table = Table::new();
        table.add_row(row!["Quantity", "Value"]);
        table.add_row(row!["conservation laws", self.kernel_dim]);
        table.add_row(row!["metabolites in laws", self.matched.len()]);
        table.add_row(row!["moieties", self.int_kernel_dim]);
        table.add_row(row!["metabolites in moieties", self.int_matched.len()]);
        table.add_row(row!["status", format!("{:?}", self.status)]);
        table.printstd();

        for (k, (species, coefficients)) in
            self.species_indices.iter().zip(&self.coefficients).enumerate()
        {
            println!("\nMoiety {}:", k + 1);
            let mut moiety_table = Table::new();
            moiety_table.add_row(row!["Species", "Coefficient"]);
            for (&s, &c) in species.iter().zip(coefficients) {
                moiety_table.add_row(row![Self::species_label(s, names), format!("{}", c)]);
            }
            moiety_table.printstd();
        }
    }

    pub fn to_json(&self) -> Result<String, ConservationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &str) -> Result<(), ConservationError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
