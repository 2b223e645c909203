use crate::ConservationLaws::conservation_errors::ConservationError;
use crate::ConservationLaws::stoichiometric_matrix::StoichiometricMatrix;
use log::{info, warn};
use regex::Regex;
use std::fs;
use std::path::Path;

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_matrix(
        &self,
        number_of_metabolites: usize,
        number_of_reactions: usize,
    ) -> Result<StoichiometricMatrix, ConservationError> {
        load_stoichiometric_matrix(&self.file_name, number_of_metabolites, number_of_reactions)
    }
    pub fn load_species_names(&self) -> Result<Vec<String>, ConservationError> {
        load_species_names(&self.file_name)
    }
}

fn read_existing(file_name: &str) -> Result<String, ConservationError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(ConservationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File '{}' does not exist", file_name),
        )));
    }
    Ok(fs::read_to_string(path)?)
}

/// Parses numbers separated by whitespace, commas or semicolons.
pub fn parse_numbers(content: &str) -> Result<Vec<f64>, ConservationError> {
    let separators = Regex::new(r"[\s,;]+").map_err(|e| ConservationError::Parse(e.to_string()))?;
    separators
        .split(content.trim())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token.parse::<f64>().map_err(|e| {
                ConservationError::Parse(format!(
                    "token {} '{}' is not a number: {}",
                    position, token, e
                ))
            })
        })
        .collect()
}

/// Loads a stoichiometric matrix stored as numbers in row-major (reaction, metabolite)
/// order, one reaction per line or all on one line; `#` starts a comment line.
pub fn load_stoichiometric_matrix(
    file_name: &str,
    number_of_metabolites: usize,
    number_of_reactions: usize,
) -> Result<StoichiometricMatrix, ConservationError> {
    let content = read_existing(file_name)?;
    let data: String = content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let values = parse_numbers(&data)?;
    let nonzero = values.iter().filter(|v| **v != 0.0).count();
    let matrix = StoichiometricMatrix::from_flat(values, number_of_metabolites, number_of_reactions)?;
    if nonzero == 0 {
        warn!("stoichiometric matrix in '{}' has no nonzero entry", file_name);
    }
    info!(
        "Loaded stoichiometric matrix of {} reactions x {} metabolites ({} nonzero) from '{}'",
        number_of_reactions, number_of_metabolites, nonzero, file_name
    );
    Ok(matrix)
}

/// One species name per non-empty line.
pub fn load_species_names(file_name: &str) -> Result<Vec<String>, ConservationError> {
    let content = read_existing(file_name)?;
    let names: Vec<String> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect();
    info!("Loaded {} species names from '{}'", names.len(), file_name);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_numbers_mixed_separators() {
        let values = parse_numbers("-1\t1 0;\n 0, -2.5  1e0\n").unwrap();
        assert_eq!(values.len(), 6);
        assert_relative_eq!(values[4], -2.5);
        assert_relative_eq!(values[5], 1.0);
        assert!(parse_numbers("").unwrap().is_empty());
        assert!(matches!(parse_numbers("1 x 2"), Err(ConservationError::Parse(_))));
    }

    #[test]
    fn test_load_stoichiometric_matrix() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "# E + S -> ES, ES -> E + P").unwrap();
        writeln!(temp_file, "-1\t-1\t1\t0").unwrap();
        writeln!(temp_file, "1\t0\t-1\t1").unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        let matrix = load_stoichiometric_matrix(file_path, 4, 2).unwrap();
        assert_eq!(matrix.number_of_reactions(), 2);
        assert_relative_eq!(matrix.get(1, 3), 1.0);
        let by_struct = LoadData::new(file_path.to_string()).load_matrix(4, 2).unwrap();
        assert_eq!(by_struct, matrix);

        let wrong_shape = load_stoichiometric_matrix(file_path, 3, 2);
        assert!(matches!(wrong_shape, Err(ConservationError::DimensionMismatch(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_stoichiometric_matrix("no_such_matrix.dat", 2, 1);
        assert!(matches!(result, Err(ConservationError::Io(_))));
        assert!(load_species_names("no_such_names.txt").is_err());
    }

    #[test]
    fn test_load_species_names() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "E\n  S \n\nES\nP").unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        let names = LoadData::new(file_path.to_string()).load_species_names().unwrap();
        assert_eq!(names, vec!["E", "S", "ES", "P"]);
    }
}
