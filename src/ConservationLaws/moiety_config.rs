//! # Moiety search configuration
//!
//! Parameters of the simulated annealing search and of the relaxation fallback,
//! stored as JSON. Every field has a default, so a partial file is valid:
//! ```json
//! {
//!   "init_t": 1.0,
//!   "cool_rate": 0.001,
//!   "max_iter": 10,
//!   "max_num_monte_carlo": 20,
//!   "relaxation_max": 1000000,
//!   "relaxation_step": 1.9,
//!   "max_relaxation_rounds": 10,
//!   "seed": 42
//! }
//! ```
use super::conservation_errors::ConservationError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoietyConfig {
    /// initial annealing temperature
    pub init_t: f64,
    /// temperature decrement applied every `dim` annealing steps
    pub cool_rate: f64,
    /// one search gives up after `10 * max_iter` restarts
    pub max_iter: usize,
    /// consecutive failed searches before the relaxation fallback runs
    pub max_num_monte_carlo: usize,
    /// iteration budget of the Motzkin relaxation
    pub relaxation_max: usize,
    /// over-relaxation factor of the Motzkin projection
    pub relaxation_step: f64,
    /// relaxation rounds after which the search stops with a partial result
    pub max_relaxation_rounds: usize,
    /// seed of the random generator; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for MoietyConfig {
    fn default() -> Self {
        Self {
            init_t: 1.0,
            cool_rate: 1e-3,
            max_iter: 10,
            max_num_monte_carlo: 20,
            relaxation_max: 1_000_000,
            relaxation_step: 1.9,
            max_relaxation_rounds: 10,
            seed: None,
        }
    }
}

impl MoietyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads the configuration from a JSON file; a missing file gives the defaults.
    pub fn load(config_file: &str) -> Result<Self, ConservationError> {
        if !Path::new(config_file).exists() {
            info!(
                "config file '{}' not found, using default moiety search settings",
                config_file
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config = Self::from_json_str(&content)?;
        info!("moiety search settings loaded from '{}'", config_file);
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConservationError> {
        let config: MoietyConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config_file: &str) -> Result<(), ConservationError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConservationError> {
        if !(self.init_t > 0.0) {
            return Err(ConservationError::InvalidConfig(format!(
                "init_t must be positive, got {}",
                self.init_t
            )));
        }
        if !(self.cool_rate > 0.0) {
            return Err(ConservationError::InvalidConfig(format!(
                "cool_rate must be positive, got {}",
                self.cool_rate
            )));
        }
        if !(self.relaxation_step > 0.0) {
            return Err(ConservationError::InvalidConfig(format!(
                "relaxation_step must be positive, got {}",
                self.relaxation_step
            )));
        }
        for (name, value) in [
            ("max_iter", self.max_iter),
            ("max_num_monte_carlo", self.max_num_monte_carlo),
            ("relaxation_max", self.relaxation_max),
            ("max_relaxation_rounds", self.max_relaxation_rounds),
        ] {
            if value == 0 {
                return Err(ConservationError::InvalidConfig(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = MoietyConfig::default();
        assert_eq!(config.init_t, 1.0);
        assert_eq!(config.cool_rate, 1e-3);
        assert_eq!(config.max_iter, 10);
        assert_eq!(config.relaxation_max, 1_000_000);
        assert_eq!(config.relaxation_step, 1.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MoietyConfig::from_json_str(r#"{"max_iter": 3, "seed": 11}"#).unwrap();
        assert_eq!(config.max_iter, 3);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.cool_rate, 1e-3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = MoietyConfig::from_json_str(r#"{"cool_rate": 0.0}"#);
        assert!(matches!(result, Err(ConservationError::InvalidConfig(_))));
        let result = MoietyConfig::from_json_str(r#"{"max_num_monte_carlo": 0}"#);
        assert!(matches!(result, Err(ConservationError::InvalidConfig(_))));
        let result = MoietyConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConservationError::Json(_))));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{"init_t": 2.5, "relaxation_step": 1.5}}"#).unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        let config = MoietyConfig::load(file_path).unwrap();
        assert_eq!(config.init_t, 2.5);
        assert_eq!(config.relaxation_step, 1.5);

        let missing = MoietyConfig::load("no_such_moiety_config.json").unwrap();
        assert_eq!(missing, MoietyConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        let config = MoietyConfig::new().with_seed(5);
        config.save(file_path).unwrap();
        assert_eq!(MoietyConfig::load(file_path).unwrap(), config);
    }
}
