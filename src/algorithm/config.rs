//! Algorithm configuration.
//!
//! [`AlgorithmConfig`] holds the parameters that control the generational
//! loop; [`Variant`] names the driver that runs it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration of an evolutionary run.
///
/// # Defaults
///
/// ```
/// use u_evopath::algorithm::AlgorithmConfig;
///
/// let config = AlgorithmConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations_count, 100);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evopath::algorithm::AlgorithmConfig;
///
/// let config = AlgorithmConfig::default()
///     .with_population_size(20)
///     .with_generations_count(300)
///     .with_mutation_rate(0.2)
///     .with_seed(42);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Probability of mutating an offspring (0.0–1.0).
    ///
    /// Only read by [`OffspringMode::Genetic`]; graph sampling ignores it.
    pub mutation_rate: f64,

    /// Probability of recombining parents instead of copying one (0.0–1.0).
    ///
    /// Only read by [`OffspringMode::Genetic`]; graph sampling ignores it.
    pub crossover_rate: f64,

    /// Number of individuals in the initial population.
    pub population_size: usize,

    /// Maximum number of generations.
    pub generations_count: usize,

    /// Attempt budget for one random path construction.
    pub max_path_attempts: usize,

    /// Random seed for reproducibility; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.1,
            crossover_rate: 0.9,
            population_size: 50,
            generations_count: 100,
            max_path_attempts: 100,
            seed: None,
        }
    }
}

impl AlgorithmConfig {
    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_generations_count(mut self, n: usize) -> Self {
        self.generations_count = n;
        self
    }

    /// Sets the attempt budget for random path construction.
    pub fn with_max_path_attempts(mut self, n: usize) -> Self {
        self.max_path_attempts = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::InvalidConfig(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if self.population_size == 0 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.generations_count == 0 {
            return Err(Error::InvalidConfig(
                "generations_count must be at least 1".into(),
            ));
        }
        if self.max_path_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_path_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Generational update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Roulette parents, one parent replaced per generation.
    #[default]
    Canonical,
    /// Steady state: the worst individual is replaced.
    Genitor,
    /// Dissimilar parents, offspring added and the worst dropped.
    Chc,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Canonical => "canonical",
            Variant::Genitor => "genitor",
            Variant::Chc => "chc",
        })
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "canonical" => Ok(Variant::Canonical),
            "genitor" => Ok(Variant::Genitor),
            "chc" => Ok(Variant::Chc),
            other => Err(Error::InvalidConfig(format!("unknown variant '{other}'"))),
        }
    }
}

/// How the solver produces each generation's offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffspringMode {
    /// A fresh random round trip from the graph; parents are ignored.
    #[default]
    Sampling,
    /// Route crossover and swap mutation at the configured rates.
    Genetic,
}

impl fmt::Display for OffspringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OffspringMode::Sampling => "sampling",
            OffspringMode::Genetic => "genetic",
        })
    }
}

impl FromStr for OffspringMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sampling" => Ok(OffspringMode::Sampling),
            "genetic" => Ok(OffspringMode::Genetic),
            other => Err(Error::InvalidConfig(format!(
                "unknown offspring mode '{other}'"
            ))),
        }
    }
}

/// Lifecycle of an evolutionary run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverState {
    /// Building or receiving the initial population.
    Initializing,
    /// Running generations.
    Evolving,
    /// Stopped because the finish condition held.
    Converged,
    /// Stopped after the last generation.
    Terminated,
}

impl DriverState {
    /// Returns `true` for [`Converged`](Self::Converged) and
    /// [`Terminated`](Self::Terminated).
    pub fn is_final(self) -> bool {
        matches!(self, DriverState::Converged | DriverState::Terminated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AlgorithmConfig::default();
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert_eq!(config.max_path_attempts, 100);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_clamps_rates() {
        let config = AlgorithmConfig::default()
            .with_mutation_rate(1.5)
            .with_crossover_rate(-0.5)
            .with_max_path_attempts(7);
        assert_eq!(config.mutation_rate, 1.0);
        assert_eq!(config.crossover_rate, 0.0);
        assert_eq!(config.max_path_attempts, 7);
    }

    #[test]
    fn test_validate() {
        assert!(AlgorithmConfig::default().with_population_size(0).validate().is_err());
        assert!(AlgorithmConfig::default().with_generations_count(0).validate().is_err());
        assert!(AlgorithmConfig::default().with_max_path_attempts(0).validate().is_err());

        let mut raw = AlgorithmConfig::default();
        raw.mutation_rate = 2.0;
        assert!(matches!(raw.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_serde_partial() {
        let config: AlgorithmConfig =
            serde_json::from_str(r#"{"population_size": 8, "seed": 3}"#).expect("valid json");
        assert_eq!(config.population_size, 8);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.generations_count, 100);
    }

    #[test]
    fn test_variant_parse_and_display() {
        assert_eq!("GENITOR".parse::<Variant>(), Ok(Variant::Genitor));
        assert_eq!("chc".parse::<Variant>(), Ok(Variant::Chc));
        assert!("steady".parse::<Variant>().is_err());
        assert_eq!(Variant::Canonical.to_string(), "canonical");
        assert_eq!(serde_json::to_string(&Variant::Chc).expect("serializable"), "\"chc\"");
    }

    #[test]
    fn test_offspring_mode_parse_and_serde() {
        assert_eq!(OffspringMode::default(), OffspringMode::Sampling);
        assert_eq!("Genetic".parse::<OffspringMode>(), Ok(OffspringMode::Genetic));
        assert!("crossover".parse::<OffspringMode>().is_err());
        assert_eq!(OffspringMode::Sampling.to_string(), "sampling");
        let mode: OffspringMode = serde_json::from_str("\"genetic\"").expect("valid json");
        assert_eq!(mode, OffspringMode::Genetic);
    }

    #[test]
    fn test_driver_state_final() {
        assert!(!DriverState::Evolving.is_final());
        assert!(DriverState::Converged.is_final());
        assert!(DriverState::Terminated.is_final());
    }
}
