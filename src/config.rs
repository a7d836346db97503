use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "marlin.toml";

/// Top-level Marlin configuration.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MarlinConfig {
    /// Global RNG seed for K-means++ seeding.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Correlation settings.
    #[serde(default)]
    pub correlation: CorrelationToml,

    /// K-means settings.
    #[serde(default)]
    pub clustering: ClusteringToml,

    /// Optimizer settings.
    #[serde(default)]
    pub optimization: OptimizationToml,
}

impl MarlinConfig {
    /// Loads configuration from `path`, or from `marlin.toml` in the working
    /// directory if it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let toml_str = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorrelationToml {
    #[serde(default = "default_correlation_method")]
    pub method: String,
    #[serde(default = "default_true")]
    pub pairwise: bool,
    #[serde(default = "default_min_periods")]
    pub min_periods: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for CorrelationToml {
    fn default() -> Self {
        Self {
            method: default_correlation_method(),
            pairwise: true,
            min_periods: default_min_periods(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_correlation_method() -> String {
    "pearson".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_periods() -> usize {
    30
}

fn default_cache_capacity() -> usize {
    100
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClusteringToml {
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_kmeans_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_kmeans_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_yield_every")]
    pub yield_every: usize,
}

impl Default for ClusteringToml {
    fn default() -> Self {
        Self {
            k: default_k(),
            max_iterations: default_kmeans_max_iterations(),
            tolerance: default_kmeans_tolerance(),
            yield_every: default_yield_every(),
        }
    }
}

fn default_k() -> usize {
    3
}

fn default_kmeans_max_iterations() -> usize {
    100
}

fn default_kmeans_tolerance() -> f64 {
    1e-6
}

fn default_yield_every() -> usize {
    10
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OptimizationToml {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub gradient_descent: GradientDescentToml,
    #[serde(default)]
    pub nelder_mead: NelderMeadToml,
}

impl Default for OptimizationToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            gradient_descent: GradientDescentToml::default(),
            nelder_mead: NelderMeadToml::default(),
        }
    }
}

fn default_method() -> String {
    "gradient_descent".to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradientDescentToml {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_optimizer_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_gd_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default = "default_report_every")]
    pub report_every: usize,
}

impl Default for GradientDescentToml {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            max_iterations: default_optimizer_max_iterations(),
            tolerance: default_gd_tolerance(),
            step: default_step(),
            report_every: default_report_every(),
        }
    }
}

fn default_learning_rate() -> f64 {
    0.01
}

fn default_optimizer_max_iterations() -> usize {
    1000
}

fn default_gd_tolerance() -> f64 {
    1e-6
}

fn default_step() -> f64 {
    1e-8
}

fn default_report_every() -> usize {
    50
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NelderMeadToml {
    #[serde(default = "default_optimizer_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
}

impl Default for NelderMeadToml {
    fn default() -> Self {
        Self {
            max_iterations: default_optimizer_max_iterations(),
            sd_tolerance: default_sd_tolerance(),
            initial_step: default_initial_step(),
        }
    }
}

fn default_sd_tolerance() -> f64 {
    1e-8
}

fn default_initial_step() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg: MarlinConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, MarlinConfig::default());
        assert_eq!(cfg.correlation.min_periods, 30);
        assert_eq!(cfg.correlation.cache_capacity, 100);
        assert_eq!(cfg.clustering.k, 3);
        assert_eq!(cfg.optimization.gradient_descent.report_every, 50);
        assert_eq!(cfg.optimization.nelder_mead.initial_step, 0.5);
    }

    #[test]
    fn test_partial_sections() {
        let cfg: MarlinConfig = toml::from_str(
            r#"
            seed = 7

            [correlation]
            min_periods = 5
            pairwise = false

            [optimization]
            method = "nelder_mead"

            [optimization.nelder_mead]
            max_iterations = 250
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.correlation.min_periods, 5);
        assert!(!cfg.correlation.pairwise);
        assert_eq!(cfg.correlation.method, "pearson");
        assert_eq!(cfg.optimization.method, "nelder_mead");
        assert_eq!(cfg.optimization.nelder_mead.max_iterations, 250);
        assert_eq!(cfg.optimization.gradient_descent.max_iterations, 1000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = toml::from_str::<MarlinConfig>("[clustering]\nclusters = 4\n").unwrap_err();
        assert!(err.to_string().contains("clusters"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[clustering]\nk = 5").unwrap();
        let cfg = MarlinConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.clustering.k, 5);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarlinConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
