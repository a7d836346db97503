//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};

use crate::config::*;

use marlin_cluster::KMeansConfig;
use marlin_correlation::{CorrelationConfig, CorrelationEngine, CorrelationMethod};
use marlin_optimize::{GradientDescentConfig, NelderMeadConfig, OptimizationMethod};
use marlin_task::{TaskDefaults, TaskEngine};

/// Builds a validated [`CorrelationConfig`] from the TOML correlation section.
pub fn build_correlation_config(c: &CorrelationToml) -> Result<CorrelationConfig> {
    let method: CorrelationMethod = c.method.parse().context("invalid [correlation].method")?;
    let cfg = CorrelationConfig::new()
        .with_method(method)
        .with_pairwise(c.pairwise)
        .with_min_periods(c.min_periods);
    cfg.validate().context("invalid [correlation] settings")?;
    Ok(cfg)
}

/// Builds a validated [`KMeansConfig`] from the TOML clustering section.
pub fn build_kmeans_config(c: &ClusteringToml) -> Result<KMeansConfig> {
    let cfg = KMeansConfig::new(c.k)
        .with_max_iterations(c.max_iterations)
        .with_tolerance(c.tolerance)
        .with_yield_every(c.yield_every);
    cfg.validate().context("invalid [clustering] settings")?;
    Ok(cfg)
}

/// Builds a validated [`GradientDescentConfig`] from the TOML section.
pub fn build_gradient_descent_config(c: &GradientDescentToml) -> Result<GradientDescentConfig> {
    let cfg = GradientDescentConfig::new()
        .with_learning_rate(c.learning_rate)
        .with_max_iterations(c.max_iterations)
        .with_tolerance(c.tolerance)
        .with_step(c.step)
        .with_report_every(c.report_every);
    cfg.validate()
        .context("invalid [optimization.gradient_descent] settings")?;
    Ok(cfg)
}

/// Builds a validated [`NelderMeadConfig`] from the TOML section.
pub fn build_nelder_mead_config(c: &NelderMeadToml) -> Result<NelderMeadConfig> {
    let cfg = NelderMeadConfig::new()
        .with_max_iterations(c.max_iterations)
        .with_sd_tolerance(c.sd_tolerance)
        .with_initial_step(c.initial_step);
    cfg.validate()
        .context("invalid [optimization.nelder_mead] settings")?;
    Ok(cfg)
}

/// Builds the per-request defaults applied by the task engine.
pub fn build_task_defaults(config: &MarlinConfig) -> Result<TaskDefaults> {
    let method: OptimizationMethod = config
        .optimization
        .method
        .parse()
        .context("invalid [optimization].method")?;
    Ok(TaskDefaults {
        correlation: build_correlation_config(&config.correlation)?,
        clustering: build_kmeans_config(&config.clustering)?,
        method,
        gradient_descent: build_gradient_descent_config(&config.optimization.gradient_descent)?,
        nelder_mead: build_nelder_mead_config(&config.optimization.nelder_mead)?,
        seed: config.seed,
    })
}

/// Builds a task engine with the configured cache capacity and defaults.
pub fn build_task_engine(config: &MarlinConfig) -> Result<TaskEngine> {
    let correlation = CorrelationEngine::with_capacity(config.correlation.cache_capacity)
        .context("invalid [correlation].cache_capacity")?;
    Ok(TaskEngine::with_correlation_engine(
        correlation,
        build_task_defaults(config)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_defaults() {
        let defaults = build_task_defaults(&MarlinConfig::default()).unwrap();
        assert_eq!(defaults, TaskDefaults::default());
    }

    #[test]
    fn test_unknown_correlation_method() {
        let mut cfg = MarlinConfig::default();
        cfg.correlation.method = "spearman".to_string();
        let err = build_task_defaults(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("[correlation].method"));
    }

    #[test]
    fn test_method_alias() {
        let mut cfg = MarlinConfig::default();
        cfg.optimization.method = "nelder-mead".to_string();
        let defaults = build_task_defaults(&cfg).unwrap();
        assert_eq!(defaults.method, OptimizationMethod::NelderMead);
    }

    #[test]
    fn test_invalid_k_rejected() {
        let mut cfg = MarlinConfig::default();
        cfg.clustering.k = 0;
        assert!(build_kmeans_config(&cfg.clustering).is_err());
    }

    #[test]
    fn test_cache_capacity_applied() {
        let mut cfg = MarlinConfig::default();
        cfg.correlation.cache_capacity = 7;
        let engine = build_task_engine(&cfg).unwrap();
        assert_eq!(engine.correlation().cache_stats().capacity, 7);
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let mut cfg = MarlinConfig::default();
        cfg.correlation.cache_capacity = 0;
        assert!(build_task_engine(&cfg).is_err());
    }
}
