//! Task kinds accepted by the protocol.

use std::fmt;
use std::str::FromStr;

use marlin_progress::Phase;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Operation requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    /// Pairwise correlation matrix over a series set.
    CorrelationMatrix,
    /// K-means clustering of points.
    KmeansClustering,
    /// Minimisation of an objective.
    Optimization,
    /// Correlation cache occupancy report.
    CacheStats,
    /// Empty the correlation cache.
    ClearCache,
}

impl TaskKind {
    /// Every kind, in wire-documentation order.
    pub const ALL: [TaskKind; 5] = [
        Self::CorrelationMatrix,
        Self::KmeansClustering,
        Self::Optimization,
        Self::CacheStats,
        Self::ClearCache,
    ];

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CorrelationMatrix => "CORRELATION_MATRIX",
            Self::KmeansClustering => "KMEANS_CLUSTERING",
            Self::Optimization => "OPTIMIZATION",
            Self::CacheStats => "CACHE_STATS",
            Self::ClearCache => "CLEAR_CACHE",
        }
    }

    /// Returns the progress phase reported for this kind. Cache maintenance
    /// belongs to the correlation phase.
    pub fn phase(&self) -> Phase {
        match self {
            Self::CorrelationMatrix | Self::CacheStats | Self::ClearCache => Phase::Correlation,
            Self::KmeansClustering => Phase::Clustering,
            Self::Optimization => Phase::Optimization,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = TaskError;

    /// Parses a wire name. Unknown names fail with
    /// [`ErrorKind::UnsupportedOperation`](crate::ErrorKind::UnsupportedOperation).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TaskError::unsupported(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_round_trip_names() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.as_str().parse::<TaskKind>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_phase() {
        assert_eq!(TaskKind::KmeansClustering.phase(), Phase::Clustering);
        assert_eq!(TaskKind::Optimization.phase(), Phase::Optimization);
        assert_eq!(TaskKind::ClearCache.phase(), Phase::Correlation);
    }

    #[test]
    fn test_unknown_is_unsupported() {
        let err = "FOURIER_TRANSFORM".parse::<TaskKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("cache_stats".parse::<TaskKind>().is_err());
    }
}
