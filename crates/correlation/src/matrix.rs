//! Output types for correlation computation.

use crate::config::CorrelationMethod;

/// Symmetric correlation matrix with unit diagonal.
///
/// Entries for pairs with too few samples or zero variance are `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    /// Row-major `n × n`.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Creates an identity matrix over `symbols`.
    pub(crate) fn identity(symbols: Vec<String>) -> Self {
        let n = symbols.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
        }
        Self { symbols, values }
    }

    /// Sets `(i, j)` and `(j, i)` together.
    pub(crate) fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        let n = self.symbols.len();
        self.values[i * n + j] = value;
        self.values[j * n + i] = value;
    }

    /// Returns the symbols labelling rows and columns.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the matrix dimension.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` for a 0×0 matrix.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the entry at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        let n = self.symbols.len();
        assert!(i < n && j < n, "index ({i}, {j}) out of range for {n}x{n}");
        self.values[i * n + j]
    }

    /// Returns the correlation between two named series.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.at(i, j))
    }

    /// Returns row `i`.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let n = self.symbols.len();
        (i < n).then(|| &self.values[i * n..(i + 1) * n])
    }

    /// Returns the matrix as nested rows.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        let n = self.symbols.len();
        if n == 0 {
            return Vec::new();
        }
        self.values.chunks(n).map(<[f64]>::to_vec).collect()
    }
}

/// Summary of a correlation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMetadata {
    /// Symbols in matrix order.
    pub symbols: Vec<String>,
    /// Estimator used.
    pub method: CorrelationMethod,
    /// Number of input rows.
    pub data_points: usize,
    /// Minimum overlapping samples required.
    pub min_periods: usize,
    /// Cache occupancy after the run.
    pub cache_size: usize,
}

/// Result of a correlation matrix computation.
#[derive(Debug, Clone)]
pub struct CorrelationResult {
    matrix: CorrelationMatrix,
    metadata: CorrelationMetadata,
}

impl CorrelationResult {
    pub(crate) fn new(matrix: CorrelationMatrix, metadata: CorrelationMetadata) -> Self {
        Self { matrix, metadata }
    }

    /// Returns the correlation matrix.
    pub fn matrix(&self) -> &CorrelationMatrix {
        &self.matrix
    }

    /// Returns the run metadata.
    pub fn metadata(&self) -> &CorrelationMetadata {
        &self.metadata
    }

    /// Consumes self and returns the parts.
    pub fn into_parts(self) -> (CorrelationMatrix, CorrelationMetadata) {
        (self.matrix, self.metadata)
    }
}

/// Snapshot of cache occupancy and effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached pairs.
    pub size: usize,
    /// Maximum number of cached pairs.
    pub capacity: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identity() {
        let m = CorrelationMatrix::identity(sym(&["a", "b", "c"]));
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.at(i, j), if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_set_pair_symmetric() {
        let mut m = CorrelationMatrix::identity(sym(&["a", "b"]));
        m.set_pair(0, 1, -0.4);
        assert_eq!(m.get("a", "b"), Some(-0.4));
        assert_eq!(m.get("b", "a"), Some(-0.4));
        assert_eq!(m.get("a", "z"), None);
    }

    #[test]
    fn test_row_and_nested() {
        let mut m = CorrelationMatrix::identity(sym(&["a", "b"]));
        m.set_pair(0, 1, 0.25);
        assert_eq!(m.row(1), Some(&[0.25, 1.0][..]));
        assert_eq!(m.row(2), None);
        assert_eq!(m.to_nested(), vec![vec![1.0, 0.25], vec![0.25, 1.0]]);
    }

    #[test]
    fn test_empty() {
        let m = CorrelationMatrix::identity(Vec::new());
        assert!(m.is_empty());
        assert!(m.to_nested().is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_at_out_of_range() {
        let m = CorrelationMatrix::identity(sym(&["a"]));
        m.at(0, 1);
    }
}
