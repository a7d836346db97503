//! Aligned multi-series input.

use std::collections::HashMap;

use tracing::warn;

use crate::error::CorrelationError;

/// Ordered rows of optional samples, one column per named series.
///
/// Row order is time order. Every row has one slot per symbol; a slot is
/// `None` when the sample is absent. Non-finite samples are stored as
/// `None` so that NaN never reaches the correlation arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    symbols: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl SeriesSet {
    /// Creates a series set from a symbol header and dense rows.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError`] if `rows` is empty, `symbols` is empty
    /// or contains duplicates, or a row's width differs from the header.
    pub fn new(symbols: Vec<String>, rows: Vec<Vec<Option<f64>>>) -> Result<Self, CorrelationError> {
        if rows.is_empty() {
            return Err(CorrelationError::EmptySeriesSet);
        }
        if symbols.is_empty() {
            return Err(CorrelationError::NoSymbols);
        }
        check_unique(&symbols)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != symbols.len() {
                return Err(CorrelationError::RowWidthMismatch {
                    row: i,
                    expected: symbols.len(),
                    got: row.len(),
                });
            }
        }
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(sanitize).collect())
            .collect();
        Ok(Self { symbols, rows })
    }

    /// Creates a series set from keyed rows.
    ///
    /// The keys of the first row, in iteration order, become the symbols.
    /// In later rows a missing key is an absent sample and an unknown key is
    /// ignored with a warning.
    ///
    /// # Example
    ///
    /// ```
    /// use marlin_correlation::SeriesSet;
    ///
    /// let set = SeriesSet::from_rows(vec![
    ///     vec![("BTC", Some(1.0)), ("ETH", Some(2.0))],
    ///     vec![("BTC", Some(1.5)), ("ETH", None)],
    /// ])
    /// .unwrap();
    /// assert_eq!(set.symbols(), &["BTC", "ETH"]);
    /// assert_eq!(set.n_rows(), 2);
    /// ```
    pub fn from_rows<I, R, K>(rows: I) -> Result<Self, CorrelationError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Option<f64>)>,
        K: Into<String>,
    {
        let mut rows = rows.into_iter();
        let first: Vec<(String, Option<f64>)> = match rows.next() {
            Some(r) => r.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            None => return Err(CorrelationError::EmptySeriesSet),
        };
        if first.is_empty() {
            return Err(CorrelationError::NoSymbols);
        }

        let symbols: Vec<String> = first.iter().map(|(k, _)| k.clone()).collect();
        check_unique(&symbols)?;
        let index: HashMap<&str, usize> = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let mut dense = vec![first.into_iter().map(|(_, v)| sanitize(v)).collect::<Vec<_>>()];
        for (r, row) in rows.enumerate() {
            let mut values = vec![None; symbols.len()];
            for (key, value) in row {
                let key: String = key.into();
                match index.get(key.as_str()) {
                    Some(&col) => values[col] = sanitize(value),
                    None => warn!(row = r + 1, symbol = %key, "ignoring unknown symbol"),
                }
            }
            dense.push(values);
        }

        Ok(Self {
            symbols,
            rows: dense,
        })
    }

    /// Returns the symbols in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the number of rows (time steps).
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of series.
    pub fn n_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the column index of `symbol`.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Returns row `i`.
    pub fn row(&self, i: usize) -> Option<&[Option<f64>]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// Returns a mask of rows with every sample present.
    pub(crate) fn complete_rows(&self) -> Vec<bool> {
        self.rows
            .iter()
            .map(|row| row.iter().all(Option::is_some))
            .collect()
    }

    /// Extracts columns `a` and `b`, dropping rows where either is absent
    /// or where `mask` (if given) is `false`.
    pub(crate) fn paired_samples(
        &self,
        a: usize,
        b: usize,
        mask: Option<&[bool]>,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(self.rows.len());
        let mut ys = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if mask.is_some_and(|m| !m[i]) {
                continue;
            }
            if let (Some(x), Some(y)) = (row[a], row[b]) {
                xs.push(x);
                ys.push(y);
            }
        }
        (xs, ys)
    }
}

fn sanitize(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn check_unique(symbols: &[String]) -> Result<(), CorrelationError> {
    let mut seen = std::collections::HashSet::with_capacity(symbols.len());
    for s in symbols {
        if !seen.insert(s.as_str()) {
            return Err(CorrelationError::DuplicateSymbol { symbol: s.clone() });
        }
    }
    Ok(())
}
