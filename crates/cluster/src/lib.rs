//! K-means clustering with K-means++ seeding and silhouette scoring.
//!
//! ```
//! use marlin_cluster::{KMeansConfig, kmeans};
//! use marlin_progress::{CancelToken, NullSink, Reporter};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let points = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![9.0, 9.0], vec![9.1, 9.0]];
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut sink = NullSink;
//! let mut reporter = Reporter::new(&mut sink, CancelToken::new());
//!
//! let result = kmeans(&points, &KMeansConfig::new(2), &mut rng, &mut reporter).unwrap();
//! assert_eq!(result.assignments()[0], result.assignments()[1]);
//! assert_ne!(result.assignments()[0], result.assignments()[2]);
//! ```

mod config;
mod error;
mod kmeans;
mod result;
mod seed;
mod silhouette;

pub use config::KMeansConfig;
pub use error::ClusterError;
pub use kmeans::kmeans;
pub use result::KMeansResult;
