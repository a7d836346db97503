//! Cluster command: K-means over a JSON point file.

use anyhow::Result;
use serde_json::{Map, Value, json};
use tracing::info_span;

use crate::cli::ClusterArgs;
use crate::oneshot;

/// Run a single clustering request.
pub fn run(args: ClusterArgs, config: Option<&std::path::Path>) -> Result<()> {
    let _cmd = info_span!("cluster").entered();
    let payload = oneshot::read_json(&args.input)?;
    oneshot::run(
        config,
        oneshot::cli_request("KMEANS_CLUSTERING", payload, options(&args)),
    )
}

/// Request options carrying only the flags the user set.
fn options(args: &ClusterArgs) -> Value {
    let mut opts = Map::new();
    if let Some(k) = args.k {
        opts.insert("k".to_string(), json!(k));
    }
    if let Some(max_iterations) = args.max_iterations {
        opts.insert("maxIterations".to_string(), json!(max_iterations));
    }
    if let Some(seed) = args.seed {
        opts.insert("seed".to_string(), json!(seed));
    }
    Value::Object(opts)
}
