//! Correlate command: pairwise correlation matrix of a JSON row file.

use anyhow::Result;
use serde_json::{Map, Value, json};
use tracing::info_span;

use crate::cli::CorrelateArgs;
use crate::oneshot;

/// Run a single correlation request.
pub fn run(args: CorrelateArgs, config: Option<&std::path::Path>) -> Result<()> {
    let _cmd = info_span!("correlate").entered();
    let payload = oneshot::read_json(&args.input)?;
    oneshot::run(
        config,
        oneshot::cli_request("CORRELATION_MATRIX", payload, options(&args)),
    )
}

/// Request options carrying only the flags the user set.
fn options(args: &CorrelateArgs) -> Value {
    let mut opts = Map::new();
    if let Some(min_periods) = args.min_periods {
        opts.insert("minPeriods".to_string(), json!(min_periods));
    }
    if args.listwise {
        opts.insert("pairwise".to_string(), json!(false));
    }
    Value::Object(opts)
}
