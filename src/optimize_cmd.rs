//! Optimize command: minimise a built-in objective from a starting point.

use anyhow::Result;
use serde_json::{Map, Value, json};
use tracing::info_span;

use crate::cli::{ObjectiveArg, OptimizeArgs};
use crate::oneshot;

/// Run a single optimization request.
pub fn run(args: OptimizeArgs, config: Option<&std::path::Path>) -> Result<()> {
    let _cmd = info_span!("optimize").entered();
    oneshot::run(
        config,
        oneshot::cli_request("OPTIMIZATION", payload(&args), options(&args)),
    )
}

fn payload(args: &OptimizeArgs) -> Value {
    let objective = match args.objective {
        ObjectiveArg::Sphere => json!({ "kind": "sphere" }),
        ObjectiveArg::Rosenbrock => json!({ "kind": "rosenbrock" }),
    };
    json!({
        "objective": objective,
        "initialGuess": args.initial,
    })
}

/// Request options carrying only the flags the user set.
fn options(args: &OptimizeArgs) -> Value {
    let mut opts = Map::new();
    if let Some(method) = &args.method {
        opts.insert("method".to_string(), json!(method));
    }
    if let Some(max_iterations) = args.max_iterations {
        opts.insert("maxIterations".to_string(), json!(max_iterations));
    }
    Value::Object(opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_and_options() {
        let args = OptimizeArgs {
            objective: ObjectiveArg::Rosenbrock,
            initial: vec![-1.2, 1.0],
            method: Some("nelder-mead".to_string()),
            max_iterations: Some(500),
        };
        assert_eq!(
            payload(&args),
            json!({ "objective": { "kind": "rosenbrock" }, "initialGuess": [-1.2, 1.0] })
        );
        assert_eq!(
            options(&args),
            json!({ "method": "nelder-mead", "maxIterations": 500 })
        );
    }
}
