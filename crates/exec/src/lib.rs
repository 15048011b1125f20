/*!
This library executes batch runs described by a case table: for every row
it hands the parameter values to a user-supplied case function and persists
the merged input/output mapping as one `.npz` archive per run.

The case function contract is explicit and narrow: a callable registered
under a name in a [CaseRegistry], taking the variable names as
keyword-style map keys and returning a string-keyed map of results.
Rows are dispatched across a bounded [rayon] worker pool after a single-row
preflight execution, so configuration errors fail fast instead of after
spooling many workers.

Example:
```no_run
use pbatch_exec::{BatchRunner, CaseFile, CaseRegistry, RunConfig};
use std::collections::BTreeMap;

let mut registry = CaseRegistry::new();
registry.register("sum", |params: &BTreeMap<String, f64>| {
    let total = params.values().sum::<f64>();
    Ok(BTreeMap::from([("total".to_string(), total)]))
});

let cases = CaseFile::read("batch_cases.csv")?;
let runner = BatchRunner::new(RunConfig::default());
let run_dir = runner.run(&cases, &registry.lookup("sum")?)?;
println!("artifacts in {}", run_dir.display());
# Ok::<(), pbatch_exec::ExecError>(())
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod cases;
mod errors;
mod registry;
mod runner;

pub use cases::*;
pub use errors::*;
pub use registry::*;
pub use runner::*;
