/*!
This library builds experimental design matrices for batch runs: tables of
parameter rows, one row per independent execution of a user function.

Each variable of the design space declares its own sampling strategy:

* **LHS**: all LHS variables are sampled jointly with a
  [Latin Hypercube](https://en.wikipedia.org/wiki/Latin_hypercube_sampling)
  design, so their marginals are stratified over the requested sample count,
* **LIN**: an independent, deterministic grid of evenly spaced points,
* **CONST**: a single fixed value broadcast into every row.

The [DesignComposer] merges these heterogeneous sources into one matrix:
the LHS block enters the Cartesian product as a single joint dimension
(whole rows, never column-by-column), each grid is an independent dimension,
and constants are broadcast. Duplicate rows are removed and the surviving
rows get unique `BatchRun_<id>` names before being assembled into a
[CaseTable] ready for CSV serialization.

Example:
```
use pbatch_doe::{CaseTable, DesignComposer, NameGenerator, VariableSpec, VariableSpecTable};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

let specs = VariableSpecTable::new(vec![
    VariableSpec::lhs("velocity", 0., 10.),
    VariableSpec::lin("angle", 0., 1., 3),
    VariableSpec::constant("mass", 5.),
]);
let design = DesignComposer::new(&specs)
    .n_samples(4)
    .with_rng(Xoshiro256Plus::seed_from_u64(42))
    .compose()
    .expect("valid design");
// 4 LHS rows x 3 grid levels, constants broadcast
assert_eq!(design.matrix().ncols(), 3);

let names = NameGenerator::new()
    .with_rng(Xoshiro256Plus::seed_from_u64(42))
    .generate(design.n_rows())
    .expect("unique names");
let table = CaseTable::assemble("Variable Names", &specs, &names, &design).expect("table");
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod composer;
mod errors;
mod grid;
mod lhs;
mod names;
mod spec;
mod table;
mod traits;

pub use composer::*;
pub use errors::*;
pub use grid::*;
pub use lhs::*;
pub use names::*;
pub use spec::*;
pub use table::*;
pub use traits::*;
