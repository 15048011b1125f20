use ndarray::arr2;
use ndarray_rand::rand::SeedableRng;
use pbatch_doe::{
    CaseTable, DesignComposer, Grid, Lhs, LhsKind, NameGenerator, SamplingMethod, VariableSpec,
    VariableSpecTable, CASE_TABLE_LABEL,
};
use rand_xoshiro::Xoshiro256Plus;

fn main() {
    let xlimits = arr2(&[[0., 1.], [-10., 10.], [5., 15.]]);
    let n = 8;

    println!("Take {n} LHS samples in");
    println!("{xlimits}\n");

    println!("*** using classic latin hypercube sampling");
    let samples = Lhs::new(&xlimits).sample(n);
    println!("{samples}\n");

    println!("*** using centered latin hypercube sampling");
    let samples = Lhs::new(&xlimits).kind(LhsKind::Centered).sample(n);
    println!("{samples}\n");

    println!("*** a 5-level grid over [0, 1]");
    println!("{}\n", Grid::new(0., 1., 5).levels());

    println!("*** composing a mixed-strategy batch design");
    let specs = VariableSpecTable::new(vec![
        VariableSpec::lhs("velocity", 0., 10.),
        VariableSpec::lin("angle", 0., 90., 4),
        VariableSpec::constant("mass", 5.),
    ]);
    let rng = Xoshiro256Plus::seed_from_u64(42);
    let design = DesignComposer::new(&specs)
        .n_samples(n)
        .with_rng(rng.clone())
        .compose()
        .expect("design composed");
    println!(
        "{} rows ({} before deduplication)",
        design.n_rows(),
        design.pre_dedup_count()
    );
    println!("{}\n", design.matrix());

    let names = NameGenerator::new()
        .with_rng(rng)
        .generate(design.n_rows())
        .expect("unique names");
    let table = CaseTable::assemble(CASE_TABLE_LABEL, &specs, &names, &design).expect("table");
    for record in table.records().iter().take(4) {
        println!("{}", record.join(","));
    }
}
