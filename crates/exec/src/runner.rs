use crate::cases::{CaseFile, CaseRow};
use crate::errors::{ExecError, Result};
use crate::registry::CaseFn;
use log::{error, info};
use ndarray::arr0;
use ndarray_npy::NpzWriter;
use rayon::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Batch executor configuration, constructed once and passed into the
/// runner; there is no global state
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// requested number of parallel workers, clamped to the machine
    /// parallelism minus one
    pub parallel: usize,
    /// bypass the single-row preflight execution
    pub skip_preflight: bool,
    /// directory under which the versioned run directory is created
    pub outdir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            parallel: 2,
            skip_preflight: false,
            outdir: PathBuf::from("."),
        }
    }
}

/// Runs every row of a case table through a case function on a bounded
/// worker pool, persisting one self-describing `.npz` archive per run.
pub struct BatchRunner {
    config: RunConfig,
}

impl BatchRunner {
    /// Constructor given the executor configuration
    pub fn new(config: RunConfig) -> Self {
        BatchRunner { config }
    }

    /// Executes the whole batch and returns the run directory.
    ///
    /// Unless disabled, the first row is executed synchronously as a
    /// preflight check before the pool is spooled, and is not re-run
    /// afterwards. A failing row is reported and does not abort its
    /// siblings; the batch ends with [ExecError::FailedRuns] when any row
    /// failed.
    pub fn run(&self, cases: &CaseFile, case_fn: &CaseFn) -> Result<PathBuf> {
        let run_dir = versioned_run_dir(&self.config.outdir);
        std::fs::create_dir_all(&run_dir)?;
        info!("Persisting run artifacts under {run_dir:?}");

        let rows = cases.rows();
        let skip = if self.config.skip_preflight {
            0
        } else {
            info!("Running preflight case '{}'", rows[0].name);
            self.run_case(cases, &rows[0], case_fn, &run_dir)?;
            info!("Preflight completed successfully");
            1
        };

        let workers = effective_workers(self.config.parallel);
        info!("Dispatching {} runs over {workers} workers", rows.len() - skip);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
        let failures: Vec<ExecError> = pool.install(|| {
            rows[skip..]
                .par_iter()
                .filter_map(|row| self.run_case(cases, row, case_fn, &run_dir).err())
                .collect()
        });
        for failure in &failures {
            error!("{failure}");
        }
        if !failures.is_empty() {
            return Err(ExecError::FailedRuns {
                failed: failures.len(),
                total: rows.len(),
            });
        }
        Ok(run_dir)
    }

    /// Executes one row: parameter map in, result map out, merged archive
    /// on disk
    fn run_case(
        &self,
        cases: &CaseFile,
        row: &CaseRow,
        case_fn: &CaseFn,
        run_dir: &Path,
    ) -> Result<()> {
        let params = cases.parameters(row);
        let results = case_fn(&params).map_err(|e| ExecError::CaseFailed {
            name: row.name.clone(),
            reason: e.to_string(),
        })?;
        // the result map wins on key collision
        let mut merged = params;
        merged.extend(results);

        let path = run_dir.join(format!("{}.npz", row.name));
        let mut npz = NpzWriter::new(File::create(&path)?);
        for (key, value) in &merged {
            // np.savez layout: one <key>.npy entry per value
            npz.add_array(format!("{key}.npy"), &arr0(*value))?;
        }
        npz.finish()?;
        Ok(())
    }
}

/// First unused directory among `run`, `run0`, `run1`, ...
fn versioned_run_dir(outdir: &Path) -> PathBuf {
    let base = outdir.join("run");
    if !base.exists() {
        return base;
    }
    let mut i = 0usize;
    loop {
        let candidate = outdir.join(format!("run{i}"));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

/// Clamps the requested worker count to the machine parallelism minus one,
/// keeping at least one worker
fn effective_workers(requested: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let cap = available.saturating_sub(1).max(1);
    let requested = requested.max(1);
    if requested > cap {
        info!("Requested {requested} parallel runs but only {cap} workers are available, clamping");
        cap
    } else {
        requested
    }
}
