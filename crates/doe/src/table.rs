use crate::errors::{DoeError, Result};
use crate::Design;
use crate::VariableSpecTable;
use linfa::Float;
use std::path::Path;

/// Default label sitting in the first header cell of a case table
pub const CASE_TABLE_LABEL: &str = "Variable Names";

/// The assembled case table: row 0 is `[label, variable names...]`, every
/// following row is `[run name, values...]` in declared variable order.
/// This is the only consumer-facing output of the composer pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseTable {
    records: Vec<Vec<String>>,
}

impl CaseTable {
    /// Joins header, run names and design matrix into one table.
    ///
    /// Fails with [DoeError::InvalidInput] when the number of names does
    /// not match the number of design rows.
    pub fn assemble<F: Float>(
        label: &str,
        specs: &VariableSpecTable<F>,
        names: &[String],
        design: &Design<F>,
    ) -> Result<Self> {
        let matrix = design.matrix();
        if names.len() != matrix.nrows() {
            return Err(DoeError::InvalidInput(format!(
                "{} names for {} design rows",
                names.len(),
                matrix.nrows()
            )));
        }
        let mut header = Vec::with_capacity(specs.len() + 1);
        header.push(label.to_string());
        header.extend(specs.names());

        let mut records = Vec::with_capacity(matrix.nrows() + 1);
        records.push(header);
        for (name, row) in names.iter().zip(matrix.rows()) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(name.clone());
            record.extend(row.iter().map(|v| v.to_string()));
            records.push(record);
        }
        Ok(CaseTable { records })
    }

    /// The table rows, header first
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of run rows (header excluded)
    pub fn n_runs(&self) -> usize {
        self.records.len() - 1
    }

    /// Writes the table as a comma-delimited CSV file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DesignComposer, NameGenerator, VariableSpec};
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn sample_design() -> (VariableSpecTable<f64>, Design<f64>) {
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lhs("x", 0., 10.),
            VariableSpec::lin("y", 0., 1., 2),
            VariableSpec::constant("c", 5.),
        ]);
        let design = DesignComposer::new(&specs)
            .n_samples(3)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .compose()
            .unwrap();
        (specs, design)
    }

    #[test]
    fn test_assemble_layout() {
        let (specs, design) = sample_design();
        let names = NameGenerator::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .generate(design.n_rows())
            .unwrap();
        let table = CaseTable::assemble(CASE_TABLE_LABEL, &specs, &names, &design).unwrap();

        let records = table.records();
        assert_eq!(design.n_rows() + 1, records.len());
        assert_eq!(
            vec!["Variable Names", "x", "y", "c"],
            records[0].iter().map(String::as_str).collect::<Vec<_>>()
        );
        for (i, record) in records.iter().skip(1).enumerate() {
            assert_eq!(4, record.len());
            assert_eq!(&names[i], &record[0]);
            // values round-trip through their string form
            let y: f64 = record[2].parse().unwrap();
            assert_eq!(y, design.matrix()[[i, 1]]);
            assert_eq!("5", record[3]);
        }
    }

    #[test]
    fn test_name_count_mismatch() {
        let (specs, design) = sample_design();
        let names = vec!["only_one".to_string()];
        let err = CaseTable::assemble(CASE_TABLE_LABEL, &specs, &names, &design).unwrap_err();
        assert!(matches!(err, DoeError::InvalidInput(_)));
    }

    #[test]
    fn test_write_csv() {
        let (specs, design) = sample_design();
        let names = NameGenerator::new().generate(design.n_rows()).unwrap();
        let table = CaseTable::assemble(CASE_TABLE_LABEL, &specs, &names, &design).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch_cases.csv");
        table.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(design.n_rows() + 1, lines.len());
        assert!(lines[0].starts_with("Variable Names,x,y,c"));
    }
}
