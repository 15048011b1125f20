use crate::errors::{ExecError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// One run of the batch: its unique name and its parameter values in
/// header order
#[derive(Clone, Debug, PartialEq)]
pub struct CaseRow {
    /// unique, filesystem-safe run name
    pub name: String,
    /// parameter values, one per header variable
    pub values: Vec<f64>,
}

impl CaseRow {
    /// Constructor given the run name and its parameter values
    pub fn new(name: &str, values: Vec<f64>) -> Self {
        CaseRow {
            name: name.to_string(),
            values,
        }
    }
}

/// A parsed batch case table: the header label, the variable names and one
/// [CaseRow] per run. Read-only for the whole batch execution.
#[derive(Clone, Debug)]
pub struct CaseFile {
    label: String,
    variables: Vec<String>,
    rows: Vec<CaseRow>,
}

impl CaseFile {
    /// Builds a case table from already parsed parts.
    ///
    /// Fails when no run is present or when a row's value count does not
    /// match the variable count.
    pub fn new(label: &str, variables: Vec<String>, rows: Vec<CaseRow>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.values.len() != variables.len() {
                return Err(ExecError::MalformedRow {
                    row: i + 1,
                    reason: format!(
                        "expected {} values, found {}",
                        variables.len(),
                        row.values.len()
                    ),
                });
            }
        }
        if rows.is_empty() {
            return Err(ExecError::ContractViolation(
                "case table contains no runs".to_string(),
            ));
        }
        Ok(CaseFile {
            label: label.to_string(),
            variables,
            rows,
        })
    }

    /// Reads a case table CSV: record 0 is `[label, variable names...]`,
    /// every following record is `[run name, values...]`.
    ///
    /// A record with the wrong column count or a non-numeric value is fatal
    /// for the whole batch.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => {
                return Err(ExecError::InvalidCaseFile {
                    path: path.to_path_buf(),
                    reason: "file is empty".to_string(),
                })
            }
        };
        if header.len() < 2 {
            return Err(ExecError::InvalidCaseFile {
                path: path.to_path_buf(),
                reason: "header declares no variable".to_string(),
            });
        }
        let label = header[0].to_string();
        let variables: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

        let mut rows = Vec::new();
        for (i, record) in records.enumerate() {
            let record = record?;
            let row = i + 1;
            if record.len() != header.len() {
                return Err(ExecError::MalformedRow {
                    row,
                    reason: format!(
                        "expected {} columns, found {}",
                        header.len(),
                        record.len()
                    ),
                });
            }
            let name = record[0].to_string();
            let mut values = Vec::with_capacity(variables.len());
            for field in record.iter().skip(1) {
                let value = field.trim().parse::<f64>().map_err(|e| ExecError::MalformedRow {
                    row,
                    reason: format!("non-numeric value '{field}': {e}"),
                })?;
                values.push(value);
            }
            rows.push(CaseRow { name, values });
        }
        if rows.is_empty() {
            return Err(ExecError::InvalidCaseFile {
                path: path.to_path_buf(),
                reason: "contains no runs".to_string(),
            });
        }
        Ok(CaseFile {
            label,
            variables,
            rows,
        })
    }

    /// The header label of the table
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Variable names in header order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// All runs of the batch
    pub fn rows(&self) -> &[CaseRow] {
        &self.rows
    }

    /// Zips the header names with a row's values into the keyword-style
    /// parameter map handed to the case function
    pub fn parameters(&self, row: &CaseRow) -> BTreeMap<String, f64> {
        self.variables
            .iter()
            .cloned()
            .zip(row.values.iter().copied())
            .collect()
    }
}
