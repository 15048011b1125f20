use crate::errors::{ExecError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Error type a case function may fail with
pub type CaseError = Box<dyn std::error::Error + Send + Sync>;

/// The narrow contract every case function must honor: take the variable
/// names as keyword-style map keys and return a string-keyed map of result
/// values
pub type CaseFn = Arc<
    dyn Fn(&BTreeMap<String, f64>) -> std::result::Result<BTreeMap<String, f64>, CaseError>
        + Send
        + Sync,
>;

/// Explicit lookup table for case functions.
///
/// A function participates in a batch only if it was registered under a
/// name beforehand; there is no runtime discovery. Looking up an
/// unregistered name is an [ExecError::ContractViolation].
#[derive(Default, Clone)]
pub struct CaseRegistry {
    entries: HashMap<String, CaseFn>,
}

impl CaseRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` under `name`, replacing any previous entry
    pub fn register<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&BTreeMap<String, f64>) -> std::result::Result<BTreeMap<String, f64>, CaseError>
            + Send
            + Sync
            + 'static,
    {
        self.entries.insert(name.to_string(), Arc::new(f));
    }

    /// Looks up the case function registered under `name`
    pub fn lookup(&self, name: &str) -> Result<CaseFn> {
        self.entries.get(name).cloned().ok_or_else(|| {
            ExecError::ContractViolation(format!(
                "no case function registered under '{name}'"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CaseRegistry::new();
        registry.register("double", |params: &BTreeMap<String, f64>| {
            Ok(params.iter().map(|(k, v)| (k.clone(), v * 2.)).collect())
        });

        let f = registry.lookup("double").unwrap();
        let params = BTreeMap::from([("x".to_string(), 3.)]);
        let result = f(&params).unwrap();
        assert_eq!(6., result["x"]);
    }

    #[test]
    fn test_missing_function_is_contract_violation() {
        let registry = CaseRegistry::new();
        assert!(matches!(
            registry.lookup("missing"),
            Err(ExecError::ContractViolation(_))
        ));
    }
}
