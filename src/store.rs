use crate::formula::CustomFormula;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last entered value of each formula variable, keyed by formula id then
/// variable id. Serializes to the JSON object of objects kept in storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableValues {
    values: HashMap<String, HashMap<String, String>>,
}

impl VariableValues {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raw text entered for a variable
    pub fn set(
        &mut self,
        formula_id: impl Into<String>,
        variable_id: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.values
            .entry(formula_id.into())
            .or_default()
            .insert(variable_id.into(), value.into());
    }

    /// Get the text entered for a variable
    pub fn get(&self, formula_id: &str, variable_id: &str) -> Option<&str> {
        self.values
            .get(formula_id)
            .and_then(|values| values.get(variable_id))
            .map(String::as_str)
    }

    /// All values entered for a formula
    pub fn values_for(&self, formula_id: &str) -> Option<&HashMap<String, String>> {
        self.values.get(formula_id)
    }

    /// Drop the values of a deleted formula
    pub fn remove_formula(&mut self, formula_id: &str) -> Option<HashMap<String, String>> {
        self.values.remove(formula_id)
    }

    /// Check if every variable of `formula` has a non-blank value
    pub fn all_filled(&self, formula: &CustomFormula) -> bool {
        formula.variables.iter().all(|variable| {
            self.get(&formula.id, &variable.id)
                .map_or(false, |value| !value.trim().is_empty())
        })
    }

    /// Serialize for storage
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore from storage
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Variable;

    #[test]
    fn set_and_get() {
        let mut store = VariableValues::new();
        store.set("f1", "v1", "2");
        store.set("f1", "v1", "3");
        store.set("f2", "v1", "4");
        assert_eq!(store.get("f1", "v1"), Some("3"));
        assert_eq!(store.get("f2", "v1"), Some("4"));
        assert_eq!(store.get("f1", "v2"), None);
        assert_eq!(store.values_for("f1").map(HashMap::len), Some(1));
        assert_eq!(store.values_for("f3"), None);
    }

    #[test]
    fn removing_a_formula() {
        let mut store = VariableValues::new();
        store.set("f1", "v1", "2");
        store.set("f2", "v1", "4");
        assert!(store.remove_formula("f1").is_some());
        assert_eq!(store.get("f1", "v1"), None);
        assert_eq!(store.get("f2", "v1"), Some("4"));
        assert!(store.remove_formula("f1").is_none());
    }

    #[test]
    fn filled() {
        let m = Variable::new("m");
        let a = Variable::new("a");
        let mut formula = CustomFormula::new("Force", "m * a")
            .with_variable(m.clone())
            .with_variable(a.clone());
        formula.id = "force".into();

        let mut store = VariableValues::new();
        assert!(!store.all_filled(&formula));
        store.set("force", m.id.as_str(), "2");
        assert!(!store.all_filled(&formula));
        store.set("force", a.id.as_str(), "  ");
        assert!(!store.all_filled(&formula));
        store.set("force", a.id.as_str(), "9.8");
        assert!(store.all_filled(&formula));

        // nothing to fill
        assert!(store.all_filled(&CustomFormula::new("Two", "2")));
    }

    #[test]
    fn json_layout() {
        let mut store = VariableValues::new();
        store.set("f1", "v1", "2");
        let json = store.to_json().unwrap();
        assert_eq!(json, r#"{"f1":{"v1":"2"}}"#);
        assert_eq!(VariableValues::from_json(&json).unwrap(), store);
        assert_eq!(VariableValues::from_json("{}").unwrap(), VariableValues::new());
        assert!(VariableValues::from_json("[]").is_err());
    }
}
