use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TemplateError;

/// A named, ordered list of required column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSchema {
    pub name: String,
    pub columns: Vec<String>,
}

/// Every configured template, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Vec<String>>,
}

impl TemplateCatalog {
    pub fn insert(&mut self, name: impl Into<String>, columns: Vec<String>) {
        self.templates.insert(name.into(), columns);
    }

    pub fn get(&self, name: &str) -> Option<TemplateSchema> {
        self.templates.get(name).map(|columns| TemplateSchema {
            name: name.to_string(),
            columns: columns.clone(),
        })
    }

    /// Like `get`, but an unknown name is an error listing what is available.
    pub fn require(&self, name: &str) -> Result<TemplateSchema, TemplateError> {
        self.get(name).ok_or_else(|| TemplateError::Unknown {
            name: name.to_string(),
            available: self.names().into_iter().map(str::to_string).collect(),
        })
    }

    /// Template identifiers in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_lists_available() {
        let mut cat = TemplateCatalog::default();
        cat.insert("B", vec!["x".into()]);
        cat.insert("A", vec![]);

        let err = cat.require("C").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown template `C`; available templates: A, B"
        );
        assert_eq!(cat.require("B").unwrap().columns, vec!["x"]);
    }
}
