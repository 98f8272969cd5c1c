//! Category + text queries over the local store

use std::sync::Arc;

use crate::core::error::MenuError;
use crate::core::menu::{Category, MenuItem};
use crate::core::store::MenuStore;

/// A combined category selection and free-text filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    /// Selected category labels, in category order, without duplicates
    pub selected: Vec<String>,
    pub text: String,
}

impl QuerySpec {
    pub fn new<I, S>(selected: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = Vec::new();
        for label in selected {
            let label = label.into();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        Self {
            selected: labels,
            text: text.into(),
        }
    }

    /// Build a spec from the current category flags and text box value
    pub fn from_categories(categories: &[Category], text: &str) -> Self {
        Self::new(
            categories
                .iter()
                .filter(|c| c.selected)
                .map(|c| c.label.clone()),
            text,
        )
    }

    pub fn is_unfiltered(&self) -> bool {
        self.selected.is_empty() && self.text.is_empty()
    }
}

/// Runs filtered queries against an injected store handle
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<MenuStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<MenuStore>) -> Self {
        Self { store }
    }

    /// Items whose category is selected and whose name contains `text`.
    /// With nothing selected the category is not consulted at all.
    pub fn query(&self, selected: &[String], text: &str) -> Result<Vec<MenuItem>, MenuError> {
        self.store.query(selected, text)
    }

    pub fn run(&self, spec: &QuerySpec) -> Result<Vec<MenuItem>, MenuError> {
        self.query(&spec.selected, &spec.text)
    }
}
