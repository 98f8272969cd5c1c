//! Menu browsing session
//!
//! Holds what the menu screen shows: the category chips with their
//! selection flags, the live search text and the last result set. Category
//! toggles query immediately; text changes are expected to arrive through
//! the debouncer and land in [`MenuBrowser::search`].

use crate::core::error::MenuError;
use crate::core::menu::{Category, MenuItem};
use crate::core::query::{QueryEngine, QuerySpec};
use crate::core::sync::MenuSnapshot;

pub struct MenuBrowser {
    engine: QueryEngine,
    categories: Vec<Category>,
    search_text: String,
    results: Vec<MenuItem>,
}

impl MenuBrowser {
    /// Start browsing from a freshly synced snapshot
    pub fn new(engine: QueryEngine, snapshot: MenuSnapshot) -> Self {
        Self {
            engine,
            categories: snapshot.categories,
            search_text: String::new(),
            results: snapshot.items,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn results(&self) -> &[MenuItem] {
        &self.results
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Labels of the selected categories, in category order
    pub fn selected_labels(&self) -> Vec<String> {
        self.query_spec().selected
    }

    /// The filter the next query would run
    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec::from_categories(&self.categories, &self.search_text)
    }

    /// Flip the first category labelled `label` and re-run the query with
    /// the current search text.
    ///
    /// Returns `Ok(false)` without querying when no category matches. On a
    /// query error the flag stays flipped and the previous results remain.
    pub fn toggle_category(&mut self, label: &str) -> Result<bool, MenuError> {
        let Some(category) = self.categories.iter_mut().find(|c| c.label == label) else {
            tracing::debug!(label, "toggle for unknown category ignored");
            return Ok(false);
        };
        category.selected = !category.selected;

        self.refresh()?;
        Ok(true)
    }

    /// Record the live text box value without querying
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Set the search text and query immediately
    pub fn search(&mut self, text: impl Into<String>) -> Result<&[MenuItem], MenuError> {
        self.set_search_text(text);
        self.refresh()?;
        Ok(&self.results)
    }

    /// Deselect every category and clear the search text
    pub fn reset(&mut self) -> Result<&[MenuItem], MenuError> {
        for category in &mut self.categories {
            category.selected = false;
        }
        self.search_text.clear();
        self.refresh()?;
        Ok(&self.results)
    }

    fn refresh(&mut self) -> Result<(), MenuError> {
        let spec = self.query_spec();
        self.results = self.engine.run(&spec)?;
        tracing::debug!(
            selected = ?spec.selected,
            text = %spec.text,
            results = self.results.len(),
            "menu results refreshed"
        );
        Ok(())
    }
}
