//! Style text parsing into a selector map.
//!
//! This is a seed for the editor, not a CSS parser: the text is split on
//! block terminators and each `selector { declarations }` pair is taken as
//! is. Blocks missing a selector or a body are dropped, so the map does not
//! round-trip arbitrary style sheets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from selector to its raw declaration block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap {
    rules: IndexMap<String, String>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: impl Into<String>, declarations: impl Into<String>) {
        self.rules.insert(selector.into(), declarations.into());
    }

    pub fn get(&self, selector: &str) -> Option<&str> {
        self.rules.get(selector).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build a style map from raw style text.
pub fn parse_style(source: &str) -> StyleMap {
    let mut map = StyleMap::new();

    for block in source.split('}') {
        let mut parts = block.split('{');
        let selector = parts.next().map(str::trim).unwrap_or_default();
        let Some(declarations) = parts.next() else {
            continue;
        };
        if selector.is_empty() || declarations.is_empty() {
            tracing::trace!(block, "dropping malformed style block");
            continue;
        }
        map.insert(selector, declarations.trim());
    }

    map
}
