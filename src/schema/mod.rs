//! Dataset schemas.
//!
//! A [`CategorySchema`] is the declarative description of one dataset: the
//! ordered categories, their display labels and the alias field names that
//! uploads and legacy documents use for them. The engine is driven entirely by
//! this configuration.

pub mod datasets;

pub use datasets::Catalog;

use crate::error::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One numeric subdivision of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Canonical field name used in stored records.
    pub key: String,
    /// Human readable label for tables and charts.
    pub label: String,
    /// Alternative field names, probed in order after `key`.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Heading the category is listed under, e.g. a continent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Category {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            aliases: Vec::new(),
            group: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Field names to probe, the key first.
    pub fn probes(&self) -> impl Iterator<Item = &str> + Clone {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Declarative description of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySchema {
    /// Dataset name used on the command line (e.g. `civil-status`).
    pub name: String,
    /// Store collection holding the documents.
    pub collection: String,
    /// Categories in declared order.
    pub categories: Vec<Category>,
    /// Wide schemas use the narrower table page size.
    #[serde(default)]
    pub wide: bool,
    /// Geography table used by choropleth views, if any.
    #[serde(default)]
    pub geography: Option<crate::geo::GeographyKind>,
}

impl CategorySchema {
    /// Build a schema and check its invariants.
    pub fn new(name: &str, collection: &str, categories: Vec<Category>) -> StatsResult<Self> {
        let schema = Self {
            name: name.to_string(),
            collection: collection.to_string(),
            categories,
            wide: false,
            geography: None,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn wide(mut self) -> Self {
        self.wide = true;
        self
    }

    pub fn with_geography(mut self, kind: crate::geo::GeographyKind) -> Self {
        self.geography = Some(kind);
        self
    }

    /// Keys must be unique and `year` is reserved.
    pub fn validate(&self) -> StatsResult<()> {
        let invalid = |reason: String| StatsError::InvalidSchema {
            schema: self.name.clone(),
            reason,
        };

        if self.categories.is_empty() {
            return Err(invalid("no categories declared".to_string()));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(invalid("empty category key".to_string()));
            }
            if category.key.eq_ignore_ascii_case("year") || category.key == "id" {
                return Err(invalid(format!("'{}' is a reserved field", category.key)));
            }
            if !seen.insert(category.key.as_str()) {
                return Err(invalid(format!("duplicate category key '{}'", category.key)));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }

    /// Position of a category key in declared order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.key == key)
    }

    /// Like [`index_of`](Self::index_of), but an unknown key is an error.
    pub fn require(&self, key: &str) -> StatsResult<usize> {
        self.index_of(key).ok_or_else(|| StatsError::UnknownCategory {
            dataset: self.name.clone(),
            category: key.to_string(),
        })
    }

    /// Distinct category groups in order of first appearance.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.categories.iter().filter_map(|c| c.group.as_deref()) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Display label for a key, falling back to the key itself.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.label.as_str())
            .unwrap_or(key)
    }
}
