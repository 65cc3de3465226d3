use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use thiserror::Error;

/// Validated category name (trimmed, non-empty).
///
/// Categories are what the quiz ranks: every answer option awards points to
/// zero or more of them, and the catalog describes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a validated category name.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNameError::Empty` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CategoryNameError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CategoryNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for CategoryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryNameError {
    #[error("category name cannot be empty")]
    Empty,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("category not found in catalog: {0}")]
    NotFound(String),

    #[error("category listed twice in catalog: {0}")]
    DuplicateCategory(CategoryName),
}

/// Read-only mapping from category name to its human-readable description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialtyCatalog {
    entries: IndexMap<CategoryName, String>,
}

impl SpecialtyCatalog {
    /// Build a catalog from `(name, description)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateCategory` if a name appears twice.
    pub fn new(
        entries: impl IntoIterator<Item = (CategoryName, String)>,
    ) -> Result<Self, CatalogError> {
        let mut map = IndexMap::new();
        for (name, description) in entries {
            if map.contains_key(&name) {
                return Err(CatalogError::DuplicateCategory(name));
            }
            map.insert(name, description);
        }
        Ok(Self { entries: map })
    }

    /// Look up the description of a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog does not know the category.
    pub fn describe(&self, category: &str) -> Result<&str, CatalogError> {
        self.entries
            .get(category)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::NotFound(category.to_string()))
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryName, &str)> {
        self.entries.iter().map(|(name, desc)| (name, desc.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> CategoryName {
        CategoryName::new(raw).unwrap()
    }

    #[test]
    fn category_name_is_trimmed_and_non_empty() {
        assert_eq!(name("  Eng ").as_str(), "Eng");
        assert_eq!(CategoryName::new(" \t"), Err(CategoryNameError::Empty));
    }

    #[test]
    fn category_name_deserialization_validates() {
        let ok: CategoryName = serde_json::from_str("\"Art\"").unwrap();
        assert_eq!(ok.as_str(), "Art");
        assert!(serde_json::from_str::<CategoryName>("\"  \"").is_err());
    }

    #[test]
    fn describe_known_and_unknown() {
        let catalog =
            SpecialtyCatalog::new([(name("Eng"), "Engineering".to_string())]).unwrap();
        assert_eq!(catalog.describe("Eng"), Ok("Engineering"));
        assert_eq!(
            catalog.describe("Law"),
            Err(CatalogError::NotFound("Law".into()))
        );
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let err = SpecialtyCatalog::new([
            (name("Eng"), "Engineering".to_string()),
            (name("Eng"), "Again".to_string()),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateCategory(name("Eng")));
    }
}
