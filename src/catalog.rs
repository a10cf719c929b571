//! Model catalog for Maguai
//!
//! The catalog is a fixed, generated list of 150 personas. Every entry is
//! derived from its index by cycling through small label tables, so the list
//! is identical on every run. It is built once per process and shared
//! read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Brand used in persona names, identifiers and descriptions
pub const BRAND: &str = "Maguai";

/// Number of personas in the catalog
pub const CATALOG_SIZE: usize = 150;

const CATEGORIES: [Category; 5] = [
    Category::General,
    Category::Coding,
    Category::Creative,
    Category::Scientific,
    Category::Analytical,
];

const ICONS: [&str; 10] = [
    "🤖", "💻", "🎨", "🔬", "📊", "⚡", "🧠", "🌌", "🛠️", "📜",
];

const SUFFIXES: [&str; 10] = [
    "Alpha", "Beta", "Prime", "Ultra", "Nano", "Quantum", "Nexus", "Vertex", "Core", "Flow",
];

static CATALOG: OnceLock<Vec<Model>> = OnceLock::new();

/// Persona category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// General-purpose assistant
    General,
    /// Programming assistant
    Coding,
    /// Writing and ideation assistant
    Creative,
    /// Science assistant
    Scientific,
    /// Data and reasoning assistant
    Analytical,
}

impl Category {
    /// Label as shown to users ("General", "Coding", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Coding => "Coding",
            Self::Creative => "Creative",
            Self::Scientific => "Scientific",
            Self::Analytical => "Analytical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable persona
///
/// Immutable once constructed; the catalog hands out shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Stable unique identifier (e.g., "maguai-7")
    pub id: String,
    /// Display name (e.g., "Maguai Nexus 7")
    pub name: String,
    /// One-line description
    pub description: String,
    /// Persona category
    pub category: Category,
    /// Emoji icon
    pub icon: String,
}

impl Model {
    /// Build the catalog entry for a zero-based index
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::catalog::{Category, Model};
    ///
    /// let model = Model::from_index(6);
    /// assert_eq!(model.id, "maguai-7");
    /// assert_eq!(model.name, "Maguai Nexus 7");
    /// assert_eq!(model.category, Category::Coding);
    /// ```
    pub fn from_index(index: usize) -> Self {
        let category = CATEGORIES[index % CATEGORIES.len()];
        let icon = ICONS[index % ICONS.len()];
        let suffix = SUFFIXES[index % SUFFIXES.len()];
        let ordinal = index + 1;

        Self {
            id: format!("{}-{}", BRAND.to_lowercase(), ordinal),
            name: format!("{} {} {}", BRAND, suffix, ordinal),
            description: format!(
                "Specialized {} assistant powered by advanced {} architecture.",
                category.as_str().to_lowercase(),
                BRAND
            ),
            category,
            icon: icon.to_string(),
        }
    }

    /// Whether this model matches a lowercased search needle
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.category.as_str().to_lowercase().contains(needle)
    }
}

/// Generate the full catalog
///
/// Pure and deterministic: two calls produce identical vectors. Most callers
/// want [`catalog`], which builds this once and caches it.
pub fn build_catalog() -> Vec<Model> {
    (0..CATALOG_SIZE).map(Model::from_index).collect()
}

/// The process-wide catalog, built on first access
pub fn catalog() -> &'static [Model] {
    CATALOG.get_or_init(build_catalog)
}

/// The persona selected when a session starts without an explicit choice
pub fn default_model() -> &'static Model {
    &catalog()[0]
}

/// Look up a persona by its exact identifier
///
/// # Examples
///
/// ```
/// use maguai::catalog::find_model;
///
/// assert!(find_model("maguai-150").is_some());
/// assert!(find_model("maguai-151").is_none());
/// ```
pub fn find_model(id: &str) -> Option<&'static Model> {
    catalog().iter().find(|m| m.id == id)
}

/// Filter the process-wide catalog
///
/// Case-insensitive substring match against the name or the category label.
/// An empty query returns every entry in catalog order; no match yields an
/// empty vector.
///
/// # Examples
///
/// ```
/// use maguai::catalog::filter_catalog;
///
/// assert_eq!(filter_catalog("").len(), 150);
/// assert_eq!(filter_catalog("CODING"), filter_catalog("coding"));
/// assert!(filter_catalog("zzz-no-match").is_empty());
/// ```
pub fn filter_catalog(query: &str) -> Vec<&'static Model> {
    filter_models(catalog(), query)
}

/// Apply the catalog filter rule to any slice of models
pub fn filter_models<'a>(models: &'a [Model], query: &str) -> Vec<&'a Model> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return models.iter().collect();
    }
    models.iter().filter(|m| m.matches(&needle)).collect()
}
