//! Resolution of the model's free-text category name to a catalog entry

use hakim_core::Category;

/// How a model-reported category name was matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryMatch<'a> {
    /// Case-insensitive equality with the canonical or localized name
    Exact(&'a Category),
    /// One name contains the other
    Partial(&'a Category),
    /// Nothing matched; first category in catalog order
    Default(&'a Category),
}

impl<'a> CategoryMatch<'a> {
    pub fn category(&self) -> &'a Category {
        match self {
            Self::Exact(c) | Self::Partial(c) | Self::Default(c) => c,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

/// Resolve a model category name against the catalog.
///
/// Returns `None` only for an empty catalog. Empty names never take part in
/// substring matching.
pub fn resolve_category<'a>(model_name: &str, categories: &'a [Category]) -> Option<CategoryMatch<'a>> {
    let needle = model_name.trim().to_lowercase();

    if !needle.is_empty() {
        if let Some(category) = categories
            .iter()
            .find(|c| lowered_names(c).iter().any(|name| *name == needle))
        {
            return Some(CategoryMatch::Exact(category));
        }

        if let Some(category) = categories.iter().find(|c| {
            lowered_names(c)
                .iter()
                .filter(|name| !name.is_empty())
                .any(|name| name.contains(needle.as_str()) || needle.contains(name.as_str()))
        }) {
            return Some(CategoryMatch::Partial(category));
        }
    }

    categories.first().map(CategoryMatch::Default)
}

fn lowered_names(category: &Category) -> [String; 2] {
    [
        category.name.to_lowercase(),
        category.name_localized.to_lowercase(),
    ]
}
