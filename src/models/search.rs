use serde::Serialize;

use crate::models::entity::Entity;

/// The value carried by the "show everything" category button.
pub const ALL_CATEGORIES: &str = "all";

/// Category chosen from the inline filter buttons on the labs page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CategoryFilter {
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Named(name) => name.as_str(),
        }
    }
}

/// Normalise a search box value for comparison.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Keep the entities whose title or long-form text contains `keyword`,
/// ignoring case. An empty keyword keeps everything. Relative order is kept.
pub fn filter_by_keyword(entities: &[Entity], keyword: &str) -> Vec<Entity> {
    let needle = normalize_keyword(keyword);
    if needle.is_empty() {
        return entities.to_vec();
    }
    entities
        .iter()
        .filter(|e| matches_keyword(e, &needle))
        .cloned()
        .collect()
}

fn matches_keyword(entity: &Entity, needle: &str) -> bool {
    entity.title.to_lowercase().contains(needle)
        || entity.body.to_lowercase().contains(needle)
        || entity
            .summary
            .as_deref()
            .map(|s| s.to_lowercase().contains(needle))
            .unwrap_or(false)
}

/// Exact, case-insensitive category match. `All` bypasses filtering.
pub fn filter_by_category(entities: &[Entity], category: &CategoryFilter) -> Vec<Entity> {
    match category {
        CategoryFilter::All => entities.to_vec(),
        CategoryFilter::Named(name) => {
            let wanted = name.to_lowercase();
            entities
                .iter()
                .filter(|e| {
                    e.category
                        .as_deref()
                        .map(|c| c.to_lowercase() == wanted)
                        .unwrap_or(false)
                })
                .cloned()
                .collect()
        }
    }
}

/// Distinct categories in first-seen order, for building the filter buttons.
pub fn categories(entities: &[Entity]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for cat in entities.iter().filter_map(|e| e.category.as_deref()) {
        if !seen.iter().any(|s| s.eq_ignore_ascii_case(cat)) {
            seen.push(cat.to_string());
        }
    }
    seen
}
