use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

/// Which collection an entity was loaded from.
/// Field names and fallback values differ between the two JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    BlogPost,
    LabEntry,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::BlogPost => "blog",
            EntityKind::LabEntry => "labs",
        }
    }

    pub fn placeholder_title(self) -> &'static str {
        match self {
            EntityKind::BlogPost => "Untitled",
            EntityKind::LabEntry => "Untitled Lab",
        }
    }

    pub fn placeholder_image(self) -> &'static str {
        match self {
            EntityKind::BlogPost => "assets/img/blog-placeholder.jpg",
            EntityKind::LabEntry => "assets/img/lab-placeholder.jpg",
        }
    }

    /// Short hand-written teaser, used verbatim on cards when present.
    fn summary_key(self) -> &'static str {
        match self {
            EntityKind::BlogPost => "excerpt",
            EntityKind::LabEntry => "desc",
        }
    }

    /// Long-form text shown in the detail view.
    fn body_key(self) -> &'static str {
        match self {
            EntityKind::BlogPost => "content",
            EntityKind::LabEntry => "description",
        }
    }
}

/// One blog post or lab project, with every optional field resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: Option<String>,
    pub title: String,
    /// Raw date string as it appeared in the collection.
    pub date: String,
    #[serde(skip)]
    pub published: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub image: String,
    pub summary: Option<String>,
    pub body: String,
    pub video: Option<String>,
    pub link: Option<String>,
}

impl Entity {
    /// Build an entity from one element of a JSON collection.
    ///
    /// This is the only place fallbacks are applied. Missing fields, empty
    /// strings, non-string scalars and even non-object items all produce a
    /// renderable entity instead of an error.
    pub fn normalize(kind: EntityKind, raw: &Value) -> Self {
        let date = text(raw, "date").unwrap_or_default();
        let summary = text(raw, kind.summary_key());
        let body = text(raw, kind.body_key())
            .or_else(|| summary.clone())
            .unwrap_or_default();

        Entity {
            kind,
            id: identifier(raw),
            title: text(raw, "title").unwrap_or_else(|| kind.placeholder_title().to_string()),
            published: parse_date(&date),
            date,
            category: text(raw, "category"),
            image: text(raw, "image")
                .and_then(|u| safe_url(&u))
                .unwrap_or_else(|| kind.placeholder_image().to_string()),
            summary,
            body,
            video: text(raw, "video").and_then(|u| safe_url(&u)),
            link: text(raw, "link").and_then(|u| safe_url(&u)),
        }
    }

    /// Text used on a card before truncation: the teaser if one was written,
    /// otherwise the long-form body.
    pub fn card_text(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.body)
    }

    /// Whether the entity has any long-form text worth an in-page detail view.
    pub fn has_detail(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

fn text(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

/// Ids are opaque, but hand-written fixtures often use plain numbers.
fn identifier(raw: &Value) -> Option<String> {
    match raw.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Drop URLs whose scheme would execute script when placed in `src`/`href`.
pub fn safe_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let lower: String = trimmed
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:") {
        return None;
    }
    Some(trimmed.to_string())
}

/// Parse the date forms found in content fixtures. `None` for anything else.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ndt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Newest first. Entities without a parseable date sink to the end and keep
/// their relative order (the sort is stable).
pub fn sort_newest_first(entities: &mut [Entity]) {
    entities.sort_by(|a, b| b.published.cmp(&a.published));
}
