use crate::content::ContentUnavailable;
use crate::designs::journal;
use crate::detail::{Expansion, Overlay};
use crate::models::entity::{Entity, EntityKind};
use crate::models::search::{self, CategoryFilter};
use crate::models::settings::SiteSettings;
use crate::render::{url_encode, CardContext, Container, RenderOptions};

/// The filter currently applied to a listing. Keyword search and the category
/// buttons are separate affordances: choosing one replaces the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    All,
    Keyword(String),
    Category(CategoryFilter),
}

/// Owns one loaded collection for the lifetime of a page render, plus the
/// filter and detail state derived from it.
pub struct Listing {
    kind: EntityKind,
    collection: Option<Vec<Entity>>,
    query: Query,
    displayed: Vec<Entity>,
    expansion: Expansion,
    overlay: Overlay,
}

impl Listing {
    pub fn new(kind: EntityKind, loaded: Result<Vec<Entity>, ContentUnavailable>) -> Self {
        let collection = loaded.ok();
        let displayed = collection.clone().unwrap_or_default();
        Listing {
            kind,
            expansion: Expansion::for_list(displayed.len()),
            collection,
            query: Query::All,
            displayed,
            overlay: Overlay::default(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.collection.is_none()
    }

    pub fn collection(&self) -> &[Entity] {
        self.collection.as_deref().unwrap_or(&[])
    }

    pub fn displayed(&self) -> &[Entity] {
        &self.displayed
    }

    /// Live search. An empty keyword shows the whole collection.
    pub fn search(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        self.query = if keyword.is_empty() {
            Query::All
        } else {
            Query::Keyword(keyword.to_string())
        };
        self.refresh();
    }

    pub fn select_category(&mut self, category: CategoryFilter) {
        self.query = Query::Category(category);
        self.refresh();
    }

    /// Re-derive the displayed list. Detail state never survives this.
    fn refresh(&mut self) {
        let all = self.collection();
        self.displayed = match &self.query {
            Query::All => all.to_vec(),
            Query::Keyword(k) => search::filter_by_keyword(all, k),
            Query::Category(c) => search::filter_by_category(all, c),
        };
        self.expansion = Expansion::for_list(self.displayed.len());
        self.overlay.close();
    }

    /// In-place toggle of card `index`.
    pub fn toggle(&mut self, index: usize) -> bool {
        self.expansion.toggle(index)
    }

    /// Open entity `index` in the overlay. Out-of-range leaves it closed.
    pub fn open(&mut self, index: usize) -> bool {
        if index < self.displayed.len() {
            self.overlay.open(index);
            true
        } else {
            false
        }
    }

    /// The card affordance: labs expand in place, blog posts open the overlay.
    pub fn activate(&mut self, index: usize) -> bool {
        match self.kind {
            EntityKind::LabEntry => self.toggle(index),
            EntityKind::BlogPost => self.open(index),
        }
    }

    /// Deep link: activate the displayed entity with this id.
    pub fn activate_id(&mut self, id: &str) -> bool {
        match self.displayed.iter().position(|e| e.id.as_deref() == Some(id)) {
            Some(index) => self.activate(index),
            None => false,
        }
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expansion.expanded()
    }

    pub fn overlay_entity(&self) -> Option<&Entity> {
        self.overlay.current().and_then(|i| self.displayed.get(i))
    }

    pub fn active_category(&self) -> CategoryFilter {
        match &self.query {
            Query::Category(c) => c.clone(),
            _ => CategoryFilter::All,
        }
    }

    pub fn keyword(&self) -> &str {
        match &self.query {
            Query::Keyword(k) => k.as_str(),
            _ => "",
        }
    }

    /// Encoded query parameters that reproduce the current filter.
    pub fn query_string(&self) -> String {
        match &self.query {
            Query::All => String::new(),
            Query::Keyword(k) => format!("q={}", url_encode(k)),
            Query::Category(c) => format!("category={}", url_encode(c.value())),
        }
    }

    /// Where closing the detail view leads: the same page and filter, with
    /// nothing open.
    pub fn close_href(&self, page: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            page.to_string()
        } else {
            format!("{}?{}", page, query)
        }
    }

    /// Render the displayed list (or the load-failure message) into `container`.
    pub fn render(&self, container: &mut Container, opts: &RenderOptions, settings: &SiteSettings, page: &str) {
        if self.is_unavailable() {
            container.show_error(self.kind);
            return;
        }
        let mut ctx = CardContext::new(settings, page);
        ctx.query = self.query_string();
        ctx.expanded = self.expansion.expanded();
        container.render(&self.displayed, opts, &ctx);
    }

    /// Content for the overlay slot; empty when the overlay is closed.
    pub fn render_overlay(&self, settings: &SiteSettings) -> String {
        self.overlay_entity()
            .map(|e| journal::overlay(e, settings))
            .unwrap_or_default()
    }
}
