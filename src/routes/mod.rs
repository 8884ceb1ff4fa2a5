pub mod api;
pub mod public;

use crate::listing::Listing;
use crate::models::search::CategoryFilter;

/// Request parameters shared by the listing pages and their fragment APIs.
#[derive(Debug, Default, Clone, FromForm)]
pub struct ListingParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub open: Option<usize>,
    pub id: Option<String>,
}

impl ListingParams {
    /// Apply the parameters to a freshly loaded listing. A category button
    /// wins over a keyword; a deep-link id wins over a positional `open`.
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(category) = self.category.as_deref() {
            listing.select_category(CategoryFilter::parse(category));
        } else if let Some(q) = self.q.as_deref() {
            listing.search(q);
        }

        if let Some(id) = self.id.as_deref().filter(|s| !s.is_empty()) {
            listing.activate_id(id);
        } else if let Some(index) = self.open {
            listing.activate(index);
        }
    }
}
