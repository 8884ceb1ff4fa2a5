use rocket::futures::future;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::designs::labs;
use crate::listing::Listing;
use crate::models::entity::EntityKind;
use crate::models::search;
use crate::render::{self, html_escape, url_encode, CardTemplate, Container, Page, RenderOptions};
use crate::routes::ListingParams;
use crate::site::{Site, ThemeChoice};

pub const BLOG_CONTAINER: &str = "blog-container";
pub const LABS_CONTAINER: &str = "labs-container";
pub const RECENT_BLOG_CONTAINER: &str = "recent-blog-container";
pub const LATEST_LABS_CONTAINER: &str = "latest-labs";

// ── Homepage ───────────────────────────────────────────

#[get("/")]
pub async fn homepage(site: &State<Site>, theme: ThemeChoice) -> RawHtml<String> {
    let settings = &site.settings;
    // The two previews are independent; neither waits on the other.
    let (blog, lab) = future::join(
        site.listing(EntityKind::BlogPost),
        site.listing(EntityKind::LabEntry),
    )
    .await;

    let mut recent = Container::new(RECENT_BLOG_CONTAINER);
    blog.render(
        &mut recent,
        &RenderOptions::preview(CardTemplate::BlogPreview, settings),
        settings,
        Page::Home.path(),
    );
    let mut latest = Container::new(LATEST_LABS_CONTAINER);
    lab.render(
        &mut latest,
        &RenderOptions::preview(CardTemplate::LabPreview, settings),
        settings,
        Page::Home.path(),
    );

    let body = format!(
        "<section class=\"hero text-center py-24 fade-in-section\">\
         <h1 class=\"text-5xl font-bold mb-4\">{site_name}</h1>\
         <p class=\"text-gray-400\">Hands-on labs and write-ups from the field.</p>\
         </section>\
         <section class=\"max-w-6xl mx-auto px-6 py-16 fade-in-section\">\
         <h2 class=\"text-3xl font-bold mb-8\">Recent Posts</h2>{recent}\
         <a href=\"/blog\" class=\"inline-block mt-8 text-green-500\">All posts →</a>\
         </section>\
         <section class=\"max-w-6xl mx-auto px-6 py-16 fade-in-section\">\
         <h2 class=\"text-3xl font-bold mb-8\">Latest Labs</h2>{latest}\
         <a href=\"/labs\" class=\"inline-block mt-8 text-green-500\">All labs →</a>\
         </section>",
        site_name = html_escape(&settings.site_name),
        recent = recent.to_html(),
        latest = latest.to_html(),
    );

    RawHtml(render::render_page(settings, Page::Home, theme.0, &body, "", Page::Home.path()))
}

// ── Blog ───────────────────────────────────────────────

#[get("/blog?<params..>")]
pub async fn blog(site: &State<Site>, theme: ThemeChoice, params: ListingParams) -> RawHtml<String> {
    let settings = &site.settings;
    let mut listing = site.listing(EntityKind::BlogPost).await;
    params.apply(&mut listing);

    let container = blog_container(&listing, site);
    let body = format!(
        "<section class=\"max-w-6xl mx-auto px-6 py-16\" data-listing=\"{id}\">\
         <h1 class=\"text-4xl font-bold mb-10\">Blog</h1>\
         {search_note}{container}\
         </section>",
        id = BLOG_CONTAINER,
        search_note = search_note(&listing, Page::Blog),
        container = container.to_html(),
    );
    let overlay = listing.render_overlay(settings);
    let close_href = listing.close_href(Page::Blog.path());

    RawHtml(render::render_page(settings, Page::Blog, theme.0, &body, &overlay, &close_href))
}

pub(crate) fn blog_container(listing: &Listing, site: &Site) -> Container {
    let mut container = Container::new(BLOG_CONTAINER);
    listing.render(
        &mut container,
        &RenderOptions::listing(CardTemplate::BlogCard, &site.settings),
        &site.settings,
        Page::Blog.path(),
    );
    container
}

// ── Labs ───────────────────────────────────────────────

#[get("/labs?<params..>")]
pub async fn labs_page(site: &State<Site>, theme: ThemeChoice, params: ListingParams) -> RawHtml<String> {
    let settings = &site.settings;
    let mut listing = site.listing(EntityKind::LabEntry).await;
    params.apply(&mut listing);

    let container = labs_container(&listing, site);
    let filters = if listing.is_unavailable() {
        String::new()
    } else {
        labs::category_buttons(&search::categories(listing.collection()), &listing.active_category())
    };
    let body = format!(
        "<section class=\"max-w-6xl mx-auto px-6 py-16\" data-listing=\"{id}\">\
         <h1 class=\"text-4xl font-bold mb-10\">Labs</h1>\
         {filters}{search_note}{container}\
         </section>",
        id = LABS_CONTAINER,
        filters = filters,
        search_note = search_note(&listing, Page::Labs),
        container = container.to_html(),
    );

    let close_href = listing.close_href(Page::Labs.path());

    RawHtml(render::render_page(settings, Page::Labs, theme.0, &body, "", &close_href))
}

pub(crate) fn labs_container(listing: &Listing, site: &Site) -> Container {
    let mut container = Container::new(LABS_CONTAINER);
    listing.render(
        &mut container,
        &RenderOptions::listing(CardTemplate::LabCard, &site.settings),
        &site.settings,
        Page::Labs.path(),
    );
    container
}

/// "Results for …" line with a link back to the full list.
fn search_note(listing: &Listing, page: Page) -> String {
    let keyword = listing.keyword();
    if keyword.is_empty() {
        return String::new();
    }
    format!(
        "<p class=\"search-note text-gray-400 mb-6\">{} result{} for “{}” · <a href=\"{}\" class=\"text-green-500\">Clear</a></p>",
        listing.displayed().len(),
        if listing.displayed().len() == 1 { "" } else { "s" },
        html_escape(keyword),
        page.path()
    )
}

// ── Legacy static-site paths ───────────────────────────

#[get("/index.html")]
pub fn index_html() -> Redirect {
    Redirect::permanent("/")
}

#[get("/blog.html?<id>")]
pub fn blog_html(id: Option<&str>) -> Redirect {
    Redirect::permanent(legacy_target("/blog", id))
}

#[get("/labs.html?<id>")]
pub fn labs_html(id: Option<&str>) -> Redirect {
    Redirect::permanent(legacy_target("/labs", id))
}

fn legacy_target(page: &str, id: Option<&str>) -> String {
    match id.filter(|s| !s.is_empty()) {
        Some(id) => format!("{}?id={}", page, url_encode(id)),
        None => page.to_string(),
    }
}

// ── Health ─────────────────────────────────────────────

#[get("/health")]
pub fn health(site: &State<Site>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "content_source": site.source(),
        "collections": {
            "blog": site.collection_path(EntityKind::BlogPost),
            "labs": site.collection_path(EntityKind::LabEntry),
        },
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![homepage, blog, labs_page, index_html, blog_html, labs_html, health]
}
