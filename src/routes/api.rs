use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;
use serde_json::{json, Value};

use crate::chrome::{Theme, THEME_COOKIE};
use crate::models::entity::EntityKind;
use crate::routes::public::{blog_container, labs_container};
use crate::routes::ListingParams;
use crate::site::{Site, ThemeChoice};

/// A re-rendered listing for live search and category filtering. The page
/// script swaps `html` into the container and toggles the no-results
/// placeholder from `empty`.
#[derive(Debug, Serialize)]
pub struct Fragment {
    pub html: String,
    pub count: usize,
    pub empty: bool,
    pub unavailable: bool,
    pub overlay: String,
}

#[get("/blog?<params..>")]
pub async fn blog_fragment(site: &State<Site>, params: ListingParams) -> Json<Fragment> {
    let mut listing = site.listing(EntityKind::BlogPost).await;
    params.apply(&mut listing);
    let container = blog_container(&listing, site);
    Json(Fragment {
        html: container.html,
        count: container.cards,
        empty: container.no_results_visible,
        unavailable: listing.is_unavailable(),
        overlay: listing.render_overlay(&site.settings),
    })
}

#[get("/labs?<params..>")]
pub async fn labs_fragment(site: &State<Site>, params: ListingParams) -> Json<Fragment> {
    let mut listing = site.listing(EntityKind::LabEntry).await;
    params.apply(&mut listing);
    let container = labs_container(&listing, site);
    Json(Fragment {
        html: container.html,
        count: container.cards,
        empty: container.no_results_visible,
        unavailable: listing.is_unavailable(),
        overlay: String::new(),
    })
}

// ── Theme toggle ───────────────────────────────────────

/// Flip the theme. The page reports what it is showing in `current`, which
/// can differ from the cookie when the script applied the system preference.
#[post("/theme?<current>")]
pub fn theme_toggle(cookies: &CookieJar<'_>, resolved: ThemeChoice, current: Option<&str>) -> Json<Value> {
    let shown = current.and_then(Theme::parse).unwrap_or(resolved.0);
    let next = shown.toggled();
    cookies.add(
        Cookie::build((THEME_COOKIE, next.as_str()))
            .path("/")
            .same_site(SameSite::Lax)
            .permanent(),
    );
    Json(json!({ "theme": next.as_str(), "icon": next.icon_classes() }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![blog_fragment, labs_fragment, theme_toggle]
}
