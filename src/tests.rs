#![cfg(test)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use rocket::http::{ContentType, Cookie, Header, Status};
use rocket::local::blocking::Client;
use serde_json::Value;

use crate::content::{self, Cause, ContentFetcher, Fetched, FsFetcher};
use crate::listing::Listing;
use crate::models::entity::{sort_newest_first, EntityKind};
use crate::models::search::{filter_by_keyword, CategoryFilter};
use crate::models::settings::SiteSettings;
use crate::render::{CardContext, CardTemplate, Container, RenderOptions};
use crate::site::Site;

/// In-memory content source: each path maps to a canned response.
struct StaticFetcher {
    responses: HashMap<String, Result<Fetched, String>>,
}

impl StaticFetcher {
    fn new() -> Self {
        StaticFetcher { responses: HashMap::new() }
    }

    fn ok(mut self, path: &str, body: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            Ok(Fetched { status: 200, body: body.to_string() }),
        );
        self
    }

    fn status(mut self, path: &str, status: u16) -> Self {
        self.responses
            .insert(path.to_string(), Ok(Fetched { status, body: String::new() }));
        self
    }

    fn broken(mut self, path: &str) -> Self {
        self.responses
            .insert(path.to_string(), Err("connection reset".to_string()));
        self
    }
}

#[rocket::async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, path: &str) -> Result<Fetched, Cause> {
        match self.responses.get(path) {
            Some(Ok(f)) => Ok(f.clone()),
            Some(Err(e)) => Err(Cause::Transport(e.clone())),
            None => Ok(Fetched { status: 404, body: String::new() }),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

const BLOG_PATH: &str = "assets/data/blog.json";
const LABS_PATH: &str = "assets/data/labs.json";

const BLOG_JSON: &str = r#"[
    {"id": "rust-intro", "title": "Intro to Rust", "date": "2024-01-01", "content": "Ownership and borrowing explained."},
    {"id": "go-basics", "title": "Go basics", "date": "2024-06-01", "content": "Goroutines and channels."}
]"#;

const LABS_JSON: &str = r#"[
    {"id": "fw", "title": "Firewall Rules", "date": "2024-03-01", "category": "Security",
     "description": "Building a pfSense ruleset from scratch.", "video": "https://www.youtube.com/embed/fw"},
    {"id": "vlan", "title": "VLAN Trunking", "date": "2024-05-01", "category": "Networking",
     "description": "Trunk ports between two Cisco switches.", "link": "labs/vlan.html"},
    {"id": "siem", "title": "SIEM Setup", "date": "not yet", "category": "Security",
     "description": "Wazuh manager and agents."}
]"#;

fn test_settings() -> SiteSettings {
    SiteSettings {
        assets_dir: "does-not-exist/assets".to_string(),
        ..SiteSettings::default()
    }
}

fn test_client(fetcher: StaticFetcher) -> Client {
    let site = Site::with_fetcher(test_settings(), fetcher);
    Client::tracked(crate::build(site)).expect("valid rocket instance")
}

fn full_client() -> Client {
    test_client(StaticFetcher::new().ok(BLOG_PATH, BLOG_JSON).ok(LABS_PATH, LABS_JSON))
}

fn card_count(html: &str) -> usize {
    html.matches("class=\"content-card ").count()
}

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn scratch_dir() -> PathBuf {
    let id = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("ngtech_content_{}_{}", std::process::id(), id));
    fs::create_dir_all(dir.join("assets/data")).unwrap();
    dir
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

#[rocket::async_test]
async fn load_sorts_collection_newest_first() {
    let fetcher = StaticFetcher::new().ok(BLOG_PATH, BLOG_JSON);
    let posts = content::load(&fetcher, EntityKind::BlogPost, BLOG_PATH).await.unwrap();
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Go basics", "Intro to Rust"]);
}

#[rocket::async_test]
async fn load_failures_are_content_unavailable() {
    let fetcher = StaticFetcher::new()
        .status(BLOG_PATH, 500)
        .ok(LABS_PATH, "{not json")
        .broken("other.json");

    let err = content::load(&fetcher, EntityKind::BlogPost, BLOG_PATH).await.unwrap_err();
    assert!(matches!(err.cause, Cause::Status(500)));
    let err = content::load(&fetcher, EntityKind::LabEntry, LABS_PATH).await.unwrap_err();
    assert!(matches!(err.cause, Cause::Malformed(_)));
    let err = content::load(&fetcher, EntityKind::LabEntry, "other.json").await.unwrap_err();
    assert!(matches!(err.cause, Cause::Transport(_)));
    assert_eq!(err.path, "other.json");
}

#[rocket::async_test]
async fn fs_fetcher_reads_fresh_content_every_time() {
    let root = scratch_dir();
    let file = root.join(BLOG_PATH);
    let fetcher = FsFetcher::new(&root);

    let err = content::load(&fetcher, EntityKind::BlogPost, BLOG_PATH).await.unwrap_err();
    assert!(matches!(err.cause, Cause::Status(404)));

    fs::write(&file, r#"[{"title": "First"}]"#).unwrap();
    let posts = content::load(&fetcher, EntityKind::BlogPost, BLOG_PATH).await.unwrap();
    assert_eq!(posts[0].title, "First");

    fs::write(&file, r#"[{"title": "Second"}, {"title": "Third"}]"#).unwrap();
    let posts = content::load(&fetcher, EntityKind::BlogPost, BLOG_PATH).await.unwrap();
    assert_eq!(posts.len(), 2);

    let denied = fetcher.fetch("../outside.json").await.unwrap();
    assert_eq!(denied.status, 403);
    let _ = fs::remove_dir_all(&root);
}

#[rocket::async_test]
async fn missing_fields_do_not_fail_the_load() {
    let fetcher = StaticFetcher::new().ok(LABS_PATH, r#"[{}, {"title": "Only title"}, 3]"#);
    let labs = content::load(&fetcher, EntityKind::LabEntry, LABS_PATH).await.unwrap();
    assert_eq!(labs.len(), 3);
    assert!(labs.iter().any(|l| l.title == "Only title"));
    assert_eq!(labs.iter().filter(|l| l.title == "Untitled Lab").count(), 2);
}

// ═══════════════════════════════════════════════════════════
// Listing behaviour
// ═══════════════════════════════════════════════════════════

async fn loaded(kind: EntityKind, path: &str, body: &str) -> Listing {
    let fetcher = StaticFetcher::new().ok(path, body);
    Listing::new(kind, content::load(&fetcher, kind, path).await)
}

#[rocket::async_test]
async fn keyword_search_is_case_insensitive_substring() {
    let mut blog = loaded(EntityKind::BlogPost, BLOG_PATH, BLOG_JSON).await;
    blog.search("rust");
    let titles: Vec<&str> = blog.displayed().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro to Rust"]);

    let all = blog.collection().to_vec();
    assert_eq!(filter_by_keyword(&all, ""), all);
}

#[rocket::async_test]
async fn resorting_sorted_collection_is_idempotent() {
    let blog = loaded(EntityKind::BlogPost, BLOG_PATH, BLOG_JSON).await;
    let mut again = blog.collection().to_vec();
    sort_newest_first(&mut again);
    assert_eq!(again, blog.collection());
}

#[rocket::async_test]
async fn category_all_ignores_keyword_state() {
    let mut labs = loaded(EntityKind::LabEntry, LABS_PATH, LABS_JSON).await;
    labs.search("vlan");
    assert_eq!(labs.displayed().len(), 1);
    labs.select_category(CategoryFilter::parse("all"));
    assert_eq!(labs.displayed(), labs.collection());
}

#[rocket::async_test]
async fn refilter_collapses_expanded_lab() {
    let settings = test_settings();
    let mut labs = loaded(EntityKind::LabEntry, LABS_PATH, LABS_JSON).await;
    let opts = RenderOptions::listing(CardTemplate::LabCard, &settings);

    labs.toggle(0);
    let mut container = Container::new("labs-container");
    labs.render(&mut container, &opts, &settings, "/labs");
    assert_eq!(container.html.matches("read-more-content expanded").count(), 1);

    labs.select_category(CategoryFilter::parse("Security"));
    labs.render(&mut container, &opts, &settings, "/labs");
    assert_eq!(container.html.matches("read-more-content expanded").count(), 0);
    assert_eq!(container.cards, 2);
}

#[rocket::async_test]
async fn unavailable_collection_renders_single_error_placeholder() {
    let settings = test_settings();
    let fetcher = StaticFetcher::new().status(LABS_PATH, 404);
    let labs = Listing::new(
        EntityKind::LabEntry,
        content::load(&fetcher, EntityKind::LabEntry, LABS_PATH).await,
    );
    let mut container = Container::new("labs-container");
    labs.render(
        &mut container,
        &RenderOptions::listing(CardTemplate::LabCard, &settings),
        &settings,
        "/labs",
    );
    assert_eq!(container.html.matches("class=\"content-error").count(), 1);
    assert_eq!(card_count(&container.html), 0);
    assert_eq!(container.cards, 0);
    assert!(!container.no_results_visible);
}

#[test]
fn script_in_title_never_reaches_markup() {
    let settings = test_settings();
    let ctx = CardContext::new(&settings, "/");
    for template in [
        CardTemplate::BlogCard,
        CardTemplate::BlogPreview,
        CardTemplate::LabCard,
        CardTemplate::LabPreview,
    ] {
        let body = r#"[{"title": "<script>alert(1)</script>", "category": "<script>", "date": "<script>",
                        "excerpt": "<script>x</script>", "description": "<script>y</script>"}]"#;
        let entities = content::parse_collection(template.kind(), body).unwrap();
        let mut container = Container::new("c");
        container.render(&entities, &RenderOptions::listing(template, &settings), &ctx);
        assert!(!container.to_html().contains("<script>"), "{:?}", template);
    }
}

// ═══════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════

#[test]
fn blog_page_renders_in_date_order() {
    let client = full_client();
    let resp = client.get("/blog").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(
        resp.headers().get_one("Cache-Control"),
        Some("no-store, no-cache, must-revalidate, max-age=0")
    );
    let html = resp.into_string().unwrap();
    let go = html.find("Go basics").unwrap();
    let rust = html.find("Intro to Rust").unwrap();
    assert!(go < rust);
    assert_eq!(card_count(&html), 2);
}

#[test]
fn blog_page_404_shows_error_not_cards() {
    let client = test_client(StaticFetcher::new().status(BLOG_PATH, 404));
    let html = client.get("/blog").dispatch().into_string().unwrap();
    assert_eq!(html.matches("class=\"content-error").count(), 1);
    assert!(html.contains("Failed to load blog posts. Please try again later."));
    assert_eq!(card_count(&html), 0);
}

#[test]
fn blog_overlay_opens_by_index_and_deep_link() {
    let client = full_client();
    let html = client.get("/blog?open=1").dispatch().into_string().unwrap();
    assert!(html.contains("Ownership and borrowing explained."));
    assert!(html.contains("id=\"post-modal\" class=\"fixed inset-0 bg-black/90 z-50 overflow-y-auto\""));

    let html = client.get("/blog?id=go-basics").dispatch().into_string().unwrap();
    assert!(html.contains("Goroutines and channels."));
    assert!(html.contains("<article class=\"post-detail\" data-id=\"go-basics\">"));

    let html = client.get("/blog?open=9").dispatch().into_string().unwrap();
    assert!(html.contains("overflow-y-auto hidden"));
}

#[test]
fn blog_search_shows_no_results_placeholder() {
    let client = full_client();
    let html = client.get("/blog?q=kubernetes").dispatch().into_string().unwrap();
    assert_eq!(card_count(&html), 0);
    assert!(html.contains("<p id=\"blog-container-no-results\" class=\"no-results text-gray-400 text-center py-10\">"));
    assert!(html.contains("0 results for"));
}

#[test]
fn labs_page_category_and_toggle() {
    let client = full_client();
    let html = client.get("/labs?category=security").dispatch().into_string().unwrap();
    assert_eq!(card_count(&html), 2);
    assert!(html.contains("data-category=\"Security\">Security</a>"));
    assert!(html.contains("href=\"/labs?category=security&amp;open=0\""));

    let html = client.get("/labs?category=security&open=0").dispatch().into_string().unwrap();
    assert_eq!(html.matches("read-more-content expanded").count(), 1);
    assert!(html.contains("Show Less ↑"));

    let html = client.get("/labs?category=all&q=vlan").dispatch().into_string().unwrap();
    assert_eq!(card_count(&html), 3);
}

#[test]
fn labs_deep_link_expands_card() {
    let client = full_client();
    let html = client.get("/labs?id=vlan").dispatch().into_string().unwrap();
    assert_eq!(html.matches("read-more-content expanded").count(), 1);
    assert!(html.contains("View Full Lab →"));
}

#[test]
fn homepage_previews_load_independently() {
    let client = test_client(StaticFetcher::new().ok(BLOG_PATH, BLOG_JSON).broken(LABS_PATH));
    let html = client.get("/").dispatch().into_string().unwrap();
    assert!(html.contains("href=\"/blog?id=go-basics\""));
    assert!(html.contains("Error loading labs. Please refresh or check your connection."));
    assert_eq!(card_count(&html), 2);
}

#[test]
fn fragment_api_reports_empty_and_unavailable() {
    let client = full_client();
    let resp = client.get("/api/labs?q=wazuh").dispatch();
    assert_eq!(resp.content_type(), Some(ContentType::JSON));
    let json: Value = resp.into_json().unwrap();
    assert_eq!(json["count"], 1);
    assert_eq!(json["empty"], false);

    let json: Value = client.get("/api/blog?q=zzz").dispatch().into_json().unwrap();
    assert_eq!(json["count"], 0);
    assert_eq!(json["empty"], true);

    let client = test_client(StaticFetcher::new());
    let json: Value = client.get("/api/blog").dispatch().into_json().unwrap();
    assert_eq!(json["unavailable"], true);
    assert_eq!(json["empty"], false);
}

#[test]
fn theme_toggle_persists_in_cookie() {
    let client = full_client();
    let json: Value = client.post("/api/theme").dispatch().into_json().unwrap();
    assert_eq!(json["theme"], "dark");
    assert!(client.cookies().get("theme").map(|c| c.value() == "dark").unwrap_or(false));

    let html = client.get("/").dispatch().into_string().unwrap();
    assert!(html.contains("<html lang=\"en\" class=\"dark\">"));

    let json: Value = client
        .post("/api/theme")
        .cookie(Cookie::new("theme", "dark"))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(json["theme"], "light");
}

#[test]
fn color_scheme_hint_sets_initial_theme() {
    let client = full_client();
    let html = client
        .get("/labs")
        .header(Header::new("Sec-CH-Prefers-Color-Scheme", "\"dark\""))
        .dispatch()
        .into_string()
        .unwrap();
    assert!(html.contains("<html lang=\"en\" class=\"dark\">"));
}

#[test]
fn pages_request_color_scheme_hint() {
    let client = full_client();
    let resp = client.get("/").dispatch();
    assert_eq!(resp.headers().get_one("Accept-CH"), Some("Sec-CH-Prefers-Color-Scheme"));
    assert_eq!(resp.headers().get_one("Critical-CH"), Some("Sec-CH-Prefers-Color-Scheme"));
    assert!(resp.headers().get("Vary").any(|v| v == "Sec-CH-Prefers-Color-Scheme"));

    let resp = client.get("/api/blog").dispatch();
    assert_eq!(resp.headers().get_one("Accept-CH"), None);
}

#[test]
fn theme_toggle_flips_what_the_page_shows() {
    let client = full_client();
    let json: Value = client.post("/api/theme?current=dark").dispatch().into_json().unwrap();
    assert_eq!(json["theme"], "light");
    assert!(client.cookies().get("theme").map(|c| c.value() == "light").unwrap_or(false));
}

#[test]
fn closing_post_keeps_active_search() {
    let client = full_client();
    let html = client.get("/blog?q=rust&open=0").dispatch().into_string().unwrap();
    assert!(html.contains("<article class=\"post-detail\" data-id=\"rust-intro\">"));
    assert!(html.contains("id=\"close-post-btn\" href=\"/blog?q=rust\""));
    assert!(html.contains("id=\"back-to-blog-btn\" href=\"/blog?q=rust\""));

    let html = client.get("/blog?open=0").dispatch().into_string().unwrap();
    assert!(html.contains("id=\"close-post-btn\" href=\"/blog\""));
}

#[test]
fn legacy_paths_redirect() {
    let client = full_client();
    let resp = client.get("/blog.html?id=go-basics").dispatch();
    assert_eq!(resp.status(), Status::PermanentRedirect);
    assert_eq!(resp.headers().get_one("Location"), Some("/blog?id=go-basics"));
    let resp = client.get("/index.html").dispatch();
    assert_eq!(resp.headers().get_one("Location"), Some("/"));
}

#[test]
fn health_reports_source() {
    let client = full_client();
    let json: Value = client.get("/health").dispatch().into_json().unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["content_source"], "memory");
    assert_eq!(json["collections"]["labs"], LABS_PATH);
}
