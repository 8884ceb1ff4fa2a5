use crate::chrome::{self, Theme};
use crate::designs::{journal, labs};
use crate::models::entity::{Entity, EntityKind};
use crate::models::settings::SiteSettings;

/// Card layouts, one per listing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTemplate {
    /// Blog listing page; "Read More" opens the post overlay.
    BlogCard,
    /// Home page "recent posts" strip.
    BlogPreview,
    /// Labs listing page; "Read More" expands the card in place.
    LabCard,
    /// Home page "latest labs" strip.
    LabPreview,
}

impl CardTemplate {
    pub fn kind(self) -> EntityKind {
        match self {
            CardTemplate::BlogCard | CardTemplate::BlogPreview => EntityKind::BlogPost,
            CardTemplate::LabCard | CardTemplate::LabPreview => EntityKind::LabEntry,
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            CardTemplate::BlogPreview => "No blog posts available yet.",
            CardTemplate::LabPreview => "No labs available yet.",
            CardTemplate::BlogCard | CardTemplate::LabCard => "No results found.",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// `None` renders every entity.
    pub limit: Option<usize>,
    pub truncate_length: usize,
    pub template: CardTemplate,
}

impl RenderOptions {
    pub fn listing(template: CardTemplate, settings: &SiteSettings) -> Self {
        RenderOptions {
            limit: None,
            truncate_length: settings.truncate_length,
            template,
        }
    }

    pub fn preview(template: CardTemplate, settings: &SiteSettings) -> Self {
        RenderOptions {
            limit: Some(settings.preview_limit),
            truncate_length: settings.truncate_length,
            template,
        }
    }
}

/// What cards need to know about the page they are rendered into.
pub struct CardContext<'a> {
    pub settings: &'a SiteSettings,
    /// Page path the detail links point back to, e.g. `/labs`.
    pub page: &'a str,
    /// Encoded query of the active filter, without the detail parameter.
    pub query: String,
    /// Position of the expanded card in the displayed list, if any.
    pub expanded: Option<usize>,
}

impl<'a> CardContext<'a> {
    pub fn new(settings: &'a SiteSettings, page: &'a str) -> Self {
        CardContext {
            settings,
            page,
            query: String::new(),
            expanded: None,
        }
    }

    /// Link that re-renders the current page with `open` set (or cleared).
    pub fn detail_href(&self, open: Option<usize>) -> String {
        let mut params: Vec<String> = Vec::new();
        if !self.query.is_empty() {
            params.push(self.query.clone());
        }
        if let Some(i) = open {
            params.push(format!("open={}", i));
        }
        if params.is_empty() {
            self.page.to_string()
        } else {
            format!("{}?{}", self.page, params.join("&"))
        }
    }
}

/// A target container on the page. Rendering always replaces `html` wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub html: String,
    pub cards: usize,
    pub no_results_visible: bool,
    no_results_message: &'static str,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Container {
            id: id.to_string(),
            html: String::new(),
            cards: 0,
            no_results_visible: false,
            no_results_message: "No results found.",
        }
    }

    /// Replace the contents with one card per entity (bounded by `limit`).
    /// An empty list shows the no-results placeholder instead.
    pub fn render(&mut self, entities: &[Entity], opts: &RenderOptions, ctx: &CardContext) {
        let shown = match opts.limit {
            Some(n) => &entities[..n.min(entities.len())],
            None => entities,
        };
        self.no_results_message = opts.template.empty_message();
        self.html = render_cards(shown, opts, ctx);
        self.cards = shown.len();
        self.no_results_visible = shown.is_empty();
    }

    /// Replace the contents with the load-failure message for `kind`.
    pub fn show_error(&mut self, kind: EntityKind) {
        self.html = error_placeholder(kind);
        self.cards = 0;
        self.no_results_visible = false;
    }

    pub fn no_results_id(&self) -> String {
        format!("{}-no-results", self.id)
    }

    /// The container element followed by its no-results placeholder.
    pub fn to_html(&self) -> String {
        format!(
            "<div id=\"{id}\" class=\"grid md:grid-cols-2 lg:grid-cols-3 gap-8\">{html}</div>\
             <p id=\"{nr}\" class=\"no-results text-gray-400 text-center py-10{hidden}\">{msg}</p>",
            id = html_escape(&self.id),
            html = self.html,
            nr = html_escape(&self.no_results_id()),
            hidden = if self.no_results_visible { "" } else { " hidden" },
            msg = self.no_results_message,
        )
    }
}

pub fn render_cards(entities: &[Entity], opts: &RenderOptions, ctx: &CardContext) -> String {
    let mut html = String::new();
    for (index, entity) in entities.iter().enumerate() {
        let card = match opts.template {
            CardTemplate::BlogCard => journal::card(entity, index, opts, ctx),
            CardTemplate::BlogPreview => journal::preview_card(entity, opts, ctx),
            CardTemplate::LabCard => labs::card(entity, index, opts, ctx),
            CardTemplate::LabPreview => labs::preview_card(entity, opts, ctx),
        };
        html.push_str(&card);
    }
    html
}

pub fn error_placeholder(kind: EntityKind) -> String {
    let msg = match kind {
        EntityKind::BlogPost => "Failed to load blog posts. Please try again later.",
        EntityKind::LabEntry => "Error loading labs. Please refresh or check your connection.",
    };
    format!("<p class=\"content-error text-center text-gray-400 py-10\">{}</p>", msg)
}

/// Escape the five HTML-significant characters.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", b));
            }
        }
    }
    result
}

/// Cut to `max` characters and append "…". Not word-aware.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut result = text[..cut].to_string();
            result.push('…');
            result
        }
    }
}

/// Format a collection date for display, or return it verbatim when it does
/// not parse.
pub fn format_date(entity: &Entity, settings: &SiteSettings) -> String {
    match entity.published {
        Some(ndt) => {
            let utc_dt = chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(ndt, chrono::Utc);
            match settings.tz() {
                Some(tz) => utc_dt.with_timezone(&tz).format(&settings.date_format).to_string(),
                None => utc_dt.format(&settings.date_format).to_string(),
            }
        }
        None => entity.date.clone(),
    }
}

/// Which top-level page is being rendered, for nav highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Blog,
    Labs,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Blog => "/blog",
            Page::Labs => "/labs",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Blog => "Blog",
            Page::Labs => "Labs",
        }
    }

    /// Page a plain (non-live) search submit lands on.
    fn search_page(self) -> &'static str {
        match self {
            Page::Labs => "/labs",
            Page::Home | Page::Blog => "/blog",
        }
    }

    /// Endpoint the search overlay queries for live results on this page.
    fn search_endpoint(self) -> &'static str {
        match self {
            Page::Labs => "/api/labs",
            Page::Home | Page::Blog => "/api/blog",
        }
    }
}

fn build_nav(current: Page, class: &str) -> String {
    [Page::Home, Page::Blog, Page::Labs]
        .iter()
        .map(|p| {
            let active = if chrome::is_active_link(p.path(), current.path()) {
                " text-green-500 font-semibold"
            } else {
                ""
            };
            format!("<a href=\"{}\" class=\"{}{}\">{}</a>", p.path(), class, active, p.title())
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Wrap page content in the site shell: nav, mobile menu, search overlay,
/// post overlay, scroll progress and scroll-to-top, plus the widget script.
/// `close_href` is where the post overlay's close and back links lead; it
/// keeps the active filter and drops only the open post.
pub fn render_page(
    settings: &SiteSettings,
    page: Page,
    theme: Theme,
    body: &str,
    overlay: &str,
    close_href: &str,
) -> String {
    let site_name = html_escape(&settings.site_name);
    let overlay_hidden = if overlay.is_empty() { " hidden" } else { "" };
    let body_lock = if overlay.is_empty() { "" } else { " overflow-hidden" };
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{html_class}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{page_title} | {site_name}</title>
<link rel="stylesheet" href="/assets/css/site.css">
</head>
<body class="bg-gray-950 text-gray-100{body_lock}">
<div id="scroll-progress" class="fixed top-0 left-0 h-1 bg-green-500 z-50" style="width:0%"></div>
<header class="sticky top-0 z-40">
<nav class="flex items-center justify-between px-6 py-4">
<a href="/" class="text-xl font-bold">{site_name}</a>
<div class="hidden md:flex gap-6">{nav}</div>
<div class="flex items-center gap-4">
<button id="search-open-btn" aria-label="Search"><i class="fa fa-search"></i></button>
<button id="theme-toggle" aria-label="Toggle dark mode"><i id="theme-icon" class="fa {theme_icon}"></i></button>
<button id="menu-toggle" class="md:hidden" aria-label="Menu"><i class="fa fa-bars"></i></button>
</div>
</nav>
<div id="mobile-menu" class="md:hidden flex flex-col px-6 pb-4 hidden">{mobile_nav}</div>
</header>
<div id="page-overlay" class="fixed inset-0 bg-black/50 z-30 hidden"></div>
<main>
{body}
</main>
<div id="search-modal" class="fixed inset-0 bg-black/80 z-50 flex items-start justify-center pt-24 hidden">
<form id="search-form" action="{search_page}" method="get" data-endpoint="{search_endpoint}" class="w-full max-w-xl">
<input id="search-input" name="q" type="search" placeholder="Search…" autocomplete="off" class="w-full px-4 py-3 rounded">
</form>
<button id="close-search-btn" aria-label="Close search" class="ml-4">&times;</button>
</div>
<div id="post-modal" class="fixed inset-0 bg-black/90 z-50 overflow-y-auto{overlay_hidden}">
<div class="max-w-3xl mx-auto p-6">
<a id="close-post-btn" href="{close_href}" aria-label="Close" class="float-right">&times;</a>
<div id="post-modal-content">{overlay}</div>
<a id="back-to-blog-btn" href="{close_href}" class="inline-block mt-6 text-green-500">← Back to Blog</a>
</div>
</div>
<button id="scroll-top-btn" class="fixed bottom-6 right-6 rounded-full bg-green-600 text-white w-10 h-10 hidden" aria-label="Back to top">↑</button>
<footer class="text-center text-gray-500 py-8">&copy; {year} {site_name}</footer>
{script}
</body>
</html>"#,
        html_class = theme.html_class(),
        page_title = page.title(),
        site_name = site_name,
        body_lock = body_lock,
        nav = build_nav(page, "hover:text-green-400"),
        mobile_nav = build_nav(page, "py-2"),
        theme_icon = theme.icon_classes(),
        body = body,
        close_href = html_escape(close_href),
        search_page = page.search_page(),
        search_endpoint = page.search_endpoint(),
        overlay_hidden = overlay_hidden,
        overlay = overlay,
        year = chrono::Utc::now().format("%Y"),
        script = chrome::widget_script(),
    )
}
