use rocket::request::{FromRequest, Outcome, Request};

use crate::chrome::{Theme, COLOR_SCHEME_HINT, THEME_COOKIE};
use crate::content::{self, ContentFetcher, FsFetcher, HttpFetcher};
use crate::listing::Listing;
use crate::models::entity::EntityKind;
use crate::models::settings::SiteSettings;

// ── Site: managed state shared by every route ──────────────

pub struct Site {
    pub settings: SiteSettings,
    fetcher: Box<dyn ContentFetcher>,
}

impl Site {
    /// Pick the content source from configuration: remote when
    /// `content_base_url` is set, otherwise the local content root.
    pub fn from_settings(settings: SiteSettings) -> Result<Self, String> {
        let fetcher: Box<dyn ContentFetcher> = match settings.content_base_url.as_deref() {
            Some(base) if !base.trim().is_empty() => Box::new(HttpFetcher::new(base.trim())?),
            _ => Box::new(FsFetcher::new(&settings.content_root)),
        };
        Ok(Site { settings, fetcher })
    }

    pub fn with_fetcher(settings: SiteSettings, fetcher: impl ContentFetcher + 'static) -> Self {
        Site {
            settings,
            fetcher: Box::new(fetcher),
        }
    }

    pub fn source(&self) -> String {
        self.fetcher.describe()
    }

    pub fn collection_path(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::BlogPost => &self.settings.blog_path,
            EntityKind::LabEntry => &self.settings.labs_path,
        }
    }

    /// Fetch one collection for the current page view.
    pub async fn listing(&self, kind: EntityKind) -> Listing {
        let loaded = content::load(self.fetcher.as_ref(), kind, self.collection_path(kind)).await;
        Listing::new(kind, loaded)
    }
}

// ── ThemeChoice: resolved theme for the current request ─────

pub struct ThemeChoice(pub Theme);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ThemeChoice {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let stored = request
            .cookies()
            .get(THEME_COOKIE)
            .map(|c| c.value().to_string());
        let prefers_dark = request
            .headers()
            .get_one(COLOR_SCHEME_HINT)
            .map(|v| v.trim().trim_matches('"').eq_ignore_ascii_case("dark"))
            .unwrap_or(false);
        let default = request
            .rocket()
            .state::<Site>()
            .map(|s| s.settings.default_theme.as_str())
            .unwrap_or("light");
        Outcome::Success(ThemeChoice(Theme::resolve(stored.as_deref(), prefers_dark, default)))
    }
}
