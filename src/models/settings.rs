use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

/// Site configuration, read from the `[<profile>.site]` table of Rocket.toml
/// (or `ROCKET_SITE_*` env vars). Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub site_name: String,
    /// Directory the collection paths are resolved against.
    pub content_root: String,
    /// When set, collections are fetched over HTTP from this base URL instead.
    pub content_base_url: Option<String>,
    pub blog_path: String,
    pub labs_path: String,
    pub assets_dir: String,
    pub preview_limit: usize,
    pub truncate_length: usize,
    pub date_format: String,
    pub timezone: String,
    pub default_theme: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            site_name: "NGTech Services".to_string(),
            content_root: "website".to_string(),
            content_base_url: None,
            blog_path: "assets/data/blog.json".to_string(),
            labs_path: "assets/data/labs.json".to_string(),
            assets_dir: "website/assets".to_string(),
            preview_limit: 3,
            truncate_length: 120,
            date_format: "%a %b %d %Y".to_string(),
            timezone: "UTC".to_string(),
            default_theme: "light".to_string(),
        }
    }
}

impl SiteSettings {
    /// Extract from a figment, falling back to defaults when the table is
    /// missing or malformed.
    pub fn from_figment(figment: &Figment) -> Self {
        match figment.extract_inner::<SiteSettings>("site") {
            Ok(s) => s,
            Err(e) => {
                if !e.missing() {
                    log::warn!("Invalid [site] configuration, using defaults: {}", e);
                }
                SiteSettings::default()
            }
        }
    }

    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().ok()
    }
}
