#[macro_use]
extern crate rocket;

use std::path::Path;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};

mod boot;
mod chrome;
mod content;
mod designs;
mod detail;
mod listing;
mod models;
mod render;
mod routes;
mod site;

#[cfg(test)]
mod tests;

use chrome::COLOR_SCHEME_HINT;
use models::settings::SiteSettings;
use site::Site;

/// Marks every page and content API response as uncacheable so a redeploy of
/// the collections is visible on the next load. Static assets are exempt.
/// HTML pages also request the colour-scheme client hint, and vary on it.
pub struct NoCacheContent;

#[rocket::async_trait]
impl Fairing for NoCacheContent {
    fn info(&self) -> Info {
        Info { name: "No-Cache Content", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if !req.uri().path().starts_with("/assets/") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
        if res.content_type().map(|ct| ct.is_html()).unwrap_or(false) {
            res.set_header(Header::new("Accept-CH", COLOR_SCHEME_HINT));
            res.set_header(Header::new("Critical-CH", COLOR_SCHEME_HINT));
            res.adjoin_header(Header::new("Vary", COLOR_SCHEME_HINT));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the application around an already-configured site.
pub fn build(site: Site) -> Rocket<Build> {
    let assets_dir = site.settings.assets_dir.clone();

    let mut rocket = rocket::build()
        .manage(site)
        .attach(NoCacheContent)
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error]);

    if Path::new(&assets_dir).is_dir() {
        rocket = rocket.mount("/assets", FileServer::from(assets_dir));
    } else {
        log::warn!("Asset directory {} not found, /assets is not served", assets_dir);
    }
    rocket
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let settings = SiteSettings::from_figment(&rocket::Config::figment());

    // Boot check — verify/create directories, validate collections
    boot::run(&settings);

    let site = match Site::from_settings(settings) {
        Ok(site) => site,
        Err(e) => {
            log::error!("Failed to configure content source: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Serving content from {}", site.source());

    build(site)
}
