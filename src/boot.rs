use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::models::settings::SiteSettings;

/// Outcome of the boot checks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub warnings: u32,
    pub errors: u32,
}

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing collections, and
/// aborts if a required directory cannot be created.
pub fn run(settings: &SiteSettings) {
    info!("{} boot check starting...", settings.site_name);

    let report = check(settings);

    if report.errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            report.errors, report.warnings
        );
        process::exit(1);
    }

    if report.warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some pages will show load errors.",
            report.warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}

pub fn check(settings: &SiteSettings) -> BootReport {
    let mut report = BootReport::default();
    let remote = settings
        .content_base_url
        .as_deref()
        .map(|u| !u.trim().is_empty())
        .unwrap_or(false);

    // ── 1. Directories ─────────────────────────────────
    let mut dirs = vec![settings.assets_dir.as_str()];
    if !remote {
        dirs.push(settings.content_root.as_str());
    }
    for dir in dirs {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 2. Collections ─────────────────────────────────
    if remote {
        info!(
            "  Content served from {}",
            settings.content_base_url.as_deref().unwrap_or_default()
        );
    } else {
        for rel in [&settings.blog_path, &settings.labs_path] {
            let path = Path::new(&settings.content_root).join(rel.trim_start_matches('/'));
            if !path.is_file() {
                warn!("  Missing collection: {} (its listing will show a load error)", path.display());
                report.warnings += 1;
            }
        }
    }

    // ── 3. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        report.warnings += 1;
    }

    report
}
