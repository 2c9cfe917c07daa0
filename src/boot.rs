use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::Config;

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if critical dependencies are absent.
pub fn run(config: &Config) {
    info!("Shopfront boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Data directory ──────────────────────────────
    let data_dir = Path::new(&config.site.data_dir);
    if !data_dir.exists() {
        match fs::create_dir_all(data_dir) {
            Ok(_) => info!("  Created directory: {}", config.site.data_dir),
            Err(e) => {
                error!("  FAILED to create directory {}: {}", config.site.data_dir, e);
                errors += 1;
            }
        }
    }

    // ── 2. Data directory writable ──────────────────────
    if data_dir.exists() {
        let test_file = data_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Data directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 3. Content host configured ──────────────────────
    if config.cms.base_url.is_empty() {
        error!("  No CMS base_url configured");
        errors += 1;
    } else if url::Url::parse(&config.cms.base_url).is_err() {
        error!("  CMS base_url is not a valid URL: {}", config.cms.base_url);
        errors += 1;
    }

    // ── 4. Config file present ──────────────────────────
    if !Path::new("shopfront.toml").exists() {
        warn!("  shopfront.toml not found — using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
