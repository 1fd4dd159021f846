//! Activity wiring for the TV shell controller.
//!
//! [`ShellActivity`] owns the controller state for one activity/window and
//! forwards lifecycle and input callbacks to it. [`headless`] provides an
//! in-memory host (page model, window, display) for tests and the demo.

use std::path::Path;

use anyhow::Context;
use tvshell_core::ShellConfig;

pub mod activity;
pub mod headless;

pub use activity::ShellActivity;

/// Installs the platform logger. Safe to call more than once.
pub fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("tvshell"),
    );

    #[cfg(not(target_os = "android"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}

/// Reads a JSON [`ShellConfig`] from disk.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<ShellConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading shell config {}", path.display()))?;
    let cfg = ShellConfig::from_json(&text)
        .with_context(|| format!("parsing shell config {}", path.display()))?;
    log::debug!("loaded shell config from {}", path.display());
    Ok(cfg)
}
