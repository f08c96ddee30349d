use anyhow::{Context, Result};
use sitepdf_core::{ExportConfig, NavigationInjector};
use std::path::{Path, PathBuf};

/// Shared state for the preview server
pub struct AppState {
    /// Canonical site root
    pub site_dir: PathBuf,
    pub injector: NavigationInjector,
}

impl AppState {
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let site_dir = std::fs::canonicalize(&config.site_dir)
            .with_context(|| format!("Site directory not found: {}", config.site_dir.display()))?;
        let injector = NavigationInjector::new(config.navigation.clone())
            .context("Failed to render navigation markup")?;

        Ok(Self { site_dir, injector })
    }

    /// Path of a top-level site file.
    pub fn site_file(&self, name: &str) -> PathBuf {
        self.site_dir.join(Path::new(name))
    }
}
