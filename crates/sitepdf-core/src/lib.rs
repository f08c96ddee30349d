//! sitepdf Core Library
//!
//! This library provides the core functionality for exporting a static
//! documentation site to one PDF:
//! - Page assembly (title and main-content extraction, asset path rewriting)
//! - PDF rendering through a headless browser
//! - Shared navigation injection and site preparation
//! - Validation of the page list against the site contents

pub mod assemble;
pub mod config;
pub mod error;
pub mod html;
pub mod nav;
pub mod render;
pub mod site;
pub mod util;

pub use assemble::{CombinedDocument, PageAssembler};
pub use config::{
    EngineConfig, ExportConfig, NavLink, NavigationConfig, PageKey, PaperSize, PdfConfig,
};
pub use error::{Error, Result};
pub use html::PageDescriptor;
pub use nav::{NavigationInjector, current_page_key, prepare_page};
pub use render::{ChromeEngine, PdfLayout, PdfRenderer, RenderEngine, RenderReport};
pub use site::SiteReport;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// High-level exporter that combines assembly and rendering
pub struct SiteExporter {
    engine: Arc<dyn RenderEngine>,
    config: ExportConfig,
}

/// Result of a full export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub render: RenderReport,
    /// Pages included, in document order
    pub pages: Vec<String>,
    /// Configured pages that were missing
    pub skipped: Vec<String>,
}

impl SiteExporter {
    /// Create an exporter backed by headless Chrome
    pub fn new(config: ExportConfig) -> Result<Self> {
        let engine = Arc::new(ChromeEngine::new(config.engine.clone()));
        Self::with_engine(engine, config)
    }

    /// Create with a custom rendering engine
    pub fn with_engine(engine: Arc<dyn RenderEngine>, config: ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    /// Assemble the combined document without rendering it
    pub async fn assemble(&self) -> Result<CombinedDocument> {
        PageAssembler::new(&self.config).assemble().await
    }

    /// Render an assembled document to the configured output
    pub async fn render(&self, combined: &CombinedDocument) -> Result<RenderReport> {
        let layout = PdfLayout::from_config(&self.config)?;
        let work_dir = self
            .config
            .work_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        PdfRenderer::new(Arc::clone(&self.engine), work_dir)
            .render(&combined.html, &layout, &self.config.output)
            .await
    }

    /// Assemble the site and render it to the configured output
    pub async fn export(&self) -> Result<ExportReport> {
        info!("Building combined HTML...");
        let combined = self.assemble().await?;
        let render = self.render(&combined).await?;

        Ok(ExportReport {
            render,
            pages: combined.pages.into_iter().map(|p| p.filename).collect(),
            skipped: combined.skipped,
        })
    }

    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }
}
