//! PDF rendering through an external engine.
//!
//! The combined document is written to a temporary file next to the run,
//! loaded by the engine through its `file://` URL and printed. The temporary
//! file is deleted only after a successful export; on failure it is kept and
//! its path logged so the document can be inspected.

mod chrome;
mod layout;

pub use chrome::ChromeEngine;
pub use layout::PdfLayout;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::error::Result;
use crate::util::{file_url, format_megabytes};

/// Trait for rendering engines
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Load the document at `url`, wait until it has rendered and print it.
    async fn print_to_pdf(&self, url: &Url, layout: &PdfLayout) -> Result<Vec<u8>>;
}

/// Outcome of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub bytes: u64,
}

impl RenderReport {
    pub fn size_mb(&self) -> String {
        format_megabytes(self.bytes)
    }
}

/// Hands combined documents to a [`RenderEngine`]
pub struct PdfRenderer {
    engine: Arc<dyn RenderEngine>,
    work_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new(engine: Arc<dyn RenderEngine>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            work_dir: work_dir.into(),
        }
    }

    /// Render `document` to `output`, overwriting any previous artifact.
    pub async fn render(&self, document: &str, layout: &PdfLayout, output: &Path) -> Result<RenderReport> {
        let work_dir = std::fs::canonicalize(&self.work_dir)?;
        let temp = tempfile::Builder::new()
            .prefix("_combined_")
            .suffix(".html")
            .tempfile_in(&work_dir)?;
        tokio::fs::write(temp.path(), document).await?;
        info!("Combined HTML saved: {}", temp.path().display());

        match self.print(temp.path(), layout, output).await {
            Ok(bytes) => {
                temp.close()?;
                let report = RenderReport {
                    output: output.to_path_buf(),
                    bytes,
                };
                info!("PDF written: {} ({} MB)", output.display(), report.size_mb());
                Ok(report)
            }
            Err(e) => {
                match temp.keep() {
                    Ok((_, path)) => warn!("Kept combined document for inspection: {}", path.display()),
                    Err(keep) => warn!("Failed to keep combined document: {}", keep),
                }
                Err(e)
            }
        }
    }

    async fn print(&self, document: &Path, layout: &PdfLayout, output: &Path) -> Result<u64> {
        let url = file_url(document)?;
        info!("Rendering with {}", self.engine.name());

        let pdf = self.engine.print_to_pdf(&url, layout).await?;
        tokio::fs::write(output, &pdf).await?;

        Ok(tokio::fs::metadata(output).await?.len())
    }
}
