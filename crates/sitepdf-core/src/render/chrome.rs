use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{PdfLayout, RenderEngine};
use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Resolves once the load event has fired, every image has settled,
/// web fonts are ready and one frame has been painted.
const READY_PROBE: &str = r"
new Promise((resolve) => {
  const settled = () => {
    const images = Array.from(document.images)
      .filter((img) => !img.complete)
      .map((img) => new Promise((done) => {
        img.addEventListener('load', done, { once: true });
        img.addEventListener('error', done, { once: true });
      }));
    const fonts = document.fonts ? document.fonts.ready : Promise.resolve();
    Promise.all([fonts, ...images]).then(() => requestAnimationFrame(() => resolve(true)));
  };
  if (document.readyState === 'complete') {
    settled();
  } else {
    window.addEventListener('load', settled, { once: true });
  }
})
";

/// Headless Chromium driven over the DevTools protocol
pub struct ChromeEngine {
    config: EngineConfig,
}

/// A running browser process. Dropping it terminates the process, so every
/// exit path of a render shuts the engine down.
struct EngineSession {
    browser: Browser,
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        debug!("Terminating rendering engine");
    }
}

impl ChromeEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn launch(config: &EngineConfig) -> Result<EngineSession> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(config.sandbox)
            .path(config.chrome_path.clone())
            .idle_browser_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::EngineLaunch(e.to_string()))?;

        debug!("Launching rendering engine");
        let browser = Browser::new(options).map_err(|e| Error::EngineLaunch(e.to_string()))?;
        Ok(EngineSession { browser })
    }

    fn wait_until_ready(tab: &Tab) -> Result<()> {
        let result = tab
            .evaluate(READY_PROBE, true)
            .map_err(|e| Error::EngineNotReady(e.to_string()))?;

        match result.value {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            other => Err(Error::EngineNotReady(format!("probe returned {other:?}"))),
        }
    }

    /// Full engine lifecycle for one document; runs on a blocking thread
    fn print_blocking(config: &EngineConfig, url: &str, options: PrintToPdfOptions) -> Result<Vec<u8>> {
        let session = Self::launch(config)?;

        let tab = session
            .browser
            .new_tab()
            .map_err(|e| Error::EngineLaunch(e.to_string()))?;
        tab.set_default_timeout(Duration::from_secs(config.timeout_secs));

        debug!("Navigating to {}", url);
        let navigation_error = |e: anyhow::Error| Error::EngineNavigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        tab.navigate_to(url).map_err(navigation_error)?;
        tab.wait_until_navigated().map_err(navigation_error)?;

        Self::wait_until_ready(&tab)?;
        if config.settle_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.settle_delay_ms));
        }

        debug!("Exporting PDF");
        tab.print_to_pdf(Some(options))
            .map_err(|e| Error::EngineExport(e.to_string()))
    }
}

fn print_options(layout: &PdfLayout) -> PrintToPdfOptions {
    let (paper_width, paper_height) = layout.paper_in();
    let (top, bottom, left, right) = layout.margins_in();

    PrintToPdfOptions {
        print_background: Some(layout.print_background),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(top),
        margin_bottom: Some(bottom),
        margin_left: Some(left),
        margin_right: Some(right),
        display_header_footer: Some(true),
        header_template: Some(layout.header_template.clone()),
        footer_template: Some(layout.footer_template.clone()),
        ..Default::default()
    }
}

#[async_trait]
impl RenderEngine for ChromeEngine {
    fn name(&self) -> &'static str {
        "chrome"
    }

    async fn print_to_pdf(&self, url: &Url, layout: &PdfLayout) -> Result<Vec<u8>> {
        let config = self.config.clone();
        let url = url.to_string();
        let options = print_options(layout);

        tokio::task::spawn_blocking(move || Self::print_blocking(&config, &url, options))
            .await
            .map_err(|e| Error::EngineExport(format!("render task failed: {e}")))?
    }
}
