//! Page assembly: ordered site pages to one printable HTML document.

use askama::Template;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::html::{PageDescriptor, extract_page, rewrite_css_urls};
use crate::site::SiteReport;
use crate::util::{canonical_dir, file_url};

/// One `.pdf-section` of the combined document
struct SectionView<'a> {
    filename: &'a str,
    content: &'a str,
    break_before: bool,
}

#[derive(Template)]
#[template(path = "combined.html")]
struct CombinedTemplate<'a> {
    title: &'a str,
    stylesheet: &'a str,
    page_size: &'a str,
    margin: String,
    placeholder_id: &'a str,
    sections: Vec<SectionView<'a>>,
}

/// Single document handed to the rendering engine
#[derive(Debug, Clone)]
pub struct CombinedDocument {
    /// Full HTML, stylesheet embedded
    pub html: String,
    /// Pages included, in document order
    pub pages: Vec<PageDescriptor>,
    /// Configured pages that were not found and left out
    pub skipped: Vec<String>,
}

impl CombinedDocument {
    /// Number of forced page boundaries between sections
    pub fn page_breaks(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }
}

/// Builds the combined document from the configured page list
pub struct PageAssembler<'a> {
    config: &'a ExportConfig,
}

impl<'a> PageAssembler<'a> {
    pub const fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Read the stylesheet and every page, then build the combined document.
    ///
    /// Pages are read one after the other in list order. A missing page is
    /// skipped with a warning unless the config is strict; a missing
    /// stylesheet always aborts.
    pub async fn assemble(&self) -> Result<CombinedDocument> {
        let site_root = canonical_dir(&self.config.site_dir)?;

        if self.config.strict {
            SiteReport::scan(&site_root, &self.config.pages)?.ensure_complete()?;
        }

        let stylesheet = self.read_stylesheet(&site_root).await?;

        let site_url = Url::from_directory_path(&site_root)
            .map_err(|()| Error::FileUrl(site_root.clone()))?;

        let (pages, skipped) = self.load_pages(&site_root, &site_url).await?;
        if pages.is_empty() {
            return Err(Error::NoPages(site_root));
        }

        let html = self.build_document(&stylesheet, &pages)?;
        debug!("Combined document is {} bytes", html.len());

        Ok(CombinedDocument {
            html,
            pages,
            skipped,
        })
    }

    /// Read the shared stylesheet, resolving its `url(...)` references
    /// against the stylesheet's own location.
    async fn read_stylesheet(&self, site_root: &Path) -> Result<String> {
        let path = site_root.join(&self.config.stylesheet);
        let css = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::StylesheetMissing {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(rewrite_css_urls(&css, &file_url(&path)?))
    }

    /// Load every configured page that exists, preserving order
    pub async fn load_pages(
        &self,
        site_root: &Path,
        site_url: &Url,
    ) -> Result<(Vec<PageDescriptor>, Vec<String>)> {
        let mut pages = Vec::with_capacity(self.config.pages.len());
        let mut skipped = Vec::new();

        for filename in &self.config.pages {
            let path = site_root.join(filename);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Skipping missing file: {}", filename);
                    skipped.push(filename.clone());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let html = String::from_utf8_lossy(&bytes);
            let page = extract_page(&html, filename, site_url);
            info!("Loaded: {} — \"{}\"", filename, page.title);
            pages.push(page);
        }

        Ok((pages, skipped))
    }

    /// Wrap the page fragments in the document shell
    pub fn build_document(&self, stylesheet: &str, pages: &[PageDescriptor]) -> Result<String> {
        let pdf = &self.config.pdf;
        let sections = pages
            .iter()
            .enumerate()
            .map(|(i, page)| SectionView {
                filename: &page.filename,
                content: &page.content,
                break_before: i > 0,
            })
            .collect();

        let template = CombinedTemplate {
            title: &self.config.title,
            stylesheet,
            page_size: pdf.paper.css_name(),
            margin: format!(
                "{}mm {}mm {}mm {}mm",
                pdf.margin_top_mm, pdf.margin_right_mm, pdf.margin_bottom_mm, pdf.margin_left_mm
            ),
            placeholder_id: &self.config.navigation.placeholder_id,
            sections,
        };

        Ok(template.render()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(name: &str, content: &str) -> PageDescriptor {
        PageDescriptor {
            filename: name.to_string(),
            title: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_build_document_breaks_between_sections() {
        let config = ExportConfig::default();
        let assembler = PageAssembler::new(&config);
        let pages = [page("a.html", "<h1>A</h1>"), page("b.html", "<h1>B</h1>"), page("c.html", "<h1>C</h1>")];

        let html = assembler.build_document("body { color: red; }", &pages).unwrap();

        assert_eq!(html.matches("class=\"pdf-section\"").count(), 3);
        assert_eq!(html.matches("page-break-before: always").count(), 2);
        assert!(html.contains("body { color: red; }"));
        assert!(html.find("<h1>A</h1>").unwrap() < html.find("<h1>B</h1>").unwrap());
        assert!(html.find("<h1>B</h1>").unwrap() < html.find("<h1>C</h1>").unwrap());
    }

    #[test]
    fn test_build_document_print_rules() {
        let config = ExportConfig::default();
        let html = PageAssembler::new(&config)
            .build_document("", &[page("only.html", "<p>x</p>")])
            .unwrap();

        assert!(html.contains("size: A4;"));
        assert!(html.contains("margin: 20mm 18mm 20mm 18mm;"));
        assert!(html.contains("#header-placeholder,"));
        assert!(html.contains("page-break-after: avoid;"));
        assert!(html.contains("p, li, table {"));
        assert!(!html.contains("page-break-before: always"));
    }

    #[test]
    fn test_build_document_escapes_title() {
        let config = ExportConfig {
            title: "R&D <Notes>".to_string(),
            ..Default::default()
        };
        let html = PageAssembler::new(&config)
            .build_document("", &[page("a.html", "<p>x</p>")])
            .unwrap();

        assert!(!html.contains("<Notes>"));
        let document = crate::html::parse_document(&html);
        let title = document.select_first("title").unwrap();
        assert_eq!(title.text_contents(), "R&D <Notes>");
    }
}
