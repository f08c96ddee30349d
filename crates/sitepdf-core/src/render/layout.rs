use askama::Template;

use crate::config::{ExportConfig, PaperSize, mm_to_in};
use crate::error::Result;

#[derive(Template)]
#[template(
    source = r#"<div style="font-size:9px; color:#999; width:100%; text-align:center; font-family: sans-serif;">{{ title }}</div>"#,
    ext = "html"
)]
struct HeaderTemplate<'a> {
    title: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<div style="font-size:9px; color:#999; width:100%; text-align:right; padding-right:{{ padding_mm }}mm; font-family: sans-serif;"><span class="pageNumber"></span> / <span class="totalPages"></span></div>"#,
    ext = "html"
)]
struct FooterTemplate {
    padding_mm: f64,
}

/// Page geometry and header/footer templates for one export
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub paper: PaperSize,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub print_background: bool,
    /// Static centered title line
    pub header_template: String,
    /// Right-aligned "page / total" line; the engine fills the
    /// `pageNumber` and `totalPages` spans
    pub footer_template: String,
}

impl PdfLayout {
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let pdf = &config.pdf;

        let header_template = HeaderTemplate {
            title: config.header_title(),
        }
        .render()?;
        let footer_template = FooterTemplate {
            padding_mm: pdf.margin_right_mm,
        }
        .render()?;

        Ok(Self {
            paper: pdf.paper,
            margin_top_mm: pdf.margin_top_mm,
            margin_bottom_mm: pdf.margin_bottom_mm,
            margin_left_mm: pdf.margin_left_mm,
            margin_right_mm: pdf.margin_right_mm,
            print_background: pdf.print_background,
            header_template,
            footer_template,
        })
    }

    /// Paper width and height in inches
    pub const fn paper_in(&self) -> (f64, f64) {
        self.paper.dimensions_in()
    }

    /// Margins in inches: top, bottom, left, right
    pub const fn margins_in(&self) -> (f64, f64, f64, f64) {
        (
            mm_to_in(self.margin_top_mm),
            mm_to_in(self.margin_bottom_mm),
            mm_to_in(self.margin_left_mm),
            mm_to_in(self.margin_right_mm),
        )
    }
}
