use tracing::warn;
use url::Url;

use super::{inner_html, paragraph, parse_document, rewrite_sources};

/// Title and main-content fragment extracted from one site page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// Page file name, relative to the site root
    pub filename: String,
    /// Text of the first `<title>`, or the file name
    pub title: String,
    /// Inner markup of the first `<main>`, with `src` references made absolute
    pub content: String,
}

/// Extract the descriptor of one page.
///
/// Missing title or main region never fails the page: the title falls back
/// to the file name and the content to a paragraph naming the file.
pub fn extract_page(html: &str, filename: &str, site_root: &Url) -> PageDescriptor {
    let document = parse_document(html);

    let title = document
        .select_first("title")
        .ok()
        .map(|title| title.text_contents().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| {
            warn!("{} has no title, using file name", filename);
            filename.to_string()
        });

    let content = match document.select_first("main") {
        Ok(main) => {
            rewrite_sources(main.as_node(), site_root);
            inner_html(main.as_node())
        }
        Err(()) => {
            warn!("{} has no <main> region, using placeholder content", filename);
            paragraph(filename)
        }
    };

    PageDescriptor {
        filename: filename.to_string(),
        title,
        content,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("file:///srv/site/").unwrap()
    }

    #[test]
    fn test_extracts_title_and_main() {
        let html = r#"<!DOCTYPE html>
            <html><head><title>  Overview  </title></head>
            <body>
              <div id="header-placeholder"></div>
              <main class="content-container"><h1>Overview</h1><img src="assets/a.png"></main>
              <footer class="site-footer">f</footer>
            </body></html>"#;

        let page = extract_page(html, "overview.html", &root());

        assert_eq!(page.filename, "overview.html");
        assert_eq!(page.title, "Overview");
        assert_eq!(
            page.content,
            r#"<h1>Overview</h1><img src="file:///srv/site/assets/a.png">"#
        );
    }

    #[test]
    fn test_first_main_wins_and_nesting_is_kept() {
        let html = "<body><main><section><main>inner</main></section></main><main>second</main></body>";

        let page = extract_page(html, "nested.html", &root());

        assert!(page.content.contains("inner"));
        assert!(!page.content.contains("second"));
    }

    #[test]
    fn test_commented_main_is_ignored() {
        let html = "<body><!-- <main>old</main> --><main>current</main></body>";

        let page = extract_page(html, "c.html", &root());

        assert_eq!(page.content, "current");
    }

    #[test]
    fn test_fallbacks_for_bare_page() {
        let page = extract_page("<body><p>stray</p></body>", "appendix.html", &root());

        assert_eq!(page.title, "appendix.html");
        assert_eq!(page.content, "<p>appendix.html</p>");
    }

    #[test]
    fn test_blank_title_falls_back() {
        let page = extract_page("<title>   </title><main>x</main>", "blank.html", &root());
        assert_eq!(page.title, "blank.html");
    }
}
