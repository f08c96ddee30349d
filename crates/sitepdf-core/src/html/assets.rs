//! Rewriting of `src` and stylesheet `url(...)` references so the engine can
//! load assets straight from disk, without a web server in front of the site.

use std::path::Path;

use kuchiki::NodeRef;
use regex_lite::{Captures, Regex};
use url::Url;

/// Whether a `src` value must be left exactly as written.
///
/// True for anything carrying a URL scheme (`http:`, `https:`, `data:`,
/// `file:` ...), protocol-relative references, absolute filesystem paths and
/// empty values.
pub fn is_passthrough(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with('/')
        || trimmed.starts_with('\\')
        || Path::new(trimmed).is_absolute()
        || Url::parse(trimmed).is_ok()
}

/// Resolve a relative `src` value against the site root directory URL.
///
/// Returns `None` when the value passes through unchanged.
pub fn resolve_source(value: &str, site_root: &Url) -> Option<String> {
    if is_passthrough(value) {
        return None;
    }

    site_root.join(value.trim()).ok().map(String::from)
}

/// Rewrite every `src` attribute below `root`. Returns the number of values changed.
pub fn rewrite_sources(root: &NodeRef, site_root: &Url) -> usize {
    let Ok(elements) = root.select("[src]") else {
        return 0;
    };

    let mut rewritten = 0;
    for element in elements.collect::<Vec<_>>() {
        let mut attrs = element.attributes.borrow_mut();
        let Some(resolved) = attrs.get("src").and_then(|src| resolve_source(src, site_root)) else {
            continue;
        };
        tracing::trace!("Rewrote src to {}", resolved);
        attrs.insert("src", resolved);
        rewritten += 1;
    }

    rewritten
}

/// Rewrite relative `url(...)` references of an inlined stylesheet.
///
/// `stylesheet_url` is the `file://` URL of the stylesheet itself, so
/// references resolve against its directory exactly as they would when the
/// browser loaded the file. Quoted and unquoted forms are both handled;
/// rewritten values are always double-quoted.
pub fn rewrite_css_urls(css: &str, stylesheet_url: &Url) -> String {
    let Ok(pattern) = Regex::new(r#"url\(\s*['"]?([^)'"]*?)['"]?\s*\)"#) else {
        return css.to_string();
    };

    pattern
        .replace_all(css, |caps: &Captures<'_>| {
            let original = caps.get(0).map_or("", |m| m.as_str());
            caps.get(1)
                .and_then(|value| resolve_source(value.as_str(), stylesheet_url))
                .map_or_else(|| original.to_string(), |resolved| format!("url(\"{resolved}\")"))
        })
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::html::parse_document;

    fn root() -> Url {
        Url::parse("file:///srv/site/").unwrap()
    }

    #[test]
    fn test_urls_pass_through() {
        for value in [
            "http://example.com/a.png",
            "https://example.com/a.png",
            "data:image/png;base64,iVBORw0KGgo=",
            "file:///tmp/a.png",
            "//cdn.example.com/a.png",
            "/var/www/a.png",
            "#clip-path",
            "",
        ] {
            assert!(is_passthrough(value), "{value} should pass through");
            assert_eq!(resolve_source(value, &root()), None);
        }
    }

    #[test]
    fn test_relative_paths_resolve_against_root() {
        assert_eq!(
            resolve_source("assets/img/fig1.png", &root()).as_deref(),
            Some("file:///srv/site/assets/img/fig1.png")
        );
        assert_eq!(
            resolve_source("./assets/a.png", &root()).as_deref(),
            Some("file:///srv/site/assets/a.png")
        );
        assert_eq!(
            resolve_source("img/a.svg#icon", &root()).as_deref(),
            Some("file:///srv/site/img/a.svg#icon")
        );
    }

    #[test]
    fn test_percent_escapes_survive() {
        let resolved = resolve_source("assets/my%20figure.png", &root()).unwrap();
        let path = Url::parse(&resolved).unwrap().to_file_path().unwrap();
        assert!(path.ends_with("assets/my figure.png"));
    }

    #[test]
    fn test_rewrite_sources_only_touches_relative_values() {
        let doc = parse_document(
            r#"<main>
                <img src="assets/a.png">
                <img src="https://example.com/b.png">
                <script src="assets/js/c.js"></script>
                <a href="other.html">link</a>
            </main>"#,
        );

        let count = rewrite_sources(&doc, &root());
        assert_eq!(count, 2);

        let html = doc.to_string();
        assert!(html.contains(r#"src="file:///srv/site/assets/a.png""#));
        assert!(html.contains(r#"src="https://example.com/b.png""#));
        assert!(html.contains(r#"src="file:///srv/site/assets/js/c.js""#));
        assert!(html.contains(r#"href="other.html""#));
    }

    #[test]
    fn test_css_urls_resolve_against_stylesheet_directory() {
        let stylesheet = Url::parse("file:///srv/site/assets/css/main.css").unwrap();
        let css = r#"@font-face { src: url("../fonts/inter.woff2") format("woff2"); }
body { background: url(bg.png); }
.logo { background-image: url( 'img/logo.svg' ); }"#;

        let rewritten = rewrite_css_urls(css, &stylesheet);

        assert!(rewritten.contains(r#"url("file:///srv/site/assets/fonts/inter.woff2")"#));
        assert!(rewritten.contains(r#"url("file:///srv/site/assets/css/bg.png")"#));
        assert!(rewritten.contains(r#"url("file:///srv/site/assets/css/img/logo.svg")"#));
        assert!(rewritten.contains(r#"format("woff2")"#));
    }

    #[test]
    fn test_css_absolute_urls_are_untouched() {
        let stylesheet = Url::parse("file:///srv/site/assets/css/main.css").unwrap();
        let css = r#"a { background: url("https://cdn.example.com/x.png"); }
b { background: url(data:image/png;base64,iVBORw0KGgo=); }
c { clip-path: url(#shape); }
d { color: red; }"#;

        assert_eq!(rewrite_css_urls(css, &stylesheet), css);
    }
}
