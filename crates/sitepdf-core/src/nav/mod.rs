//! Shared navigation header: injection into each page's placeholder and
//! highlighting of the link for the page being viewed.

mod prepare;

pub use prepare::{PageNavTemplate, prepare_page};

use askama::Template;
use kuchiki::NodeRef;
use kuchiki::iter::NodeIterator;
use tracing::debug;

use crate::config::{NavLink, NavigationConfig, PageKey};
use crate::error::Result;
use crate::html::{add_class, fragment_nodes, parse_document};

/// Class set on the link matching the current page
pub const ACTIVE_CLASS: &str = "active";

#[derive(Template)]
#[template(path = "nav.html")]
struct NavTemplate<'a> {
    brand: &'a str,
    home_href: &'a str,
    links: &'a [NavLink],
}

/// Page key for a location path: the final segment without its `.html`
/// suffix, or `home_key` when that segment is empty.
pub fn current_page_key(path: &str, home_key: &PageKey) -> PageKey {
    let segment = path.rsplit('/').next().unwrap_or_default();
    let key = segment.strip_suffix(".html").unwrap_or(segment);

    if key.is_empty() {
        home_key.clone()
    } else {
        PageKey::new(key)
    }
}

/// Inserts the shared navigation markup into pages
#[derive(Debug, Clone)]
pub struct NavigationInjector {
    config: NavigationConfig,
    markup: String,
}

impl NavigationInjector {
    /// Render the navigation markup once for all pages
    pub fn new(config: NavigationConfig) -> Result<Self> {
        let home_href = config
            .links
            .iter()
            .find(|link| link.page_key == config.home_key)
            .map_or("index.html", |link| link.href.as_str());

        let markup = NavTemplate {
            brand: &config.brand,
            home_href,
            links: &config.links,
        }
        .render()?;

        Ok(Self { config, markup })
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub const fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn page_key(&self, current_path: &str) -> PageKey {
        current_page_key(current_path, &self.config.home_key)
    }

    /// Inject the navigation into `html` as seen from `current_path`.
    ///
    /// Returns `None` when the page has no placeholder element; such pages
    /// are left alone.
    pub fn inject(&self, html: &str, current_path: &str) -> Option<String> {
        let document = parse_document(html);
        let placeholder = find_by_id(&document, &self.config.placeholder_id)?;

        let previous: Vec<NodeRef> = placeholder.children().collect();
        for node in previous {
            node.detach();
        }
        for node in fragment_nodes(&self.markup) {
            placeholder.append(node);
        }

        let key = self.page_key(current_path);
        let active = mark_active(&document, &key);
        debug!("Injected navigation for '{}' ({} active link(s))", key, active);

        Some(document.to_string())
    }
}

fn find_by_id(document: &NodeRef, id: &str) -> Option<NodeRef> {
    document
        .descendants()
        .elements()
        .find(|element| element.attributes.borrow().get("id") == Some(id))
        .map(|element| element.as_node().clone())
}

/// Add the active class to every `.nav-links a` in the page whose
/// `data-page` equals `key`, including link lists outside the placeholder
fn mark_active(root: &NodeRef, key: &PageKey) -> usize {
    let Ok(links) = root.select(".nav-links a") else {
        return 0;
    };

    let mut count = 0;
    for link in links.collect::<Vec<_>>() {
        let matches = link.attributes.borrow().get("data-page") == Some(key.as_str());
        if matches {
            add_class(&link, ACTIVE_CLASS);
            count += 1;
        }
    }
    count
}
