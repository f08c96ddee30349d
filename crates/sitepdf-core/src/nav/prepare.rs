//! One-off rewrite of site pages for runtime navigation: the static site
//! header becomes an empty placeholder and previous/next buttons are added
//! above the footer.

use askama::Template;

use crate::config::NavLink;
use crate::error::Result;
use crate::html::{fragment_nodes, parse_document};

/// Previous/next buttons inserted before the site footer
#[derive(Template)]
#[template(path = "page_nav.html")]
pub struct PageNavTemplate<'a> {
    pub prev: Option<&'a NavLink>,
    pub next: Option<&'a NavLink>,
}

/// Prepare one page. Returns `None` when the page needed no change.
///
/// The header is only replaced when no placeholder exists yet, and the
/// page navigation only added when the page has none, so running the pass
/// again is harmless.
pub fn prepare_page(
    html: &str,
    prev: Option<&NavLink>,
    next: Option<&NavLink>,
    placeholder_id: &str,
) -> Result<Option<String>> {
    let document = parse_document(html);
    let mut changed = false;

    let has_placeholder = document
        .select(&format!("[id=\"{placeholder_id}\"]"))
        .is_ok_and(|mut found| found.next().is_some());

    if !has_placeholder
        && let Ok(header) = document.select_first("header.site-header")
        && let Some(placeholder) = fragment_nodes("<div></div>").into_iter().next()
        && let Some(element) = placeholder.as_element()
    {
        element
            .attributes
            .borrow_mut()
            .insert("id", placeholder_id.to_string());
        header.as_node().insert_before(placeholder.clone());
        header.as_node().detach();
        changed = true;
    }

    let has_page_nav = document.select_first("nav.page-navigation").is_ok();
    if !has_page_nav && let Ok(footer) = document.select_first("footer.site-footer") {
        let markup = PageNavTemplate { prev, next }.render()?;
        for node in fragment_nodes(&markup) {
            footer.as_node().insert_before(node);
        }
        changed = true;
    }

    Ok(changed.then(|| document.to_string()))
}
