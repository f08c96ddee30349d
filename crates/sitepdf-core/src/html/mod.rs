//! DOM helpers over kuchiki shared by the assembler and the navigation passes.

mod assets;
mod extract;

pub use assets::{is_passthrough, resolve_source, rewrite_css_urls, rewrite_sources};
pub use extract::{PageDescriptor, extract_page};

use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeRef};

/// Parse a full HTML document.
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Serialized children of `node`, without the node's own tags.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Parse a markup fragment into detached body-level nodes, ready to be
/// inserted into another document.
pub fn fragment_nodes(markup: &str) -> Vec<NodeRef> {
    let document = parse_document(markup);
    let Ok(body) = document.select_first("body") else {
        return Vec::new();
    };

    let nodes: Vec<NodeRef> = body.as_node().children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// Add `class` to the element's class list unless already present.
pub fn add_class(element: &ElementData, class: &str) {
    let mut attrs = element.attributes.borrow_mut();
    let current = attrs.get("class").unwrap_or_default().to_string();

    if current.split_whitespace().any(|c| c == class) {
        return;
    }

    let updated = if current.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {class}", current.trim())
    };
    attrs.insert("class", updated);
}

/// A `<p>` holding `text`, serialized with proper escaping.
pub fn paragraph(text: &str) -> String {
    fragment_nodes("<p></p>")
        .into_iter()
        .find(|node| node.as_element().is_some())
        .map(|p| {
            p.append(NodeRef::new_text(text));
            p.to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_html_excludes_wrapper() {
        let doc = parse_document("<main id=\"m\"><h1>Title</h1><p>Body</p></main>");
        let main = doc.select_first("main").unwrap();
        assert_eq!(inner_html(main.as_node()), "<h1>Title</h1><p>Body</p>");
    }

    #[test]
    fn test_fragment_nodes_are_detached() {
        let nodes = fragment_nodes("<nav class=\"a\"></nav><div></div>");
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.parent().is_none()));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let doc = parse_document("<a class=\"link\" href=\"#\">x</a>");
        let link = doc.select_first("a").unwrap();

        add_class(&link, "active");
        add_class(&link, "active");

        assert_eq!(link.attributes.borrow().get("class"), Some("link active"));
    }

    #[test]
    fn test_paragraph_escapes_text() {
        assert_eq!(paragraph("a<b>.html"), "<p>a&lt;b&gt;.html</p>");
    }
}
