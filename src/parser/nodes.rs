use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Tried in order; the first match is the listing container.
static CONTAINER_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [".td-page-content", ".entry-content", "body"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Elements whose attributes the field extractors look at.
const MEDIA_TAGS: &[&str] = &["img", "iframe"];

/// Elements whose text never renders. With scripting on, `<noscript>` bodies
/// arrive as raw markup text.
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// An element found inside a node, reduced to its tag and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

#[cfg(test)]
impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One top-level child of the listing container.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    /// Descendant text, space-joined and whitespace-collapsed.
    pub text: String,
    /// Media elements in the node itself or below it, document order.
    pub media: Vec<Element>,
}

#[cfg(test)]
impl Node {
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: normalize_text([text]),
            media: Vec::new(),
        }
    }

    pub fn with_media(mut self, element: Element) -> Self {
        self.media.push(element);
        self
    }
}

impl Node {
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let media = el
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| MEDIA_TAGS.contains(&e.value().name()))
            .map(|e| Element {
                tag: e.value().name().to_string(),
                attrs: e
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            })
            .collect();

        Self {
            tag: el.value().name().to_string(),
            text: normalize_text(visible_text(el)),
            media,
        }
    }

    /// First media element with the given tag.
    pub fn first(&self, tag: &str) -> Option<&Element> {
        self.media.iter().find(|e| e.tag == tag)
    }
}

/// Text nodes under `el` that are not inside a hidden element.
fn visible_text<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    el.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_TEXT_TAGS.contains(&e.name()))
        });
        (!hidden).then_some(&**text)
    })
}

/// Join text pieces with a single space so inline elements never glue words
/// together ("6 de<span>febrero</span>"), then collapse whitespace runs.
pub fn normalize_text<'a, I>(pieces: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    pieces
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flat element children of the page's content container.
pub fn listing_nodes(html: &str) -> Vec<Node> {
    let document = Html::parse_document(html);

    let Some(container) = CONTAINER_SELECTORS
        .iter()
        .find_map(|sel| document.select(sel).next())
    else {
        warn!("No content container found in page");
        return Vec::new();
    };

    container
        .children()
        .filter_map(ElementRef::wrap)
        .map(Node::from_element)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_page_content_container() {
        let html = r#"<html><body>
            <div class="entry-content"><p>outer</p></div>
            <div class="td-page-content"><h2>Inner</h2><p>text</p></div>
        </body></html>"#;
        let nodes = listing_nodes(html);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].tag, "h2");
        assert_eq!(nodes[0].text, "Inner");
    }

    #[test]
    fn falls_back_to_body() {
        let nodes = listing_nodes("<html><body><h2>Solo</h2>loose text<p>x</p></body></html>");
        let tags: Vec<_> = nodes.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["h2", "p"]);
    }

    #[test]
    fn inline_elements_are_space_separated() {
        let nodes = listing_nodes(
            r#"<div class="entry-content"><p><strong>Viernes 6</strong>de<span>febrero</span>:
               17:00</p></div>"#,
        );
        assert_eq!(nodes[0].text, "Viernes 6 de febrero : 17:00");
    }

    #[test]
    fn media_includes_the_node_itself() {
        let nodes = listing_nodes(
            r#"<div class="entry-content"><img src="poster.jpg"><figure><img data-src="lazy.jpg" src="x.gif"></figure></div>"#,
        );
        assert_eq!(nodes[0].first("img").and_then(|i| i.attr("src")), Some("poster.jpg"));
        assert_eq!(nodes[1].first("img").and_then(|i| i.attr("data-src")), Some("lazy.jpg"));
    }

    #[test]
    fn noscript_fallback_adds_no_text() {
        let nodes = listing_nodes(
            r#"<div class="entry-content"><figure><img class="lazyload" data-src="avatar.jpg" src="data:image/gif;base64,R0lGOD"><noscript><img src="avatar.jpg"></noscript></figure></div>"#,
        );
        assert_eq!(nodes[0].text, "");
        assert_eq!(nodes[0].first("img").and_then(|i| i.attr("data-src")), Some("avatar.jpg"));
    }

    #[test]
    fn script_and_style_text_is_skipped() {
        let nodes = listing_nodes(
            r#"<div class="entry-content"><div><img src="poster.jpg"><script>var slot = "10:45";</script><style>.a{}</style>Estreno</div></div>"#,
        );
        assert_eq!(nodes[0].text, "Estreno");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_text(["  Duración:\n 120 ", "", " min\u{a0}"]), "Duración: 120 min");
    }
}
