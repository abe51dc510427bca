use crate::parser::nodes::Node;

/// Lazy-load attributes first, then the real source.
const SOURCE_ATTRS: &[&str] = &["data-src", "src"];

/// Inline-encoded images are placeholders, never posters.
const INLINE_DATA_MARKERS: &[&str] = &["base64"];

/// Matched case-insensitively.
const REJECTED_NAME_MARKERS: &[&str] = &["logo"];

/// Poster URL from the node's first image, if that image qualifies.
pub fn extract(node: &Node) -> Option<String> {
    let img = node.first("img")?;
    let src = SOURCE_ATTRS
        .iter()
        .filter_map(|a| img.attr(a))
        .find(|v| !v.is_empty())?;

    if is_rejected(src) {
        return None;
    }
    Some(src.to_string())
}

fn is_rejected(src: &str) -> bool {
    let lower = src.to_lowercase();
    INLINE_DATA_MARKERS.iter().any(|m| src.contains(m))
        || REJECTED_NAME_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::nodes::Element;

    fn img_node(attrs: &[(&str, &str)]) -> Node {
        let img = attrs
            .iter()
            .fold(Element::new("img"), |e, (k, v)| e.with_attr(k, v));
        Node::new("figure", "").with_media(img)
    }

    #[test]
    fn lazy_source_wins() {
        let node = img_node(&[("src", "placeholder.gif"), ("data-src", "real.jpg")]);
        assert_eq!(extract(&node).as_deref(), Some("real.jpg"));
    }

    #[test]
    fn empty_lazy_source_falls_back() {
        let node = img_node(&[("data-src", ""), ("src", "poster.jpg")]);
        assert_eq!(extract(&node).as_deref(), Some("poster.jpg"));
    }

    #[test]
    fn rejects_logos_and_inline_data() {
        assert!(extract(&img_node(&[("src", "/uploads/Cine-LOGO.png")])).is_none());
        assert!(extract(&img_node(&[("src", "data:image/png;base64,iVBOR")])).is_none());
    }

    #[test]
    fn only_first_image_is_considered() {
        let node = Node::new("div", "")
            .with_media(Element::new("img").with_attr("src", "logo.png"))
            .with_media(Element::new("img").with_attr("src", "poster.jpg"));
        assert!(extract(&node).is_none());
    }

    #[test]
    fn no_image() {
        assert!(extract(&Node::new("p", "texto")).is_none());
    }
}
