use crate::parser::nodes::Node;

const SOURCE_ATTRS: &[&str] = &["src", "data-src"];

/// Substrings identifying a supported video host.
const VIDEO_HOSTS: &[&str] = &["youtube", "youtu.be"];

/// Trailer URL from the node's first embedded frame, if it is a known host.
pub fn extract(node: &Node) -> Option<String> {
    let frame = node.first("iframe")?;
    let src = SOURCE_ATTRS
        .iter()
        .filter_map(|a| frame.attr(a))
        .find(|v| !v.is_empty())?;

    VIDEO_HOSTS
        .iter()
        .any(|host| src.contains(host))
        .then(|| src.to_string())
}
