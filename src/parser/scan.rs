use tracing::debug;

use super::extract;
use super::nodes::Node;
use crate::model::MovieRecord;

/// Tags that can open a new movie.
const TITLE_TAGS: &[&str] = &["h2"];

/// Section headings that never name a movie. Matched against uppercased text.
const SECTION_LABELS: &[&str] = &[
    "HORARIO",
    "FICHA",
    "ARGUMENTO",
    "TRAILER",
    "NAVALMORAL",
    "€",
    "COMPRA",
];

/// An open record plus the per-record scan flags.
#[derive(Debug, Clone)]
pub struct RecordScan {
    pub record: MovieRecord,
    /// Last day label seen in this window; applies to later time-only lines.
    pub day_context: Option<String>,
    /// A bare synopsis header was seen; the next long paragraph is the plot.
    pub expecting_synopsis: bool,
}

impl RecordScan {
    pub fn new(title: String) -> Self {
        Self {
            record: MovieRecord::new(title),
            day_context: None,
            expecting_synopsis: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ScanState {
    Idle,
    InRecord(RecordScan),
}

impl ScanState {
    /// Advance by one node. Returns the next state and the record closed by
    /// this node, if that record is retained.
    pub fn apply(self, node: &Node) -> (ScanState, Option<MovieRecord>) {
        if let Some(title) = movie_title(node) {
            debug!("Found movie: {}", title);
            let closed = self.finish();
            return (ScanState::InRecord(RecordScan::new(title.to_string())), closed);
        }

        match self {
            ScanState::Idle => (ScanState::Idle, None),
            ScanState::InRecord(mut scan) => {
                extract::apply(&mut scan, node);
                (ScanState::InRecord(scan), None)
            }
        }
    }

    /// Close the window. The open record survives only if retained.
    pub fn finish(self) -> Option<MovieRecord> {
        match self {
            ScanState::Idle => None,
            ScanState::InRecord(scan) if scan.record.is_retained() => Some(scan.record),
            ScanState::InRecord(scan) => {
                debug!("Dropping {}: missing poster or showtimes", scan.record.title);
                None
            }
        }
    }
}

/// Heading text when this node opens a new movie.
fn movie_title(node: &Node) -> Option<&str> {
    if !TITLE_TAGS.contains(&node.tag.as_str()) || node.text.is_empty() {
        return None;
    }
    let upper = node.text.to_uppercase();
    if SECTION_LABELS.iter().any(|label| upper.contains(label)) {
        return None;
    }
    Some(&node.text)
}

/// Scan the container's children into retained movie records, in order.
pub fn scan_nodes(nodes: &[Node]) -> Vec<MovieRecord> {
    let mut movies = Vec::new();
    let mut state = ScanState::Idle;

    for node in nodes {
        let (next, closed) = state.apply(node);
        movies.extend(closed);
        state = next;
    }
    movies.extend(state.finish());

    movies
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::nodes::Element;

    fn poster(src: &str) -> Node {
        Node::new("img", "").with_media(Element::new("img").with_attr("src", src))
    }

    #[test]
    fn no_headings_no_movies() {
        let nodes = vec![
            Node::new("p", "Viernes 6: 17:00"),
            poster("poster.jpg"),
            Node::new("h3", "Avatar 3"),
        ];
        assert!(scan_nodes(&nodes).is_empty());
    }

    #[test]
    fn single_movie_window() {
        let nodes = vec![
            Node::new("h2", "Avatar 3"),
            poster("poster.jpg"),
            Node::new("p", "Viernes 6: 17:00 20:00"),
        ];
        let movies = scan_nodes(&nodes);
        assert_eq!(movies.len(), 1);
        let m = &movies[0];
        assert_eq!(m.title, "Avatar 3");
        assert_eq!(m.poster.as_deref(), Some("poster.jpg"));
        assert_eq!(m.showtimes.days().collect::<Vec<_>>(), vec!["Viernes 6"]);
        assert_eq!(m.showtimes.get("Viernes 6").unwrap(), ["17:00", "20:00"]);
    }

    #[test]
    fn incomplete_records_are_dropped() {
        let nodes = vec![
            Node::new("h2", "Sin cartel"),
            Node::new("p", "Una película sin imagen ni horarios, solo con una sinopsis bastante larga."),
            Node::new("h2", "Sin sesiones"),
            poster("b.jpg"),
            Node::new("h2", "Completa"),
            poster("c.jpg"),
            Node::new("p", "Diario: 19:00"),
        ];
        let titles: Vec<_> = scan_nodes(&nodes).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Completa"]);
    }

    #[test]
    fn section_headings_are_absorbed() {
        let nodes = vec![
            Node::new("h2", "Avatar 3"),
            poster("poster.jpg"),
            Node::new("h2", "HORARIOS"),
            Node::new("p", "Sábado 7: 18:00"),
            Node::new("h2", "Entradas 5 €"),
            Node::new("h2", "Compra tus entradas"),
        ];
        let movies = scan_nodes(&nodes);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].showtimes.get("Sábado 7").unwrap(), ["18:00"]);
    }

    #[test]
    fn day_context_resets_per_movie() {
        let nodes = vec![
            Node::new("h2", "Primera"),
            poster("a.jpg"),
            Node::new("p", "Lunes 9"),
            Node::new("p", "18:00"),
            Node::new("h2", "Segunda"),
            poster("b.jpg"),
            Node::new("p", "20:00"),
        ];
        let movies = scan_nodes(&nodes);
        assert_eq!(movies.len(), 2);
        assert!(movies[1].showtimes.get("Lunes 9").is_none());
        assert_eq!(movies[1].showtimes.get("Horarios").unwrap(), ["20:00"]);
    }

    #[test]
    fn nodes_before_first_title_are_ignored() {
        let nodes = vec![
            poster("banner.jpg"),
            Node::new("p", "Diario: 17:00"),
            Node::new("h2", "Avatar 3"),
            Node::new("p", "20:00"),
        ];
        assert!(scan_nodes(&nodes).is_empty());
    }

    #[test]
    fn empty_heading_does_not_open_a_record() {
        let (state, closed) = ScanState::Idle.apply(&Node::new("h2", "   "));
        assert!(closed.is_none());
        assert!(matches!(state, ScanState::Idle));
    }
}
