pub mod extract;
pub mod nodes;
pub mod scan;

use tracing::info;

use crate::model::MovieRecord;

/// Two-pass pipeline: html → container nodes → movie records.
pub fn parse_listing(html: &str) -> Vec<MovieRecord> {
    let nodes = nodes::listing_nodes(html);
    let movies = scan::scan_nodes(&nodes);
    info!("Parsed {} nodes into {} movies", nodes.len(), movies.len());
    movies
}

// ── Tests ──
