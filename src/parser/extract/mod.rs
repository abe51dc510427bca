pub mod day;
pub mod details;
pub mod poster;
pub mod showtimes;
pub mod synopsis;
pub mod trailer;

use tracing::debug;

use super::nodes::Node;
use super::scan::RecordScan;
use synopsis::SynopsisStep;

/// Fold one node into the open record. Extractors run in a fixed order:
/// the day label must be known before the same line's times are filed.
pub fn apply(scan: &mut RecordScan, node: &Node) {
    let text = node.text.as_str();
    let movie = &mut scan.record;

    if movie.poster.is_none() {
        movie.poster = poster::extract(node);
    }

    if let Some(day) = day::detect(text) {
        debug!("  day context: {}", day);
        scan.day_context = Some(day);
    }

    let times = showtimes::find_times(text);
    if !times.is_empty() {
        let day = scan
            .day_context
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(showtimes::DEFAULT_DAY_KEY);
        showtimes::record(&mut movie.showtimes, day, &times);
    }

    if movie.synopsis.is_none() {
        match synopsis::evaluate(text, scan.expecting_synopsis) {
            Some((rule, SynopsisStep::Capture(s))) => {
                debug!("  synopsis via {}: {:.30}", rule, s);
                movie.synopsis = Some(s);
                scan.expecting_synopsis = false;
            }
            Some((_, SynopsisStep::ExpectNext)) => {
                debug!("  synopsis header, expecting next node");
                scan.expecting_synopsis = true;
            }
            None => {}
        }
    }

    if let Some(d) = details::duration(text) {
        movie.duration = Some(d);
    }
    if let Some(y) = details::year(text) {
        movie.year = Some(y);
    }

    if movie.trailer.is_none() {
        movie.trailer = trailer::extract(node);
    }
}

// ── Tests ──
