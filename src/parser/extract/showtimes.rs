use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Showtimes;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}[:.]\d{2}").unwrap());

/// Key for times seen before any day label.
pub const DEFAULT_DAY_KEY: &str = "Horarios";

/// Hours that shadow their 12-hour-clock twin.
const AFTERNOON_HOURS: std::ops::RangeInclusive<u32> = 13..=23;

/// Every time-of-day in the text, normalized to `H:MM`.
pub fn find_times(text: &str) -> Vec<String> {
    TIME_RE
        .find_iter(text)
        .map(|m| m.as_str().replace('.', ":"))
        .collect()
}

/// Add `times` under `day`, skipping repeats, then drop 12-hour entries
/// shadowed by a 24-hour afternoon time of the same day.
pub fn record(showtimes: &mut Showtimes, day: &str, times: &[String]) {
    let slot = showtimes.times_mut(day);
    for t in times {
        if !slot.contains(t) {
            slot.push(t.clone());
        }
    }
    collapse_twelve_hour_twins(slot);
}

/// "17:00" removes "5:00" and "05:00". Morning and midnight hours are never
/// collapsed against each other.
fn collapse_twelve_hour_twins(times: &mut Vec<String>) {
    let shadowed: HashSet<String> = times
        .iter()
        .filter_map(|t| {
            let (h, m) = t.split_once(':')?;
            let h: u32 = h.parse().ok()?;
            AFTERNOON_HOURS
                .contains(&h)
                .then(|| [format!("{}:{}", h - 12, m), format!("{:02}:{}", h - 12, m)])
        })
        .flatten()
        .collect();

    times.retain(|t| !shadowed.contains(t));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_colon_and_dot_times() {
        assert_eq!(find_times("Viernes 6: 17.00 y 20:30h"), vec!["17:00", "20:30"]);
        assert!(find_times("Duración: 120 min").is_empty());
    }

    #[test]
    fn afternoon_time_shadows_unpadded_twin() {
        let mut s = Showtimes::default();
        record(&mut s, "Diario", &times(&["17:00", "5:00"]));
        assert_eq!(s.get("Diario").unwrap(), ["17:00"]);
    }

    #[test]
    fn afternoon_time_shadows_padded_twin() {
        let mut s = Showtimes::default();
        record(&mut s, "Diario", &times(&["17:00", "05:00"]));
        assert_eq!(s.get("Diario").unwrap(), ["17:00"]);
    }

    #[test]
    fn twin_inserted_first_is_still_dropped() {
        let mut s = Showtimes::default();
        record(&mut s, "Diario", &times(&["8:30"]));
        record(&mut s, "Diario", &times(&["20:30"]));
        assert_eq!(s.get("Diario").unwrap(), ["20:30"]);
    }

    #[test]
    fn morning_times_are_not_collapsed() {
        let mut s = Showtimes::default();
        record(&mut s, "Domingo", &times(&["00:30", "12:30", "0:30"]));
        assert_eq!(s.get("Domingo").unwrap(), ["00:30", "12:30", "0:30"]);
    }

    #[test]
    fn repeats_are_skipped_per_day() {
        let mut s = Showtimes::default();
        record(&mut s, "Lunes", &times(&["18:00", "18:00"]));
        record(&mut s, "Martes", &times(&["18:00"]));
        assert_eq!(s.get("Lunes").unwrap(), ["18:00"]);
        assert_eq!(s.get("Martes").unwrap(), ["18:00"]);
    }
}
