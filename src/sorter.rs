use chrono::NaiveDate;
use rayon::prelude::*;

use crate::model::{MovieRecord, Showtimes};

const MONTHS: &[(&str, u32)] = &[
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

/// Best-effort date for a free-form day label like "Viernes 6 de febrero".
///
/// Needs a numeric day token; month defaults to January and year to
/// `current_year`. Impossible dates give `None`.
pub fn label_date(label: &str, current_year: i32) -> Option<NaiveDate> {
    let lower = label.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let is_number = |t: &str| t.chars().all(|c| c.is_ascii_digit());

    let day: u32 = tokens.iter().find(|t| is_number(t))?.parse().ok()?;
    let month = tokens
        .iter()
        .find_map(|t| MONTHS.iter().find(|(name, _)| name == t).map(|(_, m)| *m))
        .unwrap_or(1);
    let year = tokens
        .iter()
        .find(|t| t.len() == 4 && is_number(t))
        .and_then(|t| t.parse().ok())
        .unwrap_or(current_year);

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Reorder the day labels chronologically. Labels without a usable date keep
/// their relative order after every dated label.
pub fn sort_showtimes(showtimes: &mut Showtimes, current_year: i32) {
    showtimes.sort_days_by_key(|day| label_date(day, current_year).unwrap_or(NaiveDate::MAX));
}

/// Records share nothing, so each one is sorted independently.
pub fn sort_all(movies: &mut [MovieRecord], current_year: i32) {
    movies
        .par_iter_mut()
        .for_each(|m| sort_showtimes(&mut m.showtimes, current_year));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(labels: &[&str]) -> Showtimes {
        labels
            .iter()
            .map(|l| (l.to_string(), vec!["18:00".to_string()]))
            .collect()
    }

    fn order(s: &Showtimes) -> Vec<&str> {
        s.days().collect()
    }

    #[test]
    fn parses_full_label() {
        assert_eq!(
            label_date("Viernes 6 de febrero de 2026", 2025),
            NaiveDate::from_ymd_opt(2026, 2, 6)
        );
        assert_eq!(
            label_date("SÁBADO 14 DE MARZO", 2026),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
    }

    #[test]
    fn month_defaults_to_january() {
        assert_eq!(label_date("Lunes 9", 2026), NaiveDate::from_ymd_opt(2026, 1, 9));
    }

    #[test]
    fn unparseable_labels() {
        assert_eq!(label_date("Diario", 2026), None);
        assert_eq!(label_date("Viernes 6: sesión", 2026), None);
        assert_eq!(label_date("Lunes 31 de febrero", 2026), None);
    }

    #[test]
    fn sorts_chronologically() {
        let mut s = days(&["Sábado 7 de febrero", "Viernes 6 de febrero"]);
        sort_showtimes(&mut s, 2026);
        assert_eq!(order(&s), vec!["Viernes 6 de febrero", "Sábado 7 de febrero"]);
    }

    #[test]
    fn undated_labels_go_last_in_original_order() {
        let mut s = days(&["Horarios", "Domingo 8 de febrero", "Diario", "Viernes 6 de febrero"]);
        sort_showtimes(&mut s, 2026);
        assert_eq!(
            order(&s),
            vec!["Viernes 6 de febrero", "Domingo 8 de febrero", "Horarios", "Diario"]
        );
    }

    #[test]
    fn values_are_untouched() {
        let mut s: Showtimes = vec![
            ("Martes 10 de febrero".to_string(), vec!["20:00".to_string(), "17:00".to_string()]),
            ("Lunes 9 de febrero".to_string(), vec!["18:00".to_string()]),
        ]
        .into_iter()
        .collect();
        sort_showtimes(&mut s, 2026);
        assert_eq!(s.get("Martes 10 de febrero").unwrap(), ["20:00", "17:00"]);
        assert_eq!(order(&s), vec!["Lunes 9 de febrero", "Martes 10 de febrero"]);
    }

    #[test]
    fn sorts_every_movie() {
        let mut movies = vec![MovieRecord::new("A"), MovieRecord::new("B")];
        for m in &mut movies {
            m.showtimes = days(&["Diario", "Jueves 12 de febrero"]);
        }
        sort_all(&mut movies, 2026);
        for m in &movies {
            assert_eq!(order(&m.showtimes), vec!["Jueves 12 de febrero", "Diario"]);
        }
    }
}
