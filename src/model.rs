use serde::ser::{Serialize, SerializeMap, Serializer};

/// Day label → screening times, both in first-seen order.
///
/// Serializes as a JSON object whose key order follows the internal order,
/// so sorting the days here is what the published feed shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Showtimes {
    days: Vec<(String, Vec<String>)>,
}

impl Showtimes {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn get(&self, day: &str) -> Option<&[String]> {
        self.days
            .iter()
            .find(|(d, _)| d == day)
            .map(|(_, times)| times.as_slice())
    }

    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|(d, _)| d.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.days.iter().map(|(d, t)| (d.as_str(), t.as_slice()))
    }

    /// Times for `day`, inserting an empty list at the end if the day is new.
    pub fn times_mut(&mut self, day: &str) -> &mut Vec<String> {
        let idx = match self.days.iter().position(|(d, _)| d == day) {
            Some(idx) => idx,
            None => {
                self.days.push((day.to_string(), Vec::new()));
                self.days.len() - 1
            }
        };
        &mut self.days[idx].1
    }

    /// Stable reorder of the days; times are untouched.
    pub fn sort_days_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&str) -> K,
    {
        self.days.sort_by_key(|(d, _)| key(d));
    }
}

impl FromIterator<(String, Vec<String>)> for Showtimes {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut showtimes = Showtimes::default();
        for (day, times) in iter {
            let slot = showtimes.times_mut(&day);
            for t in times {
                if !slot.contains(&t) {
                    slot.push(t);
                }
            }
        }
        showtimes
    }
}

impl Serialize for Showtimes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, times) in &self.days {
            map.serialize_entry(day, times)?;
        }
        map.end()
    }
}

/// Fields merged in from the metadata provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
}

/// One movie reconstructed from a listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub cleaned_title: Option<String>,
    pub poster: Option<String>,
    pub showtimes: Showtimes,
    pub synopsis: Option<String>,
    pub duration: Option<String>,
    pub year: Option<String>,
    pub trailer: Option<String>,
    pub enrichment: Enrichment,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// A record is published only with a poster and at least one showtime.
    pub fn is_retained(&self) -> bool {
        self.poster.as_deref().is_some_and(|p| !p.is_empty()) && !self.showtimes.is_empty()
    }

    pub fn display_title(&self) -> &str {
        self.cleaned_title.as_deref().unwrap_or(&self.title)
    }
}
