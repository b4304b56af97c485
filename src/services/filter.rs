//! Trip filtering and sorting
//!
//! Filters combine with AND. Within the status set and the keyword list a
//! single match is enough. Date bounds are inclusive.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{Trip, TripDate, TripStatus};

/// Criteria for selecting trips; the default matches everything
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    /// Destination text, compared case-insensitively
    pub destination: Option<String>,
    /// Require the whole destination to match instead of a substring
    pub exact_destination: bool,
    /// Allowed statuses; empty allows all
    pub statuses: Vec<TripStatus>,
    /// Comma-separated description keywords
    pub keywords: Option<String>,
    pub case_sensitive_keywords: bool,
    pub start_from: Option<TripDate>,
    pub start_to: Option<TripDate>,
    pub end_from: Option<TripDate>,
    pub end_to: Option<TripDate>,
}

impl TripFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(mut self, text: impl Into<String>) -> Self {
        self.destination = Some(text.into());
        self
    }

    pub fn exact(mut self) -> Self {
        self.exact_destination = true;
        self
    }

    pub fn status(mut self, status: TripStatus) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn starting_between(mut self, from: TripDate, to: TripDate) -> Self {
        self.start_from = Some(from);
        self.start_to = Some(to);
        self
    }

    pub fn ending_between(mut self, from: TripDate, to: TripDate) -> Self {
        self.end_from = Some(from);
        self.end_to = Some(to);
        self
    }

    /// Check whether a trip passes every criterion
    pub fn matches(&self, trip: &Trip) -> bool {
        self.matches_destination(trip)
            && self.matches_status(trip)
            && self.matches_keywords(trip)
            && within(trip.start_date, self.start_from, self.start_to)
            && within(trip.end_date, self.end_from, self.end_to)
    }

    /// Trips that match, in their original order
    pub fn apply<'t>(&self, trips: &'t [Trip]) -> Vec<&'t Trip> {
        trips.iter().filter(|t| self.matches(t)).collect()
    }

    fn matches_destination(&self, trip: &Trip) -> bool {
        let Some(text) = self.destination.as_deref().map(str::trim) else {
            return true;
        };
        if text.is_empty() {
            return true;
        }

        let destination = trip.destination().to_lowercase();
        let text = text.to_lowercase();
        if self.exact_destination {
            destination == text
        } else {
            destination.contains(&text)
        }
    }

    fn matches_status(&self, trip: &Trip) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&trip.status)
    }

    fn matches_keywords(&self, trip: &Trip) -> bool {
        let Some(keywords) = self.keywords.as_deref() else {
            return true;
        };

        let mut keywords = keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .peekable();
        if keywords.peek().is_none() {
            return true;
        }

        if self.case_sensitive_keywords {
            keywords.any(|k| trip.description.contains(k))
        } else {
            let description = trip.description.to_lowercase();
            keywords.any(|k| description.contains(&k.to_lowercase()))
        }
    }
}

fn within(date: TripDate, from: Option<TripDate>, to: Option<TripDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

/// Field to sort trips by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripSortKey {
    #[default]
    StartDate,
    EndDate,
    Destination,
    Id,
    /// By status label, alphabetically
    Status,
    DescriptionLength,
}

impl TripSortKey {
    pub fn compare(&self, a: &Trip, b: &Trip) -> Ordering {
        match self {
            Self::StartDate => a.start_date.cmp(&b.start_date),
            Self::EndDate => a.end_date.cmp(&b.end_date),
            Self::Destination => a.destination().cmp(b.destination()),
            Self::Id => a.id.cmp(&b.id),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::DescriptionLength => a
                .description
                .chars()
                .count()
                .cmp(&b.description.chars().count()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartDate => "start",
            Self::EndDate => "end",
            Self::Destination => "destination",
            Self::Id => "id",
            Self::Status => "status",
            Self::DescriptionLength => "description",
        }
    }
}

impl fmt::Display for TripSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "start-date" => Ok(Self::StartDate),
            "end" | "end-date" => Ok(Self::EndDate),
            "destination" | "dest" => Ok(Self::Destination),
            "id" => Ok(Self::Id),
            "status" => Ok(Self::Status),
            "description" | "description-length" => Ok(Self::DescriptionLength),
            _ => Err(format!(
                "Invalid sort key: '{}'. Valid: start, end, destination, id, status, description",
                s
            )),
        }
    }
}

/// Sort trips in place; the sort is stable
pub fn sort_trips(trips: &mut [&Trip], key: TripSortKey, descending: bool) {
    trips.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(destination: &str, description: &str, start: u32, end: u32, status: TripStatus) -> Trip {
        let mut trip = Trip::create(
            destination,
            description,
            TripDate::new(start, 6, 2025),
            TripDate::new(end, 6, 2025),
        );
        trip.status = status;
        trip
    }

    fn sample() -> Vec<Trip> {
        vec![
            trip("Paris", "Museums and food", 10, 15, TripStatus::Planned),
            trip("Tokyo", "Food tour", 1, 20, TripStatus::Ongoing),
            trip("Parisville", "Quiet countryside", 5, 6, TripStatus::Completed),
        ]
    }

    fn ids(trips: &[&Trip]) -> Vec<String> {
        trips.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let trips = sample();
        assert_eq!(TripFilter::new().apply(&trips).len(), 3);
    }

    #[test]
    fn test_destination_contains_and_exact() {
        let trips = sample();

        let contains = TripFilter::new().destination("paris").apply(&trips);
        assert_eq!(contains.len(), 2);

        let exact = TripFilter::new().destination("PARIS").exact().apply(&trips);
        assert_eq!(ids(&exact), vec!["PARIS_0610"]);
    }

    #[test]
    fn test_status_set() {
        let trips = sample();
        let active = TripFilter::new()
            .status(TripStatus::Planned)
            .status(TripStatus::Ongoing)
            .apply(&trips);
        assert_eq!(ids(&active), vec!["PARIS_0610", "TOKYO_0601"]);
    }

    #[test]
    fn test_keywords_any_match() {
        let trips = sample();

        let filter = TripFilter::new().keywords("beach, food");
        assert_eq!(filter.apply(&trips).len(), 2);

        let mut sensitive = TripFilter::new().keywords("Food");
        sensitive.case_sensitive_keywords = true;
        assert_eq!(ids(&sensitive.apply(&trips)), vec!["TOKYO_0601"]);

        assert_eq!(TripFilter::new().keywords(" , ").apply(&trips).len(), 3);
    }

    #[test]
    fn test_date_ranges_are_inclusive() {
        let trips = sample();
        let filter = TripFilter::new()
            .starting_between(TripDate::new(5, 6, 2025), TripDate::new(10, 6, 2025));
        assert_eq!(ids(&filter.apply(&trips)), vec!["PARIS_0610", "PARISVILLE_0605"]);

        let filter = filter.ending_between(TripDate::new(1, 6, 2025), TripDate::new(6, 6, 2025));
        assert_eq!(ids(&filter.apply(&trips)), vec!["PARISVILLE_0605"]);
    }

    #[test]
    fn test_sort_keys() {
        let trips = sample();
        let mut selected = TripFilter::new().apply(&trips);

        sort_trips(&mut selected, TripSortKey::StartDate, false);
        assert_eq!(ids(&selected), vec!["TOKYO_0601", "PARISVILLE_0605", "PARIS_0610"]);

        sort_trips(&mut selected, TripSortKey::EndDate, true);
        assert_eq!(ids(&selected), vec!["TOKYO_0601", "PARIS_0610", "PARISVILLE_0605"]);

        sort_trips(&mut selected, TripSortKey::Status, false);
        assert_eq!(ids(&selected), vec!["PARISVILLE_0605", "TOKYO_0601", "PARIS_0610"]);

        sort_trips(&mut selected, TripSortKey::DescriptionLength, false);
        assert_eq!(ids(&selected), vec!["TOKYO_0601", "PARIS_0610", "PARISVILLE_0605"]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("start".parse::<TripSortKey>().unwrap(), TripSortKey::StartDate);
        assert_eq!("Destination".parse::<TripSortKey>().unwrap(), TripSortKey::Destination);
        assert!("budget".parse::<TripSortKey>().is_err());
    }
}
