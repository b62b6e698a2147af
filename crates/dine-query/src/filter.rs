//! Record predicates.
//!
//! A [`RecordFilter`] is the conjunction of up to four optional criteria.
//! An omitted criterion imposes no constraint; a membership list that is
//! present but empty matches nothing.

use std::collections::BTreeSet;

use dine_model::RestaurantRecord;

/// Decides whether a record takes part in a query.
pub trait Predicate {
    fn matches(&self, record: &RestaurantRecord) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&RestaurantRecord) -> bool,
{
    fn matches(&self, record: &RestaurantRecord) -> bool {
        self(record)
    }
}

/// Iterates the records accepted by `predicate`, in input order.
pub fn select<'a, 'p, P>(
    records: &'a [RestaurantRecord],
    predicate: &'p P,
) -> impl Iterator<Item = &'a RestaurantRecord> + 'p
where
    'a: 'p,
    P: Predicate + ?Sized,
{
    records.iter().filter(move |record| predicate.matches(record))
}

/// Inclusive rating bounds; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RatingRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn contains(&self, rating: f64) -> bool {
        self.min.is_none_or(|min| rating >= min) && self.max.is_none_or(|max| rating <= max)
    }
}

/// Conjunction of country, cuisine, vote and rating criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    countries: Option<BTreeSet<String>>,
    cuisines: Option<BTreeSet<String>>,
    min_votes: Option<u64>,
    rating_range: Option<RatingRange>,
}

impl RecordFilter {
    /// A filter that accepts every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> Option<&BTreeSet<String>> {
        self.countries.as_ref()
    }

    pub fn cuisines(&self) -> Option<&BTreeSet<String>> {
        self.cuisines.as_ref()
    }

    pub fn min_votes(&self) -> Option<u64> {
        self.min_votes
    }

    pub fn rating_range(&self) -> Option<RatingRange> {
        self.rating_range
    }
}

impl Predicate for RecordFilter {
    fn matches(&self, record: &RestaurantRecord) -> bool {
        if let Some(countries) = &self.countries
            && !countries.contains(&record.country)
        {
            return false;
        }
        if let Some(cuisines) = &self.cuisines
            && !cuisines.contains(&record.cuisine)
        {
            return false;
        }
        if let Some(min_votes) = self.min_votes
            && record.votes < min_votes
        {
            return false;
        }
        if let Some(range) = self.rating_range
            && !range.contains(record.rating)
        {
            return false;
        }
        true
    }
}

/// Builds [`RecordFilter`]s.
#[derive(Debug, Clone, Default)]
pub struct FilterComposer {
    filter: RecordFilter,
}

impl FilterComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes a filter from optional criteria in one call.
    pub fn compose<C, K>(
        country_selection: Option<C>,
        cuisine_selection: Option<K>,
        min_votes: Option<u64>,
        rating_range: Option<RatingRange>,
    ) -> RecordFilter
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        RecordFilter {
            countries: country_selection.map(collect_set),
            cuisines: cuisine_selection.map(collect_set),
            min_votes,
            rating_range,
        }
    }

    /// Restricts to the given country labels.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.countries = Some(collect_set(countries));
        self
    }

    /// Restricts to the given canonical cuisines.
    pub fn cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.cuisines = Some(collect_set(cuisines));
        self
    }

    pub fn min_votes(mut self, min_votes: u64) -> Self {
        self.filter.min_votes = Some(min_votes);
        self
    }

    pub fn rating_range(mut self, range: RatingRange) -> Self {
        self.filter.rating_range = Some(range);
        self
    }

    pub fn build(self) -> RecordFilter {
        self.filter
    }
}

fn collect_set<I>(values: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_range_is_inclusive() {
        let range = RatingRange::new(Some(2.5), Some(4.0));
        assert!(range.contains(2.5));
        assert!(range.contains(4.0));
        assert!(!range.contains(4.01));
        assert!(RatingRange::default().contains(0.0));
        assert!(RatingRange::at_least(4.0).contains(4.9));
        assert!(!RatingRange::at_most(2.5).contains(2.6));
    }

    #[test]
    fn compose_and_builder_agree() {
        let composed = FilterComposer::compose(
            Some(["Brazil", "India"]),
            None::<Vec<String>>,
            Some(10),
            Some(RatingRange::at_least(3.0)),
        );
        let built = FilterComposer::new()
            .countries(["India", "Brazil"])
            .min_votes(10)
            .rating_range(RatingRange::at_least(3.0))
            .build();
        assert_eq!(composed, built);
        assert!(composed.cuisines().is_none());
    }
}
