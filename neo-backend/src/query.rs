//! Query engine: composable filters over close approaches.
//!
//! A query is the conjunction of a possibly empty [`FilterSet`]. Each
//! [`Filter`] is a total predicate over one approach and its linked NEO.
//! Unknown values (missing time, NaN diameter, unknown hazard status) never
//! satisfy a filter.

use chrono::NaiveDate;
use neo_common::{CloseApproach, NearEarthObject};

use crate::error::{NeoError, NeoResult};

/// CLI date format for query arguments
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> NeoResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| NeoError::InvalidDate(raw.to_string()))
}

/// A single predicate. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Approach date equals the given date
    Date(NaiveDate),
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    DistanceMin(f64),
    DistanceMax(f64),
    VelocityMin(f64),
    VelocityMax(f64),
    /// Bounds on the linked NEO's diameter
    DiameterMin(f64),
    DiameterMax(f64),
    /// Equality on the linked NEO's hazard flag
    Hazardous(bool),
}

impl Filter {
    pub fn matches(&self, approach: &CloseApproach, neo: &NearEarthObject) -> bool {
        match *self {
            Filter::Date(date) => approach.date() == Some(date),
            Filter::StartDate(start) => approach.date().is_some_and(|d| d >= start),
            Filter::EndDate(end) => approach.date().is_some_and(|d| d <= end),
            Filter::DistanceMin(min) => approach.distance() >= min,
            Filter::DistanceMax(max) => approach.distance() <= max,
            Filter::VelocityMin(min) => approach.velocity() >= min,
            Filter::VelocityMax(max) => approach.velocity() <= max,
            Filter::DiameterMin(min) => neo.has_known_diameter() && neo.diameter() >= min,
            Filter::DiameterMax(max) => neo.has_known_diameter() && neo.diameter() <= max,
            Filter::Hazardous(wanted) => neo.hazardous() == Some(wanted),
        }
    }
}

/// Conjunction of filters; empty matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn matches(&self, approach: &CloseApproach, neo: &NearEarthObject) -> bool {
        self.filters.iter().all(|f| f.matches(approach, neo))
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<T: IntoIterator<Item = Filter>>(iter: T) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

/// Optional query arguments, one per filter kind.
///
/// Absent arguments contribute no filter.
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

impl QueryArgs {
    pub fn to_filters(&self) -> FilterSet {
        let candidates = [
            self.date.map(Filter::Date),
            self.start_date.map(Filter::StartDate),
            self.end_date.map(Filter::EndDate),
            self.distance_min.map(Filter::DistanceMin),
            self.distance_max.map(Filter::DistanceMax),
            self.velocity_min.map(Filter::VelocityMin),
            self.velocity_max.map(Filter::VelocityMax),
            self.diameter_min.map(Filter::DiameterMin),
            self.diameter_max.map(Filter::DiameterMax),
            self.hazardous.map(Filter::Hazardous),
        ];
        candidates.into_iter().flatten().collect()
    }
}

/// Yield at most `n` items. `None` or zero means no limit.
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> std::iter::Take<I> {
    let n = n.filter(|&n| n > 0).unwrap_or(usize::MAX);
    iter.take(n)
}
