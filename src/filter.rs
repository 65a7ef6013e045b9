//! Tribunal + date-range filtering
//!
//! Both dashboard layouts share this controller. The only difference between
//! them is whether the tribunal list starts with an "all tribunals" entry.

use crate::dataset::{Dataset, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Selector entry meaning "every tribunal".
pub const ALL_SENTINEL: &str = "TODOS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TribunalSelection {
    All,
    Only(String),
}

impl TribunalSelection {
    /// Map a selector value to a selection, honouring the sentinel.
    pub fn from_option(value: &str) -> Self {
        if value == ALL_SENTINEL {
            TribunalSelection::All
        } else {
            TribunalSelection::Only(value.to_string())
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            TribunalSelection::All => true,
            TribunalSelection::Only(t) => record.tribunal.as_deref() == Some(t.as_str()),
        }
    }

    /// The selector value this selection corresponds to.
    pub fn as_option(&self) -> &str {
        match self {
            TribunalSelection::All => ALL_SENTINEL,
            TribunalSelection::Only(t) => t,
        }
    }
}

impl fmt::Display for TribunalSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_option())
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// `start > end` never contains anything.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} até {}", self.start, self.end)
    }
}

/// What the date widget hands back: one day or a start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Single(NaiveDate),
    Pair(NaiveDate, NaiveDate),
}

impl DateInput {
    pub fn normalize(self) -> DateRange {
        match self {
            DateInput::Single(d) => DateRange::single(d),
            DateInput::Pair(start, end) => DateRange::new(start, end),
        }
    }
}

/// Records matching a tribunal and date range, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub selection: TribunalSelection,
    pub range: DateRange,
    pub records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one column across the view, nulls included as `None`.
    pub fn column(&self, column: &str) -> impl Iterator<Item = Option<&'a str>> + '_ {
        let column = column.to_string();
        self.records.iter().copied().map(move |r: &'a Record| r.value(&column))
    }
}

/// Sorted distinct non-null tribunals, optionally led by [`ALL_SENTINEL`].
pub fn tribunal_options(dataset: &Dataset, include_all_option: bool) -> Vec<String> {
    let distinct: BTreeSet<&str> = dataset
        .records()
        .iter()
        .filter_map(|r| r.tribunal.as_deref())
        .collect();

    let mut options = Vec::with_capacity(distinct.len() + 1);
    if include_all_option {
        options.push(ALL_SENTINEL.to_string());
    }
    options.extend(distinct.into_iter().map(str::to_string));
    options
}

/// Min/max observed date for the selection.
///
/// Falls back to the whole dataset when the selected tribunal has no dates,
/// and to `today` when nothing has a date at all.
pub fn date_bounds(dataset: &Dataset, selection: &TribunalSelection, today: NaiveDate) -> DateRange {
    let span = |pred: &dyn Fn(&Record) -> bool| -> Option<DateRange> {
        let mut dates = dataset
            .records()
            .iter()
            .filter(|r| pred(r))
            .filter_map(|r| r.filed_on);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateRange::new(min, max))
    };

    span(&|r: &Record| selection.matches(r))
        .or_else(|| span(&|_: &Record| true))
        .unwrap_or_else(|| DateRange::single(today))
}

/// Rows where the tribunal matches, the date is present and inside `range`.
pub fn filter<'a>(dataset: &'a Dataset, selection: &TribunalSelection, range: DateRange) -> FilteredView<'a> {
    let records = dataset
        .records()
        .iter()
        .filter(|r| selection.matches(r))
        .filter(|r| r.filed_on.map_or(false, |d| range.contains(d)))
        .collect();

    FilteredView {
        selection: selection.clone(),
        range,
        records,
    }
}

/// Raw query parameters from the dashboard form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Query {
    #[serde(default)]
    pub tribunal: Option<String>,
    #[serde(default)]
    pub inicio: Option<String>,
    #[serde(default)]
    pub fim: Option<String>,
}

impl Query {
    /// Decode a form query string. A repeated key keeps its last value;
    /// unknown keys are ignored.
    pub fn parse(query_string: &str) -> Self {
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query_string) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(query = query_string, error = %e, "malformed query string ignored");
                return Self::default();
            }
        };

        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "tribunal" => query.tribunal = Some(value),
                "inicio" => query.inicio = Some(value),
                "fim" => query.fim = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// A query resolved against the dataset: what is selected and what is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub options: Vec<String>,
    pub selection: TribunalSelection,
    pub bounds: DateRange,
    pub range: DateRange,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterController {
    pub include_all_option: bool,
}

impl FilterController {
    pub fn new(include_all_option: bool) -> Self {
        Self { include_all_option }
    }

    pub fn options(&self, dataset: &Dataset) -> Vec<String> {
        tribunal_options(dataset, self.include_all_option)
    }

    /// Work out selection and range from a query.
    ///
    /// Unknown or absent tribunal → first option. Absent dates → full bounds.
    /// Only one date given → a one-day range.
    pub fn resolve(&self, dataset: &Dataset, query: &Query, today: NaiveDate) -> Resolved {
        let options = self.options(dataset);

        let selection = query
            .tribunal
            .as_deref()
            .filter(|t| options.iter().any(|o| o.as_str() == *t))
            .or_else(|| options.first().map(String::as_str))
            .map(TribunalSelection::from_option)
            .unwrap_or(TribunalSelection::All);

        let bounds = date_bounds(dataset, &selection, today);

        let parse = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        };
        let input = match (parse(&query.inicio), parse(&query.fim)) {
            (Some(start), Some(end)) => DateInput::Pair(start, end),
            (Some(day), None) | (None, Some(day)) => DateInput::Single(day),
            (None, None) => DateInput::Pair(bounds.start, bounds.end),
        };

        Resolved {
            options,
            selection,
            bounds,
            range: input.normalize(),
        }
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset, resolved: &Resolved) -> FilteredView<'a> {
        filter(dataset, &resolved.selection, resolved.range)
    }
}
