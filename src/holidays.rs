//! Holiday input handling
//!
//! Holidays come from free text typed by a user, from a holiday-discovery
//! service, or both. All of it is funnelled into a [`RawHolidayInput`] and
//! converted to a [`HolidaySet`] by [`parse_holidays`], which is the only
//! place text becomes dates.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

static HOLIDAY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("holiday line pattern is valid"));

/// Unvalidated holiday text, one date per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHolidayInput(String);

impl RawHolidayInput {
    /// Wrap text without inspecting it
    pub fn new(text: impl Into<String>) -> Self {
        RawHolidayInput(text.into())
    }

    /// The text as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append another block of text on its own lines
    pub fn push_text(&mut self, text: &str) {
        // Keep the new block off the last existing line
        if !self.0.is_empty() && !self.0.ends_with('\n') {
            self.0.push('\n');
        }
        self.0.push_str(text);
    }
}

impl From<&str> for RawHolidayInput {
    fn from(text: &str) -> Self {
        RawHolidayInput::new(text)
    }
}

impl From<String> for RawHolidayInput {
    fn from(text: String) -> Self {
        RawHolidayInput(text)
    }
}

/// Non-business days beyond weekends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// An empty set: only weekends are non-business days
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `date` is one of the holidays
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    /// Number of distinct holidays
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no holidays were given
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order
    pub fn iter(&self) -> btree_set::Iter<'_, NaiveDate> {
        self.dates.iter()
    }

    /// Add every date of `other`; dates already present are kept once
    pub fn merge(&mut self, other: &HolidaySet) {
        self.dates.extend(other.dates.iter().copied());
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        HolidaySet { dates: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a HolidaySet {
    type Item = &'a NaiveDate;
    type IntoIter = btree_set::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}

/// Parse free-text holiday input into a set of dates
///
/// Each line is trimmed and kept only if it is exactly `YYYY-MM-DD` and names
/// a real calendar date. Anything else is skipped without error.
pub fn parse_holidays(input: &RawHolidayInput) -> HolidaySet {
    input
        .as_str()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            // Strict shape first, then a real calendar date
            if !HOLIDAY_LINE.is_match(line) {
                debug!(line, "skipping holiday line: not YYYY-MM-DD");
                return None;
            }
            match NaiveDate::parse_from_str(line, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(e) => {
                    debug!(line, error = %e, "skipping holiday line: not a calendar date");
                    None
                }
            }
        })
        .collect()
}

/// One entry as returned by a holiday-discovery service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedHoliday {
    /// Date as sent by the service, expected `YYYY-MM-DD`
    pub date: String,
    /// Holiday name, empty when the service sent none
    #[serde(default)]
    pub name: String,
}

impl NamedHoliday {
    /// Year from the leading digits of `date`, if there are any
    fn year(&self) -> Option<i32> {
        self.date.trim().split('-').next()?.parse().ok()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DiscoveryResponse {
    Wrapped {
        #[serde(default)]
        holidays: Vec<NamedHoliday>,
    },
    Bare(Vec<NamedHoliday>),
}

/// Decode a discovery response
///
/// Accepts `{"holidays": [{"date": ..., "name": ...}]}` or a bare array of
/// the same entries. A missing `holidays` key yields an empty list.
pub fn decode_discovery_response(json: &str) -> Result<Vec<NamedHoliday>> {
    let response: DiscoveryResponse = serde_json::from_str(json)?;
    Ok(match response {
        DiscoveryResponse::Wrapped { holidays } => holidays,
        DiscoveryResponse::Bare(holidays) => holidays,
    })
}

/// Source of official holidays for a place and year
pub trait HolidayProvider {
    /// Holidays observed in `location` during `year`
    fn holidays(&self, location: &str, year: i32) -> Result<Vec<NamedHoliday>>;

    /// Holidays for several years, in the order of `years`
    fn holidays_for_years(&self, location: &str, years: &[i32]) -> Result<Vec<NamedHoliday>> {
        let mut all = Vec::new();
        for &year in years {
            all.extend(self.holidays(location, year)?);
        }
        Ok(all)
    }
}

/// Holidays stored as a discovery-service response on disk
#[derive(Debug, Clone)]
pub struct JsonHolidayFile {
    path: PathBuf,
}

impl JsonHolidayFile {
    /// Provider backed by the JSON file at `path`; nothing is read yet
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Read and decode the whole file
    fn load(&self) -> Result<Vec<NamedHoliday>> {
        let text = fs::read_to_string(&self.path)?;
        decode_discovery_response(&text)
    }
}

impl HolidayProvider for JsonHolidayFile {
    fn holidays(&self, location: &str, year: i32) -> Result<Vec<NamedHoliday>> {
        self.holidays_for_years(location, &[year])
    }

    fn holidays_for_years(&self, location: &str, years: &[i32]) -> Result<Vec<NamedHoliday>> {
        // One read for all years; entries keep file order
        let holidays: Vec<NamedHoliday> = self
            .load()?
            .into_iter()
            .filter(|h| h.year().is_some_and(|y| years.contains(&y)))
            .collect();
        debug!(
            path = %self.path.display(),
            location,
            years = years.len(),
            count = holidays.len(),
            "loaded holidays from file"
        );
        Ok(holidays)
    }
}

/// Years whose holidays can affect a deadline for `trial_date`
///
/// Every year touched by `window_days` calendar days on either side of the
/// trial. The backward walk reaches back that far; with few business days
/// the grace-day walk can run past the trial by as much.
pub fn lookup_years(trial_date: NaiveDate, window_days: u32) -> Vec<i32> {
    let window = Duration::days(i64::from(window_days));
    let earliest = trial_date.checked_sub_signed(window).unwrap_or(NaiveDate::MIN);
    let latest = trial_date.checked_add_signed(window).unwrap_or(NaiveDate::MAX);
    (earliest.year()..=latest.year()).collect()
}

/// Ask a provider for every year in `years` and concatenate the results
pub fn collect_holidays<P: HolidayProvider + ?Sized>(
    provider: &P,
    location: &str,
    years: &[i32],
) -> Result<Vec<NamedHoliday>> {
    provider.holidays_for_years(location, years)
}

/// Join discovered holiday dates and manual text into one raw input
///
/// Discovered dates come first, one per line, followed by the manual text.
pub fn compose_holiday_input(discovered: &[NamedHoliday], manual: &str) -> RawHolidayInput {
    let mut raw = RawHolidayInput::new(
        discovered
            .iter()
            .map(|h| h.date.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    );
    raw.push_text(manual);
    raw
}
