//! Deadline computation for LRJS Art. 82.5 and Art. 45
//!
//! The ordinary deadline is the 10th business day before the trial, ending at
//! midnight. Art. 45 then allows filing until 15:00 on the next business day
//! (the "prórroga"). Both walks skip Saturdays, Sundays and the holiday set.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::date::is_weekend;
use crate::error::{Error, Result, Walk};
use crate::holidays::HolidaySet;

/// Business days counted back from the trial date
pub const BUSINESS_DAYS_BEFORE_TRIAL: u32 = 10;

/// Calendar days either walk may examine before giving up
///
/// Ten business days normally span two calendar weeks; this allows ten times that.
pub const DEFAULT_SEARCH_CAP_DAYS: u32 = 140;

/// Hour at which the grace day closes
pub const GRACE_CUTOFF_HOUR: i64 = 15;

/// Calculator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    /// Business days counted back from the trial
    pub business_days: u32,
    /// Limit on calendar days examined by each walk
    pub search_cap_days: u32,
    /// Time of day the grace day closes
    pub grace_cutoff: NaiveTime,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            business_days: BUSINESS_DAYS_BEFORE_TRIAL,
            search_cap_days: DEFAULT_SEARCH_CAP_DAYS,
            grace_cutoff: NaiveTime::MIN + Duration::hours(GRACE_CUTOFF_HOUR),
        }
    }
}

impl CalculatorConfig {
    /// Reject settings that make either walk meaningless
    pub fn validate(&self) -> Result<()> {
        if self.business_days == 0 {
            return Err(Error::InvalidConfig("business days must be at least 1".to_string()));
        }
        if self.search_cap_days == 0 {
            return Err(Error::InvalidConfig("search cap must be at least 1 day".to_string()));
        }
        Ok(())
    }
}

/// Result of a deadline computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineResult {
    /// Trial date the computation started from
    pub trial_date: NaiveDate,
    /// Nth business day before the trial; filing allowed until end of day
    pub theoretical_deadline: NaiveDate,
    /// Next business day after the theoretical deadline; filing allowed until the cutoff
    pub prorrogue_date: NaiveDate,
    /// Time of day the grace day closes
    pub prorrogue_cutoff: NaiveTime,
    /// Business days counted, earliest first
    pub business_days_track: Vec<NaiveDate>,
}

impl DeadlineResult {
    /// Last instant of the theoretical deadline day
    pub fn theoretical_deadline_at(&self) -> NaiveDateTime {
        let midnight = self.theoretical_deadline.and_time(NaiveTime::MIN);
        midnight + Duration::days(1) - Duration::seconds(1)
    }

    /// Moment the grace day closes
    pub fn prorrogue_deadline_at(&self) -> NaiveDateTime {
        self.prorrogue_date.and_time(self.prorrogue_cutoff)
    }

    /// Non-business days between the theoretical deadline and the grace day
    pub fn skipped_days(&self) -> Vec<NaiveDate> {
        self.theoretical_deadline
            .iter_days()
            .skip(1)
            .take_while(|d| *d < self.prorrogue_date)
            .collect()
    }
}

/// True for Saturdays, Sundays and members of `holidays`
pub fn is_non_business_day(date: NaiveDate, holidays: &HolidaySet) -> bool {
    is_weekend(date) || holidays.contains(&date)
}

/// Walk back from the day before `trial_date` until `n` business days are found
///
/// Returns the nth business day and all `n` days found, in ascending order.
pub fn find_nth_business_day_before(
    trial_date: NaiveDate,
    n: u32,
    holidays: &HolidaySet,
    cap: u32,
) -> Result<(NaiveDate, Vec<NaiveDate>)> {
    if n == 0 {
        return Err(Error::InvalidConfig("business days must be at least 1".to_string()));
    }

    let exhausted = Error::UnboundedSearch { walk: Walk::Backward, cap };
    let mut track = Vec::with_capacity(n as usize);
    let mut current = trial_date;

    // Step before looking, so the trial date itself is never counted
    for _ in 0..cap {
        current = match current.pred_opt() {
            Some(date) => date,
            None => return Err(exhausted),
        };
        if is_non_business_day(current, holidays) {
            continue;
        }
        track.push(current);
        if track.len() == n as usize {
            // Found newest first; report earliest first
            track.reverse();
            return Ok((current, track));
        }
    }

    debug!(%trial_date, found = track.len(), n, cap, "backward walk exhausted");
    Err(exhausted)
}

/// First business day strictly after `date`
pub fn next_business_day_after(
    date: NaiveDate,
    holidays: &HolidaySet,
    cap: u32,
) -> Result<NaiveDate> {
    let mut current = date;

    for _ in 0..cap {
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if !is_non_business_day(current, holidays) {
            return Ok(current);
        }
    }

    debug!(%date, cap, "forward walk exhausted");
    Err(Error::UnboundedSearch { walk: Walk::Forward, cap })
}

/// Compute the deadline for `trial_date` with the default settings
pub fn calculate_deadline(trial_date: NaiveDate, holidays: &HolidaySet) -> Result<DeadlineResult> {
    calculate_deadline_with(trial_date, holidays, &CalculatorConfig::default())
}

/// Compute the deadline for `trial_date` with explicit settings
#[tracing::instrument(level = "debug", skip(holidays, config), fields(holidays = holidays.len()))]
pub fn calculate_deadline_with(
    trial_date: NaiveDate,
    holidays: &HolidaySet,
    config: &CalculatorConfig,
) -> Result<DeadlineResult> {
    config.validate()?;

    // Ordinary deadline: nth business day before the trial
    let (theoretical_deadline, business_days_track) = find_nth_business_day_before(
        trial_date,
        config.business_days,
        holidays,
        config.search_cap_days,
    )?;
    // Grace day: first business day after the ordinary deadline
    let prorrogue_date =
        next_business_day_after(theoretical_deadline, holidays, config.search_cap_days)?;

    debug!(%theoretical_deadline, %prorrogue_date, "deadline computed");

    Ok(DeadlineResult {
        trial_date,
        theoretical_deadline,
        prorrogue_date,
        prorrogue_cutoff: config.grace_cutoff,
        business_days_track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holidays(dates: &[NaiveDate]) -> HolidaySet {
        dates.iter().copied().collect()
    }

    #[test]
    fn test_non_business_day() {
        let h = holidays(&[ymd(2026, 2, 12)]);
        assert!(is_non_business_day(ymd(2026, 2, 12), &h));
        assert!(is_non_business_day(ymd(2026, 2, 14), &h)); // Saturday
        assert!(is_non_business_day(ymd(2026, 2, 15), &h)); // Sunday
        assert!(!is_non_business_day(ymd(2026, 2, 13), &h));
        assert!(!is_non_business_day(ymd(2026, 2, 12), &HolidaySet::new()));
    }

    #[test]
    fn test_weekends_only() {
        let result = calculate_deadline(ymd(2026, 2, 26), &HolidaySet::new()).unwrap();

        assert_eq!(result.theoretical_deadline, ymd(2026, 2, 12));
        assert_eq!(result.prorrogue_date, ymd(2026, 2, 13));
        assert_eq!(
            result.business_days_track,
            vec![
                ymd(2026, 2, 12),
                ymd(2026, 2, 13),
                ymd(2026, 2, 16),
                ymd(2026, 2, 17),
                ymd(2026, 2, 18),
                ymd(2026, 2, 19),
                ymd(2026, 2, 20),
                ymd(2026, 2, 23),
                ymd(2026, 2, 24),
                ymd(2026, 2, 25),
            ]
        );
    }

    #[test]
    fn test_holiday_on_counted_day() {
        let result = calculate_deadline(ymd(2026, 2, 26), &holidays(&[ymd(2026, 2, 12)])).unwrap();

        assert_eq!(result.theoretical_deadline, ymd(2026, 2, 11));
        // 2026-02-12 is the holiday itself, so the grace day moves on to Friday
        assert_eq!(result.prorrogue_date, ymd(2026, 2, 13));
        assert_eq!(result.skipped_days(), vec![ymd(2026, 2, 12)]);
        assert!(!result.business_days_track.contains(&ymd(2026, 2, 12)));
    }

    #[test]
    fn test_grace_day_skips_weekend() {
        // Trial on Monday 2026-03-02 with Tuesday 17 a holiday: the count
        // reaches Friday 13 and the grace day falls after the weekend.
        let result = calculate_deadline(ymd(2026, 3, 2), &holidays(&[ymd(2026, 2, 17)])).unwrap();
        assert_eq!(result.theoretical_deadline, ymd(2026, 2, 13));
        assert_eq!(result.prorrogue_date, ymd(2026, 2, 16));
        assert_eq!(result.skipped_days(), vec![ymd(2026, 2, 14), ymd(2026, 2, 15)]);
    }

    #[test]
    fn test_trial_date_not_counted() {
        // A trial on a business day never counts itself
        let result = calculate_deadline(ymd(2026, 2, 25), &HolidaySet::new()).unwrap();
        assert!(!result.business_days_track.contains(&ymd(2026, 2, 25)));
        assert_eq!(*result.business_days_track.last().unwrap(), ymd(2026, 2, 24));
    }

    #[test]
    fn test_trial_on_weekend() {
        let result = calculate_deadline(ymd(2026, 2, 28), &HolidaySet::new()).unwrap();
        assert_eq!(*result.business_days_track.last().unwrap(), ymd(2026, 2, 27));
        assert_eq!(result.theoretical_deadline, ymd(2026, 2, 16));
        assert_eq!(result.prorrogue_date, ymd(2026, 2, 17));
    }

    #[test]
    fn test_crosses_year_boundary() {
        let h = holidays(&[ymd(2025, 12, 25), ymd(2026, 1, 1), ymd(2026, 1, 6)]);
        let result = calculate_deadline(ymd(2026, 1, 12), &h).unwrap();
        // Back from Fri 9: 9, 8, 7, 5, 2, Dec 31, 30, 29, 26, 24
        assert_eq!(result.theoretical_deadline, ymd(2025, 12, 24));
        assert_eq!(result.prorrogue_date, ymd(2025, 12, 26));
    }

    #[test]
    fn test_deadline_times() {
        let result = calculate_deadline(ymd(2026, 2, 26), &HolidaySet::new()).unwrap();
        assert_eq!(
            result.theoretical_deadline_at(),
            ymd(2026, 2, 12).and_hms_opt(23, 59, 59).unwrap()
        );
        assert_eq!(
            result.prorrogue_deadline_at(),
            ymd(2026, 2, 13).and_hms_opt(15, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_idempotent() {
        let h = holidays(&[ymd(2026, 2, 12), ymd(2026, 2, 19)]);
        let first = calculate_deadline(ymd(2026, 2, 26), &h).unwrap();
        let second = calculate_deadline(ymd(2026, 2, 26), &h).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_holidays_unbounded() {
        let trial = ymd(2026, 2, 26);
        let h: HolidaySet = (trial - Duration::days(400))
            .iter_days()
            .take(801)
            .collect();

        match calculate_deadline(trial, &h) {
            Err(Error::UnboundedSearch { walk, cap }) => {
                assert_eq!(walk, Walk::Backward);
                assert_eq!(cap, DEFAULT_SEARCH_CAP_DAYS);
            }
            other => panic!("Expected UnboundedSearch, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_walk_cap() {
        let start = ymd(2026, 8, 1);
        let h: HolidaySet = start.iter_days().take(40).collect();

        match next_business_day_after(start, &h, 20) {
            Err(Error::UnboundedSearch { walk, cap }) => {
                assert_eq!(walk, Walk::Forward);
                assert_eq!(cap, 20);
            }
            other => panic!("Expected UnboundedSearch, got {:?}", other),
        }

        // 2026-09-10 is a Thursday
        assert_eq!(next_business_day_after(start, &h, 60).unwrap(), ymd(2026, 9, 10));
    }

    #[test]
    fn test_cap_counts_calendar_days() {
        // 10 business days before Monday 2026-03-02 take exactly 14 calendar days
        let trial = ymd(2026, 3, 2);
        assert!(find_nth_business_day_before(trial, 10, &HolidaySet::new(), 14).is_ok());
        assert!(find_nth_business_day_before(trial, 10, &HolidaySet::new(), 13).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = CalculatorConfig { business_days: 0, ..CalculatorConfig::default() };
        assert!(matches!(
            calculate_deadline_with(ymd(2026, 2, 26), &HolidaySet::new(), &config),
            Err(Error::InvalidConfig(_))
        ));

        let config = CalculatorConfig { search_cap_days: 0, ..CalculatorConfig::default() };
        assert!(matches!(
            calculate_deadline_with(ymd(2026, 2, 26), &HolidaySet::new(), &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_business_days() {
        let config = CalculatorConfig { business_days: 1, ..CalculatorConfig::default() };
        let result =
            calculate_deadline_with(ymd(2026, 2, 26), &HolidaySet::new(), &config).unwrap();
        assert_eq!(result.business_days_track, vec![ymd(2026, 2, 25)]);
        assert_eq!(result.prorrogue_date, ymd(2026, 2, 26));
    }

    #[test]
    fn test_serialize_json() {
        let result = calculate_deadline(ymd(2026, 2, 26), &HolidaySet::new()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["theoreticalDeadline"], "2026-02-12");
        assert_eq!(json["prorrogueDate"], "2026-02-13");
        assert_eq!(json["prorrogueCutoff"], "15:00:00");
        assert_eq!(json["businessDaysTrack"].as_array().unwrap().len(), 10);
    }
}
