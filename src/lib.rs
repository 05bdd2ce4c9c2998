//! LRJS Deadline Library
//!
//! Computes the filing deadline for evidence requests in Spanish labour
//! procedure (Art. 82.5 LRJS): the 10th business day before the trial,
//! extended by the Art. 45 grace day until 15:00.
//! This library provides functionality to:
//! - Parse free-text holiday lists into a validated set of dates
//! - Load holidays from a discovery-service response
//! - Walk business days backward and forward with a bounded search
//! - Format dates for Spanish-language output
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use plazo_lrjs::{calculate_deadline, parse_holidays, RawHolidayInput};
//!
//! let holidays = parse_holidays(&RawHolidayInput::new("2026-02-12\nnot-a-date"));
//! let trial = NaiveDate::from_ymd_opt(2026, 2, 26).unwrap();
//! let result = calculate_deadline(trial, &holidays).expect("deadline");
//!
//! assert_eq!(result.theoretical_deadline, NaiveDate::from_ymd_opt(2026, 2, 11).unwrap());
//! assert_eq!(result.prorrogue_date, NaiveDate::from_ymd_opt(2026, 2, 13).unwrap());
//! ```

pub mod error;
pub mod date;
pub mod holidays;
pub mod deadline;

// Re-export commonly used items
pub use error::{Error, Result, Walk};
pub use holidays::{parse_holidays, HolidaySet, RawHolidayInput};
pub use deadline::{
    calculate_deadline, calculate_deadline_with, is_non_business_day,
    CalculatorConfig, DeadlineResult,
};
