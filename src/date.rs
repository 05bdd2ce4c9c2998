//! Date parsing and formatting
//!
//! Trial dates arrive as user text. Holiday dates never pass through here;
//! they cross the stricter boundary in [`crate::holidays::parse_holidays`].

use chrono::{Datelike, Local, NaiveDate, Weekday};
use crate::error::{Error, Result};

/// Parse a trial date expression
///
/// Supported formats:
/// - `"today"` → the local calendar date
/// - `"2026-02-26"` → ISO format
/// - `"26/02/2026"` → Spanish day/month/year order
pub fn parse_trial_date(expr: &str) -> Result<NaiveDate> {
    let expr = expr.trim();

    // Empty string is never a date
    if expr.is_empty() {
        return Err(Error::InvalidTrialDate("empty date".to_string()));
    }

    // "today" / "hoy" → local date
    if expr.eq_ignore_ascii_case("today") || expr.eq_ignore_ascii_case("hoy") {
        return Ok(Local::now().date_naive());
    }

    // ISO format: 2026-02-26
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Ok(date);
    }

    // Spanish format: 26/02/2026
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%d/%m/%Y") {
        return Ok(date);
    }

    Err(Error::InvalidTrialDate(format!("Unable to parse date: {}", expr)))
}

/// Saturday and Sunday, regardless of locale
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Format a date as `YYYY-MM-DD`
pub fn format_iso(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a date in Spanish long form
/// Example: "jueves 12 de febrero de 2026"
pub fn format_date_es(date: &NaiveDate) -> String {
    format!(
        "{} {} de {} de {}",
        weekday_es(date.weekday()),
        date.day(),
        month_es(date.month0()),
        date.year()
    )
}

fn weekday_es(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Month name for a zero-based month index
fn month_es(month0: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "enero", "febrero", "marzo", "abril", "mayo", "junio",
        "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
    ];
    MONTHS[month0 as usize]
}
