//! Calendar helpers for birth dates

use chrono::{Datelike, Local, Months, NaiveDate};

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole years elapsed between `date_of_birth` and `today`.
///
/// One year is subtracted when the birthday has not happened yet this year.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age - 1
    } else {
        age
    }
}

/// The same calendar day `years` years before `today`.
///
/// Feb 29 maps to Feb 28 when the target year is not a leap year.
pub fn years_before(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// Human-readable birth date, e.g. `Jan 02, 2000`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}
