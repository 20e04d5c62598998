//! Rupee amounts and the date/time labels shown in tables and exports.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, Utc};

use crate::domain::entry::ENTRY_DATE_FORMAT;

/// Rendered in place of a date or time that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";
pub const RUPEE: &str = "₹";

/// Formats `amount` with lakh/crore grouping behind `symbol`, e.g. `₹1,23,456.00`.
/// The sign precedes the symbol.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body.trim_start_matches(['0', ',', '.']) != "" {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Fixed-precision number with Indian digit grouping.
pub fn format_number(value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body.as_str()),
    };
    match unsigned.find('.') {
        Some(pos) => format!(
            "{}{}{}",
            sign,
            group_digits(&unsigned[..pos]),
            &unsigned[pos..]
        ),
        None => format!("{}{}", sign, group_digits(unsigned)),
    }
}

/// Last three digits form one group, everything before is grouped in pairs.
fn group_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    for (count, ch) in head.chars().rev().enumerate() {
        if count != 0 && count % 2 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
    }
    format!("{},{}", grouped, tail)
}

/// `15 Dec 2023` for an ISO entry date, [`INVALID_DATE`] otherwise.
pub fn format_display_date(date: &str) -> String {
    NaiveDate::parse_from_str(date.trim(), ENTRY_DATE_FORMAT)
        .map(format_calendar_date)
        .unwrap_or_else(|_| INVALID_DATE.to_string())
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_label(date.month()),
        date.year()
    )
}

/// Local wall-clock time of an RFC 3339 timestamp, e.g. `10:30 am`.
pub fn format_display_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(instant) => format_clock_time(instant.with_timezone(&Local).time()),
        Err(_) => INVALID_DATE.to_string(),
    }
}

pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%I:%M %P").to_string()
}

/// Local date and time of `instant`, e.g. `15 Dec 2023, 10:30 am`.
pub fn format_display_datetime(instant: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&Local);
    format!(
        "{}, {}",
        format_calendar_date(local.date_naive()),
        format_clock_time(local.time())
    )
}

/// Human-readable export stamp in local time, e.g. `15/12/2023, 4:00:00 pm`.
pub fn format_export_date(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local)
        .format("%-d/%-m/%Y, %-I:%M:%S %P")
        .to_string()
}

/// UTC calendar day used in export file names.
pub fn file_date(now: DateTime<Utc>) -> String {
    now.date_naive().format(ENTRY_DATE_FORMAT).to_string()
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(amount: f64) -> String {
        format_currency(amount, RUPEE)
    }

    #[test]
    fn inr_uses_lakh_grouping() {
        assert_eq!(inr(0.0), "₹0.00");
        assert_eq!(inr(999.5), "₹999.50");
        assert_eq!(inr(1_000.0), "₹1,000.00");
        assert_eq!(inr(123_456.0), "₹1,23,456.00");
        assert_eq!(inr(12_345_678.9), "₹1,23,45,678.90");
    }

    #[test]
    fn negative_amounts_carry_a_leading_sign() {
        assert_eq!(inr(-2_600.0), "-₹2,600.00");
        assert_eq!(inr(-0.001), "₹0.00");
        assert_eq!(format_number(-1_500.0, 2), "-1,500.00");
    }

    #[test]
    fn custom_symbol_keeps_grouping_and_sign() {
        assert_eq!(format_currency(-123_456.5, "Rs. "), "-Rs. 1,23,456.50");
        assert_eq!(format_currency(42.0, "$"), "$42.00");
    }

    #[test]
    fn display_date_uses_short_month_names() {
        assert_eq!(format_display_date("2023-12-15"), "15 Dec 2023");
        assert_eq!(format_display_date("2024-03-05"), "5 Mar 2024");
        assert_eq!(format_display_date("yesterday"), INVALID_DATE);
    }

    #[test]
    fn clock_time_is_twelve_hour_lowercase() {
        let time = NaiveTime::from_hms_opt(14, 45, 0).unwrap();
        assert_eq!(format_clock_time(time), "02:45 pm");
        assert_eq!(format_display_time("not a time"), INVALID_DATE);
    }
}
