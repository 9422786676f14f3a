use chrono::{DateTime, Timelike, Utc};

use crate::domain::ClockTime;

/// Currency symbol for an ISO code, falling back to the code itself.
pub fn currency_symbol(code: &str) -> &str {
    match code.to_ascii_uppercase().as_str() {
        "PHP" => "₱",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        _ => code,
    }
}

/// Formats an amount with two decimals and thousands separators (`-₱1,234.50`).
pub fn format_currency(amount: f64, code: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, currency_symbol(code), grouped, cents % 100)
}

/// Rounded share of `total`, capped at 100%.
pub fn format_percentage(value: f64, total: f64) -> String {
    if total == 0.0 {
        return "0%".into();
    }
    let percentage = (value / total * 100.0).round().min(100.0);
    format!("{}%", percentage as i64)
}

/// `Jan 5, 2025`
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}

/// 12-hour rendering of a class time (`1:30 PM`).
pub fn format_time(time: ClockTime) -> String {
    let hour = time.0.hour();
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{}:{:02} {}", display, time.0.minute(), period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(1234567.5, "PHP"), "₱1,234,567.50");
        assert_eq!(format_currency(-50.0, "USD"), "-$50.00");
        assert_eq!(format_currency(0.0, "XYZ"), "XYZ0.00");
        assert_eq!(format_currency(999.999, "PHP"), "₱1,000.00");
    }

    #[test]
    fn percentage_caps_at_one_hundred() {
        assert_eq!(format_percentage(300.0, 1000.0), "30%");
        assert_eq!(format_percentage(1500.0, 1000.0), "100%");
        assert_eq!(format_percentage(10.0, 0.0), "0%");
    }

    #[test]
    fn dates_and_times_use_short_forms() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 5, 13, 0, 0).unwrap();
        assert_eq!(format_date(ts), "Jan 5, 2025");
        assert_eq!(format_time(ClockTime::hm(13, 30).unwrap()), "1:30 PM");
        assert_eq!(format_time(ClockTime::hm(0, 5).unwrap()), "12:05 AM");
    }
}
