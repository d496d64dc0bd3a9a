//! Indonesian display helpers: rupiah amounts, calendar names, and link encoding.

use chrono::{Datelike, NaiveDate, Weekday};

/// Format an amount as whole rupiah, e.g. `Rp 25.000` (non-breaking space).
///
/// Fractions are rounded half away from zero. Non-finite input renders as `Rp 0`.
pub fn format_idr(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let whole = rounded.abs() as u128;
    let sign = if rounded < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}Rp\u{a0}{}", group_thousands(whole))
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Percent-encode a query component the way browsers' `encodeURIComponent` does.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// Abbreviated month name, 1-based.
pub fn short_month_name(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
    ];
    MONTHS[(month.clamp(1, 12) - 1) as usize]
}

/// Long date label such as `Kamis, 16 Okt`.
pub fn date_label(date: NaiveDate) -> String {
    format!(
        "{}, {:02} {}",
        weekday_name(date.weekday()),
        date.day(),
        short_month_name(date.month())
    )
}
