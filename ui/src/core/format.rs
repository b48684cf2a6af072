//! Display formatting helpers.

/// Rounded whole number with thousands separators, e.g. `1,234,567`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let negative = value < 0.0;
    let mut digits = (value.abs().round() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    while digits.len() > 3 {
        let rest = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() {
            rest
        } else {
            format!("{rest},{grouped}")
        };
    }
    grouped = if grouped.is_empty() {
        digits
    } else {
        format!("{digits},{grouped}")
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Currency display at THB scale: rounded to whole units with thousands
/// separators, e.g. `฿1,234,567`.
pub fn format_thb(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    if value < 0.0 {
        format!("-฿{}", format_amount(-value))
    } else {
        format!("฿{}", format_amount(value))
    }
}

/// Percent display with no decimals, e.g. `85%`.
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.0}%", value)
    } else {
        "—".to_string()
    }
}

/// File size in megabytes with two decimals, mirroring the upload card.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Human form of an RFC 3339 save stamp: `2025-08-25 · 14:30`. Degrades to
/// the raw string when it doesn't split as expected.
pub fn format_saved_at(iso: &str) -> String {
    let Some((date, time_segment)) = iso.split_once('T') else {
        return iso.to_string();
    };
    let clock: String = time_segment
        .split(['.', 'Z', '+'])
        .next()
        .unwrap_or(time_segment)
        .chars()
        .take(5)
        .collect();
    if clock.is_empty() {
        date.to_string()
    } else {
        format!("{date} · {clock}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thb_grouping() {
        assert_eq!(format_thb(0.0), "฿0");
        assert_eq!(format_thb(999.0), "฿999");
        assert_eq!(format_thb(1000.0), "฿1,000");
        assert_eq!(format_thb(1_234_567.4), "฿1,234,567");
        assert_eq!(format_thb(-25_000.0), "-฿25,000");
        assert_eq!(format_thb(f64::NAN), "—");
    }

    #[test]
    fn saved_at_display() {
        assert_eq!(
            format_saved_at("2025-08-25T14:30:12.345Z"),
            "2025-08-25 · 14:30"
        );
        assert_eq!(format_saved_at("not a stamp"), "not a stamp");
    }

    #[test]
    fn file_size_display() {
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(5_452_595), "5.20 MB");
    }
}
