/// Format a money amount with its currency code.
/// Whole amounts drop the cents ("EUR 49"), fractional ones keep two.
pub fn format_currency(amount: f64, currency: &str) -> String {
    if amount.fract() == 0.0 {
        format!("{} {:.0}", currency, amount)
    } else {
        format!("{} {:.2}", currency, amount)
    }
}

/// Format an ISO date string as DD/MM/YYYY, or "-" when absent/unparsable.
pub fn format_date(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(&value.chars().take(10).collect::<String>(), "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    "-".to_string()
}

/// Up to two uppercase initials from a display name, "NA" when empty.
pub fn initials(value: &str) -> String {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => "NA".to_string(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, second, ..] => {
            let mut out = String::new();
            out.extend(first.chars().take(1));
            out.extend(second.chars().take(1));
            out.to_uppercase()
        }
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(49.0, "EUR"), "EUR 49");
        assert_eq!(format_currency(49.99, "EUR"), "EUR 49.99");
        assert_eq!(format_currency(0.0, "USD"), "USD 0");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-05-12T09:30:00.000Z")), "12/05/2024");
        assert_eq!(format_date(Some("2024-05-12")), "12/05/2024");
        assert_eq!(format_date(Some("not a date")), "-");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Jane Coach"), "JC");
        assert_eq!(initials("Madonna"), "MA");
        assert_eq!(initials("  "), "NA");
        assert_eq!(initials("a b c"), "AB");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
