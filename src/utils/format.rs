//! Number formatting utilities.
//!
//! Shared by operator messages (thousands separators) and the CSV writers
//! (percentages).

/// Formats a number with comma separators for thousands.
///
/// # Examples
///
/// ```
/// use fail2ban_analysis_tools::utils::format::format_number;
///
/// assert_eq!(format_number(1234), "1,234");
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Formats a percentage with the shortest representation that round-trips,
/// always keeping a decimal point.
///
/// ```
/// use fail2ban_analysis_tools::utils::format::format_percentage;
///
/// assert_eq!(format_percentage(50.0), "50.0");
/// assert_eq!(format_percentage(100.0 / 3.0), "33.333333333333336");
/// ```
pub fn format_percentage(value: f64) -> String {
    format!("{:?}", value)
}
