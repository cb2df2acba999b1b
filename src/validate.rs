//! Input checks applied before anything is written to the DB.

/// A customer name must be non-empty and consist of ASCII letters only.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// A raw booking date must be exactly six ASCII digits (`YYMMDD`).
///
/// Longer strings that merely end in six digits are rejected.
pub fn validate_date(date: &str) -> bool {
    date.len() == 6 && date.bytes().all(|b| b.is_ascii_digit())
}

/// Trim the input, upper-case the first character and lower-case the rest.
///
/// Applied to customer names and services before they are handed to the booking system.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
