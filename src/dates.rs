//! Conversions between the raw, stored and displayed forms of a booking date.
//!
//! Raw input is `YYMMDD`, the DB keeps `YY/MM/DD` and bookings are shown as `Month Day, Year`.
//! Two-digit years are expanded with an explicit century pivot: years below the pivot land in
//! the 2000s, all others in the 1900s.

use chrono::NaiveDate;

/// 00-68 are 2000-2068, 69-99 are 1969-1999.
pub const DEFAULT_CENTURY_PIVOT: u8 = 69;

/// Insert separators into a raw date that already passed [`crate::validate::validate_date`].
pub fn to_stored_date(raw: &str) -> String {
    format!("{}/{}/{}", &raw[0..2], &raw[2..4], &raw[4..6])
}

pub fn expand_year(year_mod_100: u32, century_pivot: u8) -> i32 {
    let yy = year_mod_100 as i32;
    if yy < century_pivot as i32 {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Parse a stored `YY/MM/DD` date.
///
/// Returns None if the text is malformed or not a real calendar date.
pub fn parse_stored_date(stored: &str, century_pivot: u8) -> Option<NaiveDate> {
    let mut parts = stored.split('/');
    let (yy, mm, dd) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || [yy, mm, dd]
            .iter()
            .any(|p| p.len() != 2 || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    let year = expand_year(yy.parse().ok()?, century_pivot);
    NaiveDate::from_ymd_opt(year, mm.parse().ok()?, dd.parse().ok()?)
}

/// Render a stored date as e.g. `March 15, 2024`.
pub fn display_date(stored: &str, century_pivot: u8) -> Option<String> {
    parse_stored_date(stored, century_pivot).map(|d| d.format("%B %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_stored_date() {
        assert_eq!(to_stored_date("240315"), "24/03/15");
        assert_eq!(to_stored_date("991231"), "99/12/31");
    }

    #[test]
    fn test_expand_year_default_pivot() {
        assert_eq!(expand_year(0, DEFAULT_CENTURY_PIVOT), 2000);
        assert_eq!(expand_year(24, DEFAULT_CENTURY_PIVOT), 2024);
        assert_eq!(expand_year(68, DEFAULT_CENTURY_PIVOT), 2068);
        assert_eq!(expand_year(69, DEFAULT_CENTURY_PIVOT), 1969);
        assert_eq!(expand_year(99, DEFAULT_CENTURY_PIVOT), 1999);
    }

    #[test]
    fn test_expand_year_edge_pivots() {
        // pivot 0 puts everything into the 1900s, pivot 100 everything into the 2000s
        assert_eq!(expand_year(5, 0), 1905);
        assert_eq!(expand_year(99, 100), 2099);
        assert_eq!(expand_year(30, 30), 1930);
        assert_eq!(expand_year(29, 30), 2029);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(
            display_date("24/03/15", DEFAULT_CENTURY_PIVOT).as_deref(),
            Some("March 15, 2024")
        );
        assert_eq!(
            display_date("99/12/31", DEFAULT_CENTURY_PIVOT).as_deref(),
            Some("December 31, 1999")
        );
        assert_eq!(
            display_date("24/03/05", DEFAULT_CENTURY_PIVOT).as_deref(),
            Some("March 5, 2024")
        );
    }

    #[test]
    fn test_display_date_round_trip_from_raw() {
        let stored = to_stored_date("240315");
        assert_eq!(
            display_date(&stored, DEFAULT_CENTURY_PIVOT).as_deref(),
            Some("March 15, 2024")
        );
    }

    #[test]
    fn test_display_date_rejects_impossible_dates() {
        assert_eq!(display_date("24/13/01", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("23/02/29", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("24/00/10", DEFAULT_CENTURY_PIVOT), None);
        // leap day exists in 2024
        assert!(display_date("24/02/29", DEFAULT_CENTURY_PIVOT).is_some());
    }

    #[test]
    fn test_display_date_rejects_malformed_text() {
        assert_eq!(display_date("240315", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("24/03", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("24/03/15/01", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("2024/03/15", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("ab/cd/ef", DEFAULT_CENTURY_PIVOT), None);
        assert_eq!(display_date("+1/03/15", DEFAULT_CENTURY_PIVOT), None);
    }
}
