use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

const SHORT_YEAR_FORMAT: &str = "%d/%m/%y";
const LONG_YEAR_FORMAT: &str = "%d/%m/%Y";

/// Parse a `day/month/year` match date.
///
/// An empty string means the source row carried no date and yields `None`.
/// Only the two-digit (`dd/mm/yy`, 8 chars) and four-digit (`dd/mm/yyyy`,
/// 10 chars) year conventions are recognised.
pub fn parse_match_date(raw: &str) -> Result<Option<NaiveDate>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let format = match value.len() {
        8 => SHORT_YEAR_FORMAT,
        10 => LONG_YEAR_FORMAT,
        _ => {
            return Err(EtlError::data_format(format!(
                "date format unknown: '{}'",
                value
            )))
        }
    };

    NaiveDate::parse_from_str(value, format)
        .map(Some)
        .map_err(|e| EtlError::data_format(format!("invalid date '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_digit_year() {
        let date = parse_match_date("17/08/18").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2018, 8, 17));
    }

    #[test]
    fn test_parse_four_digit_year() {
        let date = parse_match_date("19/05/2019").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 5, 19));
    }

    #[test]
    fn test_empty_is_missing() {
        assert_eq!(parse_match_date("").unwrap(), None);
        assert_eq!(parse_match_date("   ").unwrap(), None);
    }

    #[test]
    fn test_unknown_length_is_format_error() {
        let err = parse_match_date("1/8/18").unwrap_err();
        assert!(matches!(err, EtlError::DataFormatError { .. }));
        assert!(parse_match_date("2018-08-17T00").is_err());
    }

    #[test]
    fn test_right_length_but_unparseable() {
        assert!(parse_match_date("32/13/18").is_err());
        assert!(parse_match_date("2018-08-17").is_err());
    }
}
