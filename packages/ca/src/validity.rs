//! X.509 validity time helpers
//!
//! Times are exchanged as X.509 GeneralizedTime strings (`YYYYMMDDHHMMSSZ`).
//! UTCTime strings (`YYMMDDHHMMSSZ`) are accepted on input, with the RFC 5280
//! century rule.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc};
use time::OffsetDateTime;

use crate::{CaError, Result};

const GENERALIZED_TIME_FORMAT: &str = "%Y%m%d%H%M%SZ";
const GENERALIZED_TIME_LEN: usize = 15;
const UTC_TIME_LEN: usize = 13;
/// GeneralizedTime has a four-digit year
const MAX_X509_YEAR: i32 = 9999;

/// Format an instant as an X.509 GeneralizedTime string
#[must_use]
pub fn to_x509_time_string(instant: DateTime<Utc>) -> String {
    instant.format(GENERALIZED_TIME_FORMAT).to_string()
}

/// Parse an X.509 GeneralizedTime or UTCTime string
///
/// # Errors
///
/// Returns [`CaError::InvalidTime`] when the string has neither shape or
/// names an impossible date.
pub fn parse_x509_time_string(value: &str) -> Result<DateTime<Utc>> {
    let generalized = match value.len() {
        GENERALIZED_TIME_LEN => value.to_string(),
        UTC_TIME_LEN => {
            // RFC 5280 4.1.2.5.1: YY >= 50 is 19YY, otherwise 20YY
            let year: u32 = value
                .get(..2)
                .and_then(|yy| yy.parse().ok())
                .ok_or_else(|| CaError::InvalidTime(format!("'{value}' has no year")))?;
            let century = if year >= 50 { "19" } else { "20" };
            format!("{century}{value}")
        }
        len => {
            return Err(CaError::InvalidTime(format!(
                "'{value}' has length {len}, expected {GENERALIZED_TIME_LEN} or {UTC_TIME_LEN}"
            )));
        }
    };

    let naive = NaiveDateTime::parse_from_str(&generalized, GENERALIZED_TIME_FORMAT)?;
    Ok(naive.and_utc())
}

/// Compute the notAfter string for a certificate valid `days` from `valid_from`
///
/// notAfter is inclusive (RFC 5280 4.1.2.5), so the result is one second
/// before `valid_from + days`.
///
/// # Errors
///
/// Returns an error if `valid_from` does not parse, `days` is zero, or the
/// result falls after year 9999.
pub fn compute_cert_valid_to_string(valid_from: &str, days: u32) -> Result<String> {
    if days == 0 {
        return Err(CaError::InvalidValidity(
            "validity period must be at least one day".to_string(),
        ));
    }

    let from = parse_x509_time_string(valid_from)?;
    let valid_to = from
        .checked_add_signed(TimeDelta::days(i64::from(days)))
        .and_then(|t| t.checked_sub_signed(TimeDelta::seconds(1)))
        .filter(|t| t.year() <= MAX_X509_YEAR)
        .ok_or_else(|| {
            CaError::InvalidValidity(format!("{days} days from {valid_from} is out of range"))
        })?;

    Ok(to_x509_time_string(valid_to))
}

/// Convert a parsed X.509 time into the representation `rcgen` expects
pub(crate) fn to_offset_date_time(instant: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(instant.timestamp())
        .map_err(|e| CaError::InvalidTime(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_utc_time_century_rule() {
        let early = parse_x509_time_string("491231235959Z").unwrap();
        let late = parse_x509_time_string("500101000000Z").unwrap();

        assert_eq!(early, Utc.with_ymd_and_hms(2049, 12, 31, 23, 59, 59).unwrap());
        assert_eq!(late, Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_date_time_conversion() {
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();

        let converted = to_offset_date_time(instant).unwrap();

        assert_eq!(converted.unix_timestamp(), instant.timestamp());
    }
}
