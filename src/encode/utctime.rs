//! The content of UTCTime values.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use time::{OffsetDateTime, UtcOffset};
use crate::error::EncodeError;


//------------ Constants -----------------------------------------------------

/// The default last year representable as a UTCTime value.
///
/// With this default, two-digit years map to the years 1950 to 2049 as
/// prescribed for certificates by RFC 5280.
pub const DEFAULT_UTC_MAX_YEAR: i32 = 2049;

/// The number of content octets of a UTCTime value.
pub const UTC_TIME_LEN: usize = 13;


//------------ UtcTimeContent ------------------------------------------------

/// The content octets of a UTCTime value.
///
/// The content always has the form `YYMMDDHHMMSSZ`, i.e., the time is
/// converted to UTC, seconds are always present, fractions of seconds are
/// dropped, and the value ends in `Z`.
///
/// The two-digit year is ambiguous. When creating the content, the caller
/// provides the last year of the 100 year window the value has to fall
/// into. The year of the time after conversion to UTC is what is checked
/// against that window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UtcTimeContent([u8; UTC_TIME_LEN]);

impl UtcTimeContent {
    /// Creates the content for `value` using the given window.
    ///
    /// Returns an error of kind [`OutOfRange`] if the year of `value` in UTC
    /// lies outside of `max_year - 99` to `max_year`.
    ///
    /// [`OutOfRange`]: ../enum.ErrorKind.html#variant.OutOfRange
    pub fn new(
        value: OffsetDateTime, max_year: i32
    ) -> Result<Self, EncodeError> {
        let utc = value.checked_to_offset(UtcOffset::UTC).ok_or_else(|| {
            EncodeError::out_of_range(
                "value", "time not representable in UTC"
            )
        })?;
        let year = utc.year();
        let min_year = max_year.saturating_sub(99);
        if year < min_year || year > max_year {
            return Err(EncodeError::out_of_range(
                "value", "year outside of the UTCTime window"
            ))
        }

        let mut res = [0u8; UTC_TIME_LEN];
        put_two_digits(&mut res[0..2], year.rem_euclid(100) as u8);
        put_two_digits(&mut res[2..4], u8::from(utc.month()));
        put_two_digits(&mut res[4..6], utc.day());
        put_two_digits(&mut res[6..8], utc.hour());
        put_two_digits(&mut res[8..10], utc.minute());
        put_two_digits(&mut res[10..12], utc.second());
        res[12] = b'Z';
        Ok(UtcTimeContent(res))
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl AsRef<[u8]> for UtcTimeContent {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

fn put_two_digits(target: &mut [u8], value: u8) {
    debug_assert!(value < 100);
    target[0] = b'0' + value / 10;
    target[1] = b'0' + value % 10;
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use crate::error::ErrorKind;
    use super::*;

    fn content(value: OffsetDateTime, max_year: i32) -> Vec<u8> {
        UtcTimeContent::new(value, max_year).unwrap().as_slice().into()
    }

    fn kind(value: OffsetDateTime, max_year: i32) -> ErrorKind {
        UtcTimeContent::new(value, max_year).unwrap_err().kind()
    }

    #[test]
    fn normalizes_to_utc() {
        assert_eq!(
            content(datetime!(2017-10-16 08:24:03 -07:00), 2049),
            b"171016152403Z"
        );
        assert_eq!(
            content(datetime!(2017-10-16 15:24:03 +00:00), 2049),
            b"171016152403Z"
        );
        assert_eq!(
            content(datetime!(2000-01-01 05:30:00 +05:30), 2049),
            b"000101000000Z"
        );
    }

    #[test]
    fn drops_fractional_seconds() {
        assert_eq!(
            content(datetime!(2020-02-29 23:59:59.999 UTC), 2049),
            b"200229235959Z"
        );
    }

    #[test]
    fn century_is_not_stored() {
        assert_eq!(
            content(datetime!(3000-01-01 00:00:00 UTC), 3000),
            b"000101000000Z"
        );
        assert_eq!(
            content(datetime!(1817-06-01 12:00:00 UTC), 1900),
            b"170601120000Z"
        );
        assert_eq!(
            content(datetime!(2017-06-01 12:00:00 UTC), 2049),
            b"170601120000Z"
        );
    }

    #[test]
    fn year_window() {
        let p = 2049;
        assert!(UtcTimeContent::new(datetime!(2049-12-31 23:59:59 UTC), p)
            .is_ok());
        assert!(UtcTimeContent::new(datetime!(1950-01-01 00:00:00 UTC), p)
            .is_ok());
        assert_eq!(
            kind(datetime!(2050-01-01 00:00:00 UTC), p), ErrorKind::OutOfRange
        );
        assert_eq!(
            kind(datetime!(1949-12-31 23:59:59 UTC), p), ErrorKind::OutOfRange
        );
        assert_eq!(
            UtcTimeContent::new(datetime!(1949-12-31 23:59:59 UTC), p)
                .unwrap_err().param(),
            Some("value")
        );
    }

    #[test]
    fn window_uses_utc_year() {
        // Local year 1950, UTC year 1949.
        assert_eq!(
            kind(datetime!(1950-01-01 00:30:00 +01:00), 2049),
            ErrorKind::OutOfRange
        );
        // Local year 1949, UTC year 1950.
        assert_eq!(
            content(datetime!(1949-12-31 23:30:00 -01:00), 2049),
            b"500101003000Z"
        );
        // Local year 2050, UTC year 2049.
        assert_eq!(
            content(datetime!(2050-01-01 00:30:00 +01:00), 2049),
            b"491231233000Z"
        );
        // Local year 2049, UTC year 2050.
        assert_eq!(
            kind(datetime!(2049-12-31 23:30:00 -01:00), 2049),
            ErrorKind::OutOfRange
        );
    }
}
