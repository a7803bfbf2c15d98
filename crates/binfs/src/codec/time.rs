//! Modification time codec.
//!
//! A timestamp is stored as a fixed-width 15-byte record rendered as
//! lowercase hex (30 characters):
//!
//! | bytes  | field                                                   |
//! |--------|---------------------------------------------------------|
//! | 0      | format version, always `1`                              |
//! | 1..9   | seconds since `0001-01-01T00:00:00Z`, big-endian `i64`  |
//! | 9..13  | nanoseconds within the second, big-endian `i32`         |
//! | 13..15 | UTC offset in minutes, big-endian `i16`, `-1` means UTC |

use super::{CodecError, Result};
use crate::Timestamp;
use chrono::{DateTime, FixedOffset};

const VERSION: u8 = 1;
const ENCODED_LEN: usize = 15;

/// Seconds between `0001-01-01T00:00:00Z` and the Unix epoch.
const UNIX_TO_INTERNAL: i64 = 62_135_596_800;

const UTC_OFFSET: i16 = -1;

/// Encodes a timestamp as 30 lowercase hex characters.
///
/// # Errors
///
/// Returns [`CodecError::FractionalOffset`] if the UTC offset is not a whole
/// number of minutes, [`CodecError::InvalidOffset`] for an offset of exactly
/// one minute west of UTC, which collides with the UTC marker, or
/// [`CodecError::TimestampOutOfRange`] if the timestamp does not fit the
/// record.
///
/// # Examples
///
/// ```
/// use binfs::codec::time;
/// use chrono::DateTime;
///
/// let t = DateTime::parse_from_rfc3339("2024-02-29T12:30:00.5+02:00").unwrap();
/// let encoded = time::encode(&t)?;
/// assert_eq!(encoded.len(), 30);
/// assert_eq!(time::decode(&encoded)?, t);
/// # Ok::<(), binfs::CodecError>(())
/// ```
pub fn encode(timestamp: &Timestamp) -> Result<String> {
    let offset_seconds = timestamp.offset().local_minus_utc();
    if offset_seconds % 60 != 0 {
        return Err(CodecError::FractionalOffset {
            seconds: offset_seconds,
        });
    }
    let offset_minutes = if offset_seconds == 0 {
        UTC_OFFSET
    } else {
        let minutes =
            i16::try_from(offset_seconds / 60).map_err(|_| CodecError::TimestampOutOfRange)?;
        // -1 is reserved for UTC
        if minutes == UTC_OFFSET {
            return Err(CodecError::InvalidOffset { minutes });
        }
        minutes
    };

    let seconds = timestamp
        .timestamp()
        .checked_add(UNIX_TO_INTERNAL)
        .ok_or(CodecError::TimestampOutOfRange)?;
    let nanos = i32::try_from(timestamp.timestamp_subsec_nanos())
        .map_err(|_| CodecError::TimestampOutOfRange)?;

    let mut buf = [0u8; ENCODED_LEN];
    buf[0] = VERSION;
    buf[1..9].copy_from_slice(&seconds.to_be_bytes());
    buf[9..13].copy_from_slice(&nanos.to_be_bytes());
    buf[13..15].copy_from_slice(&offset_minutes.to_be_bytes());
    Ok(hex::encode(buf))
}

/// Reverses [`encode`].
///
/// # Errors
///
/// Returns a [`CodecError`] if the input is not hex, has the wrong length or
/// version, or describes a timestamp or offset that cannot be represented.
pub fn decode(encoded: &str) -> Result<Timestamp> {
    let bytes = hex::decode(encoded)?;
    let buf: [u8; ENCODED_LEN] =
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::InvalidTimestampLength {
                expected: ENCODED_LEN,
                actual: bytes.len(),
            })?;

    if buf[0] != VERSION {
        return Err(CodecError::UnsupportedTimestampVersion(buf[0]));
    }

    let seconds = i64::from_be_bytes([
        buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7], buf[8],
    ]);
    let nanos = i32::from_be_bytes([buf[9], buf[10], buf[11], buf[12]]);
    let offset_minutes = i16::from_be_bytes([buf[13], buf[14]]);

    let unix_seconds = seconds
        .checked_sub(UNIX_TO_INTERNAL)
        .ok_or(CodecError::TimestampOutOfRange)?;
    let nanos = u32::try_from(nanos).map_err(|_| CodecError::TimestampOutOfRange)?;
    let utc = DateTime::from_timestamp(unix_seconds, nanos).ok_or(CodecError::TimestampOutOfRange)?;

    let offset_seconds = if offset_minutes == UTC_OFFSET {
        0
    } else {
        i32::from(offset_minutes) * 60
    };
    let offset = FixedOffset::east_opt(offset_seconds).ok_or(CodecError::InvalidOffset {
        minutes: offset_minutes,
    })?;

    Ok(utc.with_timezone(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn parse(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_round_trip_utc() {
        let t = parse("2017-03-04T05:06:07Z");
        let decoded = decode(&encode(&t).unwrap()).unwrap();
        assert_eq!(decoded, t);
        assert_eq!(decoded.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_round_trip_preserves_nanoseconds() {
        let t = parse("2023-11-05T23:59:59.123456789Z");
        let decoded = decode(&encode(&t).unwrap()).unwrap();
        assert_eq!(decoded.timestamp_subsec_nanos(), 123_456_789);
        assert_eq!(decoded, t);
    }

    #[test]
    fn test_round_trip_preserves_offset() {
        let t = parse("2020-06-01T08:00:00-07:30");
        let decoded = decode(&encode(&t).unwrap()).unwrap();
        assert_eq!(decoded.offset().local_minus_utc(), -(7 * 3600 + 30 * 60));
        assert_eq!(decoded.to_rfc3339(), t.to_rfc3339());
    }

    #[test]
    fn test_round_trip_before_unix_epoch() {
        let t = Utc
            .with_ymd_and_hms(1901, 12, 13, 20, 45, 52)
            .unwrap()
            .fixed_offset();
        assert_eq!(decode(&encode(&t).unwrap()).unwrap(), t);
    }

    #[test]
    fn test_unix_epoch_layout() {
        let t = DateTime::from_timestamp(0, 0).unwrap().fixed_offset();
        // version 1, 62135596800 seconds, 0 nanoseconds, UTC marker
        assert_eq!(encode(&t).unwrap(), "010000000e7791f70000000000ffff");
    }

    #[test]
    fn test_encode_rejects_fractional_offset() {
        let offset = FixedOffset::east_opt(30).unwrap();
        let t = Utc::now().with_timezone(&offset);
        assert!(matches!(
            encode(&t),
            Err(CodecError::FractionalOffset { seconds: 30 })
        ));
    }

    #[test]
    fn test_encode_rejects_offset_colliding_with_utc_marker() {
        let t = parse("2020-01-01T00:00:00-00:01");
        assert!(matches!(
            encode(&t),
            Err(CodecError::InvalidOffset { minutes: -1 })
        ));

        let east = parse("2020-01-01T00:00:00+00:01");
        assert_eq!(decode(&encode(&east).unwrap()).unwrap().offset().local_minus_utc(), 60);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert!(matches!(
            decode("0100"),
            Err(CodecError::InvalidTimestampLength {
                expected: 15,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        assert!(matches!(
            decode("020000000e7791f70000000000ffff"),
            Err(CodecError::UnsupportedTimestampVersion(2))
        ));
    }

    #[test]
    fn test_decode_rejects_negative_nanoseconds() {
        assert!(matches!(
            decode("010000000e7791f700ffffffffffff"),
            Err(CodecError::TimestampOutOfRange)
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_offset() {
        // 1440 minutes is a full day, beyond any valid offset
        assert!(matches!(
            decode("010000000e7791f7000000000005a0"),
            Err(CodecError::InvalidOffset { minutes: 1440 })
        ));
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(matches!(decode("not hex"), Err(CodecError::InvalidHex(_))));
    }
}
