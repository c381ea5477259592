use chrono::{Local, NaiveDateTime};

/// Capture filenames look like `thermal_data_20240101_080000.h5`; the date and
/// time live in the third and fourth underscore-separated segments.
const DATE_SEGMENT: usize = 2;
const DATE_DIGITS: usize = 8;
const TIME_DIGITS: usize = 6;
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Chronological sort key for a capture file.
///
/// Falls back to the current local time when the name does not carry a
/// parseable `YYYYMMDD_HHMMSS` pair. The fallback is indistinguishable from a
/// real capture time to callers.
pub fn extract_timestamp(filename: &str) -> NaiveDateTime {
    parse_timestamp(filename).unwrap_or_else(|| Local::now().naive_local())
}

/// Strict parse of the embedded capture time, `None` on any mismatch.
pub fn parse_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let mut segments = filename.split('_');
    let date = segments.nth(DATE_SEGMENT)?;
    let time = segments.next()?;
    // Only the last segment we read may carry the extension.
    let time = time.split('.').next().unwrap_or(time);

    if !all_digits(date, DATE_DIGITS) || !all_digits(time, TIME_DIGITS) {
        return None;
    }

    NaiveDateTime::parse_from_str(&format!("{date}_{time}"), TIMESTAMP_FORMAT).ok()
}

fn all_digits(segment: &str, expected_len: usize) -> bool {
    segment.len() == expected_len && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .unwrap()
    }

    #[test]
    fn test_parses_standard_capture_name() {
        assert_eq!(
            parse_timestamp("thermal_data_20240101_080000.h5"),
            Some(at(2024, 1, 1, 8, 0, 0))
        );
        assert_eq!(
            extract_timestamp("thermal_data_20240101_090000.h5"),
            at(2024, 1, 1, 9, 0, 0)
        );
    }

    #[test]
    fn test_extension_is_optional() {
        assert_eq!(
            parse_timestamp("cam_north_20231231_235959"),
            Some(at(2023, 12, 31, 23, 59, 59))
        );
    }

    #[test]
    fn test_trailing_segments_are_ignored() {
        assert_eq!(
            parse_timestamp("cam_a_20240315_101500_extra.json"),
            Some(at(2024, 3, 15, 10, 15, 0))
        );
    }

    #[test]
    fn test_midnight_is_a_real_timestamp() {
        let ts = parse_timestamp("thermal_data_20240101_000000.h5").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts, at(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_rejects_malformed_segments() {
        assert_eq!(parse_timestamp("thermal.h5"), None);
        assert_eq!(parse_timestamp("thermal_data_20240101.h5"), None);
        assert_eq!(parse_timestamp("thermal_data_2024011_080000.h5"), None);
        assert_eq!(parse_timestamp("thermal_data_20240101_0800.h5"), None);
        assert_eq!(parse_timestamp("thermal_data_2024O101_080000.h5"), None);
        assert_eq!(parse_timestamp("thermal_data_20241301_080000.h5"), None);
        assert_eq!(parse_timestamp("thermal_data_20240101_256000.h5"), None);
    }

    #[test]
    fn test_unparseable_name_falls_back_to_now() {
        let before = Local::now().naive_local();
        let ts = extract_timestamp("not-a-capture.h5");
        let after = Local::now().naive_local();

        assert!(ts >= before && ts <= after);
    }
}
