//! Decoding of the archive's `station,valid,tmpX` CSV payload.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::{error::ParseError, model::ObservationRecord};

/// `station,timestamp,temperature`
const COLUMNS: usize = 3;
const MISSING_TOKEN: &str = "null";

/// Timestamp layout used by the archive. Unpadded month/day are accepted when parsing.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a raw archive response into records, in source order.
///
/// The first line is the header and is discarded. Missing temperatures are kept
/// as `None`; records whose timestamp is missing are skipped. Any row with the
/// wrong number of columns, or a value that cannot be read, fails the whole parse.
pub fn parse_records(payload: &[u8]) -> Result<Vec<ObservationRecord>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(payload);

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let row = StringRecord::from_byte_record(row).map_err(|_| ParseError::InvalidUtf8 { line })?;

        if is_blank(&row) {
            continue;
        }
        if row.len() != COLUMNS {
            return Err(ParseError::ColumnCount {
                line,
                expected: COLUMNS,
                found: row.len(),
            });
        }

        let raw_timestamp = &row[1];
        if is_missing(raw_timestamp) {
            debug!(line, "skipping record with missing timestamp");
            continue;
        }

        let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT)
            .map_err(|_| ParseError::InvalidTimestamp {
                line,
                value: raw_timestamp.to_string(),
            })?;
        let temperature = parse_temperature(&row[2]).ok_or_else(|| ParseError::InvalidTemperature {
            line,
            value: row[2].to_string(),
        })?;

        records.push(ObservationRecord::new(timestamp, temperature));
    }

    debug!(count = records.len(), "parsed observation records");
    Ok(records)
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(str::is_empty)
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(MISSING_TOKEN)
}

/// `Some(None)` for a missing reading, `None` when the value is not a number.
fn parse_temperature(value: &str) -> Option<Option<f64>> {
    if is_missing(value) {
        return Some(None);
    }
    value.parse::<f64>().ok().filter(|t| t.is_finite()).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "station,valid,tmpc\n\
                          XXX,2020-01-01 00:00,-5.20\n\
                          XXX,2020-06-15 12:00,null\n\
                          XXX,2021-01-01 00:00,10.00\n";

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test timestamp")
    }

    #[test]
    fn parses_sample_in_source_order() {
        let records = parse_records(SAMPLE.as_bytes()).expect("sample parses");

        assert_eq!(
            records,
            vec![
                ObservationRecord::new(at(2020, 1, 1, 0, 0), Some(-5.2)),
                ObservationRecord::new(at(2020, 6, 15, 12, 0), None),
                ObservationRecord::new(at(2021, 1, 1, 0, 0), Some(10.0)),
            ]
        );
    }

    #[test]
    fn header_only_yields_nothing() {
        let records = parse_records(b"station,valid,tmpf\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn blank_lines_do_not_produce_records() {
        let payload = "station,valid,tmpc\r\nXXX,2020-01-01 00:00,1.50\r\n\r\n\n";
        let records = parse_records(payload.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_temperature_field_is_missing() {
        let payload = "station,valid,tmpc\nXXX,2020-01-01 00:00,\n";
        let records = parse_records(payload.as_bytes()).unwrap();
        assert_eq!(records[0].temperature, None);
    }

    #[test]
    fn missing_timestamp_is_skipped() {
        let payload = "station,valid,tmpc\nXXX,null,3.00\nXXX,2020-01-01 00:00,4.00\n";
        let records = parse_records(payload.as_bytes()).unwrap();
        assert_eq!(records, vec![ObservationRecord::new(at(2020, 1, 1, 0, 0), Some(4.0))]);
    }

    #[test]
    fn unpadded_month_and_day_are_accepted() {
        let payload = "station,valid,tmpc\nXXX,2020-6-5 07:53,22.10\n";
        let records = parse_records(payload.as_bytes()).unwrap();
        assert_eq!(records[0].timestamp, at(2020, 6, 5, 7, 53));
    }

    #[test]
    fn wrong_column_count_is_an_error() {
        let payload = "station,valid,tmpc\nXXX,2020-01-01 00:00,1.00\nXXX,2020-01-01 01:00\n";
        let err = parse_records(payload.as_bytes()).unwrap_err();

        match err {
            ParseError::ColumnCount { line, expected, found } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_temperature_is_an_error() {
        let payload = "station,valid,tmpc\nXXX,2020-01-01 00:00,M\n";
        let err = parse_records(payload.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTemperature { line: 2, .. }));
    }

    #[test]
    fn invalid_utf8_reports_its_own_line() {
        let payload = b"station,valid,tmpc\nXXX,2020-01-01 00:00,1.00\nXXX,2020-01-01 01:00,\xff\xfe\n";
        let err = parse_records(payload).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8 { line: 3 }), "{err:?}");
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let payload = "station,valid,tmpc\nXXX,01/01/2020 00:00,1.00\n";
        let err = parse_records(payload.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }
}
