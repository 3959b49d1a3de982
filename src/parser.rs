//! CSV parser for per-resource tower readings.
//!
//! Each resource is a CSV file whose first row is a header (skipped, never
//! validated) followed by `farm_id,tower_id,rssi` rows.

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::stats::{ResourceLocator, TowerMap};

const FIELDS_PER_ROW: usize = 3;

/// What to do with a data row that does not have exactly three fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    /// Fail the whole resource on the first malformed row. Rows already
    /// accumulated for that resource are dropped with it.
    #[default]
    DiscardResource,
    /// Ignore the row and keep parsing.
    SkipRow,
}

/// What to do with a signal reading that is not a valid float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidReadingPolicy {
    /// Count the sample with a reading of `0.0`.
    #[default]
    TreatAsZero,
    /// Fail the resource with [`ParseError::InvalidReading`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub malformed_rows: MalformedRowPolicy,
    pub invalid_readings: InvalidReadingPolicy,
}

/// Fetches one resource and accumulates the readings of `farm_id`.
///
/// # Errors
///
/// Returns [`ParseError::Fetch`] if the resource cannot be retrieved, or any
/// error from [`parse_records`]. No partial mapping is returned on error.
#[tracing::instrument(skip(client, locator, options), fields(locator = %locator))]
pub async fn parse_resource<C: HttpClient>(
    client: &C,
    locator: &ResourceLocator,
    farm_id: &str,
    options: &ParseOptions,
) -> Result<TowerMap, ParseError> {
    let body = fetch_bytes(client, locator.as_str()).await?;
    parse_records(&body, farm_id, options)
}

/// Parses a CSV body and accumulates per-tower stats for rows of `farm_id`.
///
/// Farm ids are compared byte for byte, and only rows of `farm_id` have
/// their other fields decoded. The result may be empty if no row matches.
///
/// # Errors
///
/// - [`ParseError::MalformedRow`] for a row without three fields, under
///   [`MalformedRowPolicy::DiscardResource`].
/// - [`ParseError::InvalidReading`] for an unparseable reading of a matching
///   row, under [`InvalidReadingPolicy::Reject`].
/// - [`ParseError::InvalidText`] if a matching row's tower id is not UTF-8.
/// - [`ParseError::Csv`] if the reader fails.
pub fn parse_records(
    body: &[u8],
    farm_id: &str,
    options: &ParseOptions,
) -> Result<TowerMap, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut towers = TowerMap::new();
    let mut matched = 0usize;

    for (index, result) in reader.byte_records().enumerate() {
        if index == 0 {
            continue;
        }

        let record = result?;
        let line = record
            .position()
            .map_or(index as u64 + 1, |position| position.line());

        if record.len() != FIELDS_PER_ROW {
            match options.malformed_rows {
                MalformedRowPolicy::DiscardResource => {
                    return Err(ParseError::MalformedRow {
                        line,
                        fields: record.len(),
                    });
                }
                MalformedRowPolicy::SkipRow => {
                    warn!(line, fields = record.len(), "Skipping malformed row");
                    continue;
                }
            }
        }

        // Rows of other farms are never decoded.
        if &record[0] != farm_id.as_bytes() {
            continue;
        }

        let tower_id = std::str::from_utf8(&record[1])
            .map_err(|_| ParseError::InvalidText { line, field: 2 })?;
        let reading = parse_reading(&record[2], line, options.invalid_readings)?;
        towers
            .entry(tower_id.to_string())
            .or_default()
            .add_reading(reading);
        matched += 1;
    }

    debug!(matched, towers = towers.len(), "Resource parsed");
    Ok(towers)
}

fn parse_reading(raw: &[u8], line: u64, policy: InvalidReadingPolicy) -> Result<f64, ParseError> {
    let parsed = std::str::from_utf8(raw)
        .ok()
        .and_then(|text| text.parse::<f64>().ok());

    match (parsed, policy) {
        (Some(value), _) => Ok(value),
        (None, InvalidReadingPolicy::TreatAsZero) => {
            debug!(line, value = %String::from_utf8_lossy(raw), "Unparseable reading counted as 0.0");
            Ok(0.0)
        }
        (None, InvalidReadingPolicy::Reject) => Err(ParseError::InvalidReading {
            line,
            value: String::from_utf8_lossy(raw).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TowerStats;

    fn parse(body: &str, farm_id: &str) -> Result<TowerMap, ParseError> {
        parse_records(body.as_bytes(), farm_id, &ParseOptions::default())
    }

    #[test]
    fn test_parse_filters_by_farm() {
        let body = "farm,tower,rssi\nF1,T1,10.0\nF1,T1,20.0\nF2,T2,5.0\n";
        let towers = parse(body, "F1").unwrap();

        assert_eq!(towers.len(), 1);
        assert_eq!(
            towers["T1"],
            TowerStats {
                sum_signal: 30.0,
                sample_count: 2
            }
        );
        assert_eq!(towers["T1"].average(), Some(15.0));
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let towers = parse("farm,tower,rssi\n", "F1").unwrap();
        assert!(towers.is_empty());
    }

    #[test]
    fn test_parse_empty_body_is_empty() {
        let towers = parse("", "F1").unwrap();
        assert!(towers.is_empty());
    }

    #[test]
    fn test_header_is_never_validated() {
        // The first row is dropped even if it looks like data or is malformed.
        let body = "F1,T9\nF1,T1,-60\n";
        let towers = parse(body, "F1").unwrap();

        assert_eq!(towers.len(), 1);
        assert!(towers.contains_key("T1"));
    }

    #[test]
    fn test_short_row_fails_resource() {
        let body = "farm,tower,rssi\nF1,T1,10.0\nF1,T1\nF1,T2,30.0\n";
        let err = parse(body, "F1").unwrap_err();

        match err {
            ParseError::MalformedRow { line, fields } => {
                assert_eq!(line, 3);
                assert_eq!(fields, 2);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_long_row_fails_resource_even_for_other_farm() {
        let body = "farm,tower,rssi\nF2,T1,10.0,extra\n";
        assert!(matches!(
            parse(body, "F1"),
            Err(ParseError::MalformedRow { fields: 4, .. })
        ));
    }

    #[test]
    fn test_skip_row_policy_keeps_other_rows() {
        let body = "farm,tower,rssi\nF1,T1,10.0\nF1,T1\nF1,T1,30.0\n";
        let options = ParseOptions {
            malformed_rows: MalformedRowPolicy::SkipRow,
            ..Default::default()
        };
        let towers = parse_records(body.as_bytes(), "F1", &options).unwrap();

        assert_eq!(towers["T1"].sample_count, 2);
        assert_eq!(towers["T1"].average(), Some(20.0));
    }

    #[test]
    fn test_invalid_reading_counts_as_zero() {
        let body = "farm,tower,rssi\nF1,T1,abc\nF1,T1,10.0\n";
        let towers = parse(body, "F1").unwrap();

        assert_eq!(towers["T1"].sample_count, 2);
        assert_eq!(towers["T1"].average(), Some(5.0));
    }

    #[test]
    fn test_invalid_reading_rejected_under_strict_policy() {
        let body = "farm,tower,rssi\nF1,T1,10.0\nF1,T1,abc\n";
        let options = ParseOptions {
            invalid_readings: InvalidReadingPolicy::Reject,
            ..Default::default()
        };
        let err = parse_records(body.as_bytes(), "F1", &options).unwrap_err();

        match err {
            ParseError::InvalidReading { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidReading, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_reading_of_other_farm_is_ignored() {
        let body = "farm,tower,rssi\nF2,T1,abc\nF1,T1,-70\n";
        let options = ParseOptions {
            invalid_readings: InvalidReadingPolicy::Reject,
            ..Default::default()
        };
        let towers = parse_records(body.as_bytes(), "F1", &options).unwrap();

        assert_eq!(towers["T1"].average(), Some(-70.0));
    }

    #[test]
    fn test_farm_id_match_is_exact() {
        let body = "farm,tower,rssi\n F1,T1,10.0\nf1,T2,10.0\n";
        assert!(parse(body, "F1").unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_are_not_malformed() {
        let body = "farm,tower,rssi\n\nF1,T1,10.0\n\n";
        let towers = parse(body, "F1").unwrap();

        assert_eq!(towers["T1"].sample_count, 1);
    }

    #[test]
    fn test_non_utf8_row_of_other_farm_is_skipped() {
        let body = b"farm,tower,rssi\nF1,T1,10.0\nF2,Mu\xf1oz,5.0\nF1,T1,20.0\n";
        let towers = parse_records(body, "F1", &ParseOptions::default()).unwrap();

        assert_eq!(towers.len(), 1);
        assert_eq!(
            towers["T1"],
            TowerStats {
                sum_signal: 30.0,
                sample_count: 2
            }
        );
    }

    #[test]
    fn test_non_utf8_tower_id_of_matching_row_fails_resource() {
        let body = b"farm,tower,rssi\nF1,T1,10.0\nF1,\xff\xfe,10.0\n";
        let result = parse_records(body, "F1", &ParseOptions::default());

        assert!(matches!(
            result,
            Err(ParseError::InvalidText { line: 3, field: 2 })
        ));
    }

    #[test]
    fn test_non_utf8_reading_follows_reading_policy() {
        let body = b"farm,tower,rssi\nF1,T1,\xff\nF1,T1,10.0\n";
        let towers = parse_records(body, "F1", &ParseOptions::default()).unwrap();
        assert_eq!(towers["T1"].average(), Some(5.0));

        let options = ParseOptions {
            invalid_readings: InvalidReadingPolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            parse_records(body, "F1", &options),
            Err(ParseError::InvalidReading { line: 2, .. })
        ));
    }
}
