use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use std::{convert::TryFrom, fmt};

use crate::error::RequestError;

/// First year with observations in the ASOS archive.
pub const EARLIEST_ARCHIVE_YEAR: i32 = 1928;

/// One hourly reading. `temperature` is `None` when the archive reported no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationRecord {
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
}

impl ObservationRecord {
    pub fn new(timestamp: NaiveDateTime, temperature: Option<f64>) -> Self {
        Self { timestamp, temperature }
    }

    pub fn is_missing(&self) -> bool {
        self.temperature.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Celsius => "c",
            Unit::Fahrenheit => "f",
        }
    }

    /// Name of the archive column holding temperatures in this unit.
    pub fn column(&self) -> &'static str {
        match self {
            Unit::Celsius => "tmpc",
            Unit::Fahrenheit => "tmpf",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [Unit] {
        &[Unit::Celsius, Unit::Fahrenheit]
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Celsius => f.write_str("c (degrees Celsius)"),
            Unit::Fahrenheit => f.write_str("f (degrees Fahrenheit)"),
        }
    }
}

impl TryFrom<&str> for Unit {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "c" => Ok(Unit::Celsius),
            "f" => Ok(Unit::Fahrenheit),
            _ => Err(RequestError::UnknownUnit(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationMode {
    Max,
    Min,
}

impl AggregationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMode::Max => "max",
            AggregationMode::Min => "min",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AggregationMode::Max => "maximum",
            AggregationMode::Min => "minimum",
        }
    }

    pub const fn all() -> &'static [AggregationMode] {
        &[AggregationMode::Max, AggregationMode::Min]
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AggregationMode {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "max" => Ok(AggregationMode::Max),
            "min" => Ok(AggregationMode::Min),
            _ => Err(RequestError::UnknownMode(value.to_string())),
        }
    }
}

/// The timeframe keyword, before its year/month/day fields are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeKind {
    All,
    Year,
    SingleMonth,
    EveryMonth,
    SingleDay,
    EveryDay,
}

impl TimeframeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeframeKind::All => "all",
            TimeframeKind::Year => "year",
            TimeframeKind::SingleMonth => "single-month",
            TimeframeKind::EveryMonth => "every-month",
            TimeframeKind::SingleDay => "single-day",
            TimeframeKind::EveryDay => "every-day",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TimeframeKind::All => "All time",
            TimeframeKind::Year => "Entire year",
            TimeframeKind::SingleMonth => "One month from one year",
            TimeframeKind::EveryMonth => "One month from every year",
            TimeframeKind::SingleDay => "One day from one year",
            TimeframeKind::EveryDay => "One day from every year",
        }
    }

    pub fn needs_year(&self) -> bool {
        matches!(
            self,
            TimeframeKind::Year | TimeframeKind::SingleMonth | TimeframeKind::SingleDay
        )
    }

    pub fn needs_month(&self) -> bool {
        matches!(
            self,
            TimeframeKind::SingleMonth
                | TimeframeKind::EveryMonth
                | TimeframeKind::SingleDay
                | TimeframeKind::EveryDay
        )
    }

    pub fn needs_day(&self) -> bool {
        matches!(self, TimeframeKind::SingleDay | TimeframeKind::EveryDay)
    }

    pub const fn all() -> &'static [TimeframeKind] {
        &[
            TimeframeKind::All,
            TimeframeKind::Year,
            TimeframeKind::SingleMonth,
            TimeframeKind::EveryMonth,
            TimeframeKind::SingleDay,
            TimeframeKind::EveryDay,
        ]
    }
}

impl fmt::Display for TimeframeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.as_str(), self.description())
    }
}

impl TryFrom<&str> for TimeframeKind {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        TimeframeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| RequestError::UnknownTimeframe(value.to_string()))
    }
}

/// The date range a query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeframeSpec {
    All,
    Year(i32),
    SingleMonth(i32, u32),
    EveryMonth(u32),
    SingleDay(i32, u32, u32),
    EveryDay(u32, u32),
}

impl TimeframeSpec {
    /// Build a timeframe from a keyword and whichever fields were supplied.
    /// Fields the keyword does not use are ignored.
    pub fn from_parts(
        kind: TimeframeKind,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Result<Self, RequestError> {
        let need = |value: Option<u32>, field: &'static str| {
            value.ok_or(RequestError::MissingField {
                timeframe: kind.as_str(),
                field,
            })
        };
        let need_year = || {
            year.ok_or(RequestError::MissingField {
                timeframe: kind.as_str(),
                field: "year",
            })
        };

        let spec = match kind {
            TimeframeKind::All => TimeframeSpec::All,
            TimeframeKind::Year => TimeframeSpec::Year(need_year()?),
            TimeframeKind::SingleMonth => {
                TimeframeSpec::SingleMonth(need_year()?, check_month(need(month, "month")?)?)
            }
            TimeframeKind::EveryMonth => TimeframeSpec::EveryMonth(check_month(need(month, "month")?)?),
            TimeframeKind::SingleDay => {
                let (y, m, d) = (need_year()?, need(month, "month")?, need(day, "day")?);
                let m = check_month(m)?;
                if NaiveDate::from_ymd_opt(y, m, d).is_none() {
                    return Err(RequestError::NoSuchDay { month: m, day: d });
                }
                TimeframeSpec::SingleDay(y, m, d)
            }
            TimeframeKind::EveryDay => {
                let (m, d) = (need(month, "month")?, need(day, "day")?);
                let m = check_month(m)?;
                // 2000 is a leap year, so Feb 29 is accepted.
                if NaiveDate::from_ymd_opt(2000, m, d).is_none() {
                    return Err(RequestError::NoSuchDay { month: m, day: d });
                }
                TimeframeSpec::EveryDay(m, d)
            }
        };

        Ok(spec)
    }

    pub fn kind(&self) -> TimeframeKind {
        match self {
            TimeframeSpec::All => TimeframeKind::All,
            TimeframeSpec::Year(_) => TimeframeKind::Year,
            TimeframeSpec::SingleMonth(..) => TimeframeKind::SingleMonth,
            TimeframeSpec::EveryMonth(_) => TimeframeKind::EveryMonth,
            TimeframeSpec::SingleDay(..) => TimeframeKind::SingleDay,
            TimeframeSpec::EveryDay(..) => TimeframeKind::EveryDay,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match *self {
            TimeframeSpec::Year(y) | TimeframeSpec::SingleMonth(y, _) | TimeframeSpec::SingleDay(y, _, _) => {
                Some(y)
            }
            _ => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match *self {
            TimeframeSpec::SingleMonth(_, m)
            | TimeframeSpec::EveryMonth(m)
            | TimeframeSpec::SingleDay(_, m, _)
            | TimeframeSpec::EveryDay(m, _) => Some(m),
            _ => None,
        }
    }

    pub fn day(&self) -> Option<u32> {
        match *self {
            TimeframeSpec::SingleDay(_, _, d) | TimeframeSpec::EveryDay(_, d) => Some(d),
            _ => None,
        }
    }

    /// The calendar date for `SingleDay`, validated by `from_parts`.
    pub fn single_date(&self) -> Option<NaiveDate> {
        match *self {
            TimeframeSpec::SingleDay(y, m, d) => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        }
    }
}

fn check_month(month: u32) -> Result<u32, RequestError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(RequestError::InvalidMonth(month.to_string()))
    }
}

/// Parse a four-digit year.
pub fn parse_year(value: &str) -> Result<i32, RequestError> {
    let trimmed = value.trim();
    if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RequestError::InvalidYear(value.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| RequestError::InvalidYear(value.to_string()))
}

/// Parse a month, accepting both `6` and `06`.
pub fn parse_month(value: &str) -> Result<u32, RequestError> {
    parse_small(value)
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| RequestError::InvalidMonth(value.to_string()))
}

/// Parse a day of month, accepting both `5` and `05`.
pub fn parse_day(value: &str) -> Result<u32, RequestError> {
    parse_small(value)
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| RequestError::InvalidDay(value.to_string()))
}

fn parse_small(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Everything needed to answer one max/min question.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub station: String,
    /// IANA zone name, passed through to the archive untouched.
    pub time_zone: String,
    pub earliest_year: i32,
    pub mode: AggregationMode,
    pub timeframe: TimeframeSpec,
    pub unit: Unit,
}

impl QueryRequest {
    pub fn new(
        station: impl Into<String>,
        time_zone: impl Into<String>,
        earliest_year: i32,
        mode: AggregationMode,
        timeframe: TimeframeSpec,
        unit: Unit,
    ) -> Result<Self, RequestError> {
        Self::new_as_of(station, time_zone, earliest_year, mode, timeframe, unit, Local::now().year())
    }

    /// Like [`QueryRequest::new`], with the current year supplied by the caller.
    pub fn new_as_of(
        station: impl Into<String>,
        time_zone: impl Into<String>,
        earliest_year: i32,
        mode: AggregationMode,
        timeframe: TimeframeSpec,
        unit: Unit,
        current_year: i32,
    ) -> Result<Self, RequestError> {
        let station = station.into().trim().to_uppercase();
        if station.is_empty() {
            return Err(RequestError::EmptyStation);
        }
        if earliest_year < EARLIEST_ARCHIVE_YEAR {
            return Err(RequestError::EarliestYearTooEarly(earliest_year));
        }
        if earliest_year > current_year {
            return Err(RequestError::EarliestYearInFuture {
                year: earliest_year,
                current: current_year,
            });
        }

        Ok(Self {
            station,
            time_zone: time_zone.into().trim().to_string(),
            earliest_year,
            mode,
            timeframe,
            unit,
        })
    }
}

/// The max or min temperature found for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub mode: AggregationMode,
    pub value: f64,
    pub unit: Unit,
}

impl fmt::Display for Extremum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}{}", self.value, self.unit.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryOutcome {
    Found(Extremum),
    NoData,
}

impl QueryOutcome {
    /// The sentence printed to the user at the end of a run.
    pub fn sentence(&self, station: &str) -> String {
        match self {
            QueryOutcome::Found(extremum) => format!(
                "The {} temperature at {} for the requested timeframe is {}.",
                extremum.mode.describe(),
                station,
                extremum
            ),
            QueryOutcome::NoData => "No data was found.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_kind_as_str_roundtrip() {
        for kind in TimeframeKind::all() {
            let parsed = TimeframeKind::try_from(kind.as_str()).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn unknown_timeframe_error() {
        let err = TimeframeKind::try_from("single_day").unwrap_err();
        assert!(err.to_string().contains("Unknown timeframe"));
    }

    #[test]
    fn mode_and_unit_parse_case_insensitively() {
        assert_eq!(AggregationMode::try_from("MAX").unwrap(), AggregationMode::Max);
        assert_eq!(AggregationMode::try_from("min").unwrap(), AggregationMode::Min);
        assert_eq!(Unit::try_from("F").unwrap(), Unit::Fahrenheit);
        assert!(Unit::try_from("k").is_err());
    }

    #[test]
    fn month_accepts_padded_and_unpadded() {
        assert_eq!(parse_month("06"), Ok(6));
        assert_eq!(parse_month("6"), Ok(6));
        assert!(parse_month("13").is_err());
        assert!(parse_month("0").is_err());
        assert!(parse_month("006").is_err());
    }

    #[test]
    fn year_must_have_four_digits() {
        assert_eq!(parse_year("2020"), Ok(2020));
        assert!(parse_year("20").is_err());
        assert!(parse_year("20x0").is_err());
    }

    #[test]
    fn from_parts_ignores_unused_fields() {
        let spec = TimeframeSpec::from_parts(TimeframeKind::EveryMonth, Some(1999), Some(3), Some(9)).unwrap();
        assert_eq!(spec, TimeframeSpec::EveryMonth(3));
    }

    #[test]
    fn from_parts_requires_needed_fields() {
        let err = TimeframeSpec::from_parts(TimeframeKind::SingleMonth, None, Some(3), None).unwrap_err();
        assert_eq!(
            err,
            RequestError::MissingField {
                timeframe: "single-month",
                field: "year"
            }
        );
    }

    #[test]
    fn from_parts_rejects_impossible_days() {
        assert!(TimeframeSpec::from_parts(TimeframeKind::SingleDay, Some(2021), Some(2), Some(29)).is_err());
        assert!(TimeframeSpec::from_parts(TimeframeKind::SingleDay, Some(2020), Some(2), Some(29)).is_ok());
        assert!(TimeframeSpec::from_parts(TimeframeKind::EveryDay, None, Some(2), Some(29)).is_ok());
        assert!(TimeframeSpec::from_parts(TimeframeKind::EveryDay, None, Some(4), Some(31)).is_err());
    }

    #[test]
    fn request_rejects_years_before_archive() {
        let err = QueryRequest::new(
            "kdsm",
            "America/Chicago",
            1900,
            AggregationMode::Max,
            TimeframeSpec::All,
            Unit::Celsius,
        )
        .unwrap_err();
        assert_eq!(err, RequestError::EarliestYearTooEarly(1900));
    }

    #[test]
    fn request_rejects_years_after_the_current_one() {
        let new = |year| {
            QueryRequest::new_as_of(
                "KDSM",
                "UTC",
                year,
                AggregationMode::Max,
                TimeframeSpec::All,
                Unit::Celsius,
                2024,
            )
        };

        assert_eq!(
            new(3000).unwrap_err(),
            RequestError::EarliestYearInFuture {
                year: 3000,
                current: 2024
            }
        );
        assert_eq!(new(2024).unwrap().earliest_year, 2024);
    }

    #[test]
    fn request_normalizes_station() {
        let req = QueryRequest::new(
            " kdsm ",
            "UTC",
            1928,
            AggregationMode::Min,
            TimeframeSpec::All,
            Unit::Celsius,
        )
        .unwrap();
        assert_eq!(req.station, "KDSM");
    }

    #[test]
    fn sentence_formats_two_decimals_and_unit() {
        let outcome = QueryOutcome::Found(Extremum {
            mode: AggregationMode::Max,
            value: 10.0,
            unit: Unit::Celsius,
        });
        assert_eq!(
            outcome.sentence("KDSM"),
            "The maximum temperature at KDSM for the requested timeframe is 10.00°C."
        );
        assert_eq!(QueryOutcome::NoData.sentence("KDSM"), "No data was found.");
    }
}
