use thiserror::Error;

/// Raised when the archive payload does not have the expected
/// `station,timestamp,temperature` shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid timestamp '{value}' (expected YYYY-MM-DD HH:MM)")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: invalid temperature '{value}'")]
    InvalidTemperature { line: u64, value: String },

    #[error("line {line}: not valid UTF-8")]
    InvalidUtf8 { line: u64 },

    #[error("failed to read CSV payload")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("archive request failed with status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to read archive response body")]
    Body(#[source] reqwest::Error),

    #[error("archive returned an empty response")]
    EmptyResponse,
}

/// User-supplied query parameters that cannot form a valid request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unknown timeframe '{0}'. Supported timeframes: all, year, single-month, every-month, single-day, every-day.")]
    UnknownTimeframe(String),

    #[error("Unknown mode '{0}'. Use max or min.")]
    UnknownMode(String),

    #[error("Unknown unit '{0}'. Use c for Celsius or f for Fahrenheit.")]
    UnknownUnit(String),

    #[error("Timeframe '{timeframe}' needs a {field}")]
    MissingField {
        timeframe: &'static str,
        field: &'static str,
    },

    #[error("Invalid year '{0}' (format: YYYY)")]
    InvalidYear(String),

    #[error("Invalid month '{0}' (format: MM, 1-12)")]
    InvalidMonth(String),

    #[error("Invalid day '{0}' (format: DD)")]
    InvalidDay(String),

    #[error("Day {day} does not exist in month {month}")]
    NoSuchDay { month: u32, day: u32 },

    #[error("Earliest year {0} is before 1928, the first year in the archive")]
    EarliestYearTooEarly(i32),

    #[error("Earliest year {year} is after the current year {current}")]
    EarliestYearInFuture { year: i32, current: i32 },

    #[error("Station identifier must not be empty")]
    EmptyStation,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to fetch observations after {attempts} attempt(s)")]
    Fetch {
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("failed to parse observations")]
    Parse(#[from] ParseError),
}
