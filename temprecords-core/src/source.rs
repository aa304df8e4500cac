use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::{fmt::Debug, time::Duration};
use tracing::{info, warn};

use crate::{
    Config, QueryRequest,
    error::{FetchError, QueryError},
    model::Unit,
};

pub mod iem;

pub use iem::IemAsosSource;

/// One download from the archive: station, unit and the date range to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub station: String,
    pub unit: Unit,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub time_zone: String,
}

impl SourceQuery {
    /// A single-day query covers just that day. Everything else downloads
    /// from Jan 1 of the earliest year through Jan 3 of next year, and the
    /// timeframe filter narrows it afterwards.
    pub fn for_request(request: &QueryRequest, today: NaiveDate) -> Self {
        let (start, end) = match request.timeframe.single_date() {
            Some(date) => (date, date.succ_opt().unwrap_or(date)),
            None => (
                first_of_year(request.earliest_year),
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 3).unwrap_or(today),
            ),
        };

        Self {
            station: request.station.clone(),
            unit: request.unit,
            start,
            end,
            time_zone: request.time_zone.clone(),
        }
    }
}

fn first_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[async_trait]
pub trait ObservationSource: Send + Sync + Debug {
    /// Raw CSV bytes for the query.
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Fetch, retrying failed attempts up to `policy.max_attempts` in total.
pub async fn fetch_with_retry(
    source: &dyn ObservationSource,
    query: &SourceQuery,
    policy: &RetryPolicy,
) -> Result<Vec<u8>, QueryError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        info!(station = %query.station, start = %query.start, end = %query.end, attempt, "fetching observations");

        match source.fetch(query).await {
            Ok(body) => {
                info!(bytes = body.len(), "fetched observations");
                return Ok(body);
            }
            Err(err) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %err, "fetch failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(QueryError::Fetch {
                    attempts: attempt,
                    source: err,
                });
            }
        }
    }
}

/// Construct the archive source described by the config.
pub fn source_from_config(config: &Config) -> Box<dyn ObservationSource> {
    Box::new(IemAsosSource::new(config.source.base_url.clone()))
}
