use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::{
    aggregate::extremum,
    error::{ParseError, QueryError},
    filter::{filter_timeframe, filter_valid},
    model::{AggregationMode, QueryOutcome, QueryRequest, TimeframeSpec, Unit},
    parser::parse_records,
    source::{ObservationSource, RetryPolicy, SourceQuery, fetch_with_retry},
};

/// Parse a payload, narrow it to `timeframe`, drop missing readings, and
/// take the max or min.
pub fn evaluate(
    payload: &[u8],
    timeframe: &TimeframeSpec,
    mode: AggregationMode,
    unit: Unit,
) -> Result<QueryOutcome, ParseError> {
    let records = parse_records(payload)?;
    let in_range = filter_timeframe(&records, timeframe);
    let valid = filter_valid(&in_range);

    let temperatures: Vec<f64> = valid.iter().filter_map(|r| r.temperature).collect();
    debug!(count = temperatures.len(), mode = mode.as_str(), "aggregating temperatures");

    Ok(extremum(&temperatures, mode, unit).map_or(QueryOutcome::NoData, QueryOutcome::Found))
}

/// Download the station's observations and answer the request.
pub async fn run_query(
    source: &dyn ObservationSource,
    request: &QueryRequest,
    retry: &RetryPolicy,
) -> Result<QueryOutcome, QueryError> {
    run_query_on(source, request, retry, Local::now().date_naive()).await
}

pub async fn run_query_on(
    source: &dyn ObservationSource,
    request: &QueryRequest,
    retry: &RetryPolicy,
    today: NaiveDate,
) -> Result<QueryOutcome, QueryError> {
    let query = SourceQuery::for_request(request, today);
    let payload = fetch_with_retry(source, &query, retry).await?;

    Ok(evaluate(&payload, &request.timeframe, request.mode, request.unit)?)
}
