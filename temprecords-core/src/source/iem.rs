use async_trait::async_trait;
use chrono::Datelike;
use reqwest::Client;

use crate::error::FetchError;

use super::{ObservationSource, SourceQuery};

/// Iowa Environmental Mesonet ASOS download service.
#[derive(Debug, Clone)]
pub struct IemAsosSource {
    base_url: String,
    http: Client,
}

impl IemAsosSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

/// Query string for the download service, in the order the service documents.
pub fn query_pairs(query: &SourceQuery) -> Vec<(&'static str, String)> {
    vec![
        ("station", query.station.clone()),
        ("data", query.unit.column().to_string()),
        ("year1", query.start.year().to_string()),
        ("month1", query.start.month().to_string()),
        ("day1", query.start.day().to_string()),
        ("year2", query.end.year().to_string()),
        ("month2", query.end.month().to_string()),
        ("day2", query.end.day().to_string()),
        ("tz", query.time_zone.clone()),
        ("format", "onlycomma".to_string()),
        ("latlon", "no".to_string()),
        ("elev", "no".to_string()),
        ("missing", "null".to_string()),
        ("trace", "T".to_string()),
        ("direct", "no".to_string()),
        ("report_type", "3".to_string()),
        ("report_type", "4".to_string()),
    ]
}

#[async_trait]
impl ObservationSource for IemAsosSource {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<u8>, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&query_pairs(query))
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: self.base_url.clone(),
                source,
            })?;

        let status = res.status();
        let body = res.bytes().await.map_err(FetchError::Body)?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status,
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }
        if body.is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        Ok(body.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
