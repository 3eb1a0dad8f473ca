//! Generic HTTP fetching with retry logic, optional response caching and error mapping

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::retry;
use crate::data_fetcher::cache::{cache_http_response, get_cached_http_response};
use crate::error::AppError;

/// Fetches a URL and parses the body as JSON.
///
/// - With `cache_ttl_seconds`, a fresh cached body is used when present and
///   successful parsable bodies are cached. Live snapshots pass `None`.
/// - Transient failures (timeouts, connect errors, 429, 5xx) are retried with
///   exponential backoff, honouring `Retry-After`.
/// - Non-success statuses map to the specific `AppError` variants.
#[instrument(skip(client))]
pub async fn fetch_json(
    client: &Client,
    url: &str,
    cache_ttl_seconds: Option<u64>,
) -> Result<Value, AppError> {
    if cache_ttl_seconds.is_some()
        && let Some(cached) = get_cached_http_response(url).await
    {
        match serde_json::from_str::<Value>(&cached) {
            Ok(parsed) => {
                debug!("Using cached HTTP response for URL: {url}");
                return Ok(parsed);
            }
            Err(e) => warn!("Failed to parse cached response for URL {}: {}", url, e),
        }
    }

    info!("Fetching data from URL: {url}");

    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(retry::INITIAL_BACKOFF_MS);
    let response = loop {
        match client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if (status.as_u16() == 429 || status.is_server_error())
                    && attempt < retry::MAX_RETRIES
                {
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .map(Duration::from_secs);
                    let wait = retry_after.unwrap_or(backoff);
                    warn!(
                        "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                        status,
                        url,
                        wait,
                        attempt + 1,
                        retry::MAX_RETRIES
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }
                break resp;
            }
            Err(e) => {
                if (e.is_timeout() || e.is_connect()) && attempt < retry::MAX_RETRIES {
                    warn!(
                        "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                        e,
                        url,
                        backoff,
                        attempt + 1,
                        retry::MAX_RETRIES
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }
                error!("Request failed for URL {}: {}", url, e);
                return if e.is_timeout() {
                    Err(AppError::network_timeout(url))
                } else if e.is_connect() {
                    Err(AppError::network_connection(url, e.to_string()))
                } else {
                    Err(AppError::ApiFetch(e))
                };
            }
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        error!("HTTP {} - {} (URL: {})", status_code, reason, url);
        return Err(status_error(status_code, reason, url));
    }

    let body = response.text().await.map_err(|e| {
        error!("Failed to read response text from URL {}: {}", url, e);
        AppError::ApiFetch(e)
    })?;
    debug!("Response length: {} bytes", body.len());

    let parsed = parse_body(&body, url)?;
    if let Some(ttl) = cache_ttl_seconds {
        cache_http_response(url.to_string(), body, ttl).await;
    }
    Ok(parsed)
}

/// Maps a non-success HTTP status to its error variant.
fn status_error(status_code: u16, reason: &str, url: &str) -> AppError {
    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

/// Parses a response body, distinguishing empty, non-JSON and malformed bodies.
fn parse_body(body: &str, url: &str) -> Result<Value, AppError> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Err(AppError::api_unexpected_structure(
            "Response body is empty",
            url,
        ));
    }
    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return Err(AppError::api_malformed_json(
            "Response is not valid JSON",
            url,
        ));
    }
    serde_json::from_str::<Value>(body).map_err(|e| {
        error!(
            "Failed to parse API response: {} (URL: {}), first 200 chars: {}",
            e,
            url,
            body.chars().take(200).collect::<String>()
        );
        AppError::api_malformed_json(e.to_string(), url)
    })
}
