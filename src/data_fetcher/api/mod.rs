pub mod fetch_utils;
pub mod http_client;
pub mod urls;

pub use fetch_utils::fetch_json;
pub use http_client::create_http_client_with_timeout;
pub use urls::*;

use crate::constants::cache::REFERENCE_DATA_SECONDS;
use crate::data_fetcher::models::{Player, RawEvent, Team, decode_collection, decode_snapshot};
use crate::error::AppError;
use reqwest::Client;
use tracing::{info, instrument};

/// Fetches the current live snapshot. Never cached.
#[instrument(skip(client))]
pub async fn fetch_live_snapshot(
    client: &Client,
    api_domain: &str,
) -> Result<Vec<RawEvent>, AppError> {
    let payload = fetch_json(client, &build_live_events_url(api_domain), None).await?;
    let events = decode_snapshot(payload);
    info!("Fetched live snapshot with {} events", events.len());
    Ok(events)
}

#[instrument(skip(client))]
pub async fn fetch_teams(client: &Client, api_domain: &str) -> Result<Vec<Team>, AppError> {
    let payload =
        fetch_json(client, &build_teams_url(api_domain), Some(REFERENCE_DATA_SECONDS)).await?;
    let teams: Vec<Team> = decode_collection(payload);
    info!("Fetched {} reference teams", teams.len());
    Ok(teams)
}

#[instrument(skip(client))]
pub async fn fetch_players(client: &Client, api_domain: &str) -> Result<Vec<Player>, AppError> {
    let payload =
        fetch_json(client, &build_players_url(api_domain), Some(REFERENCE_DATA_SECONDS)).await?;
    let players: Vec<Player> = decode_collection(payload);
    info!("Fetched {} reference players", players.len());
    Ok(players)
}

/// Fetches both reference collections concurrently. Each result stands alone,
/// so a failed player fetch does not discard the teams.
pub async fn fetch_reference_collections(
    client: &Client,
    api_domain: &str,
) -> (Result<Vec<Team>, AppError>, Result<Vec<Player>, AppError>) {
    futures::future::join(fetch_teams(client, api_domain), fetch_players(client, api_domain)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::cache::clear_http_response_cache;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        create_http_client_with_timeout(5).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_live_snapshot_is_never_cached() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events/live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [
                    {"event_id": 1, "home_team_name": "Tromsø", "home_point_run": 2},
                    {"custom_id": "abc"}
                ]
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = test_client();
        let events = fetch_live_snapshot(&client, &mock_server.uri()).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].home_point_run, Some(2));
        assert_eq!(events[1].custom_id.as_deref(), Some("abc"));

        fetch_live_snapshot(&client, &mock_server.uri()).await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_teams_uses_cache() {
        clear_http_response_cache().await;
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"external_id": 10, "name": "Tromsø", "country": "Norway"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client();
        let first = fetch_teams(&client, &mock_server.uri()).await.unwrap();
        let second = fetch_teams(&client, &mock_server.uri()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].country.as_deref(), Some("Norway"));
    }

    #[tokio::test]
    #[serial]
    async fn test_not_found_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events/live"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = fetch_live_snapshot(&test_client(), &mock_server.uri()).await;
        assert!(matches!(result, Err(AppError::ApiNotFound { .. })));
    }

    #[tokio::test]
    #[serial]
    async fn test_transient_errors_are_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events/live"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/events/live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"event_id": 7}])))
            .mount(&mock_server)
            .await;

        let events = fetch_live_snapshot(&test_client(), &mock_server.uri())
            .await
            .unwrap();
        assert_eq!(events[0].event_id, Some(7));
    }

    #[tokio::test]
    #[serial]
    async fn test_reference_collections_fail_independently() {
        clear_http_response_cache().await;
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"external_id": 1}])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/players"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let (teams, players) =
            fetch_reference_collections(&test_client(), &mock_server.uri()).await;
        assert_eq!(teams.unwrap().len(), 1);
        assert!(matches!(players, Err(AppError::ApiClientError { status: 400, .. })));
    }

    #[tokio::test]
    #[serial]
    async fn test_html_body_is_malformed_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events/live"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let result = fetch_live_snapshot(&test_client(), &mock_server.uri()).await;
        assert!(matches!(result, Err(AppError::ApiMalformedJson { .. })));
    }
}
