//! URL building utilities for API endpoints

/// Builds the live snapshot URL.
///
/// # Example
/// ```
/// use volley_live::data_fetcher::api::build_live_events_url;
///
/// let url = build_live_events_url("https://api.example.com");
/// assert_eq!(url, "https://api.example.com/events/live");
/// ```
pub fn build_live_events_url(api_domain: &str) -> String {
    format!("{}/events/live", api_domain.trim_end_matches('/'))
}

/// Builds the team reference collection URL.
///
/// # Example
/// ```
/// use volley_live::data_fetcher::api::build_teams_url;
///
/// let url = build_teams_url("https://api.example.com/");
/// assert_eq!(url, "https://api.example.com/teams");
/// ```
pub fn build_teams_url(api_domain: &str) -> String {
    format!("{}/teams", api_domain.trim_end_matches('/'))
}

/// Builds the player reference collection URL.
pub fn build_players_url(api_domain: &str) -> String {
    format!("{}/players", api_domain.trim_end_matches('/'))
}
