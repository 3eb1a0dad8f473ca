use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};
use volley_live::config::Config;
use volley_live::constants::REFERENCE_REFRESH_EVERY_TICKS;
use volley_live::data_fetcher::api::create_http_client_with_timeout;
use volley_live::data_fetcher::models::{EventView, ServeEmphasis};
use volley_live::data_fetcher::processors::{ReconciledCycle, Reconciler};
use volley_live::error::AppError;
use volley_live::poller::{ApiSource, LivePoller, ReferenceStore};

/// Builds the poller and loads the reference collections once.
async fn start_session(
    config: &Config,
) -> Result<(LivePoller<ApiSource>, reqwest::Client), AppError> {
    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let references = Arc::new(ReferenceStore::new());

    if !references.refresh(&client, &config.api_domain).await {
        warn!(
            "No reference data loaded, classification degrades to 'other' until a refresh succeeds"
        );
    }

    let poller = LivePoller::new(
        ApiSource::new(client.clone(), config.api_domain.clone()),
        references,
        Reconciler::from_config(config),
    );
    Ok((poller, client))
}

/// --once: one poll, print the events, exit.
pub async fn run_once(config: &Config) -> Result<(), AppError> {
    let (poller, _client) = start_session(config).await?;
    let cycle = poller.poll_now().await?;
    print_cycle(&cycle);
    Ok(())
}

/// Polls on the configured interval until Ctrl-C, printing every published cycle.
pub async fn run_live(config: &Config) -> Result<(), AppError> {
    let (poller, client) = start_session(config).await?;
    let mut published = poller.subscribe();

    let mut ticker = interval(Duration::from_secs(config.poll_interval_seconds));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks: u64 = 0;

    info!(
        "Polling {} every {}s",
        config.api_domain, config.poll_interval_seconds
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;
                if ticks % REFERENCE_REFRESH_EVERY_TICKS == 0 {
                    let references = Arc::clone(poller.references());
                    let client = client.clone();
                    let api_domain = config.api_domain.clone();
                    tokio::spawn(async move {
                        references.refresh(&client, &api_domain).await;
                    });
                }
                poller.start_poll().await;
            }
            changed = published.changed() => {
                if changed.is_err() {
                    error!("Poll publisher closed");
                    break;
                }
                let cycle = published.borrow_and_update().clone();
                if let Some(cycle) = cycle {
                    print_cycle(&cycle);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping poller");
                poller.cancel().await;
                break;
            }
        }
    }

    Ok(())
}

fn print_cycle(cycle: &ReconciledCycle) {
    if cycle.views.is_empty() {
        println!("No live events");
        return;
    }
    for view in &cycle.views {
        println!("{}", format_view_line(view));
    }
    println!();
}

/// One plain-text line per event.
pub fn format_view_line(view: &EventView) -> String {
    let home = view.home_team_name.as_deref().unwrap_or("?");
    let away = view.away_team_name.as_deref().unwrap_or("?");
    let mut line = format!("[{}] {} - {}", view.group.as_str(), home, away);

    if let (Some(h), Some(a)) = (view.home_sets, view.away_sets) {
        line.push_str(&format!(" {h}-{a}"));
    }
    if let Some(set) = view.point.set_number {
        let score = |v: Option<i64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        line.push_str(&format!(
            " | set {set}: {}-{}",
            score(view.point.home),
            score(view.point.away)
        ));
    }
    if let Some(side) = view.serve.serving_side {
        let heat = match view.serve.emphasis {
            ServeEmphasis::None => "",
            ServeEmphasis::Hot => " hot",
            ServeEmphasis::BlinkingHot => " blinking-hot",
        };
        line.push_str(&format!(" | serve {side} (run {}{heat})", view.serve.run));
    }
    if let Some(label) = view.play_label {
        line.push_str(&format!(" | {} {}", label.kind.as_str(), label.side));
    }

    let meta = &view.metadata;
    line.push_str(&format!(" | {}", meta.tournament));
    if let Some(league) = &meta.league_label {
        line.push_str(&format!(" / {league}"));
    }
    if let Some(stage) = &meta.stage_label {
        line.push_str(&format!(" / {stage}"));
    }
    if let Some(country) = &meta.country {
        match &country.flag {
            Some(flag) => line.push_str(&format!(" {flag} {}", country.label)),
            None => line.push_str(&format!(" {}", country.label)),
        }
    }

    let players: Vec<&str> = view
        .home_federation_players
        .iter()
        .chain(&view.away_federation_players)
        .map(String::as_str)
        .collect();
    if !players.is_empty() {
        line.push_str(&format!(" | {}", players.join(", ")));
    }

    if !view.is_live {
        line.push_str(" (not live)");
    }
    line
}
