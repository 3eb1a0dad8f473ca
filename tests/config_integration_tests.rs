use tempfile::tempdir;
use volley_live::config::{Config, CountryAlias};
use volley_live::data_fetcher::models::{ClassificationGroup, RawEvent, Team};
use volley_live::data_fetcher::processors::{Reconciler, ReferenceIndex};

/// Test that a saved config loads back with the same federation settings
#[tokio::test]
async fn test_config_roundtrip_through_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("volley_live").join("config.toml");
    let path = path.to_string_lossy().to_string();

    let config = Config {
        api_domain: "api.example.com".to_string(),
        federation_country: "Sweden".to_string(),
        federation_demonym: "swed".to_string(),
        extra_country_aliases: vec![CountryAlias {
            alias: "elitserien".to_string(),
            code: "SE".to_string(),
        }],
        ..Config::default()
    };
    config.save_to_path(&path).await.unwrap();

    let loaded = Config::load_from_path(&path).await.unwrap();
    assert_eq!(loaded.api_domain, "https://api.example.com");
    assert_eq!(loaded.federation_country, "Sweden");
    assert_eq!(loaded.extra_country_aliases, config.extra_country_aliases);
    assert_eq!(loaded.poll_interval_seconds, 10);
    assert!(loaded.validate().is_ok());
}

/// Test that the reconciler follows the configured federation and aliases
#[tokio::test]
async fn test_reconciler_from_config() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    tokio::fs::write(
        &path,
        r#"
api_domain = "https://api.example.com"
federation_country = "Sweden"
federation_demonym = "swed"

[[extra_country_aliases]]
alias = "elitserien"
code = "SE"
"#,
    )
    .await
    .unwrap();

    let config = Config::load_from_path(&path.to_string_lossy()).await.unwrap();
    let reconciler = Reconciler::from_config(&config);

    let index = ReferenceIndex::build(
        &[Team {
            external_id: Some(5),
            name: Some("Falkenberg".to_string()),
            country: Some("Sweden".to_string()),
            league: None,
        }],
        &[],
    );
    let event = RawEvent {
        event_id: Some(1),
        home_team_external_id: Some(5),
        tournament_name: Some("Elitserien".to_string()),
        ..Default::default()
    };

    let cycle = reconciler.run(vec![event], &index);
    let view = &cycle.views[0];
    assert_eq!(view.group, ClassificationGroup::HomeFederation);
    assert_eq!(view.metadata.country.as_ref().unwrap().code, "SE");
    assert_eq!(view.metadata.league_label.as_deref(), Some("Elitserien"));
}
