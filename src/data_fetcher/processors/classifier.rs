use super::reference_index::ReferenceIndex;
use crate::config::Config;
use crate::constants::federation;
use crate::data_fetcher::models::{ClassificationGroup, RawEvent, Team};
use tracing::debug;

/// The tracked federation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Federation {
    /// Exact team country literal
    pub country: String,
    /// Nationality substring for players
    pub demonym: String,
}

impl Federation {
    pub fn new(country: impl Into<String>, demonym: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            demonym: demonym.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.federation_country, &config.federation_demonym)
    }
}

impl Default for Federation {
    fn default() -> Self {
        Self::new(federation::DEFAULT_COUNTRY, federation::DEFAULT_DEMONYM)
    }
}

/// Assigns the audience group of an event.
///
/// - unpopulated index: `Other` for every event
/// - either resolved team's country equals the federation literal: `HomeFederation`
/// - else at least one side resolved: `FederationAbroad`
/// - else `Other`
pub fn classify(
    event: &RawEvent,
    index: &ReferenceIndex,
    federation: &Federation,
) -> ClassificationGroup {
    if !index.is_populated() {
        return ClassificationGroup::Other;
    }

    let home = index.resolve(event.home_team_ref());
    let away = index.resolve(event.away_team_ref());

    let is_tracked = |team: Option<&Team>| {
        team.and_then(|t| t.country.as_deref()) == Some(federation.country.as_str())
    };

    let group = if is_tracked(home) || is_tracked(away) {
        ClassificationGroup::HomeFederation
    } else if home.is_some() || away.is_some() {
        ClassificationGroup::FederationAbroad
    } else {
        ClassificationGroup::Other
    };

    debug!(
        "Classified event {:?}: home_known={}, away_known={}, group={}",
        event.event_id,
        home.is_some(),
        away.is_some(),
        group.as_str()
    );
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: i64, country: &str) -> Team {
        Team {
            external_id: Some(id),
            country: Some(country.to_string()),
            ..Default::default()
        }
    }

    fn matchup(home: i64, away: i64) -> RawEvent {
        RawEvent {
            home_team_id: Some(home),
            away_team_id: Some(away),
            ..Default::default()
        }
    }

    fn index() -> ReferenceIndex {
        ReferenceIndex::build(&[team(1, "Norway"), team(2, "Italy"), team(3, "Poland")], &[])
    }

    #[test]
    fn test_home_federation_dominates_unknown_opponent() {
        let group = classify(&matchup(1, 999), &index(), &Federation::default());
        assert_eq!(group, ClassificationGroup::HomeFederation);

        let group = classify(&matchup(999, 1), &index(), &Federation::default());
        assert_eq!(group, ClassificationGroup::HomeFederation);
    }

    #[test]
    fn test_home_federation_dominates_known_foreign_opponent() {
        let group = classify(&matchup(2, 1), &index(), &Federation::default());
        assert_eq!(group, ClassificationGroup::HomeFederation);
    }

    #[test]
    fn test_federation_abroad() {
        assert_eq!(
            classify(&matchup(2, 3), &index(), &Federation::default()),
            ClassificationGroup::FederationAbroad
        );
        assert_eq!(
            classify(&matchup(998, 3), &index(), &Federation::default()),
            ClassificationGroup::FederationAbroad
        );
    }

    #[test]
    fn test_two_unknown_teams_is_other() {
        assert_eq!(
            classify(&matchup(998, 999), &index(), &Federation::default()),
            ClassificationGroup::Other
        );
        assert_eq!(
            classify(&RawEvent::default(), &index(), &Federation::default()),
            ClassificationGroup::Other
        );
    }

    #[test]
    fn test_unpopulated_index_is_other() {
        assert_eq!(
            classify(&matchup(1, 2), &ReferenceIndex::empty(), &Federation::default()),
            ClassificationGroup::Other
        );
    }

    #[test]
    fn test_country_must_match_exactly() {
        let index = ReferenceIndex::build(&[team(1, "norway"), team(2, "Norway ")], &[]);
        assert_eq!(
            classify(&matchup(1, 2), &index, &Federation::default()),
            ClassificationGroup::FederationAbroad
        );
    }

    #[test]
    fn test_external_id_used_before_plain_id() {
        let event = RawEvent {
            home_team_id: Some(2),
            home_team_external_id: Some(1),
            ..Default::default()
        };
        assert_eq!(
            classify(&event, &index(), &Federation::default()),
            ClassificationGroup::HomeFederation
        );
    }

    #[test]
    fn test_configured_federation() {
        let poland = Federation::new("Poland", "pol");
        assert_eq!(
            classify(&matchup(3, 998), &index(), &poland),
            ClassificationGroup::HomeFederation
        );
    }
}
