use crate::data_fetcher::models::{Player, Team};
use std::collections::HashMap;
use tracing::debug;

/// Lookup structures over the team and player reference collections.
///
/// Pure function of its inputs. An index that was never built from a team
/// collection reports `is_populated() == false`, and classification treats
/// it as unavailable.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    teams: HashMap<i64, Team>,
    players_by_team: HashMap<i64, Vec<Player>>,
    populated: bool,
}

impl ReferenceIndex {
    /// An index that has never been populated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a populated index. Records without an external id are skipped;
    /// on duplicate team ids the first record wins.
    pub fn build(teams: &[Team], players: &[Player]) -> Self {
        let mut team_map = HashMap::with_capacity(teams.len());
        for team in teams {
            if let Some(id) = team.external_id {
                team_map.entry(id).or_insert_with(|| team.clone());
            }
        }

        let mut players_by_team: HashMap<i64, Vec<Player>> = HashMap::new();
        for player in players {
            if let Some(team_id) = player.team_external_id {
                players_by_team
                    .entry(team_id)
                    .or_default()
                    .push(player.clone());
            }
        }

        debug!(
            "Built reference index: {} teams, {} teams with players",
            team_map.len(),
            players_by_team.len()
        );

        Self {
            teams: team_map,
            players_by_team,
            populated: true,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn team(&self, external_id: i64) -> Option<&Team> {
        self.teams.get(&external_id)
    }

    /// Resolves an optional team reference.
    pub fn resolve(&self, external_id: Option<i64>) -> Option<&Team> {
        external_id.and_then(|id| self.team(id))
    }

    pub fn players_of_team(&self, external_id: i64) -> &[Player] {
        self.players_by_team
            .get(&external_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of a team's players whose nationality contains `demonym`
    /// (case-insensitive), in reference order.
    pub fn federation_players(&self, team_id: Option<i64>, demonym: &str) -> Vec<String> {
        let Some(team_id) = team_id else {
            return Vec::new();
        };
        let needle = demonym.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.players_of_team(team_id)
            .iter()
            .filter(|p| {
                p.nationality
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .filter_map(|p| p.name.clone())
            .collect()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.players_by_team.values().map(Vec::len).sum()
    }
}
