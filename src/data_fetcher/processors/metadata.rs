//! Display metadata recovered from inconsistent upstream fields.
//!
//! Every value is produced by an ordered fallback chain: a slice of pure
//! extractor functions evaluated in order until one yields a non-blank
//! result. Keeping the chains as data makes their order auditable.

use super::aliases::{AliasTable, STAGE_RULES, country_label};
use crate::constants::display::UNKNOWN_TOURNAMENT;
use crate::data_fetcher::models::lenient::string_at;
use crate::data_fetcher::models::{ClassificationGroup, EventMetadata, RawEvent, Team};
use serde_json::Value;
use tracing::debug;

/// Everything an extractor may look at for one event.
pub struct MetadataInput<'a> {
    pub event: &'a RawEvent,
    /// Parsed `raw_json`, or `None` when absent or malformed
    pub blob: Option<Value>,
    pub home_team: Option<&'a Team>,
    pub away_team: Option<&'a Team>,
}

impl<'a> MetadataInput<'a> {
    pub fn new(
        event: &'a RawEvent,
        home_team: Option<&'a Team>,
        away_team: Option<&'a Team>,
    ) -> Self {
        Self {
            event,
            blob: event.fallback_blob(),
            home_team,
            away_team,
        }
    }

    fn blob_string(&self, pointer: &str) -> Option<String> {
        self.blob.as_ref().and_then(|b| string_at(b, pointer))
    }
}

pub type Extractor = fn(&MetadataInput<'_>) -> Option<String>;

/// Runs a chain and returns the first non-blank result.
pub fn first_non_empty(chain: &[Extractor], input: &MetadataInput<'_>) -> Option<String> {
    chain
        .iter()
        .filter_map(|extract| extract(input))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).cloned()
}

fn nested_name(value: Option<&Value>, pointer: &str) -> Option<String> {
    value.and_then(|v| string_at(v, pointer))
}

// tournament

fn tournament_direct(input: &MetadataInput<'_>) -> Option<String> {
    non_blank(input.event.tournament_name.as_ref())
}

fn tournament_nested(input: &MetadataInput<'_>) -> Option<String> {
    nested_name(input.event.tournament.as_ref(), "/name")
}

fn tournament_blob(input: &MetadataInput<'_>) -> Option<String> {
    input.blob_string("/tournament/name")
}

fn tournament_blob_unique(input: &MetadataInput<'_>) -> Option<String> {
    input
        .blob_string("/tournament/uniqueTournament/name")
        .or_else(|| input.blob_string("/uniqueTournament/name"))
}

pub const TOURNAMENT_CHAIN: &[Extractor] = &[
    tournament_direct,
    tournament_nested,
    tournament_blob,
    tournament_blob_unique,
];

// season

fn season_direct(input: &MetadataInput<'_>) -> Option<String> {
    non_blank(input.event.season_name.as_ref())
}

fn season_nested(input: &MetadataInput<'_>) -> Option<String> {
    nested_name(input.event.season.as_ref(), "/name")
}

fn season_in_nested_tournament(input: &MetadataInput<'_>) -> Option<String> {
    nested_name(input.event.tournament.as_ref(), "/season/name")
}

fn season_blob(input: &MetadataInput<'_>) -> Option<String> {
    input.blob_string("/season/name")
}

fn season_blob_tournament(input: &MetadataInput<'_>) -> Option<String> {
    input.blob_string("/tournament/season/name")
}

pub const SEASON_CHAIN: &[Extractor] = &[
    season_direct,
    season_nested,
    season_in_nested_tournament,
    season_blob,
    season_blob_tournament,
];

// country text

fn country_home_team(input: &MetadataInput<'_>) -> Option<String> {
    input.home_team.and_then(|t| non_blank(t.country.as_ref()))
}

fn country_away_team(input: &MetadataInput<'_>) -> Option<String> {
    input.away_team.and_then(|t| non_blank(t.country.as_ref()))
}

fn country_blob_category_country(input: &MetadataInput<'_>) -> Option<String> {
    input
        .blob_string("/tournament/category/country/name")
        .or_else(|| input.blob_string("/category/country/name"))
}

fn country_blob_category(input: &MetadataInput<'_>) -> Option<String> {
    input
        .blob_string("/tournament/category/name")
        .or_else(|| input.blob_string("/category/name"))
}

fn country_from_competition_text(input: &MetadataInput<'_>) -> Option<String> {
    let parts: Vec<String> = [
        first_non_empty(TOURNAMENT_CHAIN, input),
        first_non_empty(SEASON_CHAIN, input),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

pub const COUNTRY_TEXT_CHAIN: &[Extractor] = &[
    country_home_team,
    country_away_team,
    country_blob_category_country,
    country_blob_category,
    country_from_competition_text,
];

// stage

fn stage_direct(input: &MetadataInput<'_>) -> Option<String> {
    non_blank(input.event.round_name.as_ref())
}

fn stage_nested(input: &MetadataInput<'_>) -> Option<String> {
    nested_name(input.event.round_info.as_ref(), "/name")
}

fn stage_blob(input: &MetadataInput<'_>) -> Option<String> {
    input.blob_string("/roundInfo/name")
}

pub const STAGE_CHAIN: &[Extractor] = &[stage_direct, stage_nested, stage_blob];

/// Maps raw stage text to its display label; unrecognised text is kept verbatim.
pub fn stage_label(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    STAGE_RULES
        .iter()
        .find(|rule| {
            rule.needles.iter().any(|n| lowered.contains(n))
                && !rule.excludes.iter().any(|x| lowered.contains(x))
        })
        .map(|rule| rule.label.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Picks the competition-tier label.
///
/// Home-federation events prefer season, tournament, then either team's
/// league. Other events prefer an agreed league (both sides equal), then a
/// single known league, then season and tournament. Two different leagues
/// are treated as no league.
pub fn league_label(
    group: ClassificationGroup,
    season: Option<&str>,
    tournament: Option<&str>,
    home_league: Option<&str>,
    away_league: Option<&str>,
) -> Option<String> {
    fn clean(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }
    let (season, tournament) = (clean(season), clean(tournament));
    let (home_league, away_league) = (clean(home_league), clean(away_league));

    let chosen = if group == ClassificationGroup::HomeFederation {
        season.or(tournament).or(home_league).or(away_league)
    } else {
        let league = match (home_league, away_league) {
            (Some(h), Some(a)) if h == a => Some(h),
            (Some(h), None) => Some(h),
            (None, Some(a)) => Some(a),
            _ => None,
        };
        league.or(season).or(tournament)
    };
    chosen.map(str::to_string)
}

/// Derives all display metadata for one event.
pub fn derive_metadata(
    input: &MetadataInput<'_>,
    group: ClassificationGroup,
    aliases: &AliasTable,
) -> EventMetadata {
    let tournament = first_non_empty(TOURNAMENT_CHAIN, input);
    let season = first_non_empty(SEASON_CHAIN, input);

    let country = first_non_empty(COUNTRY_TEXT_CHAIN, input)
        .and_then(|text| aliases.lookup(&text).map(country_label));

    let league = league_label(
        group,
        season.as_deref(),
        tournament.as_deref(),
        input.home_team.and_then(|t| t.league.as_deref()),
        input.away_team.and_then(|t| t.league.as_deref()),
    );

    let stage = first_non_empty(STAGE_CHAIN, input).map(|raw| stage_label(&raw));

    debug!(
        "Metadata for event {:?}: tournament={:?}, season={:?}, country={:?}, league={:?}, stage={:?}",
        input.event.event_id,
        tournament,
        season,
        country.as_ref().map(|c| c.code.as_str()),
        league,
        stage
    );

    EventMetadata {
        tournament: tournament.unwrap_or_else(|| UNKNOWN_TOURNAMENT.to_string()),
        season,
        country,
        league_label: league,
        stage_label: stage,
    }
}
