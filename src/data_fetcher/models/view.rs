//! Derived per-cycle values handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active set and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointState {
    pub set_number: Option<u32>,
    pub home: Option<i64>,
    pub away: Option<i64>,
}

/// Visual emphasis of the serving indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServeEmphasis {
    #[default]
    None,
    Hot,
    BlinkingHot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServeSignal {
    pub serving_side: Option<Side>,
    /// Unbroken run of the serving side; 0 when nobody is serving.
    pub run: u32,
    pub emphasis: ServeEmphasis,
}

/// Unique marker of a "just scored" pulse.
///
/// `seq` is process-wide monotonic, so two stamps are never equal even when
/// taken within the same clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlashStamp {
    pub at: DateTime<Utc>,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayKind {
    SideOut,
    BreakPoint,
}

impl PlayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayKind::SideOut => "side-out",
            PlayKind::BreakPoint => "break-point",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayLabel {
    pub side: Side,
    pub kind: PlayKind,
}

/// Event identity -> side -> flash stamp. Rebuilt from scratch every cycle.
pub type FlashState = HashMap<String, HashMap<Side, FlashStamp>>;

/// Event identity -> play label. Rebuilt from scratch every cycle.
pub type PlayLabelState = HashMap<String, PlayLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationGroup {
    HomeFederation,
    FederationAbroad,
    #[default]
    Other,
}

impl ClassificationGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationGroup::HomeFederation => "home-federation",
            ClassificationGroup::FederationAbroad => "federation-abroad",
            ClassificationGroup::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryLabel {
    /// Upper-case two-letter code
    pub code: String,
    /// Regional-indicator flag; absent when the code is not two ASCII letters
    pub flag: Option<String>,
    /// Display name, or the bare code when unmapped
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventMetadata {
    pub tournament: String,
    pub season: Option<String>,
    pub country: Option<CountryLabel>,
    pub league_label: Option<String>,
    pub stage_label: Option<String>,
}

/// Everything the presentation layer needs for one event in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventView {
    pub identity: String,
    pub home_team_name: Option<String>,
    pub away_team_name: Option<String>,
    pub point: PointState,
    pub home_sets: Option<i64>,
    pub away_sets: Option<i64>,
    pub is_live: bool,
    pub serve: ServeSignal,
    pub flash: Option<HashMap<Side, FlashStamp>>,
    pub play_label: Option<PlayLabel>,
    pub group: ClassificationGroup,
    pub metadata: EventMetadata,
    pub home_federation_players: Vec<String>,
    pub away_federation_players: Vec<String>,
}
