use super::lenient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One in-progress event as reported by the live snapshot endpoint.
///
/// Every field is optional and decoded leniently; see [`lenient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub event_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub custom_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub start_timestamp: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_team_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_team_external_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_team_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_team_external_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub home_team_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub away_team_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_set1: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_set2: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_set3: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_set4: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_set5: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_set1: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_set2: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_set3: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_set4: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_set5: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_sets_won: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_sets_won: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status_desc: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub home_point_run: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub away_point_run: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub new_score: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tournament_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub season_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub tournament: Option<Value>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub season: Option<Value>,

    /// Serialized (or inline) richer payload, consulted only as a last resort.
    #[serde(default, deserialize_with = "lenient::opt_blob")]
    pub raw_json: Option<Value>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub round_name: Option<String>,
    #[serde(rename = "roundInfo", default, deserialize_with = "lenient::opt_object")]
    pub round_info: Option<Value>,
}

impl RawEvent {
    /// Team reference for the home side, external identifier first.
    pub fn home_team_ref(&self) -> Option<i64> {
        self.home_team_external_id.or(self.home_team_id)
    }

    /// Team reference for the away side, external identifier first.
    pub fn away_team_ref(&self) -> Option<i64> {
        self.away_team_external_id.or(self.away_team_id)
    }

    /// Recorded score pair for set `number` (1-5). Out-of-range sets have no score.
    pub fn set_score(&self, number: u32) -> (Option<i64>, Option<i64>) {
        match number {
            1 => (self.home_set1, self.away_set1),
            2 => (self.home_set2, self.away_set2),
            3 => (self.home_set3, self.away_set3),
            4 => (self.home_set4, self.away_set4),
            5 => (self.home_set5, self.away_set5),
            _ => (None, None),
        }
    }

    /// Parses the embedded fallback payload.
    ///
    /// Returns `None` for an absent, unparsable or non-object payload.
    pub fn fallback_blob(&self) -> Option<Value> {
        match self.raw_json.as_ref()? {
            Value::Object(_) => self.raw_json.clone(),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) if value.is_object() => Some(value),
                Ok(_) => {
                    debug!("Ignoring non-object raw_json for event {:?}", self.event_id);
                    None
                }
                Err(e) => {
                    debug!(
                        "Ignoring unparsable raw_json for event {:?}: {}",
                        self.event_id, e
                    );
                    None
                }
            },
            _ => None,
        }
    }
}

/// Decodes a live snapshot payload item by item.
///
/// Accepts a bare array or an envelope object holding the array under
/// `events`, `items` or `data`. Items that are not objects are dropped.
pub fn decode_snapshot(payload: Value) -> Vec<RawEvent> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => ["events", "items", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        other => {
            warn!("Live snapshot is neither an array nor an envelope: {}", other);
            Vec::new()
        }
    };

    let total = items.len();
    let events: Vec<RawEvent> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawEvent>(item) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Dropping snapshot item that is not an event object: {}", e);
                None
            }
        })
        .collect();

    if events.len() != total {
        debug!("Decoded {} of {} snapshot items", events.len(), total);
    }
    events
}
