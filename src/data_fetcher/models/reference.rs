use super::lenient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Envelope keys that may hold a reference collection.
const ENVELOPE_KEYS: [&str; 6] = ["items", "data", "results", "teams", "players", "rows"];

/// A club known to the reference collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub external_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    /// Free-text country; must equal the federation literal exactly to count as tracked.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub country: Option<String>,
    /// Free-text competition tier
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub league: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nationality: Option<String>,
    /// External identifier of the owning team
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub team_external_id: Option<i64>,
}

/// Decodes a reference collection, tolerating an envelope object.
///
/// Items that fail to decode are skipped with a warning.
pub fn decode_collection<T: DeserializeOwned>(payload: Value) -> Vec<T> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_else(|| {
                warn!("Reference envelope has no recognised items field");
                Vec::new()
            }),
        _ => {
            warn!("Reference payload is neither an array nor an envelope");
            Vec::new()
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping undecodable reference record: {}", e);
                None
            }
        })
        .collect();

    debug!("Decoded {} of {} reference records", decoded.len(), total);
    decoded
}
