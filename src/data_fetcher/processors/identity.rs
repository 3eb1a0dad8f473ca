use crate::data_fetcher::models::{PointState, RawEvent};

/// Resolves a stable identity for an event.
///
/// Resolution order:
/// 1. numeric `event_id`
/// 2. non-blank `custom_id`
/// 3. `"{start_timestamp}|{home_team_name}|{away_team_name}"`, with absent parts left empty
///
/// Depends only on those fields, so equal inputs always give equal identities.
///
/// # Examples
///
/// ```rust
/// use volley_live::data_fetcher::models::RawEvent;
/// use volley_live::data_fetcher::processors::event_identity;
///
/// let event = RawEvent {
///     event_id: Some(9001),
///     ..Default::default()
/// };
/// assert_eq!(event_identity(&event), "9001");
/// ```
pub fn event_identity(event: &RawEvent) -> String {
    if let Some(id) = event.event_id {
        return id.to_string();
    }

    if let Some(custom) = event.custom_id.as_deref().map(str::trim)
        && !custom.is_empty()
    {
        return custom.to_string();
    }

    format!(
        "{}|{}|{}",
        event
            .start_timestamp
            .map(|ts| ts.to_string())
            .unwrap_or_default(),
        event.home_team_name.as_deref().unwrap_or_default(),
        event.away_team_name.as_deref().unwrap_or_default()
    )
}

/// Extracts the active set number and its score.
///
/// An explicit set number in `status_desc` wins, even when a later set already
/// has a recorded score. Otherwise the highest set (5 down to 1) with any
/// recorded score is the active one. No scores at all gives an empty state.
pub fn current_point(event: &RawEvent) -> PointState {
    let set_number = event
        .status_desc
        .as_deref()
        .and_then(set_from_descriptor)
        .or_else(|| highest_populated_set(event));

    match set_number {
        Some(number) => {
            let (home, away) = event.set_score(number);
            PointState {
                set_number: Some(number),
                home,
                away,
            }
        }
        None => PointState::default(),
    }
}

/// First run of ASCII digits in a free-text status, e.g. "3rd set" -> 3.
fn set_from_descriptor(desc: &str) -> Option<u32> {
    let start = desc.find(|c: char| c.is_ascii_digit())?;
    let digits: String = desc[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn highest_populated_set(event: &RawEvent) -> Option<u32> {
    (1..=5).rev().find(|&number| {
        let (home, away) = event.set_score(number);
        home.is_some() || away.is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_event(start: Option<i64>, home: &str, away: &str) -> RawEvent {
        RawEvent {
            start_timestamp: start,
            home_team_name: Some(home.to_string()),
            away_team_name: Some(away.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_prefers_numeric_id() {
        let event = RawEvent {
            event_id: Some(77),
            custom_id: Some("abc".to_string()),
            ..named_event(Some(1_700_000_000), "Tromsø", "Førde")
        };
        assert_eq!(event_identity(&event), "77");
    }

    #[test]
    fn test_identity_falls_back_to_custom_id() {
        let event = RawEvent {
            custom_id: Some(" xKbsSWb ".to_string()),
            ..named_event(Some(1_700_000_000), "Tromsø", "Førde")
        };
        assert_eq!(event_identity(&event), "xKbsSWb");
    }

    #[test]
    fn test_identity_concatenation() {
        let event = named_event(Some(1_700_000_000), "Tromsø", "Førde");
        assert_eq!(event_identity(&event), "1700000000|Tromsø|Førde");

        let bare = RawEvent::default();
        assert_eq!(event_identity(&bare), "||");
    }

    #[test]
    fn test_identity_is_deterministic() {
        let a = named_event(Some(5), "A", "B");
        let b = a.clone();
        assert_eq!(event_identity(&a), event_identity(&a));
        assert_eq!(event_identity(&a), event_identity(&b));
        assert_ne!(
            event_identity(&a),
            event_identity(&named_event(Some(5), "B", "A"))
        );
    }

    #[test]
    fn test_current_point_from_highest_populated_set() {
        let event = RawEvent {
            home_set1: Some(25),
            away_set1: Some(20),
            home_set2: Some(12),
            away_set2: None,
            ..Default::default()
        };
        assert_eq!(
            current_point(&event),
            PointState {
                set_number: Some(2),
                home: Some(12),
                away: None
            }
        );
    }

    #[test]
    fn test_current_point_descriptor_wins() {
        let event = RawEvent {
            status_desc: Some("2nd set".to_string()),
            home_set1: Some(25),
            away_set1: Some(20),
            home_set2: Some(18),
            away_set2: Some(21),
            home_set3: Some(1),
            away_set3: Some(0),
            ..Default::default()
        };
        let point = current_point(&event);
        assert_eq!(point.set_number, Some(2));
        assert_eq!(point.home, Some(18));
        assert_eq!(point.away, Some(21));
    }

    #[test]
    fn test_current_point_no_scores() {
        let event = RawEvent {
            status_desc: Some("Not started".to_string()),
            ..Default::default()
        };
        assert_eq!(current_point(&event), PointState::default());
    }

    #[test]
    fn test_descriptor_out_of_range_set() {
        let event = RawEvent {
            status_desc: Some("Set 7".to_string()),
            home_set1: Some(3),
            ..Default::default()
        };
        let point = current_point(&event);
        assert_eq!(point.set_number, Some(7));
        assert_eq!(point.home, None);
        assert_eq!(point.away, None);
    }

    #[test]
    fn test_set_from_descriptor() {
        assert_eq!(set_from_descriptor("3rd set"), Some(3));
        assert_eq!(set_from_descriptor("Set 4 (pause)"), Some(4));
        assert_eq!(set_from_descriptor("Ended"), None);
        assert_eq!(set_from_descriptor(""), None);
        assert_eq!(set_from_descriptor("99999999999999999999 set"), None);
    }
}
