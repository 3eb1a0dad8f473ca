//! Serve and run signals reconstructed from per-poll run counters.
//!
//! Upstream only reports how many consecutive points each side has won on
//! the current serve plus a `new_score` flag. From that we infer the serving
//! side, the length of its run, and whether this poll should pulse a
//! "just scored" flash with a side-out / break-point label.

use crate::constants::serve::{BLINKING_HOT_RUN, BREAK_POINT_RUN, HOT_RUN};
use crate::data_fetcher::models::{
    FlashStamp, PlayKind, PlayLabel, RawEvent, ServeEmphasis, ServeSignal, Side,
};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static FLASH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Derives the serving side and run from a pair of run counters.
///
/// Exactly one positive counter names the server. Both zero, both positive,
/// or missing counters give no server and a run of 0. Negative counters are
/// treated as zero.
pub fn derive_serve(home_run: Option<i64>, away_run: Option<i64>) -> ServeSignal {
    let home = clamp_run(home_run);
    let away = clamp_run(away_run);

    let (serving_side, run) = match (home, away) {
        (h, 0) if h > 0 => (Some(Side::Home), h),
        (0, a) if a > 0 => (Some(Side::Away), a),
        _ => (None, 0),
    };

    ServeSignal {
        serving_side,
        run,
        emphasis: emphasis_for(serving_side, run),
    }
}

pub fn serve_signal(event: &RawEvent) -> ServeSignal {
    derive_serve(event.home_point_run, event.away_point_run)
}

/// True only when upstream marks the latest score increment as brand new.
pub fn is_new_point(event: &RawEvent) -> bool {
    event.new_score == Some(1)
}

/// Play label for a new point, if this poll carries one.
pub fn play_label(event: &RawEvent, signal: &ServeSignal) -> Option<PlayLabel> {
    if !is_new_point(event) {
        return None;
    }
    let side = signal.serving_side?;
    let kind = if signal.run >= BREAK_POINT_RUN {
        PlayKind::BreakPoint
    } else {
        PlayKind::SideOut
    };
    Some(PlayLabel { side, kind })
}

/// Takes a fresh flash stamp. Never returns the same value twice in a process.
pub fn next_flash_stamp() -> FlashStamp {
    FlashStamp {
        at: Utc::now(),
        seq: FLASH_SEQUENCE.fetch_add(1, Ordering::Relaxed),
    }
}

fn clamp_run(run: Option<i64>) -> u32 {
    run.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

fn emphasis_for(serving_side: Option<Side>, run: u32) -> ServeEmphasis {
    if serving_side.is_none() {
        ServeEmphasis::None
    } else if run >= BLINKING_HOT_RUN {
        ServeEmphasis::BlinkingHot
    } else if run >= HOT_RUN {
        ServeEmphasis::Hot
    } else {
        ServeEmphasis::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_runs(home: i64, away: i64, new_score: i64) -> RawEvent {
        RawEvent {
            home_point_run: Some(home),
            away_point_run: Some(away),
            new_score: Some(new_score),
            ..Default::default()
        }
    }

    #[test]
    fn test_serve_derivation_table() {
        let signal = derive_serve(Some(3), Some(0));
        assert_eq!(signal.serving_side, Some(Side::Home));
        assert_eq!(signal.run, 3);

        let signal = derive_serve(Some(0), Some(1));
        assert_eq!(signal.serving_side, Some(Side::Away));
        assert_eq!(signal.run, 1);

        let signal = derive_serve(Some(0), Some(0));
        assert_eq!(signal.serving_side, None);
        assert_eq!(signal.run, 0);

        let signal = derive_serve(Some(2), Some(1));
        assert_eq!(signal.serving_side, None);
        assert_eq!(signal.run, 0);
    }

    #[test]
    fn test_serve_missing_and_negative_counters() {
        assert_eq!(derive_serve(None, None).serving_side, None);
        assert_eq!(derive_serve(Some(2), None).serving_side, Some(Side::Home));
        assert_eq!(derive_serve(Some(-4), Some(1)).serving_side, Some(Side::Away));
        assert_eq!(derive_serve(Some(-1), Some(-1)).serving_side, None);
    }

    #[test]
    fn test_emphasis_thresholds() {
        assert_eq!(derive_serve(Some(1), Some(0)).emphasis, ServeEmphasis::None);
        assert_eq!(derive_serve(Some(2), Some(0)).emphasis, ServeEmphasis::Hot);
        assert_eq!(derive_serve(Some(3), Some(0)).emphasis, ServeEmphasis::Hot);
        assert_eq!(
            derive_serve(Some(0), Some(4)).emphasis,
            ServeEmphasis::BlinkingHot
        );
        assert_eq!(
            derive_serve(Some(0), Some(9)).emphasis,
            ServeEmphasis::BlinkingHot
        );
        assert_eq!(derive_serve(Some(5), Some(5)).emphasis, ServeEmphasis::None);
    }

    #[test]
    fn test_play_label_kinds() {
        let event = event_with_runs(1, 0, 1);
        let label = play_label(&event, &serve_signal(&event)).unwrap();
        assert_eq!(label.side, Side::Home);
        assert_eq!(label.kind, PlayKind::SideOut);

        let event = event_with_runs(2, 0, 1);
        let label = play_label(&event, &serve_signal(&event)).unwrap();
        assert_eq!(label.kind, PlayKind::BreakPoint);

        let event = event_with_runs(0, 5, 1);
        let label = play_label(&event, &serve_signal(&event)).unwrap();
        assert_eq!(label.side, Side::Away);
        assert_eq!(label.kind, PlayKind::BreakPoint);
    }

    #[test]
    fn test_no_label_without_new_score() {
        for (home, away) in [(1, 0), (2, 0), (0, 4), (0, 0)] {
            let event = event_with_runs(home, away, 0);
            assert_eq!(play_label(&event, &serve_signal(&event)), None);
        }
        let missing = RawEvent {
            home_point_run: Some(3),
            ..Default::default()
        };
        assert_eq!(play_label(&missing, &serve_signal(&missing)), None);
    }

    #[test]
    fn test_no_label_without_server() {
        let event = event_with_runs(2, 1, 1);
        assert_eq!(play_label(&event, &serve_signal(&event)), None);
    }

    #[test]
    fn test_flash_stamps_are_unique() {
        let first = next_flash_stamp();
        let second = next_flash_stamp();
        assert_ne!(first, second);
        assert!(second.seq > first.seq);
    }
}
