//! One reconciliation cycle over a freshly fetched snapshot.
//!
//! The cycle keeps no state of its own: flash and play-label maps are built
//! from scratch for every snapshot and replace the previous ones wholesale.
//! Events absent from the snapshot are simply gone.

use super::aliases::AliasTable;
use super::classifier::{Federation, classify};
use super::identity::{current_point, event_identity};
use super::metadata::{MetadataInput, derive_metadata};
use super::reference_index::ReferenceIndex;
use super::serve::{next_flash_stamp, play_label, serve_signal};
use crate::config::Config;
use crate::data_fetcher::models::{EventView, FlashState, PlayLabelState, RawEvent};
use std::collections::HashMap;
use tracing::{debug, info};

/// Output of [`reconcile`]: the accepted events plus this cycle's signal maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutput {
    pub events: Vec<RawEvent>,
    pub flash_state: FlashState,
    pub play_labels: PlayLabelState,
}

/// Runs the per-event serve/point derivation and assembles fresh signal maps.
///
/// Events are returned unchanged and in snapshot order. Only events with
/// `new_score == 1` and an unambiguous server get a flash entry and a play
/// label. Flash stamps are unique per call, everything else is identical for
/// identical snapshots.
pub fn reconcile(snapshot: Vec<RawEvent>) -> CycleOutput {
    let mut flash_state: FlashState = HashMap::new();
    let mut play_labels: PlayLabelState = HashMap::new();

    for event in &snapshot {
        let identity = event_identity(event);
        let signal = serve_signal(event);

        if let Some(label) = play_label(event, &signal) {
            if play_labels.insert(identity.clone(), label).is_some() {
                debug!("Duplicate identity {} in snapshot, last event wins", identity);
            }
            flash_state.insert(identity, HashMap::from([(label.side, next_flash_stamp())]));
        }
    }

    debug!(
        "Reconciled {} events: {} flashes, {} play labels",
        snapshot.len(),
        flash_state.len(),
        play_labels.len()
    );

    CycleOutput {
        events: snapshot,
        flash_state,
        play_labels,
    }
}

/// Classification and metadata settings shared by every cycle.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    federation: Federation,
    aliases: AliasTable,
}

/// A reconciled cycle together with its per-event views.
#[derive(Debug, Clone, Default)]
pub struct ReconciledCycle {
    pub output: CycleOutput,
    pub views: Vec<EventView>,
}

impl Reconciler {
    pub fn new(federation: Federation, aliases: AliasTable) -> Self {
        Self {
            federation,
            aliases,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Federation::from_config(config),
            AliasTable::builtin().with_prefix(&config.extra_country_aliases),
        )
    }

    pub fn federation(&self) -> &Federation {
        &self.federation
    }

    /// Reconciles a snapshot and derives the view of every event against one
    /// reference index snapshot.
    pub fn run(&self, snapshot: Vec<RawEvent>, index: &ReferenceIndex) -> ReconciledCycle {
        let output = reconcile(snapshot);
        let views = self.build_views(&output, index);

        info!(
            "Cycle complete: {} events, {} new points, reference index populated={}",
            views.len(),
            output.play_labels.len(),
            index.is_populated()
        );

        ReconciledCycle { output, views }
    }

    pub fn build_views(&self, output: &CycleOutput, index: &ReferenceIndex) -> Vec<EventView> {
        output
            .events
            .iter()
            .map(|event| self.view_of(event, output, index))
            .collect()
    }

    fn view_of(&self, event: &RawEvent, output: &CycleOutput, index: &ReferenceIndex) -> EventView {
        let identity = event_identity(event);
        let group = classify(event, index, &self.federation);
        let home_team = index.resolve(event.home_team_ref());
        let away_team = index.resolve(event.away_team_ref());

        let input = MetadataInput::new(event, home_team, away_team);
        let metadata = derive_metadata(&input, group, &self.aliases);

        EventView {
            home_team_name: event.home_team_name.clone(),
            away_team_name: event.away_team_name.clone(),
            point: current_point(event),
            home_sets: event.home_sets_won,
            away_sets: event.away_sets_won,
            is_live: is_live_status(event.status_type.as_deref()),
            serve: serve_signal(event),
            flash: output.flash_state.get(&identity).cloned(),
            play_label: output.play_labels.get(&identity).copied(),
            group,
            metadata,
            home_federation_players: index
                .federation_players(event.home_team_ref(), &self.federation.demonym),
            away_federation_players: index
                .federation_players(event.away_team_ref(), &self.federation.demonym),
            identity,
        }
    }
}

fn is_live_status(status_type: Option<&str>) -> bool {
    status_type.is_some_and(|s| {
        let s = s.trim();
        s.eq_ignore_ascii_case("inprogress") || s.eq_ignore_ascii_case("live")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::{ClassificationGroup, PlayKind, Side, Team};

    fn live_event(id: i64, home_run: i64, away_run: i64, new_score: i64) -> RawEvent {
        RawEvent {
            event_id: Some(id),
            home_point_run: Some(home_run),
            away_point_run: Some(away_run),
            new_score: Some(new_score),
            status_type: Some("inprogress".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_reconcile_emits_only_new_points() {
        let output = reconcile(vec![
            live_event(1, 1, 0, 1),
            live_event(2, 0, 3, 0),
            live_event(3, 2, 1, 1),
            live_event(4, 0, 2, 1),
        ]);

        assert_eq!(output.events.len(), 4);
        assert_eq!(output.play_labels.len(), 2);
        assert_eq!(output.play_labels["1"].kind, PlayKind::SideOut);
        assert_eq!(output.play_labels["4"].side, Side::Away);
        assert_eq!(output.play_labels["4"].kind, PlayKind::BreakPoint);

        assert_eq!(output.flash_state.len(), 2);
        assert!(output.flash_state["1"].contains_key(&Side::Home));
        assert!(output.flash_state["4"].contains_key(&Side::Away));
        assert!(!output.flash_state.contains_key("3"));
    }

    #[test]
    fn test_duplicate_identity_last_event_wins_in_both_maps() {
        let output = reconcile(vec![live_event(1, 1, 0, 1), live_event(1, 0, 2, 1)]);

        assert_eq!(output.play_labels["1"].side, Side::Away);
        assert_eq!(output.play_labels["1"].kind, PlayKind::BreakPoint);
        assert_eq!(output.flash_state["1"].len(), 1);
        assert!(output.flash_state["1"].contains_key(&Side::Away));
    }

    #[test]
    fn test_reconcile_keeps_events_unchanged_and_ordered() {
        let snapshot = vec![live_event(9, 0, 0, 0), live_event(3, 1, 0, 0)];
        let output = reconcile(snapshot.clone());
        assert_eq!(output.events, snapshot);
    }

    #[test]
    fn test_consecutive_cycles_get_distinct_flash_stamps() {
        let first = reconcile(vec![live_event(1, 1, 0, 1)]);
        let second = reconcile(vec![live_event(1, 2, 0, 1)]);
        assert_ne!(
            first.flash_state["1"][&Side::Home],
            second.flash_state["1"][&Side::Home]
        );
    }

    #[test]
    fn test_maps_are_replaced_not_merged() {
        let first = reconcile(vec![live_event(1, 1, 0, 1)]);
        assert_eq!(first.play_labels.len(), 1);
        let second = reconcile(vec![live_event(2, 1, 0, 1)]);
        assert!(!second.play_labels.contains_key("1"));
        assert!(!second.flash_state.contains_key("1"));
    }

    #[test]
    fn test_run_builds_views() {
        let index = ReferenceIndex::build(
            &[Team {
                external_id: Some(10),
                name: Some("Tromsø".to_string()),
                country: Some("Norway".to_string()),
                league: Some("Eliteserien".to_string()),
            }],
            &[],
        );
        let event = RawEvent {
            home_team_id: Some(10),
            away_team_id: Some(20),
            status_desc: Some("3rd set".to_string()),
            home_set3: Some(14),
            away_set3: Some(12),
            home_sets_won: Some(1),
            away_sets_won: Some(1),
            round_name: Some("Final".to_string()),
            ..live_event(5, 0, 4, 1)
        };

        let cycle = Reconciler::default().run(vec![event], &index);
        let view = &cycle.views[0];
        assert_eq!(view.identity, "5");
        assert_eq!(view.group, ClassificationGroup::HomeFederation);
        assert_eq!(view.point.set_number, Some(3));
        assert_eq!(view.point.home, Some(14));
        assert_eq!(view.serve.serving_side, Some(Side::Away));
        assert_eq!(view.play_label.unwrap().kind, PlayKind::BreakPoint);
        assert!(view.flash.as_ref().unwrap().contains_key(&Side::Away));
        assert!(view.is_live);
        assert_eq!(view.metadata.country.as_ref().unwrap().code, "NO");
        assert_eq!(view.metadata.league_label.as_deref(), Some("Eliteserien"));
        assert_eq!(view.metadata.stage_label.as_deref(), Some("Finale"));
    }

    #[test]
    fn test_run_with_unpopulated_index_degrades() {
        let cycle =
            Reconciler::default().run(vec![live_event(1, 0, 0, 0)], &ReferenceIndex::empty());
        assert_eq!(cycle.views[0].group, ClassificationGroup::Other);
        assert!(cycle.views[0].home_federation_players.is_empty());
    }

    #[test]
    fn test_is_live_status() {
        assert!(is_live_status(Some("inprogress")));
        assert!(is_live_status(Some(" LIVE ")));
        assert!(!is_live_status(Some("finished")));
        assert!(!is_live_status(None));
    }
}
