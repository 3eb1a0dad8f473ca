//! Host-side polling: a superseding live poller and the copy-on-read
//! reference store it reconciles against.
//!
//! Only the most recently started poll may publish. Starting a poll aborts
//! whatever poll is still in flight, and a poll that finishes after being
//! superseded is dropped before it touches the published cycle.

use crate::data_fetcher::api::{fetch_live_snapshot, fetch_reference_collections};
use crate::data_fetcher::models::{Player, RawEvent, Team};
use crate::data_fetcher::processors::{ReconciledCycle, Reconciler, ReferenceIndex};
use crate::error::AppError;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Latest reconciled cycle, `None` until the first poll publishes.
pub type PublishedCycle = Option<Arc<ReconciledCycle>>;

type PollReply = oneshot::Sender<Result<Arc<ReconciledCycle>, AppError>>;

/// Reference collections plus the index built from them.
///
/// Readers take an `Arc` of the current index and keep it for a whole cycle;
/// a refresh swaps a new index in without disturbing cycles already running.
#[derive(Debug)]
pub struct ReferenceStore {
    inner: RwLock<ReferenceState>,
}

#[derive(Debug)]
struct ReferenceState {
    teams: Option<Vec<Team>>,
    players: Option<Vec<Player>>,
    index: Arc<ReferenceIndex>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ReferenceState {
                teams: None,
                players: None,
                index: Arc::new(ReferenceIndex::empty()),
            }),
        }
    }

    /// Current index snapshot. May be unpopulated.
    pub async fn snapshot(&self) -> Arc<ReferenceIndex> {
        Arc::clone(&self.inner.read().await.index)
    }

    /// Current index snapshot, or `ReferenceIndexUnavailable` if teams were never loaded.
    pub async fn require_populated(&self) -> Result<Arc<ReferenceIndex>, AppError> {
        let index = self.snapshot().await;
        if index.is_populated() {
            Ok(index)
        } else {
            Err(AppError::ReferenceIndexUnavailable)
        }
    }

    pub async fn replace_teams(&self, teams: Vec<Team>) {
        let mut state = self.inner.write().await;
        state.teams = Some(teams);
        state.rebuild();
    }

    pub async fn replace_players(&self, players: Vec<Player>) {
        let mut state = self.inner.write().await;
        state.players = Some(players);
        state.rebuild();
    }

    /// Applies the outcome of one reference fetch round.
    ///
    /// A failed collection keeps its previous contents. Returns `true` when at
    /// least one collection was replaced.
    pub async fn apply(
        &self,
        teams: Result<Vec<Team>, AppError>,
        players: Result<Vec<Player>, AppError>,
    ) -> bool {
        let mut state = self.inner.write().await;
        let mut changed = false;

        match teams {
            Ok(teams) => {
                state.teams = Some(teams);
                changed = true;
            }
            Err(e) => warn!("Team reference fetch failed, keeping previous teams: {}", e),
        }
        match players {
            Ok(players) => {
                state.players = Some(players);
                changed = true;
            }
            Err(e) => warn!("Player reference fetch failed, keeping previous players: {}", e),
        }

        if changed {
            state.rebuild();
        }
        changed
    }

    /// Fetches both reference collections and applies them.
    pub async fn refresh(&self, client: &Client, api_domain: &str) -> bool {
        let (teams, players) = fetch_reference_collections(client, api_domain).await;
        self.apply(teams, players).await
    }
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceState {
    fn rebuild(&mut self) {
        let Some(teams) = &self.teams else {
            debug!("Teams not loaded yet, reference index stays unpopulated");
            return;
        };
        let players = self.players.as_deref().unwrap_or_default();
        let index = ReferenceIndex::build(teams, players);
        info!(
            "Reference index rebuilt: {} teams, {} players",
            index.team_count(),
            index.player_count()
        );
        self.index = Arc::new(index);
    }
}

/// Where live snapshots come from.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawEvent>, AppError>> + Send;
}

/// Fetches live snapshots from the configured API.
#[derive(Debug, Clone)]
pub struct ApiSource {
    client: Client,
    api_domain: String,
}

impl ApiSource {
    pub fn new(client: Client, api_domain: impl Into<String>) -> Self {
        Self {
            client,
            api_domain: api_domain.into(),
        }
    }
}

impl SnapshotSource for ApiSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawEvent>, AppError>> + Send {
        fetch_live_snapshot(&self.client, &self.api_domain)
    }
}

#[derive(Debug, Default)]
struct PollState {
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

/// Runs at most one live poll at a time and publishes each completed,
/// non-superseded cycle on a watch channel.
pub struct LivePoller<S> {
    source: Arc<S>,
    references: Arc<ReferenceStore>,
    reconciler: Arc<Reconciler>,
    state: Arc<Mutex<PollState>>,
    published: Arc<watch::Sender<PublishedCycle>>,
}

impl<S: SnapshotSource> LivePoller<S> {
    pub fn new(source: S, references: Arc<ReferenceStore>, reconciler: Reconciler) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            source: Arc::new(source),
            references,
            reconciler: Arc::new(reconciler),
            state: Arc::new(Mutex::new(PollState::default())),
            published: Arc::new(published),
        }
    }

    pub fn references(&self) -> &Arc<ReferenceStore> {
        &self.references
    }

    /// Receiver that observes every published cycle.
    pub fn subscribe(&self) -> watch::Receiver<PublishedCycle> {
        self.published.subscribe()
    }

    /// Most recently published cycle.
    pub fn latest(&self) -> PublishedCycle {
        self.published.borrow().clone()
    }

    /// Generation of the most recently started poll.
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    /// Starts a poll in the background, superseding any poll in flight.
    /// Returns the new poll's generation.
    pub async fn start_poll(&self) -> u64 {
        self.spawn_poll(None).await
    }

    /// Starts a poll and waits for its result.
    ///
    /// Returns `PollSuperseded` if another poll was started before this one
    /// could publish.
    pub async fn poll_now(&self) -> Result<Arc<ReconciledCycle>, AppError> {
        let (reply, result) = oneshot::channel();
        let generation = self.spawn_poll(Some(reply)).await;

        match result.await {
            Ok(result) => result,
            // Task aborted before replying
            Err(_) => Err(AppError::poll_superseded(
                generation,
                self.generation().await,
            )),
        }
    }

    /// Aborts the poll in flight, if any.
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }
        // Bumped so a poll that already passed its fetch cannot publish
        state.generation += 1;
    }

    async fn spawn_poll(&self, reply: Option<PollReply>) -> u64 {
        let mut state = self.state.lock().await;
        state.generation += 1;
        let generation = state.generation;

        if let Some(previous) = state.in_flight.take() {
            if !previous.is_finished() {
                debug!("Poll {} supersedes the poll in flight", generation);
            }
            previous.abort();
        }

        let task = PollTask {
            generation,
            source: Arc::clone(&self.source),
            references: Arc::clone(&self.references),
            reconciler: Arc::clone(&self.reconciler),
            state: Arc::clone(&self.state),
            published: Arc::clone(&self.published),
        };

        state.in_flight = Some(tokio::spawn(async move {
            let result = task.run().await;
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
        }));

        generation
    }
}

impl<S> Drop for LivePoller<S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_lock()
            && let Some(handle) = state.in_flight.take()
        {
            handle.abort();
        }
    }
}

struct PollTask<S> {
    generation: u64,
    source: Arc<S>,
    references: Arc<ReferenceStore>,
    reconciler: Arc<Reconciler>,
    state: Arc<Mutex<PollState>>,
    published: Arc<watch::Sender<PublishedCycle>>,
}

impl<S: SnapshotSource> PollTask<S> {
    async fn run(self) -> Result<Arc<ReconciledCycle>, AppError> {
        let snapshot = self.source.fetch().await.inspect_err(|e| {
            warn!("Poll {} failed to fetch snapshot: {}", self.generation, e);
        })?;

        // One index snapshot for the whole cycle
        let index = self.references.snapshot().await;
        let cycle = Arc::new(self.reconciler.run(snapshot, &index));

        // Generation check and publish under the same lock
        let state = self.state.lock().await;
        if state.generation != self.generation {
            debug!(
                "Discarding poll {} result, poll {} is current",
                self.generation, state.generation
            );
            return Err(AppError::poll_superseded(self.generation, state.generation));
        }
        self.published.send_replace(Some(Arc::clone(&cycle)));
        Ok(cycle)
    }
}
