//! Live volleyball scoreboard engine.
//!
//! Turns stateless per-poll snapshots of live matches into stable per-event
//! views: current set and point, serving side and run, break-point / side-out
//! labels, audience classification relative to a tracked federation, and
//! tournament / season / country / league / stage metadata.
//!
//! # Examples
//!
//! ```rust
//! use volley_live::data_fetcher::models::{ClassificationGroup, RawEvent, Side, Team};
//! use volley_live::data_fetcher::processors::{Reconciler, ReferenceIndex};
//!
//! let index = ReferenceIndex::build(
//!     &[Team {
//!         external_id: Some(10),
//!         name: Some("Tromsø".to_string()),
//!         country: Some("Norway".to_string()),
//!         league: None,
//!     }],
//!     &[],
//! );
//! let event = RawEvent {
//!     event_id: Some(1),
//!     home_team_id: Some(10),
//!     status_desc: Some("1st set".to_string()),
//!     home_set1: Some(8),
//!     away_set1: Some(5),
//!     home_point_run: Some(2),
//!     away_point_run: Some(0),
//!     new_score: Some(1),
//!     ..Default::default()
//! };
//!
//! let cycle = Reconciler::default().run(vec![event], &index);
//! let view = &cycle.views[0];
//! assert_eq!(view.group, ClassificationGroup::HomeFederation);
//! assert_eq!(view.serve.serving_side, Some(Side::Home));
//! assert_eq!(view.point.home, Some(8));
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod poller;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::models::{EventView, RawEvent};
pub use data_fetcher::processors::{ReconciledCycle, Reconciler, ReferenceIndex, reconcile};
pub use error::AppError;
pub use poller::{LivePoller, ReferenceStore};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
