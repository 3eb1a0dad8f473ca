pub mod api;
pub mod cache;
pub mod models;
pub mod processors;

pub use api::{fetch_live_snapshot, fetch_reference_collections};
pub use models::{EventView, Player, RawEvent, Team};
