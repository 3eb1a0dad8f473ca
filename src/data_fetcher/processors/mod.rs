pub mod aliases;
pub mod classifier;
pub mod identity;
pub mod metadata;
pub mod reconcile;
pub mod reference_index;
pub mod serve;

pub use aliases::{AliasTable, country_label, flag_glyph};
pub use classifier::{Federation, classify};
pub use identity::{current_point, event_identity};
pub use metadata::{MetadataInput, derive_metadata, league_label, stage_label};
pub use reconcile::{CycleOutput, ReconciledCycle, Reconciler, reconcile};
pub use reference_index::ReferenceIndex;
pub use serve::{derive_serve, is_new_point, next_flash_stamp, play_label, serve_signal};
