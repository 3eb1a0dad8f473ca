pub mod lenient;
pub mod raw;
pub mod reference;
pub mod view;

pub use raw::{RawEvent, decode_snapshot};
pub use reference::{Player, Team, decode_collection};
pub use view::{
    ClassificationGroup, CountryLabel, EventMetadata, EventView, FlashStamp, FlashState, PlayKind,
    PlayLabel, PlayLabelState, PointState, ServeEmphasis, ServeSignal, Side,
};
