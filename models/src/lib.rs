//! Typed chain models, output documents, and the state-to-document
//! converters.
//!
//! Everything in this crate is pure data reshaping: no I/O happens here, so
//! each converter can be tested against a raw state value in isolation.

mod convert;
mod documents;
mod error;
mod state;

pub use self::convert::{convert, ConvertParams, EntityKind, StateContext};
pub use self::documents::{
    collections, ArenaInformationDocument, ArenaParticipantDocument, ArenaScoreDocument,
    AvatarDocument, EntityDocument, InventoryDocument, ItemSlotDocument, RuneSlotDocument,
    TableSheetDocument,
};
pub use self::error::{ConvertError, ModelError};
pub use self::state::{
    ArenaInformation, ArenaParticipant, ArenaScore, AvatarState, Inventory, InventoryItem,
    ItemSlotState, RuneSlot, RuneSlotState, RuneState, SimplifiedAvatar,
};
