//! Typed views over raw chain state.
//!
//! Parsers accept the layouts the chain actually stores: current-layout
//! records are positional lists, while records written before the account
//! split are field dictionaries. Both layouts remain readable indefinitely
//! because historical state was never migrated in place.

mod arena;
mod avatar;
mod inventory;
mod slots;

pub use self::arena::{ArenaInformation, ArenaParticipant, ArenaScore};
pub use self::avatar::{AvatarState, SimplifiedAvatar};
pub use self::inventory::{Inventory, InventoryItem};
pub use self::slots::{ItemSlotState, RuneSlot, RuneSlotState, RuneState};

use serde_json::Value;

use crate::error::ModelError;

pub(crate) fn field_str<'a>(
    fields: &'a serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, ModelError> {
    fields
        .get(name)
        .ok_or(ModelError::MissingField(name))?
        .as_str()
        .ok_or(ModelError::InvalidField(name))
}

pub(crate) fn field_i64(
    fields: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<i64, ModelError> {
    fields
        .get(name)
        .ok_or(ModelError::MissingField(name))?
        .as_i64()
        .ok_or(ModelError::InvalidField(name))
}

pub(crate) fn item_str<'a>(items: &'a [Value], index: usize, name: &'static str) -> Result<&'a str, ModelError> {
    items
        .get(index)
        .ok_or(ModelError::MissingField(name))?
        .as_str()
        .ok_or(ModelError::InvalidField(name))
}

pub(crate) fn item_i64(items: &[Value], index: usize, name: &'static str) -> Result<i64, ModelError> {
    items
        .get(index)
        .ok_or(ModelError::MissingField(name))?
        .as_i64()
        .ok_or(ModelError::InvalidField(name))
}
