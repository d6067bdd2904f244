use lodestone_core::RawState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item_i64;
use crate::error::ModelError;

/// Equipment and costumes picked for arena battles.
///
/// The chain stores this as `[battle_type, [costume ids], [equipment ids]]`.
/// An avatar that never entered the arena has no record at all, which maps to
/// the empty default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSlotState {
    pub costumes: Vec<i64>,
    pub equipments: Vec<String>,
}

impl ItemSlotState {
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = match state {
            RawState::Absent => return Ok(ItemSlotState::default()),
            RawState::List(items) => items,
            RawState::Dictionary(_) => return Err(ModelError::UnexpectedShape("item slot")),
        };

        let costumes = items
            .get(1)
            .and_then(Value::as_array)
            .ok_or(ModelError::MissingField("costumes"))?
            .iter()
            .map(|v| v.as_i64().ok_or(ModelError::InvalidField("costumes")))
            .collect::<Result<Vec<_>, _>>()?;
        let equipments = items
            .get(2)
            .and_then(Value::as_array)
            .ok_or(ModelError::MissingField("equipments"))?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or(ModelError::InvalidField("equipments"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ItemSlotState {
            costumes,
            equipments,
        })
    }
}

/// One rune slot: `[slot_index, slot_type, rune_type, is_lock, rune_id?]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuneSlot {
    pub slot_index: i64,
    pub slot_type: i64,
    pub rune_type: i64,
    pub is_lock: bool,
    pub rune_sheet_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuneSlotState {
    pub slots: Vec<RuneSlot>,
}

impl RuneSlotState {
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = match state {
            RawState::Absent => return Ok(RuneSlotState::default()),
            RawState::List(items) => items,
            RawState::Dictionary(_) => return Err(ModelError::UnexpectedShape("rune slot")),
        };

        let slots = items
            .get(1)
            .and_then(Value::as_array)
            .ok_or(ModelError::MissingField("slots"))?
            .iter()
            .map(parse_slot)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuneSlotState { slots })
    }

    /// Sheet ids of the runes currently equipped, in slot order.
    pub fn equipped_rune_ids(&self) -> Vec<i64> {
        self.slots
            .iter()
            .filter_map(|slot| slot.rune_sheet_id)
            .collect()
    }
}

fn parse_slot(value: &Value) -> Result<RuneSlot, ModelError> {
    let items = value
        .as_array()
        .ok_or(ModelError::UnexpectedShape("rune slot entry"))?;
    Ok(RuneSlot {
        slot_index: item_i64(items, 0, "slot_index")?,
        slot_type: item_i64(items, 1, "slot_type")?,
        rune_type: item_i64(items, 2, "rune_type")?,
        is_lock: items
            .get(3)
            .and_then(Value::as_bool)
            .ok_or(ModelError::MissingField("is_lock"))?,
        rune_sheet_id: items.get(4).and_then(Value::as_i64),
    })
}

/// A rune owned by an avatar: `[rune_sheet_id, level]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuneState {
    pub rune_sheet_id: i64,
    pub level: i64,
}

impl RuneState {
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = state
            .as_list()
            .ok_or(ModelError::UnexpectedShape("rune state"))?;
        Ok(RuneState {
            rune_sheet_id: item_i64(items, 0, "rune_sheet_id")?,
            level: item_i64(items, 1, "level")?,
        })
    }
}
