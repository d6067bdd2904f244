use lodestone_core::RawState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field_i64;
use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_sheet_id: i64,
    pub count: i64,
    pub locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    /// Parse an inventory list. An absent state is an empty inventory: the
    /// chain only materializes the record once the avatar owns something.
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = match state {
            RawState::Absent => return Ok(Inventory::default()),
            RawState::List(items) => items,
            RawState::Dictionary(_) => return Err(ModelError::UnexpectedShape("inventory")),
        };

        let items = items
            .iter()
            .map(parse_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Inventory { items })
    }
}

fn parse_item(value: &Value) -> Result<InventoryItem, ModelError> {
    let fields = value
        .as_object()
        .ok_or(ModelError::UnexpectedShape("inventory item"))?;
    Ok(InventoryItem {
        item_sheet_id: field_i64(fields, "item_sheet_id")?,
        count: field_i64(fields, "count")?,
        locked: fields
            .get("locked")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
