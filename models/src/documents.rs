use lodestone_core::{Address, BlockIndex};
use serde::{Deserialize, Serialize};

use crate::state::{
    ArenaInformation, ArenaParticipant, Inventory, ItemSlotState, RuneSlot, RuneState,
    SimplifiedAvatar,
};

/// Collection names, one per entity kind plus the metadata singleton.
pub mod collections {
    pub const AVATARS: &str = "avatars";
    pub const INVENTORIES: &str = "inventories";
    pub const ITEM_SLOTS: &str = "item_slots";
    pub const RUNE_SLOTS: &str = "rune_slots";
    pub const ARENA: &str = "arena";
    pub const ARENA_SCORES: &str = "arena_scores";
    pub const ARENA_INFORMATION: &str = "arena_information";
    pub const TABLE_SHEETS: &str = "table_sheets";
    pub const METADATA: &str = "metadata";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub name: String,
    pub level: i64,
    pub exp: i64,
    pub runes: Vec<RuneState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub inventory: Inventory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSlotDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub item_slot: ItemSlotState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuneSlotDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub slots: Vec<RuneSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaParticipantDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub championship_id: i32,
    pub round: i32,
    pub participant: ArenaParticipant,
    pub simple_avatar: SimplifiedAvatar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaScoreDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub championship_id: i32,
    pub round: i32,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaInformationDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub championship_id: i32,
    pub round: i32,
    pub information: ArenaInformation,
}

/// Table sheet document. The CSV payload is moved to the blob store on
/// write; only the file id survives in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSheetDocument {
    pub block_index: BlockIndex,
    pub address: Address,
    pub name: String,
    pub sheet_csv: String,
}

/// One output document per entity kind.
///
/// Documents are immutable value objects built fresh every cycle, so an
/// upsert is always a full replace: the store never holds a mix of old and
/// new fields for one business key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityDocument {
    Avatar(AvatarDocument),
    Inventory(InventoryDocument),
    ItemSlot(ItemSlotDocument),
    RuneSlot(RuneSlotDocument),
    ArenaParticipant(ArenaParticipantDocument),
    ArenaScore(ArenaScoreDocument),
    ArenaInformation(ArenaInformationDocument),
    TableSheet(TableSheetDocument),
}

impl EntityDocument {
    pub fn collection(&self) -> &'static str {
        match self {
            EntityDocument::Avatar(_) => collections::AVATARS,
            EntityDocument::Inventory(_) => collections::INVENTORIES,
            EntityDocument::ItemSlot(_) => collections::ITEM_SLOTS,
            EntityDocument::RuneSlot(_) => collections::RUNE_SLOTS,
            EntityDocument::ArenaParticipant(_) => collections::ARENA,
            EntityDocument::ArenaScore(_) => collections::ARENA_SCORES,
            EntityDocument::ArenaInformation(_) => collections::ARENA_INFORMATION,
            EntityDocument::TableSheet(_) => collections::TABLE_SHEETS,
        }
    }

    /// The business key used for upsert matching.
    pub fn address(&self) -> Address {
        match self {
            EntityDocument::Avatar(doc) => doc.address,
            EntityDocument::Inventory(doc) => doc.address,
            EntityDocument::ItemSlot(doc) => doc.address,
            EntityDocument::RuneSlot(doc) => doc.address,
            EntityDocument::ArenaParticipant(doc) => doc.address,
            EntityDocument::ArenaScore(doc) => doc.address,
            EntityDocument::ArenaInformation(doc) => doc.address,
            EntityDocument::TableSheet(doc) => doc.address,
        }
    }

    pub fn block_index(&self) -> BlockIndex {
        match self {
            EntityDocument::Avatar(doc) => doc.block_index,
            EntityDocument::Inventory(doc) => doc.block_index,
            EntityDocument::ItemSlot(doc) => doc.block_index,
            EntityDocument::RuneSlot(doc) => doc.block_index,
            EntityDocument::ArenaParticipant(doc) => doc.block_index,
            EntityDocument::ArenaScore(doc) => doc.block_index,
            EntityDocument::ArenaInformation(doc) => doc.block_index,
            EntityDocument::TableSheet(doc) => doc.block_index,
        }
    }
}
