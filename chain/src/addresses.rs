//! Storage address derivation.
//!
//! Every derived location uses the keyed-hash formula from
//! [`Address::derive`]; the key strings below are part of the chain's
//! storage convention and must not change.

use lodestone_core::{accounts, Address};

/// Legacy per-avatar inventory location, used as the fallback when the
/// current-layout inventory account has no record.
pub fn legacy_inventory(avatar: Address) -> Address {
    avatar.derive("inventory")
}

pub fn item_slot(avatar: Address) -> Address {
    avatar.derive("item_slot_arena")
}

pub fn rune_slot(avatar: Address) -> Address {
    avatar.derive("rune_slot_arena")
}

pub fn rune_state(avatar: Address, rune_sheet_id: i64) -> Address {
    avatar.derive(&format!("rune_state_{rune_sheet_id}"))
}

pub fn arena_participants(championship_id: i32, round: i32) -> Address {
    accounts::ARENA.derive(&format!("arena_participants_{championship_id}_{round}"))
}

pub fn arena_participant(avatar: Address, championship_id: i32, round: i32) -> Address {
    avatar.derive(&format!("arena_participant_{championship_id}_{round}"))
}

pub fn arena_score(avatar: Address, championship_id: i32, round: i32) -> Address {
    avatar.derive(&format!("arena_score_{championship_id}_{round}"))
}

pub fn arena_information(avatar: Address, championship_id: i32, round: i32) -> Address {
    avatar.derive(&format!("arena_information_{championship_id}_{round}"))
}

pub fn table_sheet(name: &str) -> Address {
    accounts::TABLE_SHEET.derive(name)
}
