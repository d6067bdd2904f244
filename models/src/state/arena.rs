use lodestone_core::RawState;
use serde::{Deserialize, Serialize};

use super::{item_i64, item_str};
use crate::error::ModelError;

/// Arena score record: `[address, score]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaScore {
    pub score: i64,
}

impl ArenaScore {
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = state
            .as_list()
            .ok_or(ModelError::UnexpectedShape("arena score"))?;
        Ok(ArenaScore {
            score: item_i64(items, 1, "score")?,
        })
    }
}

/// Arena information record: `[address, win, lose, ticket, ..]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaInformation {
    pub win: i64,
    pub lose: i64,
    pub ticket: i64,
}

impl ArenaInformation {
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = state
            .as_list()
            .ok_or(ModelError::UnexpectedShape("arena information"))?;
        Ok(ArenaInformation {
            win: item_i64(items, 1, "win")?,
            lose: item_i64(items, 2, "lose")?,
            ticket: item_i64(items, 3, "ticket")?,
        })
    }
}

/// Per-avatar arena participant record:
/// `[address, name, level, cp, score, ticket, win, lose]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaParticipant {
    pub name: String,
    pub level: i64,
    pub cp: i64,
    pub score: i64,
    pub ticket: i64,
    pub win: i64,
    pub lose: i64,
}

impl ArenaParticipant {
    pub fn from_state(state: &RawState) -> Result<Self, ModelError> {
        let items = state
            .as_list()
            .ok_or(ModelError::UnexpectedShape("arena participant"))?;
        Ok(ArenaParticipant {
            name: item_str(items, 1, "name")?.to_owned(),
            level: item_i64(items, 2, "level")?,
            cp: item_i64(items, 3, "cp")?,
            score: item_i64(items, 4, "score")?,
            ticket: item_i64(items, 5, "ticket")?,
            win: item_i64(items, 6, "win")?,
            lose: item_i64(items, 7, "lose")?,
        })
    }
}
