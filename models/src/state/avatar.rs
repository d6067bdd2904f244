use lodestone_core::{Address, RawState};
use serde::{Deserialize, Serialize};

use super::{field_i64, field_str, item_i64, item_str, Inventory};
use crate::error::ModelError;

/// An avatar resolved from chain state, with its inventory attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarState {
    pub address: Address,
    pub name: String,
    pub level: i64,
    pub exp: i64,
    pub inventory: Inventory,
}

/// The avatar projection embedded into other documents (arena entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedAvatar {
    pub address: Address,
    pub name: String,
    pub level: i64,
}

impl AvatarState {
    /// Parse an avatar from either storage layout.
    ///
    /// The current layout is a positional list `[version, name, level, exp,
    /// ..]`; the legacy layout is a field dictionary.
    pub fn from_state(
        address: Address,
        state: &RawState,
        inventory: Inventory,
    ) -> Result<Self, ModelError> {
        let (name, level, exp) = parse_avatar_fields(state)?;
        Ok(AvatarState {
            address,
            name,
            level,
            exp,
            inventory,
        })
    }
}

impl SimplifiedAvatar {
    pub fn from_state(address: Address, state: &RawState) -> Result<Self, ModelError> {
        let (name, level, _) = parse_avatar_fields(state)?;
        Ok(SimplifiedAvatar {
            address,
            name,
            level,
        })
    }
}

impl From<&AvatarState> for SimplifiedAvatar {
    fn from(avatar: &AvatarState) -> Self {
        SimplifiedAvatar {
            address: avatar.address,
            name: avatar.name.clone(),
            level: avatar.level,
        }
    }
}

fn parse_avatar_fields(state: &RawState) -> Result<(String, i64, i64), ModelError> {
    match state {
        RawState::Dictionary(fields) => {
            let name = field_str(fields, "name")?.to_owned();
            let level = field_i64(fields, "level")?;
            let exp = field_i64(fields, "exp").unwrap_or(0);
            Ok((name, level, exp))
        }
        RawState::List(items) => {
            let name = item_str(items, 1, "name")?.to_owned();
            let level = item_i64(items, 2, "level")?;
            let exp = item_i64(items, 3, "exp").unwrap_or(0);
            Ok((name, level, exp))
        }
        RawState::Absent => Err(ModelError::UnexpectedShape("avatar")),
    }
}
