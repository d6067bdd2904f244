use lodestone_core::{accounts, Address, BlockIndex, RawState};
use lodestone_models::{AvatarState, Inventory, ModelError, RuneSlotState, RuneState};
use serde_json::Value;
use tracing::debug;

use crate::addresses;
use crate::service::{StateError, StateService};

/// Resolves logical entities from their candidate storage locations.
///
/// Schema migrations on the chain never rewrote historical data, so every
/// read must tolerate both the current account layout and the legacy
/// top-level layout. Centralizing the two-step probe here keeps that rule
/// out of the converters.
pub struct StateResolver<S> {
    service: S,
}

impl<S> StateResolver<S>
where
    S: StateService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Resolve an entity whose legacy location is the entity address itself.
    ///
    /// The current-layout fetch always runs first; the legacy address is
    /// only probed after a miss, never speculatively.
    pub async fn resolve(&self, entity: Address, account: Address) -> Result<RawState, StateError> {
        self.resolve_with_legacy(entity, account, entity).await
    }

    /// Resolve an entity whose legacy location is not derivable by formula
    /// from the entity address and must be supplied by the caller.
    pub async fn resolve_with_legacy(
        &self,
        entity: Address,
        account: Address,
        legacy: Address,
    ) -> Result<RawState, StateError> {
        match self.service.get_account_state(entity, account).await {
            Ok(Some(value)) => Ok(RawState::decode(Some(value))?),
            Ok(None) | Err(StateError::NotFound) => {
                debug!(entity = %entity, legacy = %legacy, "current layout miss, probing legacy address");
                self.fetch_optional(legacy).await
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch a legacy-account address, mapping a missing record to `Absent`.
    async fn fetch_optional(&self, address: Address) -> Result<RawState, StateError> {
        match self.service.get_state(address).await {
            Ok(value) => Ok(RawState::decode(value)?),
            Err(StateError::NotFound) => Ok(RawState::Absent),
            Err(err) => Err(err),
        }
    }

    pub async fn get_tip(&self) -> Result<BlockIndex, StateError> {
        self.service.get_tip().await
    }

    /// Raw avatar state; a miss in both layouts is `NotFound` because an
    /// avatar, unlike its satellite records, must exist.
    pub async fn get_avatar_state(&self, avatar: Address) -> Result<RawState, StateError> {
        let state = self.resolve(avatar, accounts::AVATAR).await?;
        if state.is_absent() {
            return Err(StateError::NotFound);
        }
        Ok(state)
    }

    /// Typed avatar with its inventory attached.
    pub async fn get_avatar(&self, avatar: Address) -> Result<AvatarState, StateError> {
        let state = self.get_avatar_state(avatar).await?;
        let inventory_state = self.get_inventory_state(avatar).await?;
        let inventory = Inventory::from_state(&inventory_state)?;
        Ok(AvatarState::from_state(avatar, &state, inventory)?)
    }

    /// Inventory moved from a derived per-avatar path to its own account;
    /// the old path stays readable through the explicit legacy address.
    pub async fn get_inventory_state(&self, avatar: Address) -> Result<RawState, StateError> {
        let legacy = addresses::legacy_inventory(avatar);
        self.resolve_with_legacy(avatar, accounts::INVENTORY, legacy)
            .await
    }

    pub async fn get_item_slot_state(&self, avatar: Address) -> Result<RawState, StateError> {
        self.fetch_optional(addresses::item_slot(avatar)).await
    }

    pub async fn get_rune_slot_state(&self, avatar: Address) -> Result<RawState, StateError> {
        self.fetch_optional(addresses::rune_slot(avatar)).await
    }

    /// The rune states equipped in the avatar's arena rune slots. Runes
    /// whose record is missing are skipped.
    pub async fn get_rune_states(&self, avatar: Address) -> Result<Vec<RuneState>, StateError> {
        let slot_state = self.get_rune_slot_state(avatar).await?;
        let slots = RuneSlotState::from_state(&slot_state)?;

        let mut runes = Vec::new();
        for rune_sheet_id in slots.equipped_rune_ids() {
            let state = self
                .fetch_optional(addresses::rune_state(avatar, rune_sheet_id))
                .await?;
            if state.is_absent() {
                continue;
            }
            runes.push(RuneState::from_state(&state)?);
        }
        Ok(runes)
    }

    /// Avatar addresses enrolled in a championship round.
    pub async fn get_arena_participants(
        &self,
        championship_id: i32,
        round: i32,
    ) -> Result<Vec<Address>, StateError> {
        let state = self
            .fetch_optional(addresses::arena_participants(championship_id, round))
            .await?;
        let items = match &state {
            RawState::Absent => return Ok(Vec::new()),
            RawState::List(items) => items,
            RawState::Dictionary(_) => {
                return Err(ModelError::UnexpectedShape("arena participants").into())
            }
        };

        items
            .iter()
            .map(|item| {
                let hex = item
                    .as_str()
                    .ok_or(ModelError::InvalidField("participants"))?;
                Address::from_hex(hex)
                    .map_err(ModelError::from)
                    .map_err(StateError::from)
            })
            .collect()
    }

    pub async fn get_arena_participant_state(
        &self,
        avatar: Address,
        championship_id: i32,
        round: i32,
    ) -> Result<RawState, StateError> {
        self.fetch_optional(addresses::arena_participant(avatar, championship_id, round))
            .await
    }

    pub async fn get_arena_score_state(
        &self,
        avatar: Address,
        championship_id: i32,
        round: i32,
    ) -> Result<RawState, StateError> {
        self.fetch_optional(addresses::arena_score(avatar, championship_id, round))
            .await
    }

    pub async fn get_arena_information_state(
        &self,
        avatar: Address,
        championship_id: i32,
        round: i32,
    ) -> Result<RawState, StateError> {
        self.fetch_optional(addresses::arena_information(avatar, championship_id, round))
            .await
    }

    /// A table sheet is a CSV string keyed by sheet name. Returns the sheet
    /// address alongside the payload; `None` when the sheet does not exist.
    pub async fn get_sheet(&self, name: &str) -> Result<Option<(Address, String)>, StateError> {
        let address = addresses::table_sheet(name);
        match self.service.get_state(address).await {
            Ok(Some(Value::String(csv))) => Ok(Some((address, csv))),
            Ok(Some(_)) => Err(ModelError::UnexpectedShape("table sheet").into()),
            Ok(None) | Err(StateError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
