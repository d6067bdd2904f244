use lodestone_core::{Address, BlockIndex, RawState};

use crate::documents::{
    ArenaInformationDocument, ArenaParticipantDocument, ArenaScoreDocument, AvatarDocument,
    EntityDocument, InventoryDocument, ItemSlotDocument, RuneSlotDocument, TableSheetDocument,
};
use crate::error::ConvertError;
use crate::state::{
    ArenaInformation, ArenaParticipant, ArenaScore, AvatarState, Inventory, ItemSlotState,
    RuneSlotState, RuneState, SimplifiedAvatar,
};

/// The closed set of entity kinds the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Avatar,
    Inventory,
    ItemSlot,
    RuneSlot,
    ArenaParticipant,
    ArenaScore,
    ArenaInformation,
    TableSheet,
}

/// The block position and owning address a conversion happens at.
#[derive(Debug, Clone, Copy)]
pub struct StateContext {
    pub block_index: BlockIndex,
    pub address: Address,
}

/// Parameters for one conversion.
///
/// Kinds that compose the output of other reads (rune states for avatars,
/// the simplified avatar projection for arena participants) receive those
/// reads here, already performed by the orchestrator. Conversion itself
/// never does I/O.
#[derive(Debug, Clone)]
pub enum ConvertParams<'a> {
    /// A single decoded state; accepted by Inventory, ItemSlot and RuneSlot.
    State(&'a RawState),
    /// Avatar state plus the avatar's resolved rune states.
    Avatar {
        state: &'a RawState,
        runes: &'a [RuneState],
    },
    /// Arena state scoped to a championship round; accepted by ArenaScore
    /// and ArenaInformation.
    Arena {
        state: &'a RawState,
        championship_id: i32,
        round: i32,
    },
    /// Participant state plus the pre-fetched avatar projection.
    ArenaParticipant {
        state: &'a RawState,
        championship_id: i32,
        round: i32,
        avatar: &'a SimplifiedAvatar,
    },
    /// A table sheet payload; the sheet value is a CSV string, not a
    /// decoded state.
    TableSheet { name: &'a str, csv: &'a str },
}

/// Convert a resolved state into the document for `kind`.
///
/// The output document's identity key always equals `ctx.address`. A
/// kind/params mismatch fails with `UnsupportedOperation` so a wrong call
/// site fails loudly instead of emitting a partial document.
pub fn convert(
    kind: EntityKind,
    ctx: &StateContext,
    params: &ConvertParams<'_>,
) -> Result<EntityDocument, ConvertError> {
    match (kind, params) {
        (EntityKind::Avatar, ConvertParams::Avatar { state, runes }) => {
            let avatar = AvatarState::from_state(ctx.address, state, Inventory::default())?;
            Ok(EntityDocument::Avatar(AvatarDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                name: avatar.name,
                level: avatar.level,
                exp: avatar.exp,
                runes: runes.to_vec(),
            }))
        }
        (EntityKind::Inventory, ConvertParams::State(state)) => {
            let inventory = Inventory::from_state(state)?;
            Ok(EntityDocument::Inventory(InventoryDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                inventory,
            }))
        }
        (EntityKind::ItemSlot, ConvertParams::State(state)) => {
            let item_slot = ItemSlotState::from_state(state)?;
            Ok(EntityDocument::ItemSlot(ItemSlotDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                item_slot,
            }))
        }
        (EntityKind::RuneSlot, ConvertParams::State(state)) => {
            let slots = RuneSlotState::from_state(state)?;
            Ok(EntityDocument::RuneSlot(RuneSlotDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                slots: slots.slots,
            }))
        }
        (
            EntityKind::ArenaParticipant,
            ConvertParams::ArenaParticipant {
                state,
                championship_id,
                round,
                avatar,
            },
        ) => {
            let participant = ArenaParticipant::from_state(state)?;
            Ok(EntityDocument::ArenaParticipant(ArenaParticipantDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                championship_id: *championship_id,
                round: *round,
                participant,
                simple_avatar: (*avatar).clone(),
            }))
        }
        (
            EntityKind::ArenaScore,
            ConvertParams::Arena {
                state,
                championship_id,
                round,
            },
        ) => {
            let score = ArenaScore::from_state(state)?;
            Ok(EntityDocument::ArenaScore(ArenaScoreDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                championship_id: *championship_id,
                round: *round,
                score: score.score,
            }))
        }
        (
            EntityKind::ArenaInformation,
            ConvertParams::Arena {
                state,
                championship_id,
                round,
            },
        ) => {
            let information = ArenaInformation::from_state(state)?;
            Ok(EntityDocument::ArenaInformation(ArenaInformationDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                championship_id: *championship_id,
                round: *round,
                information,
            }))
        }
        (EntityKind::TableSheet, ConvertParams::TableSheet { name, csv }) => {
            Ok(EntityDocument::TableSheet(TableSheetDocument {
                block_index: ctx.block_index,
                address: ctx.address,
                name: (*name).to_owned(),
                sheet_csv: (*csv).to_owned(),
            }))
        }
        (kind, _) => Err(ConvertError::UnsupportedOperation { kind }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use lodestone_core::{Address, RawState};
    use serde_json::json;

    use super::{convert, ConvertParams, EntityKind, StateContext};
    use crate::documents::EntityDocument;
    use crate::error::ConvertError;
    use crate::state::{RuneState, SimplifiedAvatar};

    const ADDR: &str = "00000000000000000000000000000000000000aa";

    fn ctx() -> StateContext {
        StateContext {
            block_index: 100,
            address: Address::from_hex(ADDR).unwrap(),
        }
    }

    fn simple_avatar() -> SimplifiedAvatar {
        SimplifiedAvatar {
            address: Address::from_hex(ADDR).unwrap(),
            name: "saeta".to_owned(),
            level: 31,
        }
    }

    #[test]
    fn test_avatar_conversion() {
        let state = RawState::decode(Some(json!([2, "saeta", 31, 900]))).unwrap();
        let runes = vec![RuneState {
            rune_sheet_id: 10_001,
            level: 5,
        }];
        let params = ConvertParams::Avatar {
            state: &state,
            runes: &runes,
        };
        let doc = convert(EntityKind::Avatar, &ctx(), &params).unwrap();
        assert_eq!(doc.address(), ctx().address);
        assert_eq!(doc.block_index(), 100);
        assert_matches!(doc, EntityDocument::Avatar(inner) => {
            assert_eq!(inner.name, "saeta");
            assert_eq!(inner.runes.len(), 1);
        });
    }

    #[test]
    fn test_every_plain_kind_converts() {
        let inventory = RawState::decode(Some(json!([{ "item_sheet_id": 1, "count": 2 }]))).unwrap();
        let item_slot = RawState::decode(Some(json!([1, [], []]))).unwrap();
        let rune_slot = RawState::decode(Some(json!([1, [[0, 0, 1, false, null]]]))).unwrap();

        for (kind, state) in [
            (EntityKind::Inventory, &inventory),
            (EntityKind::ItemSlot, &item_slot),
            (EntityKind::RuneSlot, &rune_slot),
        ] {
            let doc = convert(kind, &ctx(), &ConvertParams::State(state)).unwrap();
            assert_eq!(doc.address(), ctx().address);
        }
    }

    #[test]
    fn test_arena_conversions() {
        let score_state = RawState::decode(Some(json!([ADDR, 1_512]))).unwrap();
        let info_state = RawState::decode(Some(json!([ADDR, 4, 2, 6]))).unwrap();
        let participant_state =
            RawState::decode(Some(json!([ADDR, "saeta", 31, 120_000, 1_512, 6, 4, 2]))).unwrap();

        let score = convert(
            EntityKind::ArenaScore,
            &ctx(),
            &ConvertParams::Arena {
                state: &score_state,
                championship_id: 7,
                round: 2,
            },
        )
        .unwrap();
        assert_matches!(score, EntityDocument::ArenaScore(inner) => {
            assert_eq!(inner.score, 1_512);
            assert_eq!(inner.championship_id, 7);
        });

        let info = convert(
            EntityKind::ArenaInformation,
            &ctx(),
            &ConvertParams::Arena {
                state: &info_state,
                championship_id: 7,
                round: 2,
            },
        )
        .unwrap();
        assert_eq!(info.address(), ctx().address);

        let avatar = simple_avatar();
        let participant = convert(
            EntityKind::ArenaParticipant,
            &ctx(),
            &ConvertParams::ArenaParticipant {
                state: &participant_state,
                championship_id: 7,
                round: 2,
                avatar: &avatar,
            },
        )
        .unwrap();
        assert_matches!(participant, EntityDocument::ArenaParticipant(inner) => {
            assert_eq!(inner.simple_avatar.name, "saeta");
            assert_eq!(inner.participant.win, 4);
        });
    }

    #[test]
    fn test_table_sheet_conversion() {
        let doc = convert(
            EntityKind::TableSheet,
            &ctx(),
            &ConvertParams::TableSheet {
                name: "RuneListSheet",
                csv: "id,grade\n10001,1",
            },
        )
        .unwrap();
        assert_matches!(doc, EntityDocument::TableSheet(inner) => {
            assert_eq!(inner.name, "RuneListSheet");
        });
    }

    #[test]
    fn test_mismatched_params_fail_loudly() {
        let state = RawState::decode(Some(json!([2, "saeta", 31, 900]))).unwrap();
        let avatar = simple_avatar();

        // An arena kind without championship context.
        let result = convert(EntityKind::ArenaScore, &ctx(), &ConvertParams::State(&state));
        assert_matches!(
            result,
            Err(ConvertError::UnsupportedOperation {
                kind: EntityKind::ArenaScore
            })
        );

        // A plain kind with arena context.
        let result = convert(
            EntityKind::Inventory,
            &ctx(),
            &ConvertParams::ArenaParticipant {
                state: &state,
                championship_id: 7,
                round: 2,
                avatar: &avatar,
            },
        );
        assert_matches!(
            result,
            Err(ConvertError::UnsupportedOperation {
                kind: EntityKind::Inventory
            })
        );

        // Avatar without its rune reads.
        let result = convert(EntityKind::Avatar, &ctx(), &ConvertParams::State(&state));
        assert_matches!(
            result,
            Err(ConvertError::UnsupportedOperation {
                kind: EntityKind::Avatar
            })
        );
    }
}
