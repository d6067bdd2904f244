use assert_matches::assert_matches;
use lodestone_chain::addresses;
use lodestone_core::{accounts, Address};
use lodestone_models::{collections, EntityDocument};
use lodestone_store::DocumentStore;
use lodestone_worker::{CycleOutcome, SyncWorker};
use serde_json::json;
use tokio_util::sync::CancellationToken;

mod common;

use common::{options, MemoryStateService, MemoryStore};

const AVATAR_A: &str = "00000000000000000000000000000000000000aa";
const AVATAR_B: &str = "00000000000000000000000000000000000000bb";

fn addr(hex: &str) -> Address {
    Address::from_hex(hex).unwrap()
}

/// A node with one fully-populated participant in championship 7 round 2.
fn populated_service() -> MemoryStateService {
    let avatar = addr(AVATAR_A);
    let mut service = MemoryStateService {
        tip: 250,
        ..Default::default()
    };

    service.legacy_states.insert(
        addresses::arena_participants(7, 2),
        json!([AVATAR_A]),
    );
    service.account_states.insert(
        (accounts::AVATAR, avatar),
        json!({ "name": "saeta", "level": 31, "exp": 900 }),
    );
    service.account_states.insert(
        (accounts::INVENTORY, avatar),
        json!([{ "item_sheet_id": 300_000, "count": 2 }]),
    );
    service.legacy_states.insert(
        addresses::item_slot(avatar),
        json!([1, [40_100_000], ["guid-1"]]),
    );
    service.legacy_states.insert(
        addresses::rune_slot(avatar),
        json!([1, [[0, 0, 1, false, 10_001]]]),
    );
    service.legacy_states.insert(
        addresses::rune_state(avatar, 10_001),
        json!([10_001, 12]),
    );
    service.legacy_states.insert(
        addresses::arena_score(avatar, 7, 2),
        json!([AVATAR_A, 1_512]),
    );
    service.legacy_states.insert(
        addresses::arena_information(avatar, 7, 2),
        json!([AVATAR_A, 4, 2, 6]),
    );
    service.legacy_states.insert(
        addresses::arena_participant(avatar, 7, 2),
        json!([AVATAR_A, "saeta", 31, 120_000, 1_512, 6, 4, 2]),
    );

    service
}

#[tokio::test]
async fn test_cycle_writes_documents_and_advances_checkpoint() {
    let worker = SyncWorker::new(populated_service(), MemoryStore::default(), options(7, 2));
    let ct = CancellationToken::new();

    let outcome = worker.run_cycle(&ct).await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Synced {
            block_index: 250,
            documents: 7
        }
    );

    let store = worker.store();
    assert_eq!(store.checkpoint(), Some(250));
    for collection in [
        collections::AVATARS,
        collections::INVENTORIES,
        collections::ITEM_SLOTS,
        collections::RUNE_SLOTS,
        collections::ARENA,
        collections::ARENA_SCORES,
        collections::ARENA_INFORMATION,
    ] {
        let documents = store.documents(collection);
        assert_eq!(documents.len(), 1, "collection {collection}");
        assert_eq!(documents[0].address(), addr(AVATAR_A));
        assert_eq!(documents[0].block_index(), 250);
    }

    let avatars = store.documents(collections::AVATARS);
    assert_matches!(&avatars[0], EntityDocument::Avatar(avatar) => {
        assert_eq!(avatar.name, "saeta");
        assert_eq!(avatar.runes.len(), 1);
        assert_eq!(avatar.runes[0].level, 12);
    });

    // the arena entry was linked back to the avatar document
    assert_eq!(store.links(), vec![addr(AVATAR_A)]);
}

#[tokio::test]
async fn test_write_failure_leaves_checkpoint_untouched() {
    let store = MemoryStore::default();
    store
        .fail_writes
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let worker = SyncWorker::new(populated_service(), store, options(7, 2));

    let result = worker.run_cycle(&CancellationToken::new()).await;
    assert!(result.is_err());
    assert_eq!(worker.store().checkpoint(), None);
}

#[tokio::test]
async fn test_idle_when_tip_not_advanced() {
    let store = MemoryStore::default();
    store.update_latest_block_index(250).await.unwrap();
    let worker = SyncWorker::new(populated_service(), store, options(7, 2));

    let outcome = worker.run_cycle(&CancellationToken::new()).await.unwrap();
    assert_eq!(outcome, CycleOutcome::Idle);
    assert!(worker.store().documents(collections::AVATARS).is_empty());
}

#[tokio::test]
async fn test_replaying_a_cycle_is_idempotent() {
    let worker = SyncWorker::new(populated_service(), MemoryStore::default(), options(7, 2));
    let ct = CancellationToken::new();

    worker.run_cycle(&ct).await.unwrap();
    let first = worker.store().documents(collections::ARENA_SCORES);

    // rewind the checkpoint and replay the same block
    worker.store().update_latest_block_index(0).await.unwrap();
    worker.run_cycle(&ct).await.unwrap();
    let second = worker.store().documents(collections::ARENA_SCORES);

    assert_eq!(first, second);
    assert_eq!(worker.store().checkpoint(), Some(250));
}

#[tokio::test]
async fn test_malformed_participant_does_not_block_the_batch() {
    let mut service = populated_service();
    service.legacy_states.insert(
        addresses::arena_participants(7, 2),
        json!([AVATAR_A, AVATAR_B]),
    );
    // a list-shaped avatar state with the name missing entirely
    service
        .account_states
        .insert((accounts::AVATAR, addr(AVATAR_B)), json!([2]));
    let worker = SyncWorker::new(service, MemoryStore::default(), options(7, 2));

    let outcome = worker
        .run_cycle(&CancellationToken::new())
        .await
        .unwrap();
    assert_matches!(outcome, CycleOutcome::Synced { .. });

    let avatars = worker.store().documents(collections::AVATARS);
    assert_eq!(avatars.len(), 1);
    assert_eq!(avatars[0].address(), addr(AVATAR_A));
    assert_eq!(worker.store().checkpoint(), Some(250));
}

#[tokio::test]
async fn test_missing_participant_avatar_is_skipped() {
    let mut service = populated_service();
    service.legacy_states.insert(
        addresses::arena_participants(7, 2),
        json!([AVATAR_A, AVATAR_B]),
    );
    // AVATAR_B has no state anywhere
    let worker = SyncWorker::new(service, MemoryStore::default(), options(7, 2));

    let outcome = worker
        .run_cycle(&CancellationToken::new())
        .await
        .unwrap();
    assert_matches!(outcome, CycleOutcome::Synced { documents: 7, .. });
}

#[tokio::test]
async fn test_legacy_layout_participant_still_syncs() {
    let avatar = addr(AVATAR_A);
    let mut service = MemoryStateService {
        tip: 250,
        ..Default::default()
    };
    service
        .legacy_states
        .insert(addresses::arena_participants(7, 2), json!([AVATAR_A]));
    // avatar and inventory both predate the account split
    service.legacy_states.insert(
        avatar,
        json!({ "name": "saeta", "level": 31, "exp": 900 }),
    );
    service.legacy_states.insert(
        addresses::legacy_inventory(avatar),
        json!([{ "item_sheet_id": 300_000, "count": 2 }]),
    );
    let worker = SyncWorker::new(service, MemoryStore::default(), options(7, 2));

    worker.run_cycle(&CancellationToken::new()).await.unwrap();

    let avatars = worker.store().documents(collections::AVATARS);
    assert_eq!(avatars.len(), 1);
    let inventories = worker.store().documents(collections::INVENTORIES);
    assert_matches!(&inventories[0], EntityDocument::Inventory(inventory) => {
        assert_eq!(inventory.inventory.items.len(), 1);
    });
}

#[tokio::test]
async fn test_table_sheets_are_mirrored() {
    let mut service = populated_service();
    service.legacy_states.insert(
        addresses::table_sheet("RuneListSheet"),
        json!("id,grade\n10001,1"),
    );
    let mut options = options(7, 2);
    options.table_sheets = vec!["RuneListSheet".to_owned(), "MissingSheet".to_owned()];
    let worker = SyncWorker::new(service, MemoryStore::default(), options);

    let outcome = worker
        .run_cycle(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Synced {
            block_index: 250,
            documents: 8
        }
    );

    let sheet = worker.store().sheet("RuneListSheet").unwrap();
    assert_eq!(sheet.sheet_csv, "id,grade\n10001,1");
    assert!(worker.store().sheet("MissingSheet").is_none());
}

#[tokio::test]
async fn test_cancelled_cycle_writes_nothing() {
    let worker = SyncWorker::new(populated_service(), MemoryStore::default(), options(7, 2));
    let ct = CancellationToken::new();
    ct.cancel();

    let outcome = worker.run_cycle(&ct).await.unwrap();
    assert_eq!(outcome, CycleOutcome::Idle);
    assert!(worker.store().documents(collections::AVATARS).is_empty());
    assert_eq!(worker.store().checkpoint(), None);
}
