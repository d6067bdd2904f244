use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lodestone_chain::{StateError, StateService};
use lodestone_core::{Address, BlockIndex};
use lodestone_models::{collections, EntityDocument, TableSheetDocument};
use lodestone_store::{DocumentStore, StoreError};
use lodestone_worker::SyncOptions;
use serde_json::Value;

pub fn options(championship_id: i32, round: i32) -> SyncOptions {
    SyncOptions {
        node_url: "http://localhost:9000".to_owned(),
        championship_id,
        round,
        table_sheets: Vec::new(),
        fetch_concurrency: 4,
        poll_interval_seconds: 1,
    }
}

/// In-memory chain node: two layers of state keyed the same way the
/// resolver probes them.
#[derive(Default)]
pub struct MemoryStateService {
    pub tip: BlockIndex,
    pub account_states: HashMap<(Address, Address), Value>,
    pub legacy_states: HashMap<Address, Value>,
}

#[async_trait]
impl StateService for MemoryStateService {
    async fn get_state(&self, address: Address) -> Result<Option<Value>, StateError> {
        match self.legacy_states.get(&address) {
            Some(value) => Ok(Some(value.clone())),
            None => Err(StateError::NotFound),
        }
    }

    async fn get_account_state(
        &self,
        address: Address,
        account: Address,
    ) -> Result<Option<Value>, StateError> {
        match self.account_states.get(&(account, address)) {
            Some(value) => Ok(Some(value.clone())),
            None => Err(StateError::NotFound),
        }
    }

    async fn get_tip(&self) -> Result<BlockIndex, StateError> {
        Ok(self.tip)
    }
}

#[derive(Default)]
struct Inner {
    checkpoint: Option<BlockIndex>,
    collections: HashMap<&'static str, HashMap<String, EntityDocument>>,
    sheets: HashMap<String, TableSheetDocument>,
    links: Vec<Address>,
}

/// In-memory document store with the same replace-by-address semantics as
/// the real one, plus a switch to make batch writes fail.
#[derive(Default)]
pub struct MemoryStore {
    pub fail_writes: AtomicBool,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn checkpoint(&self) -> Option<BlockIndex> {
        self.inner.lock().unwrap().checkpoint
    }

    pub fn documents(&self, collection: &str) -> Vec<EntityDocument> {
        self.inner
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn sheet(&self, name: &str) -> Option<TableSheetDocument> {
        self.inner.lock().unwrap().sheets.get(name).cloned()
    }

    pub fn links(&self) -> Vec<Address> {
        self.inner.lock().unwrap().links.clone()
    }

    fn injected_failure() -> StoreError {
        StoreError::Blob(std::io::Error::new(
            std::io::ErrorKind::Other,
            "injected write failure",
        ))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn latest_block_index(&self) -> Result<Option<BlockIndex>, StoreError> {
        Ok(self.inner.lock().unwrap().checkpoint)
    }

    async fn update_latest_block_index(&self, block_index: BlockIndex) -> Result<(), StoreError> {
        self.inner.lock().unwrap().checkpoint = Some(block_index);
        Ok(())
    }

    async fn bulk_upsert(&self, documents: &[EntityDocument]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected_failure());
        }
        let mut inner = self.inner.lock().unwrap();
        for document in documents {
            inner
                .collections
                .entry(document.collection())
                .or_default()
                .insert(document.address().to_hex(), document.clone());
        }
        Ok(())
    }

    async fn insert_table_sheet(&self, document: &TableSheetDocument) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected_failure());
        }
        self.inner
            .lock()
            .unwrap()
            .sheets
            .insert(document.name.clone(), document.clone());
        Ok(())
    }

    async fn link_avatar_with_arena(&self, address: Address) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = address.to_hex();
        let has_avatar = inner
            .collections
            .get(collections::AVATARS)
            .map(|documents| documents.contains_key(&key))
            .unwrap_or(false);
        let has_arena = inner
            .collections
            .get(collections::ARENA)
            .map(|documents| documents.contains_key(&key))
            .unwrap_or(false);
        if has_avatar && has_arena {
            inner.links.push(address);
        }
        Ok(())
    }
}
