use async_trait::async_trait;
use lodestone_core::{Address, BlockIndex};
use lodestone_models::{EntityDocument, TableSheetDocument};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("mongo error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("document serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),
    #[error("blob write error: {0}")]
    Blob(#[from] std::io::Error),
}

/// The write surface of the document store.
///
/// Every operation is keyed by business key (the owning address), never by
/// the store's internal identity, and every upsert is a full-document
/// replace so replaying a batch is always safe.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The last fully-synced block index; `None` before the first
    /// successful cycle.
    async fn latest_block_index(&self) -> Result<Option<BlockIndex>, StoreError>;

    /// Advance the checkpoint. Creates the singleton metadata record when
    /// it does not exist yet.
    async fn update_latest_block_index(&self, block_index: BlockIndex) -> Result<(), StoreError>;

    /// Replace-or-insert every document in the batch, keyed by address.
    /// Documents absent from the batch are left untouched.
    async fn bulk_upsert(&self, documents: &[EntityDocument]) -> Result<(), StoreError>;

    /// Upsert a table sheet, moving its CSV payload to the blob store.
    async fn insert_table_sheet(&self, document: &TableSheetDocument) -> Result<(), StoreError>;

    /// Best-effort cross-collection link: attach the avatar document's
    /// store identity to the matching arena entry. A missing avatar or
    /// arena document is a silent no-op.
    async fn link_avatar_with_arena(&self, address: Address) -> Result<(), StoreError>;
}
