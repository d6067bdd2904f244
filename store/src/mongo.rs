use async_trait::async_trait;
use futures_util::io::AsyncWriteExt;
use lodestone_core::{Address, BlockIndex};
use lodestone_models::{collections, EntityDocument, TableSheetDocument};
use mongodb::bson::{doc, to_document, Bson, Document};
use mongodb::options::{ClientOptions, IndexOptions, ReplaceOptions, UpdateOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use crate::store::{DocumentStore, StoreError};

const SYNC_CONTEXT_ID: &str = "sync_context";

/// Entity collections provisioned with a unique index on the business key.
const ENTITY_COLLECTIONS: &[&str] = &[
    collections::AVATARS,
    collections::INVENTORIES,
    collections::ITEM_SLOTS,
    collections::RUNE_SLOTS,
    collections::ARENA,
    collections::ARENA_SCORES,
    collections::ARENA_INFORMATION,
    collections::TABLE_SHEETS,
];

pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    pub async fn connect(connection_string: &str, database: &str) -> Result<Self, StoreError> {
        info!("connecting to database");
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let database = client.database(database);
        Ok(Self { client, database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    /// Whether the entity collections this worker writes to already exist.
    pub async fn is_initialized(&self) -> Result<bool, StoreError> {
        let names = self.database.list_collection_names(None).await?;
        Ok(names.iter().any(|n| n == collections::AVATARS)
            && names.iter().any(|n| n == collections::ARENA))
    }

    /// Create the entity collections and their unique business-key indexes.
    ///
    /// The unique index on `address` is what enforces the at-most-one
    /// document per business key invariant at the storage level. Safe to
    /// call on an already-initialized database.
    pub async fn ensure_initialized(&self) -> Result<(), StoreError> {
        for name in ENTITY_COLLECTIONS {
            let index = IndexModel::builder()
                .keys(doc! { "address": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.collection(name).create_index(index, None).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn latest_block_index(&self) -> Result<Option<BlockIndex>, StoreError> {
        let filter = doc! { "_id": SYNC_CONTEXT_ID };
        let context = self
            .collection(collections::METADATA)
            .find_one(filter, None)
            .await?;
        Ok(context
            .and_then(|doc| doc.get_i64("latest_block_index").ok())
            .map(|index| index as BlockIndex))
    }

    async fn update_latest_block_index(&self, block_index: BlockIndex) -> Result<(), StoreError> {
        info!(block_index = block_index, "updating latest block index");
        let filter = doc! { "_id": SYNC_CONTEXT_ID };
        let update = doc! { "$set": { "latest_block_index": block_index as i64 } };
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection(collections::METADATA)
            .update_one(filter, update, options)
            .await?;
        Ok(())
    }

    async fn bulk_upsert(&self, documents: &[EntityDocument]) -> Result<(), StoreError> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut session = self.client.start_session(None).await?;
        let options = ReplaceOptions::builder().upsert(true).build();

        for document in documents {
            let filter = doc! { "address": document.address().to_hex() };
            let replacement = to_document(document)?;
            self.collection(document.collection())
                .replace_one_with_session(
                    filter,
                    replacement,
                    options.clone(),
                    &mut session,
                )
                .await?;
        }

        info!(count = documents.len(), "stored documents");
        Ok(())
    }

    async fn insert_table_sheet(&self, document: &TableSheetDocument) -> Result<(), StoreError> {
        let bucket = self.database.gridfs_bucket(None);

        let mut upload = bucket.open_upload_stream(format!("{}-csv", document.name), None);
        upload.write_all(document.sheet_csv.as_bytes()).await?;
        upload.close().await?;
        let csv_file_id = upload.id().clone();

        let mut sheet = to_document(document)?;
        sheet.remove("sheet_csv");
        sheet.insert("sheet_csv_file_id", csv_file_id);

        let filter = doc! { "address": document.address.to_hex() };
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection(collections::TABLE_SHEETS)
            .replace_one(filter, sheet, options)
            .await?;

        debug!(sheet = %document.name, "stored table sheet");
        Ok(())
    }

    async fn link_avatar_with_arena(&self, address: Address) -> Result<(), StoreError> {
        let filter = doc! { "address": address.to_hex() };
        let Some(avatar) = self
            .collection(collections::AVATARS)
            .find_one(filter.clone(), None)
            .await?
        else {
            return Ok(());
        };
        let Some(object_id) = avatar.get("_id").cloned() else {
            return Ok(());
        };
        if !matches!(object_id, Bson::ObjectId(_)) {
            return Ok(());
        }

        let update = doc! { "$set": { "avatar_object_id": object_id } };
        // no upsert: a missing arena entry must stay missing
        self.collection(collections::ARENA)
            .update_one(filter, update, None)
            .await?;
        Ok(())
    }
}
