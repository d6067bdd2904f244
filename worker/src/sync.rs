use std::time::Duration;

use error_stack::{Result, ResultExt};
use exponential_backoff::Backoff;
use futures::stream::{self, StreamExt, TryStreamExt};
use lodestone_chain::{StateError, StateResolver, StateService};
use lodestone_core::{Address, BlockIndex};
use lodestone_models::{
    convert, ConvertError, ConvertParams, EntityDocument, EntityKind, SimplifiedAvatar,
    StateContext, TableSheetDocument,
};
use lodestone_store::DocumentStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::configuration::SyncOptions;
use crate::error::{WorkerError, WorkerErrorResultExt};

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The checkpoint advanced to `block_index` after writing `documents`
    /// documents.
    Synced {
        block_index: BlockIndex,
        documents: usize,
    },
    /// Nothing to do; the chain tip has not moved past the checkpoint.
    Idle,
}

/// Drives the fetch-convert-write pipeline against one championship round.
///
/// The checkpoint only advances after every write of the cycle succeeded,
/// so a failed or cancelled cycle is indistinguishable from one that never
/// ran.
pub struct SyncWorker<S, D> {
    resolver: StateResolver<S>,
    store: D,
    options: SyncOptions,
    backoff: Backoff,
}

impl<S, D> SyncWorker<S, D>
where
    S: StateService,
    D: DocumentStore,
{
    pub fn new(service: S, store: D, options: SyncOptions) -> Self {
        let backoff = Backoff::new(10, Duration::from_secs(1), Some(Duration::from_secs(60)));
        Self {
            resolver: StateResolver::new(service),
            store,
            options,
            backoff,
        }
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    /// Run sync cycles until cancelled.
    pub async fn run(&self, ct: CancellationToken) -> Result<(), WorkerError> {
        loop {
            if ct.is_cancelled() {
                info!("sync worker stopped");
                return Ok(());
            }

            match self.run_cycle_with_backoff(&ct).await? {
                CycleOutcome::Synced {
                    block_index,
                    documents,
                } => {
                    info!(block_index, documents, "cycle synced");
                }
                CycleOutcome::Idle => {
                    debug!("tip not advanced");
                }
            }

            tokio::select! {
                _ = ct.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_secs(self.options.poll_interval_seconds)) => {}
            }
        }
    }

    async fn run_cycle_with_backoff(
        &self,
        ct: &CancellationToken,
    ) -> Result<CycleOutcome, WorkerError> {
        for duration in &self.backoff {
            match self.run_cycle(ct).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if matches!(err.current_context(), WorkerError::Fatal) => {
                    return Err(err);
                }
                Err(err) => {
                    warn!(err = ?err, "sync cycle failed");
                    if ct.is_cancelled() {
                        return Ok(CycleOutcome::Idle);
                    }
                    tokio::time::sleep(duration).await;
                }
            }
        }

        Err(WorkerError::Temporary).attach_printable("maximum number of retries exceeded")
    }

    /// One fetch-convert-write cycle.
    ///
    /// Malformed state for a single entity is logged and skipped. A
    /// transport failure aborts the cycle before the checkpoint advances;
    /// every write is a keyed replace, so the retried cycle overwrites
    /// cleanly.
    pub async fn run_cycle(&self, ct: &CancellationToken) -> Result<CycleOutcome, WorkerError> {
        let checkpoint = self
            .store
            .latest_block_index()
            .await
            .temporary("failed to read the sync checkpoint")?
            .unwrap_or(0);
        let tip = self
            .resolver
            .get_tip()
            .await
            .temporary("failed to read the chain tip")?;
        if tip <= checkpoint {
            return Ok(CycleOutcome::Idle);
        }
        debug!(checkpoint, tip, "starting sync cycle");

        let participants = self
            .resolver
            .get_arena_participants(self.options.championship_id, self.options.round)
            .await
            .temporary("failed to list arena participants")?;

        let batches: Vec<Vec<EntityDocument>> = stream::iter(participants.iter().copied())
            .map(|address| self.collect_avatar_documents(tip, address))
            .buffer_unordered(self.options.fetch_concurrency)
            .try_collect()
            .await?;
        let documents: Vec<EntityDocument> = batches.into_iter().flatten().collect();

        let sheets = self.collect_table_sheets(tip).await?;

        if ct.is_cancelled() {
            // drop the batch; the next cycle rebuilds it from scratch
            debug!("cycle cancelled before writing");
            return Ok(CycleOutcome::Idle);
        }

        self.store
            .bulk_upsert(&documents)
            .await
            .temporary("failed to write the document batch")?;
        for sheet in &sheets {
            self.store
                .insert_table_sheet(sheet)
                .await
                .temporary("failed to write a table sheet")?;
        }

        // linking is best effort and never blocks checkpoint progress
        for address in &participants {
            if let Err(err) = self.store.link_avatar_with_arena(*address).await {
                warn!(err = ?err, address = %address, "failed to link avatar with arena entry");
            }
        }

        self.store
            .update_latest_block_index(tip)
            .await
            .temporary("failed to advance the sync checkpoint")?;

        Ok(CycleOutcome::Synced {
            block_index: tip,
            documents: documents.len() + sheets.len(),
        })
    }

    /// All documents derived from one arena participant.
    ///
    /// A participant whose avatar state is missing or malformed yields no
    /// documents at all; satellite records degrade individually.
    async fn collect_avatar_documents(
        &self,
        block_index: BlockIndex,
        address: Address,
    ) -> Result<Vec<EntityDocument>, WorkerError> {
        let championship_id = self.options.championship_id;
        let round = self.options.round;
        let ctx = StateContext {
            block_index,
            address,
        };
        let mut documents = Vec::new();

        let avatar_state =
            match contain_entity_error(self.resolver.get_avatar_state(address).await, address)? {
                Some(state) => state,
                None => {
                    warn!(address = %address, "avatar state unavailable, skipping participant");
                    return Ok(documents);
                }
            };
        let runes = contain_entity_error(self.resolver.get_rune_states(address).await, address)?
            .unwrap_or_default();
        match convert(
            EntityKind::Avatar,
            &ctx,
            &ConvertParams::Avatar {
                state: &avatar_state,
                runes: &runes,
            },
        ) {
            Ok(document) => documents.push(document),
            Err(ConvertError::Model(err)) => {
                warn!(err = ?err, address = %address, "avatar state malformed, skipping participant");
                return Ok(documents);
            }
            Err(err @ ConvertError::UnsupportedOperation { .. }) => {
                return Err(err).fatal("converter invoked with mismatched parameters");
            }
        }

        if let Some(state) =
            contain_entity_error(self.resolver.get_inventory_state(address).await, address)?
        {
            self.push_converted(
                &mut documents,
                EntityKind::Inventory,
                &ctx,
                &ConvertParams::State(&state),
            )?;
        }

        if let Some(state) =
            contain_entity_error(self.resolver.get_item_slot_state(address).await, address)?
        {
            if !state.is_absent() {
                self.push_converted(
                    &mut documents,
                    EntityKind::ItemSlot,
                    &ctx,
                    &ConvertParams::State(&state),
                )?;
            }
        }

        if let Some(state) =
            contain_entity_error(self.resolver.get_rune_slot_state(address).await, address)?
        {
            if !state.is_absent() {
                self.push_converted(
                    &mut documents,
                    EntityKind::RuneSlot,
                    &ctx,
                    &ConvertParams::State(&state),
                )?;
            }
        }

        if let Some(state) = contain_entity_error(
            self.resolver
                .get_arena_score_state(address, championship_id, round)
                .await,
            address,
        )? {
            if !state.is_absent() {
                self.push_converted(
                    &mut documents,
                    EntityKind::ArenaScore,
                    &ctx,
                    &ConvertParams::Arena {
                        state: &state,
                        championship_id,
                        round,
                    },
                )?;
            }
        }

        if let Some(state) = contain_entity_error(
            self.resolver
                .get_arena_information_state(address, championship_id, round)
                .await,
            address,
        )? {
            if !state.is_absent() {
                self.push_converted(
                    &mut documents,
                    EntityKind::ArenaInformation,
                    &ctx,
                    &ConvertParams::Arena {
                        state: &state,
                        championship_id,
                        round,
                    },
                )?;
            }
        }

        let simple_avatar = match SimplifiedAvatar::from_state(address, &avatar_state) {
            Ok(avatar) => avatar,
            Err(err) => {
                warn!(err = ?err, address = %address, "avatar projection failed, skipping arena entry");
                return Ok(documents);
            }
        };
        if let Some(state) = contain_entity_error(
            self.resolver
                .get_arena_participant_state(address, championship_id, round)
                .await,
            address,
        )? {
            if !state.is_absent() {
                self.push_converted(
                    &mut documents,
                    EntityKind::ArenaParticipant,
                    &ctx,
                    &ConvertParams::ArenaParticipant {
                        state: &state,
                        championship_id,
                        round,
                        avatar: &simple_avatar,
                    },
                )?;
            }
        }

        Ok(documents)
    }

    async fn collect_table_sheets(
        &self,
        block_index: BlockIndex,
    ) -> Result<Vec<TableSheetDocument>, WorkerError> {
        let mut sheets = Vec::new();
        for name in &self.options.table_sheets {
            let (address, csv) = match self.resolver.get_sheet(name).await {
                Ok(Some(sheet)) => sheet,
                Ok(None) => {
                    warn!(sheet = %name, "table sheet not found");
                    continue;
                }
                Err(err) if err.is_entity_error() => {
                    warn!(err = ?err, sheet = %name, "skipping malformed table sheet");
                    continue;
                }
                Err(err) => return Err(err).temporary("failed to fetch a table sheet"),
            };

            let ctx = StateContext {
                block_index,
                address,
            };
            let document = convert(
                EntityKind::TableSheet,
                &ctx,
                &ConvertParams::TableSheet { name, csv: &csv },
            )
            .fatal("table sheet conversion failed")?;
            if let EntityDocument::TableSheet(sheet) = document {
                sheets.push(sheet);
            }
        }
        Ok(sheets)
    }

    fn push_converted(
        &self,
        documents: &mut Vec<EntityDocument>,
        kind: EntityKind,
        ctx: &StateContext,
        params: &ConvertParams<'_>,
    ) -> Result<(), WorkerError> {
        match convert(kind, ctx, params) {
            Ok(document) => {
                documents.push(document);
                Ok(())
            }
            Err(ConvertError::Model(err)) => {
                warn!(err = ?err, address = %ctx.address, kind = ?kind, "skipping entity with malformed state");
                Ok(())
            }
            // a kind/params mismatch is a bug, not bad chain data
            Err(err @ ConvertError::UnsupportedOperation { .. }) => {
                Err(err).fatal("converter invoked with mismatched parameters")
            }
        }
    }
}

/// Ok for a good read, `None` for a missing or malformed record, Err only
/// for failures worth aborting the cycle over.
fn contain_entity_error<T>(
    result: std::result::Result<T, StateError>,
    address: Address,
) -> Result<Option<T>, WorkerError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StateError::NotFound) => Ok(None),
        Err(err) if err.is_entity_error() => {
            warn!(err = ?err, address = %address, "skipping malformed state");
            Ok(None)
        }
        Err(err) => Err(err).temporary("state fetch failed"),
    }
}
