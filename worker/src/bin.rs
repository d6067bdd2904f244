use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use error_stack::{Result, ResultExt};
use lodestone_chain::HttpStateService;
use lodestone_observability::init_tracing;
use lodestone_store::MongoStore;
use lodestone_worker::{
    lodestone_cli_style, set_ctrlc_handler, ReportExt, StorageOptions, SyncOptions, SyncWorker,
    WorkerError, WorkerErrorResultExt,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lodestone", version, styles = lodestone_cli_style())]
struct Cli {
    #[command(subcommand)]
    subcommand: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync arena state into the document store until stopped.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    sync: SyncOptions,
    #[command(flatten)]
    storage: StorageOptions,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    run(args).await.to_exit_code()
}

async fn run(args: Cli) -> Result<(), WorkerError> {
    init_tracing().change_context(WorkerError::Configuration)?;

    let ct = CancellationToken::new();
    set_ctrlc_handler(ct.clone())?;

    match args.subcommand {
        Command::Run(args) => run_sync(args.sync, args.storage, ct).await,
    }
}

async fn run_sync(
    sync: SyncOptions,
    storage: StorageOptions,
    ct: CancellationToken,
) -> Result<(), WorkerError> {
    let store = MongoStore::connect(&storage.connection_string, &storage.database)
        .await
        .configuration("failed to connect to the document store")?;
    if !store
        .is_initialized()
        .await
        .temporary("failed to inspect the document store")?
    {
        info!(database = %storage.database, "database not initialized, provisioning");
    }
    store
        .ensure_initialized()
        .await
        .temporary("failed to provision the document store")?;

    let service = HttpStateService::new(sync.node_url.clone());
    let worker = SyncWorker::new(service, store, sync);
    worker.run(ct).await
}
