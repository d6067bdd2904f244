use clap::Args;

/// Options shared by every sync run.
#[derive(Debug, Clone, Args)]
pub struct SyncOptions {
    /// Base url of the chain node state endpoint.
    #[arg(long, env = "LODESTONE_NODE_URL")]
    pub node_url: String,
    /// Championship the tracked arena season belongs to.
    #[arg(long, env = "LODESTONE_CHAMPIONSHIP_ID")]
    pub championship_id: i32,
    /// Round of the tracked arena season.
    #[arg(long, env = "LODESTONE_ROUND")]
    pub round: i32,
    /// Table sheet names to mirror, comma separated.
    #[arg(long, env = "LODESTONE_TABLE_SHEETS", value_delimiter = ',')]
    pub table_sheets: Vec<String>,
    /// How many avatars to fetch concurrently.
    #[arg(long, env = "LODESTONE_FETCH_CONCURRENCY", default_value = "8")]
    pub fetch_concurrency: usize,
    /// Seconds to wait between sync cycles.
    #[arg(long, env = "LODESTONE_POLL_INTERVAL_SECONDS", default_value = "30")]
    pub poll_interval_seconds: u64,
}

/// Options for connecting to MongoDB.
#[derive(Debug, Clone, Args)]
pub struct StorageOptions {
    /// The connection string of the target database.
    #[arg(long, env = "MONGO_CONNECTION_STRING")]
    pub connection_string: String,
    /// The database where documents are written.
    #[arg(long, env = "MONGO_DATABASE", default_value = "lodestone")]
    pub database: String,
}
