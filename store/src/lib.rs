//! Document persistence: idempotent bulk upserts keyed by business key,
//! checkpoint tracking, and blob storage for large sheet payloads.

mod mongo;
mod store;

pub use self::mongo::MongoStore;
pub use self::store::{DocumentStore, StoreError};
