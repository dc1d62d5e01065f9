use snafu::{Location, Snafu};
use tracing::instrument;

use crate::config::{Config, StoreKind};
use crate::model::{BarStats, RatingRecord};

pub use memory::MemoryStore;
pub use remote::RemoteStore;

mod memory;
mod remote;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("cannot connect to the rating store at `{endpoint}`: {source}"))]
    Connection {
        endpoint: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("rating store unavailable: {source}"))]
    BackendUnavailable {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("rating store returned no rows for bar `{bar}`"))]
    EmptyQuery {
        bar: String,
        #[snafu(implicit)]
        location: Location,
    },
}

/// The authoritative per-bar statistics table behind one apply/snapshot
/// contract.
///
/// Exactly one backend is live per deployment, picked by configuration: the
/// in-process table, or the append-only row store that keeps raw submissions
/// and leaves the grouping to us.
#[derive(Debug, Clone)]
pub enum Store {
    Memory(MemoryStore),
    Remote(RemoteStore),
}

impl Store {
    /// Fold a validated submission into the bar's running statistics and
    /// return the resulting row.
    ///
    /// A failed apply never leaves a partial row behind; the previously
    /// committed state stays visible.
    #[instrument(skip(self))]
    pub async fn apply(&self, record: &RatingRecord) -> Result<BarStats> {
        match self {
            Store::Memory(store) => Ok(store.apply(record)),
            Store::Remote(store) => store.apply(record).await,
        }
    }

    /// A consistent point-in-time copy of every bar's statistics.
    ///
    /// Row order is not meaningful; callers sort for presentation.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Vec<BarStats>> {
        match self {
            Store::Memory(store) => Ok(store.snapshot()),
            Store::Remote(store) => store.snapshot().await,
        }
    }
}

pub async fn connect(config: &Config) -> Result<Store> {
    match config.store_backend {
        StoreKind::Memory => {
            tracing::info!("using the in-memory rating store");
            Ok(Store::Memory(MemoryStore::default()))
        }
        StoreKind::Remote => {
            tracing::info!(endpoint = %config.surreal.endpoint, "using the remote rating store");
            let store = RemoteStore::connect(&config.surreal).await?;
            Ok(Store::Remote(store))
        }
    }
}
