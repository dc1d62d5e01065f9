use std::collections::btree_map::{BTreeMap, Entry};

use derive_new::new;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::instrument;

use super::{BackendUnavailableSnafu, ConnectionSnafu, EmptyQuerySnafu, Result};
use crate::config::SurrealConfig;
use crate::model::{now, BarStats, RatingRecord, Timestamp};

const TABLE: &str = "ratings";

/// A raw submission row as the external store keeps it.
///
/// The store only ever appends these; running means are derived on read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct StoredRating {
    pub bar: String,
    pub margarita_rating: f64,
    pub price_rating: f64,
    pub atmosphere_rating: f64,
    pub average_rating: f64,
    pub comments: String,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

impl StoredRating {
    pub fn from_record(record: &RatingRecord) -> Self {
        Self::new(
            record.bar.clone(),
            record.margarita_rating,
            record.price_rating,
            record.atmosphere_rating,
            record.average_rating,
            record.comments.clone(),
        )
    }

    fn to_record(&self) -> RatingRecord {
        RatingRecord {
            bar: self.bar.clone(),
            margarita_rating: self.margarita_rating,
            price_rating: self.price_rating,
            atmosphere_rating: self.atmosphere_rating,
            average_rating: self.average_rating,
            comments: self.comments.clone(),
        }
    }
}

/// Append-only rating store on SurrealDB, reached by URL so the embedded
/// in-memory engine and a remote endpoint share one code path.
///
/// Because the store holds raw submissions rather than aggregates, both
/// [RemoteStore::apply] and [RemoteStore::snapshot] group the raw rows
/// client-side through the same running-mean fold the in-memory table uses.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    db: Surreal<Any>,
}

impl RemoteStore {
    pub async fn connect(config: &SurrealConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_str();

        let db = surrealdb::engine::any::connect(endpoint)
            .await
            .context(ConnectionSnafu { endpoint })?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await
            .context(ConnectionSnafu { endpoint })?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .context(ConnectionSnafu { endpoint })?;

        Ok(Self { db })
    }

    #[instrument(skip(self))]
    pub async fn apply(&self, record: &RatingRecord) -> Result<BarStats> {
        let row = StoredRating::from_record(record);
        tracing::debug!(row = ?row, "appending rating row for `{}`", row.bar);

        let _created: Vec<StoredRating> = self
            .db
            .create(TABLE)
            .content(&row)
            .await
            .context(BackendUnavailableSnafu)?;

        let rows = self.rows_for(&record.bar).await?;
        group(rows)
            .remove(&record.bar)
            .context(EmptyQuerySnafu { bar: record.bar.clone() })
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Vec<BarStats>> {
        let rows: Vec<StoredRating> = self
            .db
            .select(TABLE)
            .await
            .context(BackendUnavailableSnafu)?;

        Ok(group(rows).into_values().collect())
    }

    async fn rows_for(&self, bar: &str) -> Result<Vec<StoredRating>> {
        let mut response = self
            .db
            .query("SELECT * FROM ratings WHERE bar = $bar ORDER BY created_at ASC")
            .bind(("bar", bar.to_string()))
            .await
            .context(BackendUnavailableSnafu)?;

        response.take(0).context(BackendUnavailableSnafu)
    }
}

/// Group raw rows per bar: each metric mean over the bar's rows, then the
/// overall average over the three metric means.
fn group(rows: impl IntoIterator<Item = StoredRating>) -> BTreeMap<String, BarStats> {
    let mut table = BTreeMap::new();

    for row in rows {
        let record = row.to_record();
        match table.entry(record.bar.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(BarStats::first(&record));
            }
            Entry::Occupied(mut entry) => entry.get_mut().fold(&record),
        }
    }

    table
}
