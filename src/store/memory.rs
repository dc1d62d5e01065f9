use std::sync::Arc;

use dashmap::DashMap;

use crate::model::{BarStats, RatingRecord};

/// In-process rating table, one [BarStats] row per bar.
///
/// The map's per-key locking is the mutual-exclusion boundary: an entry is
/// created or folded while the key's shard is held, so two submissions for
/// the same bar always apply in some sequential order and a snapshot never
/// observes a row with its means and count out of step.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<DashMap<String, BarStats>>,
}

impl MemoryStore {
    pub fn apply(&self, record: &RatingRecord) -> BarStats {
        let row = self
            .table
            .entry(record.bar.clone())
            .and_modify(|stats| stats.fold(record))
            .or_insert_with(|| BarStats::first(record));

        row.clone()
    }

    pub fn snapshot(&self) -> Vec<BarStats> {
        self.table.iter().map(|row| row.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bar: &str, margarita: f64, price: f64, atmosphere: f64) -> RatingRecord {
        RatingRecord {
            bar: bar.to_string(),
            margarita_rating: margarita,
            price_rating: price,
            atmosphere_rating: atmosphere,
            average_rating: (margarita + price + atmosphere) / 3.0,
            comments: String::new(),
        }
    }

    #[test]
    fn empty_table_snapshots_to_nothing() {
        let store = MemoryStore::default();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn bars_do_not_bleed_into_each_other() {
        let store = MemoryStore::default();
        store.apply(&record("Drink", 10.0, 10.0, 10.0));
        store.apply(&record("Orlandos", 2.0, 2.0, 2.0));
        store.apply(&record("Orlandos", 4.0, 4.0, 4.0));

        let snapshot = store.snapshot();
        let drink = snapshot.iter().find(|row| row.bar == "Drink").unwrap();
        let orlandos = snapshot.iter().find(|row| row.bar == "Orlandos").unwrap();

        assert_eq!(drink.rating_count, 1);
        assert_eq!(drink.average_rating, 10.0);
        assert_eq!(orlandos.rating_count, 2);
        assert_eq!(orlandos.average_rating, 3.0);
    }

    #[test]
    fn apply_returns_the_updated_row() {
        let store = MemoryStore::default();
        store.apply(&record("3 Needs", 10.0, 10.0, 10.0));
        let row = store.apply(&record("3 Needs", 2.0, 2.0, 2.0));

        assert_eq!(row.rating_count, 2);
        assert_eq!(row.average_rating, 6.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_applies_to_one_bar_all_land() {
        const WRITERS: u64 = 32;

        let store = MemoryStore::default();

        let mut handles = Vec::new();
        for writer in 0..WRITERS {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                // distinct scores per writer, all within the scale
                let score = 1.0 + (writer % 10) as f64;
                store.apply(&record("Drink", score, score, score));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let expected: f64 =
            (0..WRITERS).map(|writer| 1.0 + (writer % 10) as f64).sum::<f64>() / WRITERS as f64;

        let snapshot = store.snapshot();
        let row = snapshot.iter().find(|row| row.bar == "Drink").unwrap();

        assert_eq!(row.rating_count, WRITERS, "every apply must land exactly once");
        assert!(
            (row.margarita_rating - expected).abs() < 1e-9,
            "running mean must equal the mean of all submitted scores"
        );
        assert!((row.average_rating - expected).abs() < 1e-9);
    }
}
