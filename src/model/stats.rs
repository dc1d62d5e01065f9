use serde::{Deserialize, Serialize};

use super::RatingRecord;

/// Running statistics for one bar, keyed by name.
///
/// Each metric holds a true mean of every score folded in so far, updated
/// incrementally from the previous mean and the count. `average_rating` is
/// always the mean of the three metric means, recomputed after they change.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BarStats {
    pub bar: String,
    pub margarita_rating: f64,
    pub price_rating: f64,
    pub atmosphere_rating: f64,
    pub average_rating: f64,
    pub rating_count: u64,
}

impl BarStats {
    /// Open a row from the first submission for a bar.
    pub fn first(record: &RatingRecord) -> Self {
        Self {
            bar: record.bar.clone(),
            margarita_rating: record.margarita_rating,
            price_rating: record.price_rating,
            atmosphere_rating: record.atmosphere_rating,
            average_rating: mean_of_three(
                record.margarita_rating,
                record.price_rating,
                record.atmosphere_rating,
            ),
            rating_count: 1,
        }
    }

    /// Fold one more submission into the running means.
    ///
    /// The three metric means are updated first, then `average_rating` is
    /// recomputed from the updated means. The order matters: the overall
    /// average is derived, never tracked as a fourth running mean.
    pub fn fold(&mut self, record: &RatingRecord) {
        let count = self.rating_count as f64;

        self.margarita_rating = shift_mean(self.margarita_rating, count, record.margarita_rating);
        self.price_rating = shift_mean(self.price_rating, count, record.price_rating);
        self.atmosphere_rating =
            shift_mean(self.atmosphere_rating, count, record.atmosphere_rating);

        self.rating_count += 1;
        self.average_rating = mean_of_three(
            self.margarita_rating,
            self.price_rating,
            self.atmosphere_rating,
        );
    }
}

fn shift_mean(mean: f64, count: f64, value: f64) -> f64 {
    (mean * count + value) / (count + 1.0)
}

fn mean_of_three(first: f64, second: f64, third: f64) -> f64 {
    (first + second + third) / 3.0
}
