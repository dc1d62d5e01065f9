use serde::{Deserialize, Serialize};

/// A single validated rating submission.
///
/// Produced by [crate::intake::Intake]; every field has already passed
/// validation and `average_rating` is the mean of the three scores at full
/// floating-point precision. Rounding is left to whoever displays it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RatingRecord {
    pub bar: String,
    pub margarita_rating: f64,
    pub price_rating: f64,
    pub atmosphere_rating: f64,
    pub average_rating: f64,
    #[serde(default)]
    pub comments: String,
}
