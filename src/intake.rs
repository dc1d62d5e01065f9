use derive_new::new;
use serde::Deserialize;
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::model::RatingRecord;

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

#[derive(Debug, Snafu, PartialEq)]
pub enum ValidationError {
    #[snafu(display("missing required field `{field}`"))]
    MissingField { field: &'static str },

    #[snafu(display("field `{field}` is not a number: `{value}`"))]
    NotANumber {
        field: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },

    #[snafu(display("field `{field}` must be between 1 and 10, got {value}"))]
    OutOfRange { field: &'static str, value: f64 },

    #[snafu(display("unknown bar `{bar}`, not a stop on this tour"))]
    UnknownBar { bar: String },
}

/// One rating submission exactly as it came off the form, nothing parsed yet.
///
/// Every field is optional at this level so that a missing input is reported
/// by [Intake::validate] as [ValidationError::MissingField] instead of being
/// bounced by the form decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubmission {
    pub bar: Option<String>,
    pub margarita_rating: Option<String>,
    pub price_rating: Option<String>,
    pub atmosphere_rating: Option<String>,
    pub comments: Option<String>,
}

/// Validates raw form fields into a [RatingRecord].
///
/// `allowed_bars` is the configured tour lineup; an empty list disables the
/// membership check.
#[derive(Debug, Clone, Default, new)]
pub struct Intake {
    allowed_bars: Vec<String>,
}

impl Intake {
    pub fn validate(&self, raw: RawSubmission) -> Result<RatingRecord> {
        let bar = raw
            .bar
            .as_deref()
            .map(str::trim)
            .filter(|bar| !bar.is_empty())
            .context(MissingFieldSnafu { field: "bar" })?;

        if !self.allowed_bars.is_empty() && !self.allowed_bars.iter().any(|known| known == bar) {
            return UnknownBarSnafu { bar }.fail();
        }

        let margarita_rating = parse_rating("margarita_rating", raw.margarita_rating.as_deref())?;
        let price_rating = parse_rating("price_rating", raw.price_rating.as_deref())?;
        let atmosphere_rating = parse_rating("atmosphere_rating", raw.atmosphere_rating.as_deref())?;

        let average_rating = (margarita_rating + price_rating + atmosphere_rating) / 3.0;

        Ok(RatingRecord {
            bar: bar.to_string(),
            margarita_rating,
            price_rating,
            atmosphere_rating,
            average_rating,
            comments: raw.comments.unwrap_or_default(),
        })
    }
}

fn parse_rating(field: &'static str, value: Option<&str>) -> Result<f64> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .context(MissingFieldSnafu { field })?;

    let rating: f64 = value.parse().context(NotANumberSnafu { field, value })?;

    // NaN fails the range check as well
    ensure!(
        (1.0..=10.0).contains(&rating),
        OutOfRangeSnafu { field, value: rating }
    );

    Ok(rating)
}
