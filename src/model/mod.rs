pub use record::*;
pub use stats::*;

mod record;
mod stats;

pub type Timestamp = chrono::DateTime<chrono::Utc>;

pub fn now() -> Timestamp {
    chrono::Utc::now()
}
