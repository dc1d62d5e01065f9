use std::time::Duration;

use axum_template::engine::Engine;
use derive_new::new;
use snafu::ResultExt;
use tera::Tera;

use crate::config::Config;
use crate::error::{ApplicationError, LoadTemplatesSnafu};
use crate::intake::Intake;
use crate::store::Store;

pub type AppEngine = Engine<Tera>;

/// Shared request state: the template engine, the intake validator, the
/// rating store, and the bits of configuration pages need.
#[derive(Clone, new)]
pub struct App {
    pub engine: AppEngine,
    pub intake: Intake,
    pub store: Store,
    pub site: Site,
}

#[derive(Debug, Clone, new)]
pub struct Site {
    pub bars: Vec<String>,
    pub poll_interval: Duration,
}

pub fn create_app(config: &Config, store: Store) -> Result<App, ApplicationError> {
    let templates = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html");
    let tera = Tera::new(templates).context(LoadTemplatesSnafu)?;

    let lineup = config.lineup();
    let intake = Intake::new(lineup.clone());
    let site = Site::new(lineup, config.poll_interval);

    Ok(App::new(Engine::from(tera), intake, store, site))
}
