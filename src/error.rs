use std::net::SocketAddr;

use snafu::{Location, Snafu};

use crate::store::StoreError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApplicationError {
    /// could not parse the configuration from the environment
    ConfigLoad {
        source: envy::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// could not load the page templates
    LoadTemplates {
        source: tera::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// could not initialize the logger
    InitializeLogger {
        source: tracing_subscriber::util::TryInitError,
        #[snafu(implicit)]
        location: Location,
    },

    /// could not connect to the rating store
    ConnectStore {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    /// could not bind to the given address, check if it's already in use
    BindAddress {
        address: SocketAddr,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// could not serve the application
    WebServer {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
