use dotenvy::dotenv;
use snafu::ResultExt;

use margarita_tour::config::Config;
use margarita_tour::error::{
    ApplicationError, BindAddressSnafu, ConnectStoreSnafu, WebServerSnafu,
};
use margarita_tour::{api, logger, store};

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let store = store::connect(&config).await.context(ConnectStoreSnafu)?;
    let app = api::create_app(&config, store)?;
    let router = api::create_router(app);

    let listener = tokio::net::TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!("listening on http://{}", config.host);

    axum::serve(listener, router).await.context(WebServerSnafu)?;

    Ok(())
}
