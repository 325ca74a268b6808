//! Hello-world service.
//!
//! ```text
//! $ curl 'localhost:8080/?name=Ann'
//! Hello Ann
//! $ curl localhost:8080/
//! {"code":422,"status":"Unprocessable Entity","messages":{"name":["Missing data for required field."]}}
//! ```
//!
//! Settings come from `argus.toml` (optional), `.env` and `ARGUS__*`
//! environment variables, e.g. `ARGUS__SERVER__HTTP_ADDR=127.0.0.1:3000`.

use anyhow::Context;
use argus::config::DEFAULT_ENV_PREFIX;
use argus::prelude::*;
use argus::server::telemetry::{init_logging, LogConfig};
use argus::server::{Handler, ServerBuilder};

fn hello() -> Handler {
    let schema = Schema::builder()
        .field("name", Field::string().required())
        .build();

    UseArgs::new(schema).handler(|_req, args| async move {
        format!("Hello {}", args.str("name").unwrap_or_default())
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_optional_file("argus.toml")?
        .with_dotenv()?
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()
        .context("failed to load configuration")?;

    init_logging(&LogConfig::from(&config.logging)).context("failed to initialize logging")?;

    let server = ServerBuilder::from_config(&config)
        .route(Method::GET, "/", "index", hello())?
        .build();

    tracing::info!(addr = server.http_addr(), "starting hello service");
    server.run().await?;
    Ok(())
}
