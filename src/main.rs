//! Command-line entry point: imports or previews one CSV price file and
//! prints the aggregate report as JSON.

use dotenvy::dotenv;
use std::{env, path::Path, path::PathBuf};
use tarifa::{
    config,
    core::importer,
    errors::{Error, Result},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tarifa <import|preview> <file.csv> [max_rows]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let (command, path) = match (args.get(1), args.get(2)) {
        (Some(command), Some(path)) => (command.as_str(), PathBuf::from(path)),
        _ => {
            return Err(Error::Config {
                message: USAGE.to_string(),
            });
        }
    };

    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;

    // Reference data lives in catalog.toml and is seeded when present
    if Path::new("catalog.toml").exists() {
        let catalog = config::catalog::load_catalog("catalog.toml")?;
        config::catalog::seed_catalog(&db, &catalog).await?;
    }

    match command {
        "import" => {
            let result = importer::import_csv(&db, &path).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.is_success() {
                info!("Import completed successfully");
            }
        }
        "preview" => {
            let max_rows = args
                .get(3)
                .map_or(Ok(usize::MAX), |raw| raw.parse())
                .map_err(|_| Error::Config {
                    message: USAGE.to_string(),
                })?;
            let report = importer::preview_csv(&db, &path, max_rows).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            return Err(Error::Config {
                message: USAGE.to_string(),
            });
        }
    }

    Ok(())
}
