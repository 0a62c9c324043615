//! lastseen server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `LASTSEEN_*`
//! environment variables, opens the JSON report store and serves the API.
//! `PORT` overrides the listening port.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use lastseen_server::ServerConfig;
use lastseen_store_json::JsonFileStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "lastseen missing-persons board server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(cli.config, None)?;

  // A store file that exists but cannot be parsed stops startup here.
  let store = JsonFileStore::open(&server_cfg.data_file)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.data_file))?;

  tokio::fs::create_dir_all(&server_cfg.uploads_dir)
    .await
    .with_context(|| {
      format!("failed to create uploads dir {:?}", server_cfg.uploads_dir)
    })?;

  let app = lastseen_server::router(Arc::new(store), &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Defaults, then the optional config file, then `LASTSEEN_*`, then `PORT`.
///
/// `env` replaces the process environment when given.
fn load_config(
  path: PathBuf,
  env: Option<config::Map<String, String>>,
) -> anyhow::Result<ServerConfig> {
  let defaults = ServerConfig::default();
  let port = match &env {
    Some(vars) => vars.get("PORT").cloned(),
    None => std::env::var("PORT").ok(),
  };

  let settings = config::Config::builder()
    .set_default("host", defaults.host)?
    .set_default("port", i64::from(defaults.port))?
    .set_default("data_file", defaults.data_file.to_string_lossy().into_owned())?
    .set_default("uploads_dir", defaults.uploads_dir.to_string_lossy().into_owned())?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("LASTSEEN").source(env))
    .set_override_option("port", port)?
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect()
  }

  #[test]
  fn defaults_without_file_or_environment() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config(dir.path().join("absent.toml"), Some(vars(&[]))).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.data_file, PathBuf::from("data/missing-persons.json"));
    assert_eq!(cfg.uploads_dir, PathBuf::from("uploads"));
  }

  #[test]
  fn file_then_prefixed_environment_then_port() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      "host = \"127.0.0.1\"\nport = 4000\ndata_file = \"/srv/reports.json\"\n",
    )
    .unwrap();

    let cfg = load_config(
      path.clone(),
      Some(vars(&[("LASTSEEN_UPLOADS_DIR", "/srv/photos")])),
    )
    .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 4000);
    assert_eq!(cfg.data_file, PathBuf::from("/srv/reports.json"));
    assert_eq!(cfg.uploads_dir, PathBuf::from("/srv/photos"));

    let cfg = load_config(
      path,
      Some(vars(&[("LASTSEEN_PORT", "5000"), ("PORT", "8081")])),
    )
    .unwrap();
    assert_eq!(cfg.port, 8081);
  }

  #[test]
  fn invalid_port_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(dir.path().join("absent.toml"), Some(vars(&[("PORT", "http")])));
    assert!(result.is_err());
  }
}
