use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_ADDR: &str = "127.0.0.1:2021";
pub const DEFAULT_DB_PATH: &str = "depot.db";

/// Server configuration, read from the environment with sane defaults.
/// `DEPOT_ADDR` is the listen address, `DEPOT_DB` the SQLite file path.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let addr =
            env::var("DEPOT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("invalid DEPOT_ADDR `{addr}`"))?;

        let db_path = env::var("DEPOT_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        Ok(Config { addr, db_path })
    }
}
