//! Store configuration.
//!
//! Connection bootstrapping (pooling, retries, TLS) is the embedder's job;
//! this module only carries the knobs the stores themselves need, read from
//! the environment with local-development defaults.

use anyhow::{Context, bail};

/// Whether two-step writes should attempt a multi-document transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxnMode {
    /// Attempt a transaction; permanently fall back to sequential writes after
    /// the first "transactions not supported" error from the server.
    #[default]
    Auto,
    /// Never open a transaction (standalone deployments, some test setups).
    Disabled,
}

/// Connection settings for [`crate::MongoStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub txn_mode: TxnMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "stockroom".to_string(),
            txn_mode: TxnMode::Auto,
        }
    }
}

impl StoreConfig {
    /// Read `STOCKROOM_MONGODB_URI`, `STOCKROOM_DATABASE` and `STOCKROOM_TXN`
    /// from the environment, defaulting each missing variable.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let uri = std::env::var("STOCKROOM_MONGODB_URI").unwrap_or(defaults.uri);
        let database = std::env::var("STOCKROOM_DATABASE").unwrap_or(defaults.database);
        let txn_mode = match std::env::var("STOCKROOM_TXN") {
            Ok(value) => parse_txn_mode(&value).context("STOCKROOM_TXN")?,
            Err(_) => TxnMode::Auto,
        };
        Ok(Self {
            uri,
            database,
            txn_mode,
        })
    }
}

fn parse_txn_mode(value: &str) -> anyhow::Result<TxnMode> {
    match value.to_ascii_lowercase().as_str() {
        "auto" => Ok(TxnMode::Auto),
        "off" | "disabled" => Ok(TxnMode::Disabled),
        other => bail!("expected 'auto' or 'off', got '{other}'"),
    }
}
