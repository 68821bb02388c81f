//! MongoDB backend.
//!
//! One collection per entity, documents are the domain records' serde form
//! (`_id` is the entity id as a UUID string). Two-step writes run inside a
//! multi-document transaction when the deployment supports one; see
//! [`MongoStore::open_txn`] for the fallback protocol.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bson::{Document, doc};
use mongodb::error::ErrorKind;
use mongodb::{Client, ClientSession, Collection, Database};

use stockroom_core::UserId;
use stockroom_products::Product;
use stockroom_purchasing::Purchase;
use stockroom_sales::Sale;
use stockroom_sellers::Seller;

use crate::config::{StoreConfig, TxnMode};
use crate::store::{StoreError, StoreResult};

mod products;
mod purchases;
mod reports;
mod sales;
mod sellers;

pub(crate) const PRODUCTS: &str = "products";
pub(crate) const SALES: &str = "sales";
pub(crate) const PURCHASES: &str = "purchases";
pub(crate) const SELLERS: &str = "sellers";

/// MongoDB-backed store.
///
/// Cloning is cheap (the driver's `Client` is a handle) and clones share the
/// transaction-support flag, so a fallback discovered by one clone sticks for
/// all of them.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
    txn_enabled: Arc<AtomicBool>,
}

impl MongoStore {
    /// Connect using [`StoreConfig`] (URI + database name + transaction mode).
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        Ok(Self::new(client, &config.database, config.txn_mode))
    }

    pub fn new(client: Client, database: &str, mode: TxnMode) -> Self {
        let db = client.database(database);
        Self {
            client,
            db,
            txn_enabled: Arc::new(AtomicBool::new(mode == TxnMode::Auto)),
        }
    }

    pub(crate) fn products(&self) -> Collection<Product> {
        self.db.collection(PRODUCTS)
    }

    pub(crate) fn sales(&self) -> Collection<Sale> {
        self.db.collection(SALES)
    }

    pub(crate) fn purchases(&self) -> Collection<Purchase> {
        self.db.collection(PURCHASES)
    }

    pub(crate) fn sellers(&self) -> Collection<Seller> {
        self.db.collection(SELLERS)
    }

    pub(crate) fn raw(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    /// Open a transaction for a two-step write, or `None` when transactions
    /// are disabled (by configuration or a previous fallback).
    ///
    /// `start_transaction` does no IO; a deployment without transaction
    /// support only reveals itself on the first operation inside the
    /// transaction, surfacing as [`StoreError::TxnUnsupported`]. Callers abort
    /// the session, call [`Self::disable_txn`] and redo the write
    /// sequentially.
    pub(crate) async fn open_txn(&self) -> StoreResult<Option<ClientSession>> {
        if !self.txn_enabled.load(Ordering::Relaxed) {
            return Ok(None);
        }
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok(Some(session))
    }

    pub(crate) fn disable_txn(&self) {
        if self.txn_enabled.swap(false, Ordering::Relaxed) {
            tracing::warn!(
                "deployment does not support transactions; two-step writes fall back to sequential mode"
            );
        }
    }
}

/// Filter for one record of one user.
pub(crate) fn by_id(user_id: UserId, id: impl ToString) -> Document {
    doc! { "_id": id.to_string(), "user_id": user_id.to_string() }
}

/// Filter for all records of one user.
pub(crate) fn by_user(user_id: UserId) -> Document {
    doc! { "user_id": user_id.to_string() }
}

/// Quote a user-supplied needle for use inside `$regex`.
pub(crate) fn escape_regex(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn txn_unsupported(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Command(c) => c.code == 20 && c.message.contains("Transaction numbers"),
        _ => false,
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        if txn_unsupported(&err) {
            StoreError::TxnUnsupported
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_regex_quotes_metacharacters() {
        assert_eq!(escape_regex("a.c"), "a\\.c");
        assert_eq!(escape_regex("100% (new)"), "100% \\(new\\)");
        assert_eq!(escape_regex("plain"), "plain");
    }

    #[test]
    fn by_id_filter_scopes_to_user() {
        let user: UserId = "00000000-0000-0000-0000-000000000001".parse().unwrap();
        let filter = by_id(user, "abc");
        assert_eq!(filter.get_str("_id").unwrap(), "abc");
        assert_eq!(filter.get_str("user_id").unwrap(), user.to_string());
    }
}
