//! Persistence collaborators. The dashboard talks to `Backend` and never
//! learns whether rows live in the hosted store or in the browser.

pub mod http;
pub mod local;
mod rest;
mod sync;

pub use local::LocalStore;
pub use rest::RowStore;
pub use sync::{initial_sync, merge_sync};

use crate::auth::Session;
use crate::config::AppConfig;
use crate::error::Result;
use crate::model::{Category, Kind, Transaction, TransactionDraft};
use crate::store::CategorySet;

#[derive(Clone, Debug, PartialEq)]
pub enum Backend {
    Remote(RowStore),
    Local(LocalStore),
}

impl Backend {
    pub fn for_session(config: &AppConfig, session: &Session) -> Self {
        match &config.remote {
            Some(remote) => Backend::Remote(RowStore::new(
                remote.clone(),
                session.access_token.clone(),
            )),
            None => Backend::Local(LocalStore),
        }
    }

    pub async fn load_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        match self {
            Backend::Remote(rows) => rows.select_transactions(user_id).await,
            Backend::Local(local) => local.load_transactions(),
        }
    }

    pub async fn load_categories(&self, user_id: &str) -> Result<Option<CategorySet>> {
        match self {
            Backend::Remote(rows) => rows.select_categories(user_id).await,
            Backend::Local(local) => local.load_categories(),
        }
    }

    /// `None` when the hosted store accepted the row without echoing it.
    pub async fn insert_transaction(
        &self,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<Option<Transaction>> {
        match self {
            Backend::Remote(rows) => rows.insert_transaction(user_id, draft).await,
            Backend::Local(local) => local.insert_transaction(user_id, draft).map(Some),
        }
    }

    pub async fn update_transaction(&self, id: i64, draft: &TransactionDraft) -> Result<()> {
        match self {
            Backend::Remote(rows) => rows.update_transaction(id, draft).await,
            Backend::Local(local) => local.update_transaction(id, draft),
        }
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        match self {
            Backend::Remote(rows) => rows.delete_transaction(id).await,
            Backend::Local(local) => local.delete_transaction(id),
        }
    }

    pub async fn delete_transactions_by_category(&self, user_id: &str, category: &str) -> Result<()> {
        match self {
            Backend::Remote(rows) => rows.delete_transactions_by_category(user_id, category).await,
            Backend::Local(local) => local.delete_transactions_by_category(category),
        }
    }

    pub async fn save_categories(&self, user_id: &str, set: &CategorySet) -> Result<()> {
        match self {
            Backend::Remote(rows) => rows.upsert_categories(user_id, set).await,
            Backend::Local(local) => local.save_categories(set),
        }
    }

    pub async fn update_category_list(&self, user_id: &str, kind: Kind, list: &[Category]) -> Result<()> {
        match self {
            Backend::Remote(rows) => rows.update_category_list(user_id, kind, list).await,
            Backend::Local(local) => local.update_category_list(kind, list),
        }
    }
}
