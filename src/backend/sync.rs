use std::future::Future;

use futures::future::{select, Either};
use gloo_timers::future::TimeoutFuture;

use super::Backend;
use crate::error::{AppError, Result};
use crate::model::Transaction;
use crate::store::CategorySet;

/// Races `fut` against a wall-clock timer. The losing request is dropped,
/// not aborted on the wire.
pub async fn with_timeout<T, F>(fut: F, timeout_ms: u32) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let timer = Box::pin(TimeoutFuture::new(timeout_ms));
    match select(Box::pin(fut), timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(AppError::Timeout(timeout_ms)),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SyncOutcome<T> {
    Loaded(T),
    /// Nothing stored yet; defaults were created and are used.
    Defaulted(T),
    Failed(AppError),
    TimedOut,
}

impl<T> SyncOutcome<T> {
    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => SyncOutcome::Loaded(value),
            Err(AppError::Timeout(_)) => SyncOutcome::TimedOut,
            Err(err) => SyncOutcome::Failed(err),
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            SyncOutcome::Loaded(v) | SyncOutcome::Defaulted(v) => Some(v),
            SyncOutcome::Failed(_) | SyncOutcome::TimedOut => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            SyncOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SyncOutcome::Loaded(_) => "synced",
            SyncOutcome::Defaulted(_) => "defaulted",
            SyncOutcome::Failed(_) => "failed",
            SyncOutcome::TimedOut => "timed out",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyncReport {
    pub categories: SyncOutcome<CategorySet>,
    pub transactions: SyncOutcome<Vec<Transaction>>,
}

impl SyncReport {
    /// True when neither half produced data.
    pub fn is_total_failure(&self) -> bool {
        matches!(
            self.categories,
            SyncOutcome::Failed(_) | SyncOutcome::TimedOut
        ) && matches!(
            self.transactions,
            SyncOutcome::Failed(_) | SyncOutcome::TimedOut
        )
    }

    /// First error worth showing, if any half failed outright.
    pub fn first_error(&self) -> Option<&AppError> {
        self.categories.error().or_else(|| self.transactions.error())
    }
}

/// Folds a report into the current state: halves that succeeded replace
/// what is held, halves that failed keep it.
pub fn merge_sync(
    report: SyncReport,
    categories: &CategorySet,
    transactions: &[Transaction],
) -> (CategorySet, Vec<Transaction>) {
    let categories = report
        .categories
        .value()
        .unwrap_or_else(|| categories.clone());
    let transactions = report
        .transactions
        .value()
        .unwrap_or_else(|| transactions.to_vec());
    (categories, transactions)
}

/// Turns the category half of a sync into its outcome. With no stored row
/// the defaults are written through `store_defaults` and used whether or not
/// that write succeeds.
async fn settle_categories<S, Fut>(
    loaded: Result<Option<CategorySet>>,
    store_defaults: S,
) -> SyncOutcome<CategorySet>
where
    S: FnOnce(CategorySet) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match loaded {
        Ok(Some(set)) => SyncOutcome::Loaded(set),
        Ok(None) => {
            let defaults = CategorySet::default();
            if let Err(err) = store_defaults(defaults.clone()).await {
                log::warn!("[sync] could not store default categories: {}", err);
            }
            SyncOutcome::Defaulted(defaults)
        }
        Err(err) => SyncOutcome::from_result(Err(err)),
    }
}

/// Loads categories and transactions concurrently, each under its own timeout.
pub async fn initial_sync(backend: &Backend, user_id: &str, timeout_ms: u32) -> SyncReport {
    log::debug!("[sync] start for {} ({} ms budget)", user_id, timeout_ms);
    let (categories, transactions) = futures::join!(
        with_timeout(backend.load_categories(user_id), timeout_ms),
        with_timeout(backend.load_transactions(user_id), timeout_ms),
    );

    let categories = settle_categories(categories, |defaults| async move {
        with_timeout(backend.save_categories(user_id, &defaults), timeout_ms).await
    })
    .await;
    let transactions = SyncOutcome::from_result(transactions);

    match &transactions {
        SyncOutcome::Loaded(items) => log::info!("[sync] {} transactions loaded", items.len()),
        other => log::warn!("[sync] transactions {}", other.describe()),
    }
    match &categories {
        SyncOutcome::Failed(err) => log::warn!("[sync] categories failed: {}", err),
        other => log::info!("[sync] categories {}", other.describe()),
    }

    SyncReport { categories, transactions }
}
