//! Persisted commands. Each stages its change on a copy, writes it through the
//! backend, and only then hands back the `Action` that commits it.

use futures::lock::Mutex;

use crate::backend::{initial_sync, merge_sync, Backend};
use crate::dialog;
use crate::error::{AppError, Result};
use crate::model::{now_millis, Kind, Transaction, TransactionDraft};
use crate::state::Action;
use crate::store::{CategoryChange, CategorySet, TransactionStore};

/// Runs the initial sync and returns the commit plus the error to surface,
/// if the whole sync failed. Loaded categories also become the saved lists
/// later category edits build on.
pub async fn sync(
    backend: &Backend,
    user_id: &str,
    timeout_ms: u32,
    saved: &Mutex<CategorySet>,
    transactions: &[Transaction],
) -> (Action, Option<AppError>) {
    let report = initial_sync(backend, user_id, timeout_ms).await;
    if report.is_total_failure() {
        let err = report
            .first_error()
            .cloned()
            .unwrap_or(AppError::Timeout(timeout_ms));
        return (Action::SyncFinished, Some(err));
    }
    let mut saved = saved.lock().await;
    let (categories, transactions) = merge_sync(report, &saved, transactions);
    *saved = categories.clone();
    (Action::Synced { categories, transactions }, None)
}

pub async fn add_transaction(
    backend: &Backend,
    user_id: &str,
    categories: &CategorySet,
    store: &TransactionStore,
    draft: TransactionDraft,
) -> Result<Action> {
    let draft = TransactionDraft {
        kind: TransactionStore::infer_kind(categories, &draft.category),
        ..draft
    };
    let echoed = backend.insert_transaction(user_id, &draft).await?;
    let tx = match echoed {
        Some(tx) => tx,
        None => {
            log::debug!("[tx] insert not echoed, using a local id");
            Transaction::from_draft(store.local_id(now_millis()), user_id, draft)
        }
    };
    log::info!("[tx] added {} ({} {})", tx.id, tx.category, tx.amount);
    Ok(Action::TransactionAdded(tx))
}

pub async fn update_transaction(backend: &Backend, id: i64, draft: TransactionDraft) -> Result<Action> {
    backend.update_transaction(id, &draft).await?;
    log::info!("[tx] updated {}", id);
    Ok(Action::TransactionUpdated { id, draft })
}

pub async fn delete_transaction(backend: &Backend, id: i64) -> Result<Action> {
    backend.delete_transaction(id).await?;
    log::info!("[tx] deleted {}", id);
    Ok(Action::TransactionDeleted(id))
}

/// Persists one category edit against the saved lists and hands back its
/// commit. The caller holds the saved-set lock, so the list written remotely
/// always includes every earlier acknowledged edit.
async fn persist_category_change(
    backend: &Backend,
    user_id: &str,
    saved: &mut CategorySet,
    change: CategoryChange,
) -> Result<Action> {
    let mut next = saved.clone();
    let kind = change.apply(&mut next)?;
    backend.update_category_list(user_id, kind, next.list(kind)).await?;
    *saved = next;
    Ok(Action::CategoryChanged(change))
}

pub async fn add_category(
    backend: &Backend,
    user_id: &str,
    saved: &Mutex<CategorySet>,
    kind: Kind,
    name: &str,
) -> Result<Action> {
    let mut saved = saved.lock().await;
    let category = saved.new_category(kind, name, now_millis())?;
    log::info!("[category] adding {} to {}", category.id, kind.as_str());
    persist_category_change(backend, user_id, &mut saved, CategoryChange::Added { kind, category }).await
}

/// Removes the category, then every transaction filed under it. When only the
/// list change lands, the category is still committed as deleted and its
/// transactions stay until the next sync.
pub async fn delete_category(
    backend: &Backend,
    user_id: &str,
    saved: &Mutex<CategorySet>,
    id: &str,
) -> Result<Action> {
    let mut saved = saved.lock().await;
    let change = CategoryChange::Deleted { id: id.to_string(), cascaded: true };
    persist_category_change(backend, user_id, &mut saved, change).await?;
    match backend.delete_transactions_by_category(user_id, id).await {
        Ok(()) => Ok(Action::CategoryChanged(CategoryChange::Deleted {
            id: id.to_string(),
            cascaded: true,
        })),
        Err(err) => {
            log::error!("[category] {} removed but its transactions were not: {}", id, err);
            dialog::alert(&format!(
                "카테고리는 삭제되었지만 내역을 삭제하지 못했습니다: {}",
                err.user_message()
            ));
            Ok(Action::CategoryChanged(CategoryChange::Deleted {
                id: id.to_string(),
                cascaded: false,
            }))
        }
    }
}

pub async fn reorder_categories(
    backend: &Backend,
    user_id: &str,
    saved: &Mutex<CategorySet>,
    kind: Kind,
    order: Vec<String>,
) -> Result<Action> {
    let mut saved = saved.lock().await;
    persist_category_change(backend, user_id, &mut saved, CategoryChange::Reordered { kind, order }).await
}

pub async fn set_category_icon(
    backend: &Backend,
    user_id: &str,
    saved: &Mutex<CategorySet>,
    id: &str,
    icon: &str,
) -> Result<Action> {
    let mut saved = saved.lock().await;
    let change = CategoryChange::IconSet {
        id: id.to_string(),
        icon: icon.to_string(),
    };
    persist_category_change(backend, user_id, &mut saved, change).await
}
