//! Browser-local persistence, used when no remote store is configured and
//! as the avatar and session cache in every mode.

use web_sys::Storage;

use crate::error::{AppError, Result};
use crate::model::{now_millis, Category, Kind, Transaction, TransactionDraft};
use crate::store::{CategorySet, TransactionStore};

const TRANSACTIONS_KEY: &str = "transactions";
const CATEGORIES_KEY: &str = "user_categories";

pub fn storage() -> Result<Storage> {
    web_sys::window()
        .ok_or_else(|| AppError::Storage("no window".to_string()))?
        .local_storage()
        .map_err(|_| AppError::Storage("access denied".to_string()))?
        .ok_or_else(|| AppError::Storage("localStorage missing".to_string()))
}

pub fn read_key(key: &str) -> Result<Option<String>> {
    storage()?
        .get_item(key)
        .map_err(|_| AppError::Storage(format!("read {}", key)))
}

pub fn write_key(key: &str, value: &str) -> Result<()> {
    storage()?
        .set_item(key, value)
        .map_err(|_| AppError::Storage(format!("write {}", key)))
}

pub fn remove_key(key: &str) -> Result<()> {
    storage()?
        .remove_item(key)
        .map_err(|_| AppError::Storage(format!("remove {}", key)))
}

pub fn avatar_key(user_id: &str) -> String {
    format!("avatar_{}", user_id)
}

pub fn load_avatar(user_id: &str) -> Option<String> {
    read_key(&avatar_key(user_id))
        .ok()
        .flatten()
        .filter(|url| url.starts_with("data:"))
}

pub fn save_avatar(user_id: &str, data_url: &str) -> Result<()> {
    write_key(&avatar_key(user_id), data_url)
}

/// Stored transactions; a missing key is an empty collection.
pub fn parse_transactions(raw: Option<&str>) -> Result<Vec<Transaction>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(raw)?),
        _ => Ok(Vec::new()),
    }
}

pub fn parse_categories(raw: Option<&str>) -> Result<Option<CategorySet>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(raw)?)),
        _ => Ok(None),
    }
}

/// Whole-collection store over `localStorage`. Every write rewrites the key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalStore;

impl LocalStore {
    pub fn load_transactions(&self) -> Result<Vec<Transaction>> {
        parse_transactions(read_key(TRANSACTIONS_KEY)?.as_deref())
    }

    fn save_transactions(&self, items: &[Transaction]) -> Result<()> {
        write_key(TRANSACTIONS_KEY, &serde_json::to_string(items)?)
    }

    fn with_transactions<T>(&self, f: impl FnOnce(&mut TransactionStore) -> Result<T>) -> Result<T> {
        let mut store = TransactionStore::new(self.load_transactions()?);
        let out = f(&mut store)?;
        self.save_transactions(store.all())?;
        Ok(out)
    }

    pub fn insert_transaction(&self, user_id: &str, draft: &TransactionDraft) -> Result<Transaction> {
        self.with_transactions(|store| {
            let tx = Transaction::from_draft(store.local_id(now_millis()), user_id, draft.clone());
            store.add(tx.clone());
            Ok(tx)
        })
    }

    pub fn update_transaction(&self, id: i64, draft: &TransactionDraft) -> Result<()> {
        self.with_transactions(|store| store.update(id, draft.clone()))
    }

    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        self.with_transactions(|store| {
            store
                .delete(id)
                .map(|_| ())
                .ok_or_else(|| AppError::NotFound(id.to_string()))
        })
    }

    pub fn delete_transactions_by_category(&self, category: &str) -> Result<()> {
        self.with_transactions(|store| {
            let removed = store.remove_category(category);
            log::debug!("[local] removed {} transactions of {}", removed, category);
            Ok(())
        })
    }

    pub fn load_categories(&self) -> Result<Option<CategorySet>> {
        parse_categories(read_key(CATEGORIES_KEY)?.as_deref())
    }

    pub fn save_categories(&self, set: &CategorySet) -> Result<()> {
        write_key(CATEGORIES_KEY, &serde_json::to_string(set)?)
    }

    pub fn update_category_list(&self, kind: Kind, list: &[Category]) -> Result<()> {
        let mut set = self.load_categories()?.unwrap_or_default();
        set.replace_list(kind, list.to_vec());
        self.save_categories(&set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transactions_missing_or_blank_is_empty() {
        assert!(parse_transactions(None).unwrap().is_empty());
        assert!(parse_transactions(Some("  ")).unwrap().is_empty());
        assert!(matches!(parse_transactions(Some("{oops")), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_parse_transactions_reads_stored_rows() {
        let raw = r#"[{"id":1,"user_id":"local","date":"2024-03-05","type":"expense","category":"food","amount":15000,"desc":"lunch"}]"#;
        let items = parse_transactions(Some(raw)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, 15000);
        assert_eq!(items[0].kind, Kind::Expense);
    }

    #[test]
    fn test_parse_categories() {
        assert_eq!(parse_categories(None).unwrap(), None);
        let raw = serde_json::to_string(&CategorySet::default()).unwrap();
        assert_eq!(parse_categories(Some(&raw)).unwrap(), Some(CategorySet::default()));
    }

    #[test]
    fn test_avatar_key() {
        assert_eq!(avatar_key("abc"), "avatar_abc");
    }
}
