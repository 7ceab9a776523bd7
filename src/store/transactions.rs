use std::cmp::Ordering;

use crate::error::{AppError, Result};
use crate::model::{date_sort_key, Kind, Transaction, TransactionDraft};
use crate::store::CategorySet;

/// Flat, unordered collection of the user's transactions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionStore {
    items: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(items: Vec<Transaction>) -> Self {
        TransactionStore { items }
    }

    pub fn all(&self) -> &[Transaction] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Type implied by the category's owning list; `expense` when the
    /// category is in none of them.
    pub fn infer_kind(categories: &CategorySet, category: &str) -> Kind {
        categories.owner_of(category).unwrap_or(Kind::Expense)
    }

    /// Id used when the row store did not echo the inserted row back.
    pub fn local_id(&self, now_ms: i64) -> i64 {
        let max = self.items.iter().map(|t| t.id).max().unwrap_or(i64::MIN);
        if max >= now_ms {
            max + 1
        } else {
            now_ms
        }
    }

    pub fn add(&mut self, tx: Transaction) {
        self.items.push(tx);
    }

    pub fn update(&mut self, id: i64, draft: TransactionDraft) -> Result<()> {
        let tx = self
            .items
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tx.apply(draft);
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Option<Transaction> {
        let idx = self.items.iter().position(|t| t.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Cascade for a deleted category; returns how many transactions went with it.
    pub fn remove_category(&mut self, category: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|t| t.category != category);
        before - self.items.len()
    }

    /// Newest first. Unparseable dates sort last; equal dates keep insertion order.
    pub fn sorted_by_date_desc<'a, I>(items: I) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut sorted: Vec<&Transaction> = items.into_iter().collect();
        sorted.sort_by(|a, b| match (date_sort_key(&a.date), date_sort_key(&b.date)) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, date: &str, category: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            user_id: "u".into(),
            date: date.into(),
            kind: Kind::Expense,
            category: category.into(),
            amount,
            desc: String::new(),
        }
    }

    #[test]
    fn test_infer_kind_from_owning_list() {
        let set = CategorySet::default();
        assert_eq!(TransactionStore::infer_kind(&set, "income_default"), Kind::Income);
        assert_eq!(TransactionStore::infer_kind(&set, "savings_default"), Kind::Savings);
        assert_eq!(TransactionStore::infer_kind(&set, "food"), Kind::Expense);
        assert_eq!(TransactionStore::infer_kind(&set, "unknown"), Kind::Expense);
    }

    #[test]
    fn test_update_replaces_mutable_fields() {
        let mut store = TransactionStore::new(vec![tx(1, "2024-03-01", "food", 100)]);
        let draft = TransactionDraft {
            date: "2024-04-02".into(),
            kind: Kind::Income,
            category: "income_default".into(),
            amount: 900,
            desc: "월급".into(),
        };
        store.update(1, draft.clone()).unwrap();
        assert_eq!(store.get(1).unwrap().to_draft(), draft);
        assert_eq!(store.get(1).unwrap().user_id, "u");
        assert!(matches!(store.update(2, draft), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_cascade() {
        let mut store = TransactionStore::new(vec![
            tx(1, "2024-03-01", "food", 100),
            tx(2, "2024-03-02", "fixed", 200),
            tx(3, "2024-03-03", "food", 300),
        ]);
        assert_eq!(store.delete(2).map(|t| t.id), Some(2));
        assert!(store.delete(2).is_none());
        assert_eq!(store.remove_category("food"), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_local_id_never_collides() {
        let store = TransactionStore::new(vec![tx(5000, "2024-03-01", "food", 1)]);
        assert_eq!(store.local_id(1000), 5001);
        assert_eq!(store.local_id(9000), 9000);
        assert_eq!(TransactionStore::default().local_id(7), 7);
    }

    #[test]
    fn test_sorted_by_date_desc() {
        let items = vec![
            tx(1, "2024-03-01", "food", 1),
            tx(2, "bad", "food", 1),
            tx(3, "2024/03/15", "food", 1),
            tx(4, "2024-03-15", "food", 1),
        ];
        let ids: Vec<i64> = TransactionStore::sorted_by_date_desc(&items)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }
}
