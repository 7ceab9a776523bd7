use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::model::{builtin_name, default_list, Category, Kind};

/// The three ordered category lists of one user, stored remotely as one row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySet {
    pub expense: Vec<Category>,
    pub savings: Vec<Category>,
    pub income: Vec<Category>,
}

impl Default for CategorySet {
    fn default() -> Self {
        CategorySet {
            expense: default_list(Kind::Expense),
            savings: default_list(Kind::Savings),
            income: default_list(Kind::Income),
        }
    }
}

impl CategorySet {
    pub fn list(&self, kind: Kind) -> &[Category] {
        match kind {
            Kind::Expense => &self.expense,
            Kind::Savings => &self.savings,
            Kind::Income => &self.income,
        }
    }

    fn list_mut(&mut self, kind: Kind) -> &mut Vec<Category> {
        match kind {
            Kind::Expense => &mut self.expense,
            Kind::Savings => &mut self.savings,
            Kind::Income => &mut self.income,
        }
    }

    /// Every category, expense list first, then savings, then income.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        Kind::LOOKUP_ORDER
            .into_iter()
            .flat_map(move |kind| self.list(kind).iter())
    }

    /// Owning list of `id`. Ids duplicated across lists resolve to the first
    /// list in expense, savings, income order.
    pub fn owner_of(&self, id: &str) -> Option<Kind> {
        Kind::LOOKUP_ORDER
            .into_iter()
            .find(|kind| self.list(*kind).iter().any(|c| c.id == id))
    }

    pub fn find(&self, id: &str) -> Option<(Kind, &Category)> {
        let kind = self.owner_of(id)?;
        self.list(kind).iter().find(|c| c.id == id).map(|c| (kind, c))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.owner_of(id).is_some()
    }

    pub fn display_name(&self, id: &str) -> String {
        match self.find(id) {
            Some((_, cat)) => cat.name.clone(),
            None => builtin_name(id).map(str::to_string).unwrap_or_else(|| id.to_string()),
        }
    }

    /// A `custom_<millis>` id not used by any list.
    pub fn fresh_id(&self, now_ms: i64) -> String {
        let mut stamp = now_ms;
        loop {
            let id = format!("custom_{}", stamp);
            if !self.contains(&id) {
                return id;
            }
            stamp += 1;
        }
    }

    /// A named category with a fresh id and the list's default icon. Not yet
    /// part of any list.
    pub fn new_category(&self, kind: Kind, name: &str, now_ms: i64) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "카테고리 이름을 입력해주세요.".to_string(),
            ));
        }
        Ok(Category {
            id: self.fresh_id(now_ms),
            name: name.to_string(),
            icon: kind.default_icon().to_string(),
        })
    }

    /// Appends `category` to `kind`'s list unless its id is already taken.
    pub fn insert(&mut self, kind: Kind, category: Category) {
        if !self.contains(&category.id) {
            self.list_mut(kind).push(category);
        }
    }

    /// Removes `id` from its owning list and reports which list changed.
    pub fn delete(&mut self, id: &str) -> Result<Kind> {
        let kind = self
            .owner_of(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        self.list_mut(kind).retain(|c| c.id != id);
        Ok(kind)
    }

    /// Rebuilds `kind`'s list in the given order. Unknown and repeated ids are
    /// skipped, so a stale order never resurrects or duplicates a category.
    /// Categories the order does not mention keep their relative order at the end.
    pub fn reorder(&mut self, kind: Kind, order: &[String]) {
        let mut rest = std::mem::take(self.list_mut(kind));
        let mut next: Vec<Category> = Vec::with_capacity(rest.len());
        for id in order {
            if let Some(at) = rest.iter().position(|c| &c.id == id) {
                next.push(rest.remove(at));
            }
        }
        next.extend(rest);
        *self.list_mut(kind) = next;
    }

    pub fn set_icon(&mut self, id: &str, icon: &str) -> Result<Kind> {
        let kind = self
            .owner_of(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        if let Some(cat) = self.list_mut(kind).iter_mut().find(|c| c.id == id) {
            cat.icon = icon.to_string();
        }
        Ok(kind)
    }

    pub fn replace_list(&mut self, kind: Kind, list: Vec<Category>) {
        *self.list_mut(kind) = list;
    }

    pub fn ids(&self, kind: Kind) -> Vec<String> {
        self.list(kind).iter().map(|c| c.id.clone()).collect()
    }
}

/// One persisted edit to the category lists. The reducer replays it against
/// the newest state, so edits acknowledged out of render order all survive.
#[derive(Clone, Debug, PartialEq)]
pub enum CategoryChange {
    Added { kind: Kind, category: Category },
    /// `cascaded` is false when the list change landed but removing the
    /// category's transactions did not.
    Deleted { id: String, cascaded: bool },
    Reordered { kind: Kind, order: Vec<String> },
    IconSet { id: String, icon: String },
}

impl CategoryChange {
    /// Applies the edit and reports which list it touched.
    pub fn apply(&self, set: &mut CategorySet) -> Result<Kind> {
        match self {
            CategoryChange::Added { kind, category } => {
                set.insert(*kind, category.clone());
                Ok(*kind)
            }
            CategoryChange::Deleted { id, .. } => set.delete(id),
            CategoryChange::Reordered { kind, order } => {
                set.reorder(*kind, order);
                Ok(*kind)
            }
            CategoryChange::IconSet { id, icon } => set.set_icon(id, icon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &CategorySet, kind: Kind) -> Vec<String> {
        set.ids(kind)
    }

    fn add(set: &mut CategorySet, kind: Kind, name: &str, now_ms: i64) -> Result<Category> {
        let category = set.new_category(kind, name, now_ms)?;
        set.insert(kind, category.clone());
        Ok(category)
    }

    #[test]
    fn test_add_appends_with_default_icon() {
        let mut set = CategorySet::default();
        let cat = add(&mut set, Kind::Expense, "  교통  ", 1700000000000).unwrap();
        assert_eq!(cat.id, "custom_1700000000000");
        assert_eq!(cat.name, "교통");
        assert_eq!(cat.icon, "💸");
        assert_eq!(set.expense.last(), Some(&cat));
        assert_eq!(set.owner_of(&cat.id), Some(Kind::Expense));
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let mut set = CategorySet::default();
        assert!(matches!(add(&mut set, Kind::Savings, "   ", 1), Err(AppError::Validation(_))));
        assert_eq!(set.savings.len(), 1);
    }

    #[test]
    fn test_fresh_ids_are_unique_across_lists() {
        let mut set = CategorySet::default();
        let a = add(&mut set, Kind::Income, "보너스", 42).unwrap();
        let b = add(&mut set, Kind::Savings, "적금", 42).unwrap();
        assert_eq!(a.id, "custom_42");
        assert_eq!(b.id, "custom_43");
    }

    #[test]
    fn test_lookup_precedence_prefers_expense() {
        let mut set = CategorySet::default();
        set.income.push(Category::new("food", "중복", "?"));
        assert_eq!(set.owner_of("food"), Some(Kind::Expense));
        assert_eq!(set.display_name("food"), "식비");

        set.savings.push(Category::new("dup", "저축쪽", "?"));
        set.income.push(Category::new("dup", "수입쪽", "?"));
        assert_eq!(set.owner_of("dup"), Some(Kind::Savings));
    }

    #[test]
    fn test_delete_each_list() {
        for kind in Kind::LOOKUP_ORDER {
            let mut set = CategorySet::default();
            let id = set.list(kind)[0].id.clone();
            assert_eq!(set.delete(&id).unwrap(), kind);
            assert!(!set.contains(&id));
        }
        let mut set = CategorySet::default();
        assert!(matches!(set.delete("missing"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_reorder_round_trips_and_skips_unknown_ids() {
        let mut set = CategorySet::default();
        let order = vec!["other".to_string(), "fixed".to_string(), "food".to_string()];
        set.reorder(Kind::Expense, &order);
        assert_eq!(ids(&set, Kind::Expense), order);

        let stale = vec![
            "food".to_string(),
            "gone".to_string(),
            "fixed".to_string(),
            "food".to_string(),
        ];
        set.reorder(Kind::Expense, &stale);
        assert_eq!(ids(&set, Kind::Expense), vec!["food", "fixed", "other"]);
    }

    #[test]
    fn test_reorder_keeps_categories_added_after_the_order_was_taken() {
        let mut set = CategorySet::default();
        let order = vec!["other".to_string(), "food".to_string(), "fixed".to_string()];
        let added = add(&mut set, Kind::Expense, "교통", 7).unwrap();
        set.reorder(Kind::Expense, &order);
        assert_eq!(ids(&set, Kind::Expense), vec!["other", "food", "fixed", added.id.as_str()]);
    }

    #[test]
    fn test_insert_ignores_taken_ids() {
        let mut set = CategorySet::default();
        let cat = set.new_category(Kind::Income, "보너스", 1).unwrap();
        assert!(!set.contains(&cat.id));
        set.insert(Kind::Income, cat.clone());
        set.insert(Kind::Savings, cat.clone());
        assert_eq!(set.owner_of(&cat.id), Some(Kind::Income));
        assert_eq!(set.savings.len(), 1);
    }

    #[test]
    fn test_changes_compose_in_any_order() {
        let base = CategorySet::default();
        let added = CategoryChange::Added {
            kind: Kind::Expense,
            category: base.new_category(Kind::Expense, "교통", 5).unwrap(),
        };
        let icon = CategoryChange::IconSet { id: "food".into(), icon: "🍜".into() };

        let mut one = base.clone();
        added.apply(&mut one).unwrap();
        icon.apply(&mut one).unwrap();
        let mut two = base.clone();
        icon.apply(&mut two).unwrap();
        added.apply(&mut two).unwrap();

        assert_eq!(one, two);
        assert!(one.contains("custom_5"));
        assert_eq!(one.find("food").unwrap().1.icon, "🍜");
        assert!(matches!(
            CategoryChange::Deleted { id: "nope".into(), cascaded: true }.apply(&mut one),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_icon() {
        let mut set = CategorySet::default();
        assert_eq!(set.set_icon("savings_default", "🐷").unwrap(), Kind::Savings);
        assert_eq!(set.find("savings_default").unwrap().1.icon, "🐷");
        assert!(set.set_icon("nope", "🐷").is_err());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut set = CategorySet::default();
        set.delete("food").unwrap();
        assert_eq!(set.display_name("food"), "식비");
        assert_eq!(set.display_name("custom_9"), "custom_9");
    }

    #[test]
    fn test_iter_order() {
        let set = CategorySet::default();
        let all: Vec<&str> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(all, vec!["fixed", "food", "other", "savings_default", "income_default"]);
    }
}
