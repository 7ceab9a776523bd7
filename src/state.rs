//! Application state of the dashboard and the reducer every mutation goes through.

use std::rc::Rc;

use yew::Reducible;

use crate::error::{AppError, Result};
use crate::model::{Kind, Transaction, TransactionDraft};
use crate::store::{CategoryChange, CategorySet, TransactionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Overview,
    Month,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub categories: CategorySet,
    pub transactions: TransactionStore,
    pub year: i32,
    pub month: u32,
    pub view: View,
    /// Category shown in the detail modal.
    pub detail: Option<String>,
    pub loading: bool,
}

pub enum Action {
    Synced {
        categories: CategorySet,
        transactions: Vec<Transaction>,
    },
    SyncFinished,
    TransactionAdded(Transaction),
    TransactionUpdated { id: i64, draft: TransactionDraft },
    TransactionDeleted(i64),
    CategoryChanged(CategoryChange),
    NavigateMonth(i32),
    SelectYear(i32),
    SwitchView(View),
    OpenDetail(String),
    CloseDetail,
}

impl AppState {
    pub fn new(year: i32, month: u32) -> Self {
        AppState {
            categories: CategorySet::default(),
            transactions: TransactionStore::default(),
            year,
            month,
            view: View::Month,
            detail: None,
            loading: true,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Synced { categories, transactions } => {
                self.categories = categories;
                self.transactions = TransactionStore::new(transactions);
                self.loading = false;
            }
            Action::SyncFinished => self.loading = false,
            Action::TransactionAdded(mut tx) => {
                if self.transactions.get(tx.id).is_some() {
                    tx.id = self.transactions.local_id(tx.id);
                }
                self.transactions.add(tx);
            }
            Action::TransactionUpdated { id, draft } => {
                if let Err(err) = self.transactions.update(id, draft) {
                    log::warn!("[state] update skipped: {}", err);
                }
            }
            Action::TransactionDeleted(id) => {
                self.transactions.delete(id);
            }
            Action::CategoryChanged(change) => {
                if let Err(err) = change.apply(&mut self.categories) {
                    log::warn!("[state] category change skipped: {}", err);
                    return;
                }
                if let CategoryChange::Deleted { id, cascaded } = &change {
                    if *cascaded {
                        let removed = self.transactions.remove_category(id);
                        log::info!("[state] category {} deleted with {} transactions", id, removed);
                    }
                    if self.detail.as_deref() == Some(id.as_str()) {
                        self.detail = None;
                    }
                }
            }
            Action::NavigateMonth(delta) => {
                let (year, month) = shift_month(self.year, self.month, delta);
                self.year = year;
                self.month = month;
            }
            Action::SelectYear(year) => self.year = year,
            Action::SwitchView(view) => self.view = view,
            Action::OpenDetail(id) => self.detail = Some(id),
            Action::CloseDetail => self.detail = None,
        }
    }
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Moves the cursor by `delta` months, rolling over year boundaries.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

/// Largest amount a form accepts: one trillion won.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Validates raw form input. Date and amount are required; the amount must
/// be a whole number no larger than `MAX_AMOUNT`.
pub fn parse_form(
    date: &str,
    kind: Kind,
    category: &str,
    amount: &str,
    desc: &str,
) -> Result<TransactionDraft> {
    let date = date.trim();
    let amount = amount.trim().replace(',', "");
    if date.is_empty() || amount.is_empty() {
        return Err(AppError::Validation(
            "날짜와 금액을 모두 입력해주세요.".to_string(),
        ));
    }
    let amount = amount
        .parse::<i64>()
        .ok()
        .filter(|a| *a >= 0)
        .ok_or_else(|| AppError::Validation("금액은 숫자로 입력해주세요.".to_string()))?;
    if amount > MAX_AMOUNT {
        return Err(AppError::Validation("금액이 너무 큽니다.".to_string()));
    }
    if category.is_empty() {
        return Err(AppError::Validation("카테고리를 선택해주세요.".to_string()));
    }
    Ok(TransactionDraft {
        date: date.to_string(),
        kind,
        category: category.to_string(),
        amount,
        desc: desc.trim().to_string(),
    })
}

/// New order after dropping `dragged` in front of `target`, or at the end
/// when dropped past the last card.
pub fn move_before(order: &[String], dragged: &str, target: Option<&str>) -> Vec<String> {
    if target == Some(dragged) || !order.iter().any(|id| id == dragged) {
        return order.to_vec();
    }
    let mut next: Vec<String> = order.iter().filter(|id| *id != dragged).cloned().collect();
    let at = target
        .and_then(|t| next.iter().position(|id| id == t))
        .unwrap_or(next.len());
    next.insert(at, dragged.to_string());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::monthly_rollup;

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
    fn test_month_rollover() {
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 6, 1), (2024, 7));
        assert_eq!(shift_month(2024, 3, -15), (2022, 12));
    }

    #[test]
    fn test_navigation_and_year_select() {
        let mut state = AppState::new(2024, 12);
        state.apply(Action::NavigateMonth(1));
        assert_eq!((state.year, state.month), (2025, 1));
        state.apply(Action::SelectYear(2020));
        assert_eq!((state.year, state.month), (2020, 1));
        state.apply(Action::SwitchView(View::Overview));
        assert_eq!(state.view, View::Overview);
    }

    #[test]
    fn test_category_delete_cascades_and_closes_detail() {
        for kind in Kind::LOOKUP_ORDER {
            let mut state = AppState::new(2024, 3);
            let id = state.categories.list(kind)[0].id.clone();
            state.apply(Action::Synced {
                categories: CategorySet::default(),
                transactions: vec![tx(1, "2024-03-01", &id, 10), tx(2, "2024-03-02", "zzz", 20)],
            });
            state.apply(Action::OpenDetail(id.clone()));

            state.apply(Action::CategoryChanged(CategoryChange::Deleted {
                id: id.clone(),
                cascaded: true,
            }));

            assert!(!state.categories.contains(&id));
            assert!(state.transactions.all().iter().all(|t| t.category != id));
            assert_eq!(state.transactions.len(), 1);
            assert_eq!(state.detail, None);
        }
    }

    #[test]
    fn test_delete_without_cascade_keeps_transactions() {
        let mut state = AppState::new(2024, 3);
        state.apply(Action::Synced {
            categories: CategorySet::default(),
            transactions: vec![tx(1, "2024-03-01", "food", 10)],
        });
        state.apply(Action::CategoryChanged(CategoryChange::Deleted {
            id: "food".into(),
            cascaded: false,
        }));
        assert!(!state.categories.contains("food"));
        assert_eq!(state.transactions.len(), 1);
    }

    #[test]
    fn test_detail_stays_open_for_other_category() {
        let mut state = AppState::new(2024, 3);
        state.apply(Action::OpenDetail("food".into()));
        state.apply(Action::CategoryChanged(CategoryChange::Deleted {
            id: "fixed".into(),
            cascaded: true,
        }));
        assert_eq!(state.detail.as_deref(), Some("food"));
    }

    #[test]
    fn test_interleaved_category_commits_all_survive() {
        let mut state = AppState::new(2024, 3);
        let snapshot = state.categories.clone();
        let category = snapshot.new_category(Kind::Expense, "교통", 11).unwrap();
        let id = category.id.clone();
        let order = vec!["other".to_string(), "fixed".to_string(), "food".to_string()];

        state.apply(Action::CategoryChanged(CategoryChange::Added { kind: Kind::Expense, category }));
        state.apply(Action::CategoryChanged(CategoryChange::IconSet {
            id: "food".into(),
            icon: "🍜".into(),
        }));
        state.apply(Action::CategoryChanged(CategoryChange::Reordered { kind: Kind::Expense, order }));

        assert_eq!(state.categories.ids(Kind::Expense), vec!["other", "fixed", "food", id.as_str()]);
        assert_eq!(state.categories.find("food").unwrap().1.icon, "🍜");
    }

    #[test]
    fn test_stale_category_change_is_skipped() {
        let mut state = AppState::new(2024, 3);
        state.apply(Action::CategoryChanged(CategoryChange::Deleted { id: "food".into(), cascaded: true }));
        let before = state.clone();
        state.apply(Action::CategoryChanged(CategoryChange::IconSet {
            id: "food".into(),
            icon: "🍜".into(),
        }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_add_then_rollup_scenario() {
        let mut state = AppState::new(2024, 3);
        let draft = parse_form("2024-03-05", Kind::Expense, "food", "15000", "lunch").unwrap();
        state.apply(Action::TransactionAdded(Transaction::from_draft(7, "u", draft)));
        let rollup = monthly_rollup(&state.categories, state.transactions.all(), 2024, 3);
        assert_eq!(rollup.expense, 15000);
        assert_eq!(rollup.category_total("food"), 15000);
        assert_eq!(rollup.balance(), -15000);
    }

    #[test]
    fn test_added_id_collision_is_bumped() {
        let mut state = AppState::new(2024, 3);
        state.apply(Action::TransactionAdded(tx(5, "2024-03-01", "food", 1)));
        state.apply(Action::TransactionAdded(tx(5, "2024-03-02", "food", 2)));
        assert_eq!(state.transactions.len(), 2);
        assert!(state.transactions.get(6).is_some());
    }

    #[test]
    fn test_update_and_delete() {
        let mut state = AppState::new(2024, 3);
        state.apply(Action::TransactionAdded(tx(1, "2024-03-01", "food", 100)));
        let mut draft = state.transactions.get(1).unwrap().to_draft();
        draft.amount = 250;
        state.apply(Action::TransactionUpdated { id: 1, draft });
        assert_eq!(state.transactions.get(1).unwrap().amount, 250);
        state.apply(Action::TransactionDeleted(1));
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn test_parse_form_validation() {
        let missing = parse_form("", Kind::Expense, "food", "100", "");
        assert_eq!(
            missing,
            Err(AppError::Validation("날짜와 금액을 모두 입력해주세요.".into()))
        );
        assert!(parse_form("2024-03-01", Kind::Expense, "food", " ", "").is_err());
        assert!(parse_form("2024-03-01", Kind::Expense, "food", "abc", "").is_err());
        assert!(parse_form("2024-03-01", Kind::Expense, "", "100", "").is_err());

        let ok = parse_form("2024-03-01", Kind::Income, "income_default", "1,500,000", " 월급 ").unwrap();
        assert_eq!(ok.amount, 1_500_000);
        assert_eq!(ok.desc, "월급");
    }

    #[test]
    fn test_parse_form_caps_amount() {
        let at_cap = parse_form("2024-03-01", Kind::Expense, "food", "1,000,000,000,000", "").unwrap();
        assert_eq!(at_cap.amount, MAX_AMOUNT);
        assert_eq!(
            parse_form("2024-03-01", Kind::Expense, "food", "5000000000000000000", ""),
            Err(AppError::Validation("금액이 너무 큽니다.".into()))
        );
        assert!(parse_form("2024-03-01", Kind::Expense, "food", "99999999999999999999", "").is_err());
    }

    #[test]
    fn test_move_before() {
        let order: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(move_before(&order, "d", Some("b")), vec!["a", "d", "b", "c"]);
        assert_eq!(move_before(&order, "a", Some("c")), vec!["b", "a", "c", "d"]);
        assert_eq!(move_before(&order, "b", None), vec!["a", "c", "d", "b"]);
        assert_eq!(move_before(&order, "b", Some("b")), order);
        assert_eq!(move_before(&order, "x", Some("a")), order);
    }
}
