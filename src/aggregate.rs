//! Monthly and yearly rollups over the transaction collection.
//!
//! Everything here is recomputed from scratch on each render; nothing is cached.

use std::collections::BTreeSet;

use crate::model::{date_year, Kind, Transaction};
use crate::store::{CategorySet, TransactionStore};

pub const CHART_COLORS: [&str; 10] = [
    "#4318FF", "#6AD2FF", "#2B3674", "#FFB547", "#01B574", "#8A8D93", "#EC407A", "#AB47BC",
    "#7E57C2", "#26A69A",
];

/// Sums by transaction type and by category id over one time window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rollup {
    pub income: i64,
    pub expense: i64,
    pub savings: i64,
    /// One entry per live category, in expense, savings, income list order.
    pub category_totals: Vec<(String, i64)>,
}

impl Rollup {
    fn over<'a, I>(categories: &CategorySet, items: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut rollup = Rollup {
            category_totals: categories.iter().map(|c| (c.id.clone(), 0)).collect(),
            ..Rollup::default()
        };
        for tx in items {
            match tx.kind {
                Kind::Income => rollup.income = rollup.income.saturating_add(tx.amount),
                Kind::Expense => rollup.expense = rollup.expense.saturating_add(tx.amount),
                Kind::Savings => rollup.savings = rollup.savings.saturating_add(tx.amount),
            }
            // Orphans (category in no list) only count toward the type totals.
            if let Some(entry) = rollup
                .category_totals
                .iter_mut()
                .find(|(id, _)| *id == tx.category)
            {
                entry.1 = entry.1.saturating_add(tx.amount);
            }
        }
        rollup
    }

    /// Savings leave the balance just like expenses do.
    pub fn balance(&self) -> i64 {
        self.income
            .saturating_sub(self.expense)
            .saturating_sub(self.savings)
    }

    pub fn total(&self, kind: Kind) -> i64 {
        match kind {
            Kind::Income => self.income,
            Kind::Expense => self.expense,
            Kind::Savings => self.savings,
        }
    }

    pub fn category_total(&self, id: &str) -> i64 {
        self.category_totals
            .iter()
            .find(|(cat, _)| cat == id)
            .map(|(_, amount)| *amount)
            .unwrap_or(0)
    }

    /// `(name, amount)` for the categories of one list with non-zero activity.
    pub fn breakdown(&self, categories: &CategorySet, kind: Kind) -> Vec<(String, i64)> {
        categories
            .list(kind)
            .iter()
            .map(|c| (c.name.clone(), self.category_total(&c.id)))
            .filter(|(_, amount)| *amount > 0)
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct YearlyRollup {
    pub rollup: Rollup,
    pub savings_rate: i64,
}

pub fn monthly_rollup(
    categories: &CategorySet,
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Rollup {
    Rollup::over(
        categories,
        transactions.iter().filter(|t| t.is_in_month(year, month)),
    )
}

pub fn yearly_rollup(categories: &CategorySet, transactions: &[Transaction], year: i32) -> YearlyRollup {
    let rollup = Rollup::over(categories, transactions.iter().filter(|t| t.is_in_year(year)));
    let savings_rate = savings_rate(rollup.income, rollup.savings);
    YearlyRollup { rollup, savings_rate }
}

/// `round(savings / income * 100)`, halves rounding up; 0 without income.
pub fn savings_rate(income: i64, savings: i64) -> i64 {
    if income <= 0 {
        return 0;
    }
    (savings as f64 / income as f64 * 100.0 + 0.5).floor() as i64
}

#[derive(Clone, Debug, PartialEq)]
pub struct PieSegment {
    pub name: String,
    pub amount: i64,
    pub percent: f64,
    pub start: f64,
    pub end: f64,
    pub color: &'static str,
}

/// Segments ordered by descending amount, ties in input order, colors cycling
/// through the palette. Empty when there is nothing to draw.
pub fn pie_segments(mut data: Vec<(String, i64)>, total: i64) -> Vec<PieSegment> {
    if total == 0 || data.is_empty() {
        return Vec::new();
    }
    data.sort_by(|a, b| b.1.cmp(&a.1));

    let mut cursor = 0.0;
    data.into_iter()
        .enumerate()
        .map(|(i, (name, amount))| {
            let percent = (amount as f64 * 100.0) / total as f64;
            let segment = PieSegment {
                name,
                amount,
                percent,
                start: cursor,
                end: cursor + percent,
                color: CHART_COLORS[i % CHART_COLORS.len()],
            };
            cursor += percent;
            segment
        })
        .collect()
}

/// CSS `conic-gradient` for the segments, or `None` for the empty state.
pub fn conic_gradient(segments: &[PieSegment]) -> Option<String> {
    if segments.is_empty() {
        return None;
    }
    let parts: Vec<String> = segments
        .iter()
        .map(|s| format!("{} {:.2}% {:.2}%", s.color, s.start, s.end))
        .collect();
    Some(format!("conic-gradient({})", parts.join(", ")))
}

/// Transactions of one category in one month, newest first, with their sum.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryDetail {
    pub kind: Kind,
    pub items: Vec<Transaction>,
    pub total: i64,
}

pub fn category_detail(
    categories: &CategorySet,
    transactions: &[Transaction],
    category: &str,
    year: i32,
    month: u32,
) -> CategoryDetail {
    let items: Vec<Transaction> = TransactionStore::sorted_by_date_desc(
        transactions
            .iter()
            .filter(|t| t.category == category && t.is_in_month(year, month)),
    )
    .into_iter()
    .cloned()
    .collect();
    let total = items.iter().fold(0i64, |acc, t| acc.saturating_add(t.amount));
    CategoryDetail {
        kind: categories.owner_of(category).unwrap_or(Kind::Expense),
        items,
        total,
    }
}

/// The newest `n` transactions across the whole collection.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut sorted = TransactionStore::sorted_by_date_desc(transactions);
    sorted.truncate(n);
    sorted
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonthTotals {
    pub month: u32,
    pub income: i64,
    pub expense: i64,
    pub savings: i64,
}

impl MonthTotals {
    pub fn peak(&self) -> i64 {
        self.income.max(self.expense).max(self.savings)
    }
}

/// Per-month type totals of one year, January first.
pub fn monthly_series(transactions: &[Transaction], year: i32) -> Vec<MonthTotals> {
    (1..=12)
        .map(|month| {
            let mut totals = MonthTotals { month, ..MonthTotals::default() };
            for tx in transactions.iter().filter(|t| t.is_in_month(year, month)) {
                match tx.kind {
                    Kind::Income => totals.income = totals.income.saturating_add(tx.amount),
                    Kind::Expense => totals.expense = totals.expense.saturating_add(tx.amount),
                    Kind::Savings => totals.savings = totals.savings.saturating_add(tx.amount),
                }
            }
            totals
        })
        .collect()
}

/// Years offered by the year selectors: a window around `current` plus any
/// year that has data, ascending.
pub fn selectable_years(transactions: &[Transaction], current: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = ((current - 5)..=(current + 1)).collect();
    years.extend(transactions.iter().filter_map(|t| date_year(&t.date)));
    years.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, date: &str, kind: Kind, category: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            user_id: "u".into(),
            date: date.into(),
            kind,
            category: category.into(),
            amount,
            desc: String::new(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, "2024-03-01", Kind::Income, "income_default", 3_000_000),
            tx(2, "2024-03-05", Kind::Expense, "food", 15_000),
            tx(3, "2024/03/20", Kind::Expense, "fixed", 700_000),
            tx(4, "2024-03-25", Kind::Savings, "savings_default", 500_000),
            tx(5, "2024-04-02", Kind::Expense, "food", 8_000),
            tx(6, "2023-03-02", Kind::Expense, "food", 1),
            tx(7, "2024-03-09", Kind::Expense, "deleted_cat", 2_000),
        ]
    }

    #[test]
    fn test_single_expense_scenario() {
        let categories = CategorySet::default();
        let items = vec![Transaction {
            desc: "lunch".into(),
            ..tx(1, "2024-03-05", Kind::Expense, "food", 15000)
        }];
        let rollup = monthly_rollup(&categories, &items, 2024, 3);
        assert_eq!(rollup.expense, 15000);
        assert_eq!(rollup.category_total("food"), 15000);
        assert_eq!(rollup.balance(), -15000);
    }

    #[test]
    fn test_balance_identity_holds() {
        let categories = CategorySet::default();
        let items = sample();
        for (y, m) in [(2024, 3), (2024, 4), (2023, 3), (2022, 1)] {
            let r = monthly_rollup(&categories, &items, y, m);
            assert_eq!(r.income - r.expense - r.savings, r.balance());
        }
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_wrapping() {
        let categories = CategorySet::default();
        let items = vec![
            tx(1, "2024-03-01", Kind::Expense, "food", i64::MAX - 1),
            tx(2, "2024-03-02", Kind::Expense, "food", i64::MAX - 1),
            tx(3, "2024-03-03", Kind::Income, "income_default", 10),
        ];
        let rollup = monthly_rollup(&categories, &items, 2024, 3);
        assert_eq!(rollup.expense, i64::MAX);
        assert_eq!(rollup.category_total("food"), i64::MAX);
        assert_eq!(rollup.balance(), 10 - i64::MAX);

        let march = monthly_series(&items, 2024)[2];
        assert_eq!(march.expense, i64::MAX);
        assert_eq!(category_detail(&categories, &items, "food", 2024, 3).total, i64::MAX);
    }

    #[test]
    fn test_every_live_category_has_a_total() {
        let categories = CategorySet::default();
        let rollup = monthly_rollup(&categories, &[], 2024, 3);
        assert_eq!(rollup.category_totals.len(), 5);
        assert!(rollup.category_totals.iter().all(|(_, amount)| *amount == 0));
        assert_eq!(rollup.category_total("other"), 0);
    }

    #[test]
    fn test_orphans_count_only_in_type_totals() {
        let categories = CategorySet::default();
        let rollup = monthly_rollup(&categories, &sample(), 2024, 3);
        assert_eq!(rollup.expense, 15_000 + 700_000 + 2_000);
        assert_eq!(rollup.category_total("deleted_cat"), 0);
        assert!(rollup.category_totals.iter().all(|(id, _)| id != "deleted_cat"));
    }

    #[test]
    fn test_yearly_sums_months_monthly_keeps_its_own() {
        let categories = CategorySet::default();
        let items = vec![
            tx(1, "2024-01-10", Kind::Expense, "food", 100),
            tx(2, "2024-06-10", Kind::Expense, "food", 250),
        ];
        let year = yearly_rollup(&categories, &items, 2024);
        assert_eq!(year.rollup.expense, 350);
        assert_eq!(monthly_rollup(&categories, &items, 2024, 1).expense, 100);
        assert_eq!(monthly_rollup(&categories, &items, 2024, 6).expense, 250);
    }

    #[test]
    fn test_savings_rate() {
        assert_eq!(savings_rate(0, 500), 0);
        assert_eq!(savings_rate(1000, 200), 20);
        assert_eq!(savings_rate(3, 1), 33);
        assert_eq!(savings_rate(8, 1), 13);

        let year = yearly_rollup(&CategorySet::default(), &sample(), 2024);
        assert_eq!(year.savings_rate, 17);
    }

    #[test]
    fn test_pie_orders_by_amount_and_assigns_palette() {
        let data = vec![("food".to_string(), 300), ("fixed".to_string(), 700)];
        let segments = pie_segments(data, 1000);
        assert_eq!(segments[0].name, "fixed");
        assert_eq!(segments[0].percent, 70.0);
        assert_eq!(segments[0].color, CHART_COLORS[0]);
        assert_eq!(segments[1].name, "food");
        assert_eq!(segments[1].percent, 30.0);
        assert_eq!(segments[1].color, CHART_COLORS[1]);
        assert_eq!(segments[1].start, 70.0);
        assert_eq!(segments[1].end, 100.0);
    }

    #[test]
    fn test_pie_ties_keep_encounter_order_and_palette_wraps() {
        let data: Vec<(String, i64)> = (0..12).map(|i| (format!("c{}", i), 10)).collect();
        let segments = pie_segments(data, 120);
        let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[..3], ["c0", "c1", "c2"]);
        assert_eq!(segments[10].color, CHART_COLORS[0]);
        assert_eq!(segments[11].color, CHART_COLORS[1]);
    }

    #[test]
    fn test_pie_empty_state() {
        assert!(pie_segments(vec![], 100).is_empty());
        assert!(pie_segments(vec![("a".into(), 5)], 0).is_empty());
        assert_eq!(conic_gradient(&[]), None);
        let g = conic_gradient(&pie_segments(vec![("a".into(), 1)], 1)).unwrap();
        assert_eq!(g, "conic-gradient(#4318FF 0.00% 100.00%)");
    }

    #[test]
    fn test_breakdown_skips_idle_categories() {
        let categories = CategorySet::default();
        let rollup = monthly_rollup(&categories, &sample(), 2024, 3);
        let expense = rollup.breakdown(&categories, Kind::Expense);
        assert_eq!(
            expense,
            vec![("고정지출".to_string(), 700_000), ("식비".to_string(), 15_000)]
        );
    }

    #[test]
    fn test_category_detail() {
        let categories = CategorySet::default();
        let mut items = sample();
        items.push(tx(8, "2024-03-28", Kind::Expense, "food", 5_000));
        let detail = category_detail(&categories, &items, "food", 2024, 3);
        let ids: Vec<i64> = detail.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![8, 2]);
        assert_eq!(detail.total, 20_000);
        assert_eq!(detail.kind, Kind::Expense);

        let income = category_detail(&categories, &items, "income_default", 2024, 3);
        assert_eq!(income.kind, Kind::Income);
        assert_eq!(income.kind.total_label(), "총 수입");
    }

    #[test]
    fn test_recent_is_global_top_five() {
        let items = sample();
        let ids: Vec<i64> = recent(&items, 5).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 7, 2]);
        assert!(recent(&[], 5).is_empty());
    }

    #[test]
    fn test_monthly_series() {
        let series = monthly_series(&sample(), 2024);
        assert_eq!(series.len(), 12);
        assert_eq!(series[2].income, 3_000_000);
        assert_eq!(series[2].savings, 500_000);
        assert_eq!(series[3].expense, 8_000);
        assert_eq!(series[2].peak(), 3_000_000);
        assert_eq!(series[0], MonthTotals { month: 1, ..MonthTotals::default() });
    }

    #[test]
    fn test_selectable_years() {
        let years = selectable_years(&sample(), 2026);
        assert_eq!(years.first(), Some(&2021));
        assert_eq!(years.last(), Some(&2027));
        let old = selectable_years(&[tx(1, "2015-01-01", Kind::Income, "x", 1)], 2026);
        assert_eq!(old.first(), Some(&2015));
    }
}
