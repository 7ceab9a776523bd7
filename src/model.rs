use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Transaction type and, equally, the name of the category list a category lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
    Savings,
}

impl Kind {
    /// Membership scans walk the lists in this order; the first match wins.
    pub const LOOKUP_ORDER: [Kind; 3] = [Kind::Expense, Kind::Savings, Kind::Income];
    /// Order used by forms and category sections.
    pub const DISPLAY_ORDER: [Kind; 3] = [Kind::Income, Kind::Expense, Kind::Savings];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
            Kind::Savings => "savings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Kind::Income => "수입",
            Kind::Expense => "지출",
            Kind::Savings => "저축",
        }
    }

    /// Footer label of the detail modal's running total.
    pub fn total_label(self) -> &'static str {
        match self {
            Kind::Income => "총 수입",
            Kind::Expense => "총 지출",
            Kind::Savings => "총 저축",
        }
    }

    pub fn default_icon(self) -> &'static str {
        match self {
            Kind::Income => "💵",
            Kind::Expense => "💸",
            Kind::Savings => "📈",
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub category: String,
    pub amount: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub desc: String,
}

/// The mutable fields of a transaction, as submitted by a form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub category: String,
    pub amount: i64,
    pub desc: String,
}

/// Insert payload: the draft plus its owner. The id is assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTransaction<'a> {
    pub user_id: &'a str,
    #[serde(flatten)]
    pub draft: &'a TransactionDraft,
}

impl Transaction {
    pub fn from_draft(id: i64, user_id: &str, draft: TransactionDraft) -> Self {
        Transaction {
            id,
            user_id: user_id.to_string(),
            date: draft.date,
            kind: draft.kind,
            category: draft.category,
            amount: draft.amount,
            desc: draft.desc,
        }
    }

    pub fn apply(&mut self, draft: TransactionDraft) {
        self.date = draft.date;
        self.kind = draft.kind;
        self.category = draft.category;
        self.amount = draft.amount;
        self.desc = draft.desc;
    }

    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            date: self.date.clone(),
            kind: self.kind,
            category: self.category.clone(),
            amount: self.amount,
            desc: self.desc.clone(),
        }
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        date_year_month(&self.date) == Some((year, month))
    }

    pub fn is_in_year(&self, year: i32) -> bool {
        date_year(&self.date) == Some(year)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn new(id: &str, name: &str, icon: &str) -> Self {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

pub const DEFAULT_INCOME_ID: &str = "income_default";
pub const DEFAULT_SAVINGS_ID: &str = "savings_default";

/// Names of the built-in categories, used when an id is no longer in any list.
pub fn builtin_name(id: &str) -> Option<&'static str> {
    match id {
        DEFAULT_INCOME_ID => Some("수입"),
        DEFAULT_SAVINGS_ID => Some("저축"),
        "fixed" => Some("고정지출"),
        "food" => Some("식비"),
        "other" => Some("기타"),
        _ => None,
    }
}

pub fn default_list(kind: Kind) -> Vec<Category> {
    match kind {
        Kind::Expense => vec![
            Category::new("fixed", "고정지출", "🏠"),
            Category::new("food", "식비", "🍚"),
            Category::new("other", "기타", "🎸"),
        ],
        Kind::Savings => vec![Category::new(DEFAULT_SAVINGS_ID, "저축", "💰")],
        Kind::Income => vec![Category::new(DEFAULT_INCOME_ID, "수입", "💰")],
    }
}

/// Leading integer of a date component, tolerant of padding and trailing junk.
fn leading_int(part: &str) -> Option<i64> {
    let part = part.trim_start();
    let (sign, digits) = match part.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, part.strip_prefix('+').unwrap_or(part)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Year of a `YYYY-MM-DD` / `YYYY/MM/DD` string: the first numeric component.
pub fn date_year(date: &str) -> Option<i32> {
    let first = date.trim().split(&['-', '/'][..]).next()?;
    leading_int(first).and_then(|y| i32::try_from(y).ok())
}

/// `(year, month)` from the first two numeric components. The day is never
/// validated; this is string matching, not calendar parsing.
pub fn date_year_month(date: &str) -> Option<(i32, u32)> {
    let mut parts = date.trim().split(&['-', '/'][..]);
    let year = leading_int(parts.next()?)?;
    let month = leading_int(parts.next()?)?;
    Some((i32::try_from(year).ok()?, u32::try_from(month).ok()?))
}

/// Milliseconds since the epoch; seeds category and fallback transaction ids.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Local calendar date, the starting point of the view cursor and form dates.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Calendar value used to order transactions newest-first.
pub fn date_sort_key(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y/%m/%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_matching_accepts_both_separators() {
        assert_eq!(date_year_month("2024-03-15"), Some((2024, 3)));
        assert_eq!(date_year_month("2024/03/15"), Some((2024, 3)));
        assert_ne!(date_year_month("2024-03-15"), Some((2024, 4)));
        assert_eq!(date_year_month(" 2024-3-1 "), Some((2024, 3)));
    }

    #[test]
    fn test_date_matching_is_not_calendar_parsing() {
        assert_eq!(date_year_month("2024-02-31"), Some((2024, 2)));
        assert_eq!(date_year_month("2024-13"), Some((2024, 13)));
        assert_eq!(date_year_month("2024"), None);
        assert_eq!(date_year_month("abc-03"), None);
        assert_eq!(date_year_month(""), None);
        assert_eq!(date_year("2024"), Some(2024));
        assert_eq!(date_year("2023/12/31"), Some(2023));
        assert_eq!(date_year("x"), None);
    }

    #[test]
    fn test_transaction_window_checks() {
        let tx = Transaction {
            id: 1,
            user_id: "u".into(),
            date: "2024/03/05".into(),
            kind: Kind::Expense,
            category: "food".into(),
            amount: 100,
            desc: String::new(),
        };
        assert!(tx.is_in_month(2024, 3));
        assert!(!tx.is_in_month(2024, 4));
        assert!(tx.is_in_year(2024));
        assert!(!tx.is_in_year(2023));
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(date_sort_key("2024-03-05"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(date_sort_key("2024/03/05"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(date_sort_key("2024-02-31"), None);
    }

    #[test]
    fn test_transaction_wire_format() {
        let row = serde_json::json!({
            "id": 17,
            "user_id": "abc",
            "date": "2024-03-05",
            "type": "savings",
            "category": "savings_default",
            "amount": 50000,
            "desc": null
        });
        let tx: Transaction = serde_json::from_value(row).unwrap();
        assert_eq!(tx.kind, Kind::Savings);
        assert_eq!(tx.desc, "");

        let draft = tx.to_draft();
        let insert = NewTransaction { user_id: "abc", draft: &draft };
        let value = serde_json::to_value(&insert).unwrap();
        assert_eq!(value["type"], "savings");
        assert_eq!(value["user_id"], "abc");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_list(Kind::Expense).len(), 3);
        assert_eq!(default_list(Kind::Income)[0].id, DEFAULT_INCOME_ID);
        assert_eq!(builtin_name("food"), Some("식비"));
        assert_eq!(builtin_name("custom_1"), None);
        assert_eq!(serde_json::to_value(Kind::Income).unwrap(), "income");
        assert_eq!(Kind::Savings.total_label(), "총 저축");
    }
}
