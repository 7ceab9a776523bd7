use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use super::http::{authorized, ensure_ok, eq_filter};
use crate::config::RemoteConfig;
use crate::error::Result;
use crate::model::{default_list, Category, Kind, NewTransaction, Transaction, TransactionDraft};
use crate::store::CategorySet;

const TRANSACTIONS: &str = "transactions";
const USER_CATEGORIES: &str = "user_categories";

/// One `user_categories` row. Lists that were never written come back null.
#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    #[serde(default)]
    pub expense: Option<Vec<Category>>,
    #[serde(default)]
    pub savings: Option<Vec<Category>>,
    #[serde(default)]
    pub income: Option<Vec<Category>>,
}

impl CategoryRow {
    pub fn into_set(self) -> CategorySet {
        CategorySet {
            expense: self.expense.unwrap_or_else(|| default_list(Kind::Expense)),
            savings: self.savings.unwrap_or_else(|| default_list(Kind::Savings)),
            income: self.income.unwrap_or_else(|| default_list(Kind::Income)),
        }
    }
}

#[derive(Serialize)]
struct CategoryUpsert<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    set: &'a CategorySet,
}

/// Client for the hosted row store. Row ownership is enforced server-side;
/// every call still filters by the signed-in user.
#[derive(Clone, Debug, PartialEq)]
pub struct RowStore {
    config: RemoteConfig,
    access_token: String,
}

impl RowStore {
    pub fn new(config: RemoteConfig, access_token: String) -> Self {
        RowStore { config, access_token }
    }

    fn token(&self) -> Option<&str> {
        Some(self.access_token.as_str())
    }

    pub async fn select_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        log::debug!("[rows] select transactions for {}", user_id);
        let builder = Request::get(&self.config.rest_url(TRANSACTIONS))
            .query([("user_id", eq_filter(user_id)), ("select", "*".to_string())]);
        let resp = authorized(builder, &self.config, self.token()).send().await?;
        let rows = ensure_ok(resp).await?.json::<Vec<Transaction>>().await?;
        Ok(rows)
    }

    /// Inserts and returns the stored row when the service echoes it back.
    pub async fn insert_transaction(
        &self,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<Option<Transaction>> {
        log::debug!("[rows] insert transaction {:?}", draft);
        let builder = Request::post(&self.config.rest_url(TRANSACTIONS))
            .header("Prefer", "return=representation");
        let resp = authorized(builder, &self.config, self.token())
            .json(&NewTransaction { user_id, draft })?
            .send()
            .await?;
        let resp = ensure_ok(resp).await?;
        let text = resp.text().await.unwrap_or_default();
        Ok(serde_json::from_str::<Vec<Transaction>>(&text)
            .ok()
            .and_then(|rows| rows.into_iter().next()))
    }

    pub async fn update_transaction(&self, id: i64, draft: &TransactionDraft) -> Result<()> {
        log::debug!("[rows] update transaction {}", id);
        let builder = Request::patch(&self.config.rest_url(TRANSACTIONS))
            .query([("id", eq_filter(id))]);
        let resp = authorized(builder, &self.config, self.token())
            .json(draft)?
            .send()
            .await?;
        ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        log::debug!("[rows] delete transaction {}", id);
        let builder = Request::delete(&self.config.rest_url(TRANSACTIONS))
            .query([("id", eq_filter(id))]);
        let resp = authorized(builder, &self.config, self.token()).send().await?;
        ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn delete_transactions_by_category(&self, user_id: &str, category: &str) -> Result<()> {
        log::debug!("[rows] delete transactions of category {}", category);
        let builder = Request::delete(&self.config.rest_url(TRANSACTIONS)).query([
            ("user_id", eq_filter(user_id)),
            ("category", eq_filter(category)),
        ]);
        let resp = authorized(builder, &self.config, self.token()).send().await?;
        ensure_ok(resp).await?;
        Ok(())
    }

    /// Zero or one row; `None` means the user has never saved categories.
    pub async fn select_categories(&self, user_id: &str) -> Result<Option<CategorySet>> {
        log::debug!("[rows] select categories for {}", user_id);
        let builder = Request::get(&self.config.rest_url(USER_CATEGORIES))
            .query([("user_id", eq_filter(user_id)), ("select", "*".to_string())]);
        let resp = authorized(builder, &self.config, self.token()).send().await?;
        let rows = ensure_ok(resp).await?.json::<Vec<CategoryRow>>().await?;
        Ok(rows.into_iter().next().map(CategoryRow::into_set))
    }

    pub async fn upsert_categories(&self, user_id: &str, set: &CategorySet) -> Result<()> {
        log::debug!("[rows] upsert categories for {}", user_id);
        let builder = Request::post(&self.config.rest_url(USER_CATEGORIES))
            .query([("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates");
        let resp = authorized(builder, &self.config, self.token())
            .json(&CategoryUpsert { user_id, set })?
            .send()
            .await?;
        ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn update_category_list(&self, user_id: &str, kind: Kind, list: &[Category]) -> Result<()> {
        log::debug!("[rows] update {} categories for {}", kind.as_str(), user_id);
        let builder = Request::patch(&self.config.rest_url(USER_CATEGORIES))
            .query([("user_id", eq_filter(user_id))]);
        let resp = authorized(builder, &self.config, self.token())
            .json(&category_list_patch(kind, list))?
            .send()
            .await?;
        ensure_ok(resp).await?;
        Ok(())
    }
}

pub fn category_list_patch(kind: Kind, list: &[Category]) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert(
        kind.as_str().to_string(),
        serde_json::to_value(list).unwrap_or(serde_json::Value::Array(Vec::new())),
    );
    serde_json::Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_row_defaults_missing_lists() {
        let row: CategoryRow = serde_json::from_value(json!({
            "user_id": "u1",
            "expense": [{ "id": "rent", "name": "월세", "icon": "🏠" }],
            "savings": null
        }))
        .unwrap();
        let set = row.into_set();
        assert_eq!(set.ids(Kind::Expense), vec!["rent"]);
        assert_eq!(set.savings, default_list(Kind::Savings));
        assert_eq!(set.income, default_list(Kind::Income));
    }

    #[test]
    fn test_upsert_body_is_one_row() {
        let set = CategorySet::default();
        let body = serde_json::to_value(CategoryUpsert { user_id: "u1", set: &set }).unwrap();
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["expense"][1]["id"], "food");
        assert_eq!(body["income"][0]["id"], "income_default");
    }

    #[test]
    fn test_category_list_patch_touches_one_column() {
        let list = default_list(Kind::Savings);
        let body = category_list_patch(Kind::Savings, &list);
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(body["savings"][0]["name"], "저축");
    }
}
