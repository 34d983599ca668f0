/// Parish finance ledger (Keuangan)
///
/// Amounts are whole rupiah stored as BIGINT. The summary sums income and
/// expense over the same filter used by the listing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "finance_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinanceType {
    Income,
    Expense,
}

impl FinanceType {
    pub fn label(&self) -> &'static str {
        match self {
            FinanceType::Income => "Pemasukan",
            FinanceType::Expense => "Pengeluaran",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Finance {
    pub id: Uuid,
    pub title: String,
    pub entry_type: FinanceType,
    pub amount: i64,
    pub entry_date: NaiveDate,
    pub category: String,
    pub recorded_by: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update input
#[derive(Debug, Clone)]
pub struct FinanceInput {
    pub title: String,
    pub entry_type: FinanceType,
    pub amount: i64,
    pub entry_date: NaiveDate,
    pub category: String,
    pub notes: Option<String>,
}

/// Listing filter; every field is optional
#[derive(Debug, Clone, Copy, Default)]
pub struct FinanceFilter {
    pub entry_type: Option<FinanceType>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FinanceSummary {
    pub income: i64,
    pub expense: i64,
}

impl FinanceSummary {
    pub fn balance(&self) -> i64 {
        self.income - self.expense
    }
}

const FILTER_WHERE: &str = r#"
    WHERE ($1::finance_type IS NULL OR entry_type = $1)
      AND ($2::date IS NULL OR entry_date >= $2)
      AND ($3::date IS NULL OR entry_date <= $3)
"#;

impl Finance {
    pub async fn create(
        pool: &PgPool,
        recorded_by: Uuid,
        data: FinanceInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Finance>(
            r#"
            INSERT INTO finances (title, entry_type, amount, entry_date, category, notes, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.title)
        .bind(data.entry_type)
        .bind(data.amount)
        .bind(data.entry_date)
        .bind(data.category)
        .bind(data.notes)
        .bind(recorded_by)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Finance>("SELECT * FROM finances WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: FinanceInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Finance>(
            r#"
            UPDATE finances
            SET title = $2, entry_type = $3, amount = $4, entry_date = $5,
                category = $6, notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.entry_type)
        .bind(data.amount)
        .bind(data.entry_date)
        .bind(data.category)
        .bind(data.notes)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM finances WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest entries first
    pub async fn list(
        pool: &PgPool,
        filter: FinanceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT * FROM finances {} ORDER BY entry_date DESC, created_at DESC LIMIT $4 OFFSET $5",
            FILTER_WHERE
        );

        sqlx::query_as::<_, Finance>(&query)
            .bind(filter.entry_type)
            .bind(filter.start)
            .bind(filter.end)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: FinanceFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM finances {}", FILTER_WHERE);

        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.entry_type)
            .bind(filter.start)
            .bind(filter.end)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Income and expense totals over the filter
    pub async fn summary(pool: &PgPool, filter: FinanceFilter) -> Result<FinanceSummary, sqlx::Error> {
        let query = format!(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE entry_type = 'income'), 0)::BIGINT AS income,
                COALESCE(SUM(amount) FILTER (WHERE entry_type = 'expense'), 0)::BIGINT AS expense
            FROM finances {}
            "#,
            FILTER_WHERE
        );

        sqlx::query_as::<_, FinanceSummary>(&query)
            .bind(filter.entry_type)
            .bind(filter.start)
            .bind(filter.end)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance() {
        let summary = FinanceSummary {
            income: 1_500_000,
            expense: 2_000_000,
        };
        assert_eq!(summary.balance(), -500_000);
        assert_eq!(FinanceSummary::default().balance(), 0);
    }

    #[test]
    fn test_type_serde() {
        assert_eq!(serde_json::to_string(&FinanceType::Income).unwrap(), "\"income\"");
        let t: FinanceType = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(t, FinanceType::Expense);
    }
}
