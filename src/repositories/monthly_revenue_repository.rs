use async_trait::async_trait;
use sqlx::PgPool;

use super::{duplicate_or_database, EntitySet, StoreError, StoreResult};
use crate::models::{Entity, MonthlyRevenue, MonthlyRevenueForm};

pub struct MonthlyRevenueRepository {
    pool: PgPool,
}

impl MonthlyRevenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySet<MonthlyRevenue> for MonthlyRevenueRepository {
    async fn list(&self) -> StoreResult<Vec<MonthlyRevenue>> {
        let revenues = sqlx::query_as::<_, MonthlyRevenue>("SELECT * FROM monthly_revenue")
            .fetch_all(&self.pool)
            .await?;

        Ok(revenues)
    }

    async fn find(&self, month: i32) -> StoreResult<Option<MonthlyRevenue>> {
        let revenue =
            sqlx::query_as::<_, MonthlyRevenue>("SELECT * FROM monthly_revenue WHERE month = $1")
                .bind(month)
                .fetch_optional(&self.pool)
                .await?;

        Ok(revenue)
    }

    async fn insert(&self, form: MonthlyRevenueForm) -> StoreResult<MonthlyRevenue> {
        // month es la primary key: un segundo año para el mismo mes viola la clave
        sqlx::query_as::<_, MonthlyRevenue>(
            r#"
            INSERT INTO monthly_revenue (month, year, revenue)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(form.month)
        .bind(form.year)
        .bind(form.revenue)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_database(e, MonthlyRevenue::SET_NAME, form.month))
    }

    async fn update(&self, revenue: &MonthlyRevenue) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE monthly_revenue SET year = $2, revenue = $3 WHERE month = $1")
            .bind(revenue.month)
            .bind(revenue.year)
            .bind(revenue.revenue)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Concurrency {
                set: MonthlyRevenue::SET_NAME,
                key: revenue.month.to_string(),
            });
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, month: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM monthly_revenue WHERE month = $1")
            .bind(month)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, month: i32) -> StoreResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM monthly_revenue WHERE month = $1)")
                .bind(month)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM monthly_revenue")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
