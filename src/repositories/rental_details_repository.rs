use async_trait::async_trait;
use sqlx::PgPool;

use super::{duplicate_or_database, EntitySet, StoreError, StoreResult};
use crate::models::{Entity, RentalDetails, RentalDetailsForm};

pub struct RentalDetailsRepository {
    pool: PgPool,
}

impl RentalDetailsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySet<RentalDetails> for RentalDetailsRepository {
    async fn list(&self) -> StoreResult<Vec<RentalDetails>> {
        let details = sqlx::query_as::<_, RentalDetails>("SELECT * FROM rental_details")
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    async fn find(&self, rental_id: i32) -> StoreResult<Option<RentalDetails>> {
        let details = sqlx::query_as::<_, RentalDetails>(
            "SELECT * FROM rental_details WHERE rental_id = $1",
        )
        .bind(rental_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    async fn insert(&self, form: RentalDetailsForm) -> StoreResult<RentalDetails> {
        let rental_id = form.rental_id;
        sqlx::query_as::<_, RentalDetails>(
            r#"
            INSERT INTO rental_details (rental_id, customer_name, make, model, rental_start_date, rental_end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(rental_id)
        .bind(form.customer_name)
        .bind(form.make)
        .bind(form.model)
        .bind(form.rental_start_date)
        .bind(form.rental_end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_database(e, RentalDetails::SET_NAME, rental_id))
    }

    async fn update(&self, details: &RentalDetails) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE rental_details
            SET customer_name = $2, make = $3, model = $4, rental_start_date = $5, rental_end_date = $6
            WHERE rental_id = $1
            "#,
        )
        .bind(details.rental_id)
        .bind(&details.customer_name)
        .bind(&details.make)
        .bind(&details.model)
        .bind(details.rental_start_date)
        .bind(details.rental_end_date)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Concurrency {
                set: RentalDetails::SET_NAME,
                key: details.rental_id.to_string(),
            });
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, rental_id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM rental_details WHERE rental_id = $1")
            .bind(rental_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, rental_id: i32) -> StoreResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rental_details WHERE rental_id = $1)")
                .bind(rental_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rental_details")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
