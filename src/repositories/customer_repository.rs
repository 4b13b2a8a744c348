use async_trait::async_trait;
use sqlx::PgPool;

use super::{EntitySet, StoreError, StoreResult};
use crate::models::{Customer, CustomerForm, Entity};

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySet<Customer> for CustomerRepository {
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customer")
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customer WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn insert(&self, form: CustomerForm) -> StoreResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customer (first_name, last_name, email, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(form.first_name)
        .bind(form.last_name)
        .bind(form.email)
        .bind(form.phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE customer
            SET first_name = $2, last_name = $3, email = $4, phone_number = $5
            WHERE id = $1
            "#,
        )
        .bind(customer.id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone_number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Concurrency {
                set: Customer::SET_NAME,
                key: customer.id.to_string(),
            });
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM customer WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customer")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
