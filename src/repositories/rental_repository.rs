//! Repositorio de alquileres
//!
//! A diferencia del resto, la edición no pasa por una transacción del pool:
//! adquiere una conexión explícita, ejecuta un UPDATE parametrizado por
//! columnas y la libera al salir del scope, haya error o no.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{EntitySet, StoreError, StoreResult};
use crate::models::{Entity, Rental, RentalForm};

const UPDATE_RENTAL_SQL: &str = r#"
    UPDATE rental
    SET customer_id = $2, vehicle_id = $3, rental_start_date = $4, rental_end_date = $5, total_cost = $6
    WHERE id = $1
"#;

pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySet<Rental> for RentalRepository {
    async fn list(&self) -> StoreResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>("SELECT * FROM rental")
            .fetch_all(&self.pool)
            .await?;

        Ok(rentals)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rental WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rental)
    }

    async fn insert(&self, form: RentalForm) -> StoreResult<Rental> {
        // el id sale de la secuencia SERIAL, nunca de COUNT(*) + 1
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rental (customer_id, vehicle_id, rental_start_date, rental_end_date, total_cost)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(form.customer_id)
        .bind(form.vehicle_id)
        .bind(form.rental_start_date)
        .bind(form.rental_end_date)
        .bind(form.total_cost)
        .fetch_one(&self.pool)
        .await?;

        Ok(rental)
    }

    async fn update(&self, rental: &Rental) -> StoreResult<()> {
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query(UPDATE_RENTAL_SQL)
            .bind(rental.id)
            .bind(rental.customer_id)
            .bind(rental.vehicle_id)
            .bind(rental.rental_start_date)
            .bind(rental.rental_end_date)
            .bind(rental.total_cost)
            .execute(&mut *connection)
            .await?;

        debug!("UPDATE rental {} -> {} filas", rental.id, result.rows_affected());

        if result.rows_affected() == 0 {
            return Err(StoreError::Concurrency {
                set: Rental::SET_NAME,
                key: rental.id.to_string(),
            });
        }

        Ok(())
    }

    async fn remove(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM rental WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rental WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rental")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
