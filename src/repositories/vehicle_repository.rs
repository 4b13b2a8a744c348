use async_trait::async_trait;
use sqlx::PgPool;

use super::{EntitySet, StoreError, StoreResult};
use crate::models::{Entity, Vehicle, VehicleForm};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySet<Vehicle> for VehicleRepository {
    async fn list(&self) -> StoreResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicle")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicle WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn insert(&self, form: VehicleForm) -> StoreResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicle (make, model, year, plate_number, rental_rate_per_day, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(form.make)
        .bind(form.model)
        .bind(form.year)
        .bind(form.plate_number)
        .bind(form.rental_rate_per_day)
        .bind(form.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn update(&self, vehicle: &Vehicle) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE vehicle
            SET make = $2, model = $3, year = $4, plate_number = $5, rental_rate_per_day = $6, status = $7
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.plate_number)
        .bind(vehicle.rental_rate_per_day)
        .bind(&vehicle.status)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Concurrency {
                set: Vehicle::SET_NAME,
                key: vehicle.id.to_string(),
            });
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM vehicle WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicle WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicle")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
