//! Capa de acceso a datos
//!
//! `EntitySet` es la única interfaz de lectura/escritura que ven los
//! controladores. `DbContext` agrupa un conjunto por entidad y se construye
//! por request, sobre PostgreSQL o sobre tablas en memoria.

pub mod customer_repository;
pub mod memory_repository;
pub mod monthly_revenue_repository;
pub mod rental_details_repository;
pub mod rental_repository;
pub mod vehicle_repository;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{Customer, Entity, MonthlyRevenue, Rental, RentalDetails, Vehicle};

pub use customer_repository::CustomerRepository;
pub use memory_repository::MemorySet;
pub use monthly_revenue_repository::MonthlyRevenueRepository;
pub use rental_details_repository::RentalDetailsRepository;
pub use rental_repository::RentalRepository;
pub use vehicle_repository::VehicleRepository;

/// Errores del almacén
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{set} with key '{key}' already exists")]
    Duplicate { set: &'static str, key: String },

    /// La escritura no tocó ninguna fila: otro request la modificó o la borró
    #[error("{set} with key '{key}' was not updated; it was modified or deleted concurrently")]
    Concurrency { set: &'static str, key: String },

    #[error("{0} has no identity values left")]
    IdentityExhausted(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Traduce una violación de clave primaria en `StoreError::Duplicate`
pub(crate) fn duplicate_or_database(e: sqlx::Error, set: &'static str, key: impl ToString) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Duplicate {
                set,
                key: key.to_string(),
            };
        }
    }
    StoreError::Database(e)
}

/// Conjunto de filas de una entidad
#[async_trait]
pub trait EntitySet<E: Entity>: Send + Sync {
    /// Todas las filas, en el orden del almacén
    async fn list(&self) -> StoreResult<Vec<E>>;

    async fn find(&self, key: E::Key) -> StoreResult<Option<E>>;

    /// Inserta a partir del formulario; las claves identity las asigna el almacén
    async fn insert(&self, form: E::Form) -> StoreResult<E>;

    /// Reemplaza todos los campos de la fila con la clave del registro.
    /// `StoreError::Concurrency` si ninguna fila fue actualizada.
    async fn update(&self, record: &E) -> StoreResult<()>;

    /// `true` si había una fila que borrar
    async fn remove(&self, key: E::Key) -> StoreResult<bool>;

    async fn exists(&self, key: E::Key) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;
}

pub type SharedSet<E> = Arc<dyn EntitySet<E>>;

/// Contexto de datos: un conjunto por entidad. Un conjunto ausente se
/// reporta como "entity set unavailable" por el controlador.
#[derive(Clone, Default)]
pub struct DbContext {
    pub customers: Option<SharedSet<Customer>>,
    pub vehicles: Option<SharedSet<Vehicle>>,
    pub rentals: Option<SharedSet<Rental>>,
    pub rental_details: Option<SharedSet<RentalDetails>>,
    pub monthly_revenues: Option<SharedSet<MonthlyRevenue>>,
}

impl DbContext {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            customers: Some(Arc::new(CustomerRepository::new(pool.clone()))),
            vehicles: Some(Arc::new(VehicleRepository::new(pool.clone()))),
            rentals: Some(Arc::new(RentalRepository::new(pool.clone()))),
            rental_details: Some(Arc::new(RentalDetailsRepository::new(pool.clone()))),
            monthly_revenues: Some(Arc::new(MonthlyRevenueRepository::new(pool))),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            customers: Some(Arc::new(MemorySet::<Customer>::new())),
            vehicles: Some(Arc::new(MemorySet::<Vehicle>::new())),
            rentals: Some(Arc::new(MemorySet::<Rental>::new())),
            rental_details: Some(Arc::new(MemorySet::<RentalDetails>::new())),
            monthly_revenues: Some(Arc::new(MemorySet::<MonthlyRevenue>::new())),
        }
    }
}
