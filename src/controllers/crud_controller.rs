//! Controlador CRUD genérico
//!
//! Index, Details, Create, Edit y Delete escritos una sola vez para cualquier
//! `Entity`. El controlador trabaja sobre el `DbContext` del request y
//! devuelve resultados de dominio; la capa de rutas los convierte en vistas,
//! redirecciones o errores HTTP.

use std::marker::PhantomData;

use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use crate::models::Entity;
use crate::repositories::{DbContext, SharedSet, StoreError};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Resultado de un POST de formulario
#[derive(Debug)]
pub enum Submission<F, E> {
    /// Persistido; la ruta redirige al listado
    Saved(E),
    /// No pasa la validación; se vuelve a mostrar el formulario tal como llegó
    Invalid { form: F, errors: ValidationErrors },
}

pub struct CrudController<E: Entity> {
    context: DbContext,
    _entity: PhantomData<E>,
}

impl<E: Entity> CrudController<E> {
    pub fn new(context: DbContext) -> Self {
        Self {
            context,
            _entity: PhantomData,
        }
    }

    fn set(&self) -> Option<SharedSet<E>> {
        E::set(&self.context)
    }

    fn require_set(&self) -> AppResult<SharedSet<E>> {
        self.set().ok_or(AppError::EntitySetUnavailable(E::SET_NAME))
    }

    /// Busca por clave; sin clave, sin conjunto o sin fila es not-found
    async fn lookup(&self, key: Option<E::Key>) -> AppResult<E> {
        let (Some(key), Some(set)) = (key, self.set()) else {
            return Err(AppError::NotFound(format!("{} not found", E::SET_NAME)));
        };

        set.find(key)
            .await?
            .ok_or_else(|| not_found_error(E::SET_NAME, &key.to_string()))
    }

    pub async fn index(&self) -> AppResult<Vec<E>> {
        let set = self.require_set()?;
        let rows = set.list().await?;
        debug!("{}: {} filas", E::SET_NAME, rows.len());
        Ok(rows)
    }

    pub async fn details(&self, key: Option<E::Key>) -> AppResult<E> {
        self.lookup(key).await
    }

    pub async fn create(&self, form: E::Form) -> AppResult<Submission<E::Form, E>> {
        if let Err(errors) = form.validate() {
            debug!("{}: formulario de alta inválido", E::SET_NAME);
            return Ok(Submission::Invalid { form, errors });
        }

        let set = self.require_set()?;
        let record = set.insert(form).await?;
        info!("✅ {} {} creado", E::SET_NAME, record.key());

        Ok(Submission::Saved(record))
    }

    pub async fn edit_form(&self, key: Option<E::Key>) -> AppResult<E> {
        self.lookup(key).await
    }

    pub async fn edit(&self, key: E::Key, form: E::Form) -> AppResult<Submission<E::Form, E>> {
        if E::form_key(&form) != Some(key) {
            warn!("{}: la clave del formulario no coincide con la ruta ({})", E::SET_NAME, key);
            return Err(not_found_error(E::SET_NAME, &key.to_string()));
        }

        if let Err(errors) = form.validate() {
            debug!("{}: formulario de edición inválido", E::SET_NAME);
            return Ok(Submission::Invalid { form, errors });
        }

        let set = self.require_set()?;
        let record = E::from_form(key, form);

        match set.update(&record).await {
            Ok(()) => {
                info!("✏️ {} {} actualizado", E::SET_NAME, key);
                Ok(Submission::Saved(record))
            }
            Err(conflict @ StoreError::Concurrency { .. }) => {
                if self.exists(&set, key).await? {
                    // la fila sigue ahí: no se reintenta ni se mezcla
                    return Err(conflict.into());
                }
                warn!("{} {} desapareció durante la edición", E::SET_NAME, key);
                Err(not_found_error(E::SET_NAME, &key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_form(&self, key: Option<E::Key>) -> AppResult<E> {
        self.lookup(key).await
    }

    pub async fn delete_confirmed(&self, key: E::Key) -> AppResult<()> {
        let set = self.require_set()?;

        if set.remove(key).await? {
            info!("🗑️ {} {} eliminado", E::SET_NAME, key);
        } else {
            debug!("{} {} ya no existía", E::SET_NAME, key);
        }

        Ok(())
    }

    async fn exists(&self, set: &SharedSet<E>, key: E::Key) -> AppResult<bool> {
        Ok(set.exists(key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        MonthlyRevenue, MonthlyRevenueForm, Rental, RentalForm, Vehicle, VehicleForm,
    };
    use crate::repositories::{EntitySet, MemorySet, StoreResult};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn corolla() -> VehicleForm {
        VehicleForm {
            id: None,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2020,
            plate_number: "ABC-123".to_string(),
            rental_rate_per_day: Decimal::new(2500, 2),
            status: "Available".to_string(),
        }
    }

    fn rental(id: Option<i32>) -> RentalForm {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        RentalForm {
            id,
            customer_id: 2,
            vehicle_id: 9,
            rental_start_date: start,
            rental_end_date: start + chrono::Duration::days(5),
            total_cost: Decimal::new(12500, 2),
        }
    }

    fn saved<F: std::fmt::Debug, E: std::fmt::Debug>(submission: Submission<F, E>) -> E {
        match submission {
            Submission::Saved(record) => record,
            other => panic!("expected a saved record, got {:?}", other),
        }
    }

    /// Conjunto que siempre informa conflicto al actualizar, con la fila aún presente
    struct AlwaysConflicting(MemorySet<Rental>);

    #[async_trait]
    impl EntitySet<Rental> for AlwaysConflicting {
        async fn list(&self) -> StoreResult<Vec<Rental>> {
            self.0.list().await
        }
        async fn find(&self, key: i32) -> StoreResult<Option<Rental>> {
            self.0.find(key).await
        }
        async fn insert(&self, form: RentalForm) -> StoreResult<Rental> {
            self.0.insert(form).await
        }
        async fn update(&self, record: &Rental) -> StoreResult<()> {
            Err(StoreError::Concurrency {
                set: "Rental",
                key: record.id.to_string(),
            })
        }
        async fn remove(&self, key: i32) -> StoreResult<bool> {
            self.0.remove(key).await
        }
        async fn exists(&self, key: i32) -> StoreResult<bool> {
            self.0.exists(key).await
        }
        async fn count(&self) -> StoreResult<i64> {
            self.0.count().await
        }
    }

    #[tokio::test]
    async fn test_create_then_details_returns_same_values() {
        let controller = CrudController::<Vehicle>::new(DbContext::in_memory());
        let created = saved(controller.create(corolla()).await.unwrap());

        let found = controller.details(Some(created.id)).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.make, "Toyota");
        assert_eq!(found.rental_rate_per_day, Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn test_invalid_create_keeps_input_and_persists_nothing() {
        let controller = CrudController::<Vehicle>::new(DbContext::in_memory());
        let form = VehicleForm {
            plate_number: String::new(),
            ..corolla()
        };

        match controller.create(form).await.unwrap() {
            Submission::Invalid { form, errors } => {
                assert_eq!(form.make, "Toyota");
                assert!(errors.field_errors().contains_key("plate_number"));
            }
            Submission::Saved(_) => panic!("invalid form must not be saved"),
        }
        assert!(controller.index().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_absent_keys_are_not_found() {
        let controller = CrudController::<Vehicle>::new(DbContext::in_memory());
        assert!(matches!(controller.details(Some(42)).await, Err(AppError::NotFound(_))));
        assert!(matches!(controller.edit_form(Some(42)).await, Err(AppError::NotFound(_))));
        assert!(matches!(controller.delete_form(Some(42)).await, Err(AppError::NotFound(_))));
        assert!(matches!(controller.details(None).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_set() {
        let controller = CrudController::<Rental>::new(DbContext::default());

        let err = controller.index().await.unwrap_err();
        assert_eq!(err.to_string(), "Entity set 'CarManagementDbContext.Rental' is null.");

        assert!(matches!(controller.details(Some(1)).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            controller.delete_confirmed(1).await,
            Err(AppError::EntitySetUnavailable("Rental"))
        ));
    }

    #[tokio::test]
    async fn test_edit_with_mismatched_key_is_not_found() {
        let controller = CrudController::<Rental>::new(DbContext::in_memory());
        let created = saved(controller.create(rental(None)).await.unwrap());

        let mut form = rental(Some(created.id + 1));
        form.total_cost = Decimal::new(1, 0);
        let result = controller.edit(created.id, form).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let unchanged = controller.details(Some(created.id)).await.unwrap();
        assert_eq!(unchanged.total_cost, Decimal::new(12500, 2));
    }

    #[tokio::test]
    async fn test_edit_replaces_bound_fields() {
        let controller = CrudController::<Rental>::new(DbContext::in_memory());
        let created = saved(controller.create(rental(None)).await.unwrap());

        let mut form = rental(Some(created.id));
        form.vehicle_id = 3;
        form.total_cost = Decimal::new(9900, 2);
        let updated = saved(controller.edit(created.id, form).await.unwrap());

        assert_eq!(updated.vehicle_id, 3);
        assert_eq!(controller.details(Some(created.id)).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_edit_of_vanished_row_is_not_found() {
        let controller = CrudController::<Rental>::new(DbContext::in_memory());
        let result = controller.edit(5, rental(Some(5))).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_conflict_with_row_still_present_is_fatal() {
        let rentals = AlwaysConflicting(MemorySet::new());
        let existing = rentals.insert(rental(None)).await.unwrap();
        let context = DbContext {
            rentals: Some(Arc::new(rentals)),
            ..DbContext::default()
        };
        let controller = CrudController::<Rental>::new(context);

        let result = controller.edit(existing.id, rental(Some(existing.id))).await;
        assert!(matches!(result, Err(AppError::Concurrency(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let controller = CrudController::<Vehicle>::new(DbContext::in_memory());
        let created = saved(controller.create(corolla()).await.unwrap());

        controller.delete_confirmed(created.id).await.unwrap();
        controller.delete_confirmed(created.id).await.unwrap();
        assert!(controller.index().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_monthly_revenue_same_month_other_year_is_rejected() {
        let controller = CrudController::<MonthlyRevenue>::new(DbContext::in_memory());
        let march = MonthlyRevenueForm {
            month: 3,
            year: 2023,
            revenue: Decimal::new(100000, 2),
        };
        saved(controller.create(march.clone()).await.unwrap());

        let next_year = MonthlyRevenueForm { year: 2024, ..march };
        assert!(matches!(
            controller.create(next_year).await,
            Err(AppError::Conflict(_))
        ));

        let rows = controller.index().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2023);
    }
}
