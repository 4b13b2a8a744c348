//! Almacén en memoria
//!
//! Las escrituras se serializan detrás de un `RwLock`; el contador de
//! identidad vive bajo el mismo lock, así que dos inserts concurrentes nunca
//! reciben la misma clave.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EntitySet, StoreError, StoreResult};
use crate::models::Entity;

struct MemoryTable<E> {
    rows: Vec<E>,
    last_id: i32,
}

pub struct MemorySet<E> {
    table: RwLock<MemoryTable<E>>,
}

impl<E: Entity> MemorySet<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(MemoryTable {
                rows: Vec::new(),
                last_id: 0,
            }),
        }
    }
}

impl<E: Entity> Default for MemorySet<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> EntitySet<E> for MemorySet<E>
where
    E: Entity,
    E::Key: From<i32>,
{
    async fn list(&self) -> StoreResult<Vec<E>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn find(&self, key: E::Key) -> StoreResult<Option<E>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|row| row.key() == key).cloned())
    }

    async fn insert(&self, form: E::Form) -> StoreResult<E> {
        let mut table = self.table.write().await;

        let key = match E::natural_key(&form) {
            Some(key) => key,
            None => {
                table.last_id = table
                    .last_id
                    .checked_add(1)
                    .ok_or(StoreError::IdentityExhausted(E::SET_NAME))?;
                E::Key::from(table.last_id)
            }
        };

        if table.rows.iter().any(|row| row.key() == key) {
            return Err(StoreError::Duplicate {
                set: E::SET_NAME,
                key: key.to_string(),
            });
        }

        let record = E::from_form(key, form);
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &E) -> StoreResult<()> {
        let mut table = self.table.write().await;
        let key = record.key();
        match table.rows.iter_mut().find(|row| row.key() == key) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(StoreError::Concurrency {
                set: E::SET_NAME,
                key: key.to_string(),
            }),
        }
    }

    async fn remove(&self, key: E::Key) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|row| row.key() != key);
        Ok(table.rows.len() != before)
    }

    async fn exists(&self, key: E::Key) -> StoreResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.iter().any(|row| row.key() == key))
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthlyRevenue, MonthlyRevenueForm, Rental, RentalForm};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn rental_form(customer_id: i32) -> RentalForm {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        RentalForm {
            id: Some(999),
            customer_id,
            vehicle_id: 1,
            rental_start_date: start,
            rental_end_date: start + chrono::Duration::days(3),
            total_cost: Decimal::new(7500, 2),
        }
    }

    fn revenue(month: i32, year: i32) -> MonthlyRevenueForm {
        MonthlyRevenueForm {
            month,
            year,
            revenue: Decimal::new(100000, 2),
        }
    }

    #[tokio::test]
    async fn test_identity_ignores_submitted_key() {
        let set = MemorySet::<Rental>::new();
        let first = set.insert(rental_form(1)).await.unwrap();
        let second = set.insert(rental_form(2)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(set.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_identity_is_not_reused_after_delete() {
        let set = MemorySet::<Rental>::new();
        set.insert(rental_form(1)).await.unwrap();
        let second = set.insert(rental_form(2)).await.unwrap();
        assert!(set.remove(1).await.unwrap());

        // count + 1 daría 2 otra vez
        let third = set.insert(rental_form(3)).await.unwrap();
        assert_ne!(third.id, second.id);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let set = Arc::new(MemorySet::<Rental>::new());
        let handles: Vec<_> = (1..=32)
            .map(|customer| {
                let set = set.clone();
                tokio::spawn(async move { set.insert(rental_form(customer)).await.unwrap().id })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn test_natural_key_duplicate_is_rejected() {
        let set = MemorySet::<MonthlyRevenue>::new();
        set.insert(revenue(3, 2023)).await.unwrap();

        let err = set.insert(revenue(3, 2024)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { set: "MonthlyRevenue", .. }));

        let stored = set.find(3).await.unwrap().unwrap();
        assert_eq!(stored.year, 2023);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_a_concurrency_error() {
        let set = MemorySet::<MonthlyRevenue>::new();
        let ghost = MonthlyRevenue {
            month: 5,
            year: 2024,
            revenue: Decimal::ZERO,
        };
        assert!(matches!(
            set.update(&ghost).await,
            Err(StoreError::Concurrency { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let set = MemorySet::<MonthlyRevenue>::new();
        set.insert(revenue(1, 2024)).await.unwrap();
        assert!(set.remove(1).await.unwrap());
        assert!(!set.remove(1).await.unwrap());
        assert!(!set.exists(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let set = MemorySet::<MonthlyRevenue>::new();
        for month in [7, 2, 11] {
            set.insert(revenue(month, 2024)).await.unwrap();
        }
        let months: Vec<i32> = set.list().await.unwrap().iter().map(|r| r.month).collect();
        assert_eq!(months, vec![7, 2, 11]);
    }

    #[tokio::test]
    async fn test_exhausted_identity_is_an_error() {
        let set = MemorySet::<Rental> {
            table: RwLock::new(MemoryTable {
                rows: Vec::new(),
                last_id: i32::MAX - 1,
            }),
        };
        assert_eq!(set.insert(rental_form(1)).await.unwrap().id, i32::MAX);

        let err = set.insert(rental_form(2)).await.unwrap_err();
        assert!(matches!(err, StoreError::IdentityExhausted("Rental")));
        assert_eq!(set.count().await.unwrap(), 1);
    }
}
