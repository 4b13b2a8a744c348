//! Modelo de Rental
//!
//! Un alquiler une un cliente y un vehículo durante un periodo. El Id lo
//! asigna la secuencia del almacén; la fecha de fin no se compara con la de
//! inicio.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::entity::Entity;
use crate::repositories::{DbContext, SharedSet};
use crate::utils::forms::{empty_string_as_none, form_datetime};
use crate::utils::validation::validate_amount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Rental {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rental_start_date: NaiveDateTime,
    pub rental_end_date: NaiveDateTime,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RentalForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<i32>,

    #[validate(range(min = 1))]
    pub customer_id: i32,

    #[validate(range(min = 1))]
    pub vehicle_id: i32,

    #[serde(deserialize_with = "form_datetime")]
    pub rental_start_date: NaiveDateTime,

    #[serde(deserialize_with = "form_datetime")]
    pub rental_end_date: NaiveDateTime,

    #[validate(custom = "validate_amount")]
    pub total_cost: Decimal,
}

impl Entity for Rental {
    type Key = i32;
    type Form = RentalForm;

    const SET_NAME: &'static str = "Rental";
    const ROUTE: &'static str = "Rentals";

    fn key(&self) -> i32 {
        self.id
    }

    fn form_key(form: &RentalForm) -> Option<i32> {
        form.id
    }

    fn from_form(id: i32, form: RentalForm) -> Self {
        Self {
            id,
            customer_id: form.customer_id,
            vehicle_id: form.vehicle_id,
            rental_start_date: form.rental_start_date,
            rental_end_date: form.rental_end_date,
            total_cost: form.total_cost,
        }
    }

    fn set(context: &DbContext) -> Option<SharedSet<Self>> {
        context.rentals.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_end_before_start_is_accepted() {
        let form = RentalForm {
            id: None,
            customer_id: 2,
            vehicle_id: 9,
            rental_start_date: at(10),
            rental_end_date: at(3),
            total_cost: Decimal::new(15000, 2),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_references_must_be_positive() {
        let form = RentalForm {
            id: None,
            customer_id: 0,
            vehicle_id: -1,
            rental_start_date: at(1),
            rental_end_date: at(2),
            total_cost: Decimal::ZERO,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("customer_id"));
        assert!(errors.field_errors().contains_key("vehicle_id"));
    }
}
