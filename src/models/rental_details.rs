//! Modelo de RentalDetails
//!
//! Registro desnormalizado de un alquiler (nombre del cliente y datos del
//! vehículo). La clave `RentalId` viene del formulario y no se comprueba
//! contra la tabla de alquileres.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::entity::Entity;
use crate::repositories::{DbContext, SharedSet};
use crate::utils::forms::form_datetime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct RentalDetails {
    pub rental_id: i32,
    pub customer_name: String,
    pub make: String,
    pub model: String,
    pub rental_start_date: NaiveDateTime,
    pub rental_end_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RentalDetailsForm {
    #[validate(range(min = 1))]
    pub rental_id: i32,

    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[serde(deserialize_with = "form_datetime")]
    pub rental_start_date: NaiveDateTime,

    #[serde(deserialize_with = "form_datetime")]
    pub rental_end_date: NaiveDateTime,
}

impl Entity for RentalDetails {
    type Key = i32;
    type Form = RentalDetailsForm;

    const SET_NAME: &'static str = "RentalDetails";
    const ROUTE: &'static str = "RentalDetails";

    fn key(&self) -> i32 {
        self.rental_id
    }

    fn form_key(form: &RentalDetailsForm) -> Option<i32> {
        Some(form.rental_id)
    }

    fn natural_key(form: &RentalDetailsForm) -> Option<i32> {
        Some(form.rental_id)
    }

    fn from_form(rental_id: i32, form: RentalDetailsForm) -> Self {
        Self {
            rental_id,
            customer_name: form.customer_name,
            make: form.make,
            model: form.model,
            rental_start_date: form.rental_start_date,
            rental_end_date: form.rental_end_date,
        }
    }

    fn set(context: &DbContext) -> Option<SharedSet<Self>> {
        context.rental_details.clone()
    }
}
