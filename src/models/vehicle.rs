//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y el formulario usado en Create/Edit.
//! Mapea a la tabla `vehicle` con primary key `id` asignada por la base de datos.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::entity::Entity;
use crate::repositories::{DbContext, SharedSet};
use crate::utils::forms::empty_string_as_none;
use crate::utils::validation::validate_amount;

/// Vehicle principal - mapea exactamente a la tabla vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Vehicle {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
    pub rental_rate_per_day: Decimal,
    pub status: String,
}

/// Formulario de vehículo (campos enlazables: Id, Make, Model, Year, PlateNumber, RentalRatePerDay, Status)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub plate_number: String,

    #[validate(custom = "validate_amount")]
    pub rental_rate_per_day: Decimal,

    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub status: String,
}

impl Entity for Vehicle {
    type Key = i32;
    type Form = VehicleForm;

    const SET_NAME: &'static str = "Vehicle";
    const ROUTE: &'static str = "Vehicles";

    fn key(&self) -> i32 {
        self.id
    }

    fn form_key(form: &VehicleForm) -> Option<i32> {
        form.id
    }

    fn from_form(id: i32, form: VehicleForm) -> Self {
        Self {
            id,
            make: form.make,
            model: form.model,
            year: form.year,
            plate_number: form.plate_number,
            rental_rate_per_day: form.rental_rate_per_day,
            status: form.status,
        }
    }

    fn set(context: &DbContext) -> Option<SharedSet<Self>> {
        context.vehicles.clone()
    }
}
