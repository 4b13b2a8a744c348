//! Modelo de MonthlyRevenue
//!
//! La clave es sólo `Month`: un segundo registro para el mismo mes (aunque
//! sea de otro año) se rechaza como duplicado.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::entity::Entity;
use crate::repositories::{DbContext, SharedSet};
use crate::utils::validation::validate_amount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct MonthlyRevenue {
    pub month: i32,
    pub year: i32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct MonthlyRevenueForm {
    #[validate(range(min = 1, max = 12))]
    pub month: i32,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(custom = "validate_amount")]
    pub revenue: Decimal,
}

impl Entity for MonthlyRevenue {
    type Key = i32;
    type Form = MonthlyRevenueForm;

    const SET_NAME: &'static str = "MonthlyRevenue";
    const ROUTE: &'static str = "MonthlyRevenues";

    fn key(&self) -> i32 {
        self.month
    }

    fn form_key(form: &MonthlyRevenueForm) -> Option<i32> {
        Some(form.month)
    }

    fn natural_key(form: &MonthlyRevenueForm) -> Option<i32> {
        Some(form.month)
    }

    fn from_form(month: i32, form: MonthlyRevenueForm) -> Self {
        Self {
            month,
            year: form.year,
            revenue: form.revenue,
        }
    }

    fn set(context: &DbContext) -> Option<SharedSet<Self>> {
        context.monthly_revenues.clone()
    }
}
