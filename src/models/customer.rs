//! Modelo de Customer

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::entity::Entity;
use crate::repositories::{DbContext, SharedSet};
use crate::utils::forms::empty_string_as_none;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[serde(default)]
    #[validate(email)]
    pub email: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 30))]
    pub phone_number: Option<String>,
}

impl Entity for Customer {
    type Key = i32;
    type Form = CustomerForm;

    const SET_NAME: &'static str = "Customer";
    const ROUTE: &'static str = "Customers";

    fn key(&self) -> i32 {
        self.id
    }

    fn form_key(form: &CustomerForm) -> Option<i32> {
        form.id
    }

    fn from_form(id: i32, form: CustomerForm) -> Self {
        Self {
            id,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone_number: form.phone_number,
        }
    }

    fn set(context: &DbContext) -> Option<SharedSet<Self>> {
        context.customers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_checked() {
        let form = CustomerForm {
            id: None,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "not-an-email".to_string(),
            phone_number: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let form = CustomerForm {
            email: "ada@example.com".to_string(),
            ..form
        };
        assert!(form.validate().is_ok());
    }
}
