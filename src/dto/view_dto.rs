use serde::Serialize;
use validator::ValidationErrors;

// Response genérica para listados y detalles
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

// Vista de formulario (Create, Edit, Delete) con su token anti-forgery
#[derive(Debug, Serialize)]
pub struct FormView<T> {
    pub antiforgery_token: String,
    pub record: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl<T> FormView<T> {
    pub fn empty(antiforgery_token: String) -> Self {
        Self {
            antiforgery_token,
            record: None,
            errors: None,
        }
    }

    pub fn with_record(antiforgery_token: String, record: T) -> Self {
        Self {
            antiforgery_token,
            record: Some(record),
            errors: None,
        }
    }

    pub fn invalid(antiforgery_token: String, record: T, errors: ValidationErrors) -> Self {
        Self {
            antiforgery_token,
            record: Some(record),
            errors: Some(errors),
        }
    }
}
