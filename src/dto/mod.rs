//! DTOs de respuesta: vistas de listado, detalle y formulario

pub mod view_dto;

pub use view_dto::{ApiResponse, FormView};
