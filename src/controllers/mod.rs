//! Controladores
//!
//! Un único controlador CRUD genérico sirve a todas las entidades.

pub mod crud_controller;

pub use crud_controller::{CrudController, Submission};
