//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! deserialización de formularios y tokens JWT anti-forgery.

pub mod errors;
pub mod forms;
pub mod jwt;
pub mod validation;
