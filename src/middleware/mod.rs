//! Middleware del sistema
//!
//! CORS y validación de tokens anti-forgery.

pub mod antiforgery;
pub mod cors;

pub use antiforgery::*;
pub use cors::*;
