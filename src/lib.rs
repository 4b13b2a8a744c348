//! Gestión de alquiler de coches: controladores CRUD sobre clientes,
//! vehículos, alquileres, detalles de alquiler e ingresos mensuales.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
