//! Modelos del sistema
//!
//! Este módulo contiene los registros persistidos, sus formularios y el
//! trait `Entity` que los conecta con el controlador CRUD genérico.

pub mod customer;
pub mod entity;
pub mod monthly_revenue;
pub mod rental;
pub mod rental_details;
pub mod vehicle;

pub use customer::{Customer, CustomerForm};
pub use entity::Entity;
pub use monthly_revenue::{MonthlyRevenue, MonthlyRevenueForm};
pub use rental::{Rental, RentalForm};
pub use rental_details::{RentalDetails, RentalDetailsForm};
pub use vehicle::{Vehicle, VehicleForm};
