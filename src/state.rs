//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::DbContext;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub antiforgery: JwtConfig,
    context: DbContext,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, context: DbContext) -> Self {
        let antiforgery = JwtConfig::from(&config);
        Self {
            config,
            antiforgery,
            context,
        }
    }

    /// Contexto de datos para un request
    pub fn context(&self) -> DbContext {
        self.context.clone()
    }
}
