//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir
//! requests desde diferentes orígenes.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::EnvironmentConfig;

/// CORS según la configuración: orígenes explícitos si los hay, permisivo
/// sólo en desarrollo y ningún origen cruzado en el resto de entornos
pub fn cors_from_config(config: &EnvironmentConfig) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) if !origins.is_empty() => cors_middleware_with_origins(origins),
        _ if config.is_development() => cors_middleware(),
        _ => CorsLayer::new(),
    }
}

/// Crear middleware de CORS configurado para desarrollo
/// NOTA: Permite cualquier origen - solo para desarrollo
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("requestverificationtoken"),
        ])
        .expose_headers([HeaderName::from_static("location")])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
