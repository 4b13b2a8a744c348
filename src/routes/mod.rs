//! Rutas HTTP
//!
//! Cada entidad se monta bajo el nombre de su controlador (`/Vehicles`,
//! `/Rentals`, ...) con el mismo router CRUD genérico.

pub mod crud_routes;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::{antiforgery_middleware, cors_from_config};
use crate::models::{Customer, Entity, MonthlyRevenue, Rental, RentalDetails, Vehicle};
use crate::state::AppState;

pub use crud_routes::create_crud_router;

fn mount<E: Entity>(router: Router<AppState>) -> Router<AppState> {
    router.nest(&format!("/{}", E::ROUTE), create_crud_router::<E>())
}

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let mut entities = Router::new();
    entities = mount::<Customer>(entities);
    entities = mount::<Vehicle>(entities);
    entities = mount::<Rental>(entities);
    entities = mount::<RentalDetails>(entities);
    entities = mount::<MonthlyRevenue>(entities);

    let entities = entities.layer(from_fn_with_state(state.clone(), antiforgery_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(entities)
        .layer(TraceLayer::new_for_http())
        .layer(cors_from_config(&state.config))
        .with_state(state)
}

/// Endpoint de salud
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "car-rental",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Endpoints montados, para el log de arranque
pub fn describe_routes() -> Vec<String> {
    [
        Customer::ROUTE,
        Vehicle::ROUTE,
        Rental::ROUTE,
        RentalDetails::ROUTE,
        MonthlyRevenue::ROUTE,
    ]
    .iter()
    .map(|route| {
        format!(
            "/{0} · /{0}/Details/{{id}} · /{0}/Create · /{0}/Edit/{{id}} · /{0}/Delete/{{id}}",
            route
        )
    })
    .collect()
}
