use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use car_rental::config::{DataStore, DatabaseConfig, EnvironmentConfig};
use car_rental::database::DatabaseConnection;
use car_rental::repositories::DbContext;
use car_rental::routes::{create_app_router, describe_routes};
use car_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Car Rental Management");
    info!("========================");

    // Inicializar almacén de datos
    let context = match config.data_store {
        DataStore::Postgres => {
            let db_config = DatabaseConfig::from_environment(&config)?;
            let db_connection = match DatabaseConnection::new(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };

            if config.run_migrations {
                db_connection.run_migrations().await?;
            }

            DbContext::postgres(db_connection.pool().clone())
        }
        DataStore::Memory => {
            warn!("⚠️ DATA_STORE=memory: los datos se pierden al apagar el servidor");
            DbContext::in_memory()
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app_router(AppState::new(config, context));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    for route in describe_routes() {
        info!("   {}", route);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
