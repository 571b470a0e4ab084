use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_dispatch::config::EnvironmentConfig;
use fleet_dispatch::repositories::{FleetData, FleetStore};
use fleet_dispatch::routes::create_router;
use fleet_dispatch::services::seed::demo_fleet;
use fleet_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env().context("invalid configuration")?;

    // Configurar logging: RUST_LOG tiene prioridad sobre LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚚 Fleet Dispatch Core ({})", config.environment);
    info!("================================================");

    // Los datos de demostración solo se siembran en desarrollo
    let data = if config.seed_demo_data && config.is_development() {
        demo_fleet(chrono::Utc::now())
    } else {
        if config.seed_demo_data {
            warn!("⚠️ SEED_DEMO_DATA ignorado fuera de desarrollo");
        }
        FleetData::new()
    };
    let store = FleetStore::with_data(data);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;

    let app = create_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Liveness");
    info!("   /api/vehicles, /api/drivers - Flota");
    info!("   /api/trips - Despacho y ciclo de vida de viajes");
    info!("   /api/fuel-logs, /api/maintenance-logs - Registros financieros");
    info!("   /api/analytics/fleet, /api/analytics/monthly - Analytics");
    info!("   /api/alerts - Alertas");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el manejador de señales: {}", e);
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
