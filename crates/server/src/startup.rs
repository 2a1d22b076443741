use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Configured origins with credentials, or fully permissive when none are listed.
pub fn build_cors(origins: &[String]) -> Result<CorsLayer, StartupError> {
    if origins.is_empty() {
        return Ok(CorsLayer::very_permissive());
    }
    let parsed = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>().map_err(|e| StartupError::InvalidConfig(format!("cors origin {o}: {e}"))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::very_permissive().allow_origin(parsed))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Build the app from a loaded configuration and run the HTTP server; logging must be
/// initialized by the caller.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_media_root(std::path::Path::new(&cfg.media.root))
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let state = ServerState::from_db(db, &cfg);
    let app: Router = routes::build_router(state, build_cors(&cfg.server.cors_allowed_origins)?);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_garbage_origin() {
        assert!(build_cors(&["http://localhost:3000".into()]).is_ok());
        assert!(build_cors(&["bad\norigin".into()]).is_err());
        assert!(build_cors(&[]).is_ok());
    }

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 9100;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 9100);
        cfg.server.host = "not a host".into();
        assert!(bind_addr(&cfg).is_err());
    }
}
