//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use leads_backend::{
    config::{AppState, ServerConfig},
    create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()?;
    let server_config = ServerConfig::from_env();

    let app = create_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&server_config.addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
