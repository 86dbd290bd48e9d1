use videoclub_api::{app, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    videoclub_observability::init(!config.is_development());

    let services = app::services::build_services(&config);
    let app = app::build_app(&config, services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        environment = config.env_name(),
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
