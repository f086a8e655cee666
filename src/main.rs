use clap::Parser;
use formgate::adapters::api_handler;
use formgate::adapters::health_handler::HealthHandler;
use formgate::cli::Cli;
use formgate::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    info!(
        "Starting Formgate demo server on {}:{}",
        settings.server.host, settings.server.port
    );

    // Register the demo forms
    let forms = api_handler::demo_registry();
    let health_handler = Arc::new(HealthHandler::new(forms.clone()));

    // Create application using the library function
    let app = formgate::create_app(forms, health_handler);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
