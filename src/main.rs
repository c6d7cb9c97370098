use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use minhas_financas_api::application::entry_service::EntryService;
use minhas_financas_api::application::user_service::UserService;
use minhas_financas_api::data::entry_repository::InMemoryEntryRepository;
use minhas_financas_api::data::user_repository::InMemoryUserRepository;
use minhas_financas_api::infrastructure::config::AppConfig;
use minhas_financas_api::infrastructure::logging::init_logging;
use minhas_financas_api::presentation::handlers::{AppState, configure_routes};
use minhas_financas_api::presentation::middleware::RequestLogging;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    init_logging(&config.log_level);
    info!(?config, "Configuration loaded");

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let entry_repository = Arc::new(InMemoryEntryRepository::new());

    let state = web::Data::new(AppState {
        user_service: UserService::new(user_repository),
        entry_service: EntryService::new(entry_repository),
    });
    info!("Application state initialized");

    let bind_addr = config.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestLogging)
            .configure(configure_routes)
    })
    .bind(&bind_addr)
    .inspect_err(|e| error!(address = %bind_addr, error = %e, "Failed to bind"))?;

    info!(address = %bind_addr, "Starting HTTP server");
    server.run().await
}
