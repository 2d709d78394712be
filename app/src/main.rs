use reqbind::config::load_dotenv;
use reqbind::Server;
use tracing_subscriber::EnvFilter;

mod controllers;
mod middleware;
mod requests;
mod routes;

#[tokio::main]
async fn main() {
    let environment = load_dotenv(std::path::Path::new("."));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reqbind=debug")),
        )
        .init();

    tracing::info!(%environment, "starting app");

    if let Err(err) = Server::from_config(routes::register())
        .middleware(middleware::LoggingMiddleware)
        .run()
        .await
    {
        tracing::error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}
