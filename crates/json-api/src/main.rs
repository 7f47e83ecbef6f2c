//! Kaiten JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kaiten_app::context::AppContext;

use crate::config::{ServerConfig, logging::LogFormat};

mod auth;
mod carts;
mod config;
mod extensions;
mod healthcheck;
mod loyalty;
mod menu;
mod orders;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod users;

use crate::state::State;

/// Kaiten JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level));

    match config.logging.log_format {
        LogFormat::Compact => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
    }

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::from_database_url(&config.database.database_url).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("register").post(users::register::handler))
        .push(
            Router::with_path("menu")
                .push(Router::with_path("rolls").get(menu::rolls::handler))
                .push(Router::with_path("sets").get(menu::sets::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("profile").get(users::profile::handler))
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .push(Router::with_path("add").post(carts::add::handler))
                        .push(Router::with_path("remove").delete(carts::remove::handler))
                        .push(Router::with_path("update").put(carts::update::handler))
                        .push(Router::with_path("clear").delete(carts::clear::handler))
                        .push(Router::with_path("use-bonus").post(carts::use_bonus::handler)),
                )
                .push(
                    Router::with_path("orders")
                        .get(orders::index::handler)
                        .post(orders::create::handler)
                        .push(Router::with_path("{uuid}").get(orders::get::handler)),
                )
                .push(
                    Router::with_path("loyalty")
                        .push(Router::with_path("cards").get(loyalty::cards::handler))
                        .push(
                            Router::with_path("available-rolls")
                                .get(loyalty::available_rolls::handler),
                        )
                        .push(Router::with_path("use-card").post(loyalty::use_card::handler))
                        .push(Router::with_path("history").get(loyalty::history::handler)),
                ),
        );

    let doc = OpenApi::new("Kaiten API", "0.1.0")
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
