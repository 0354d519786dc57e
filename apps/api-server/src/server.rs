//! HTTP server assembly.

use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use crate::handlers;
use crate::middleware::error::{json_config, path_config};
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

/// Build the server on an already-bound listener.
///
/// The returned [`Server`] does nothing until awaited or spawned; use
/// [`Server::handle`] to stop it.
pub fn run(listener: TcpListener, state: AppState) -> std::io::Result<Server> {
    let addr = listener.local_addr()?;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(path_config())
            .configure(handlers::configure_routes)
    })
    .listen(listener)?
    .run();

    tracing::info!(%addr, "HTTP server listening");
    Ok(server)
}
