//! Server construction and middleware wiring.

mod state_builders;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use ci_tender::Trace;
use ci_tender::inbound::http::routes::configure;
use ci_tender::inbound::http::state::HttpState;
use ci_tender::settings::ServerSettings;
use state_builders::{BuiltState, build_http_state};

fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
}

/// Construct the Actix HTTP server described by `settings`.
///
/// Creates the configured administrator account before binding.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails or the
/// administrator account cannot be created.
pub async fn create_server(settings: &ServerSettings) -> std::io::Result<Server> {
    let BuiltState { http, accounts } = build_http_state();

    match settings.admin_credentials() {
        Some((email, password)) => {
            accounts
                .bootstrap_admin(email, password)
                .await
                .map_err(|err| std::io::Error::other(format!("admin bootstrap failed: {err}")))?;
        }
        None => warn!("no administrator configured; write endpoints are unreachable"),
    }

    let http_state = web::Data::new(http);
    let bind_addr = settings.bind_addr();
    let server = HttpServer::new(move || build_app(http_state.clone()))
        .bind(bind_addr)?
        .run();
    info!(%bind_addr, "server listening");
    Ok(server)
}
