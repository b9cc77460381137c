//! Route table of the HTTP adapter.

use actix_web::web;

use super::advertisements::placement;
use super::auth::{current_user, login, logout, register};
use super::error::{json_error_handler, path_error_handler, query_error_handler};
use super::records::{self, sectors};
use crate::domain::{Advertisement, Supplier, Tender, User};

/// Mount every `/api/v1` route.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use ci_tender::inbound::http::routes::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(login))
                    .route("/register", web::post().to(register))
                    .route("/logout", web::post().to(logout))
                    .route("/me", web::get().to(current_user)),
            )
            .route("/tenders/sectors", web::get().to(sectors::<Tender>))
            .route("/suppliers/sectors", web::get().to(sectors::<Supplier>))
            .route(
                "/advertisements/placements/{position}",
                web::get().to(placement),
            )
            .configure(records::configure::<Tender>)
            .configure(records::configure::<Supplier>)
            .configure(records::configure::<User>)
            .configure(records::configure::<Advertisement>),
    );
}
