//! Record collection handlers, generic over the record family.
//!
//! ```text
//! GET    /api/v1/tenders?keyword=...&page=2&pageSize=10
//! GET    /api/v1/tenders/{id}
//! POST   /api/v1/tenders            (administrator)
//! PUT    /api/v1/tenders/{id}       (administrator)
//! DELETE /api/v1/tenders/{id}       (administrator)
//! GET    /api/v1/tenders/facets
//! ```
//!
//! The user collection is readable by administrators only.

use actix_web::{HttpResponse, web};
use pagination::Page;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ApiResult;
use super::auth::{AdminSession, Viewer};
use super::query::ListParams;
use super::state::{FacadeFor, HttpState};
use crate::domain::ports::{Facets, ListQuery, RecordFacade};
use crate::domain::{Error, Record, RecordId, RecordKind};

fn facade<R: Record>(state: &HttpState) -> &dyn RecordFacade<R>
where
    HttpState: FacadeFor<R>,
{
    <HttpState as FacadeFor<R>>::facade(state)
}

fn authorize_read<R: Record>(viewer: &Viewer) -> Result<(), Error> {
    if R::KIND == RecordKind::User {
        viewer.require_admin()?;
    }
    Ok(())
}

fn record_id<R: Record>(raw: &str) -> Result<RecordId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("{} {raw} not found", R::KIND)))
}

/// Filtered, sorted page of records.
pub async fn list<R>(
    state: web::Data<HttpState>,
    viewer: Viewer,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Page<R>>>
where
    R: Record,
    HttpState: FacadeFor<R>,
{
    authorize_read::<R>(&viewer)?;
    let query = ListQuery::try_from(params.into_inner())?;
    let page = facade::<R>(&state).list(&query).await?;
    debug!(kind = %R::KIND, total = page.total, page = page.page, "records listed");
    Ok(web::Json(page))
}

/// Single record by id.
pub async fn get<R>(
    state: web::Data<HttpState>,
    viewer: Viewer,
    id: web::Path<String>,
) -> ApiResult<web::Json<R>>
where
    R: Record,
    HttpState: FacadeFor<R>,
{
    authorize_read::<R>(&viewer)?;
    let id = record_id::<R>(&id)?;
    Ok(web::Json(facade::<R>(&state).get(id).await?))
}

/// Validate and store a new record.
pub async fn create<R>(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    payload: web::Json<R::Input>,
) -> ApiResult<HttpResponse>
where
    R: Record,
    R::Input: DeserializeOwned,
    HttpState: FacadeFor<R>,
{
    let record = facade::<R>(&state).create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Apply a partial update.
pub async fn update<R>(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    id: web::Path<String>,
    payload: web::Json<R::Input>,
) -> ApiResult<web::Json<R>>
where
    R: Record,
    R::Input: DeserializeOwned,
    HttpState: FacadeFor<R>,
{
    let id = record_id::<R>(&id)?;
    let record = facade::<R>(&state)
        .update(id, payload.into_inner())
        .await?;
    Ok(web::Json(record))
}

/// Remove a record.
pub async fn delete<R>(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse>
where
    R: Record,
    HttpState: FacadeFor<R>,
{
    let id = record_id::<R>(&id)?;
    facade::<R>(&state).delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Distinct categories and locations.
pub async fn facets<R>(
    state: web::Data<HttpState>,
    viewer: Viewer,
) -> ApiResult<web::Json<Facets>>
where
    R: Record,
    HttpState: FacadeFor<R>,
{
    authorize_read::<R>(&viewer)?;
    Ok(web::Json(facade::<R>(&state).facets().await?))
}

/// Distinct sectors, for the tender and supplier filter menus.
pub async fn sectors<R>(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<String>>>
where
    R: Record,
    HttpState: FacadeFor<R>,
{
    let facets = facade::<R>(&state).facets().await?;
    Ok(web::Json(facets.categories))
}

/// Register the collection, item and facet routes of `R`.
pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: Record,
    R::Input: DeserializeOwned,
    HttpState: FacadeFor<R>,
{
    let base = format!("/{}", R::KIND.collection());
    cfg.service(
        web::resource(base.clone())
            .route(web::get().to(list::<R>))
            .route(web::post().to(create::<R>)),
    )
    .service(web::resource(format!("{base}/facets")).route(web::get().to(facets::<R>)))
    .service(
        web::resource(format!("{base}/{{id}}"))
            .route(web::get().to(get::<R>))
            .route(web::put().to(update::<R>))
            .route(web::delete().to(delete::<R>)),
    );
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
