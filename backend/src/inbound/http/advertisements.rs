//! Advertisement placement handler.
//!
//! ```text
//! GET /api/v1/advertisements/placements/top
//! ```

use actix_web::web;
use serde_json::json;

use super::ApiResult;
use super::state::HttpState;
use crate::domain::{AdPosition, Error, Placement};

/// Advertisement to show in the slot at `position`.
pub async fn placement(
    state: web::Data<HttpState>,
    position: web::Path<String>,
) -> ApiResult<web::Json<Placement>> {
    let position = AdPosition::from_label(&position).ok_or_else(|| {
        Error::validation_failed(format!("unknown advertisement position: {position}"))
            .with_details(json!({ "fields": { "position": ["invalid_format"] } }))
    })?;
    Ok(web::Json(state.placements.placement(position).await?))
}
