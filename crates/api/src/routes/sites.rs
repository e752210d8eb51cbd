//! Public, read-only view of published sites.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use site_lake_core::document::{PublicId, PublishedSite};
use site_lake_core::render::{render_notice, render_site_page};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sites/{public_id}", get(view_site))
        .route("/v1/sites/{public_id}", get(get_site))
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    /// Zero-based page index.
    page: Option<usize>,
}

/// Look up a live published site. Unknown, unpublished and malformed ids
/// all read as not found.
async fn find_site(state: &AppState, raw_id: &str) -> ApiResult<Option<PublishedSite>> {
    let Ok(public_id) = PublicId::parse(raw_id) else {
        tracing::debug!(public_id = raw_id, "Rejected malformed public id");
        return Ok(None);
    };
    let site = state.store().get_site(public_id.as_str()).await?;
    Ok(site.filter(|site| site.is_published))
}

/// Standalone HTML document of one page of a site.
async fn view_site(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    match find_site(&state, &public_id).await {
        Ok(Some(site)) => {
            let index = query.page.unwrap_or(0);
            tracing::debug!(public_id = %site.public_id, index, "Serving published page");
            Html(render_site_page(&site, index)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Html(render_notice(
                "",
                "Site Not Found",
                "The site you're looking for doesn't exist or has been removed.",
            )),
        )
            .into_response(),
        Err(err) => {
            let status = err.status();
            tracing::error!(public_id = %public_id, error = %err, "Failed to load published site");
            (
                status,
                Html(render_notice(
                    "",
                    "Error Loading Site",
                    "There was an error loading this site. Please try again later.",
                )),
            )
                .into_response()
        }
    }
}

/// Published record as JSON, with its public URL.
async fn get_site(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let site = find_site(&state, &public_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("site {public_id}")))?;

    Ok(Json(json!({
        "url": state.config().site_url(&site.public_id),
        "site": site,
    })))
}
