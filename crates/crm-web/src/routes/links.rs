//! Out-of-band link handlers.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use crm_core::{LinkConfirmation, LinkKind};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn link_entities(
    kind: LinkKind,
    state: AppState,
    owner_id: String,
    other_id: String,
) -> ApiResult<Json<LinkConfirmation>> {
    Ok(Json(state.graph.link(kind, &owner_id, &other_id).await?))
}

/// One `POST` route per [`LinkKind`].
pub fn router() -> Router<AppState> {
    LinkKind::ALL.into_iter().fold(Router::new(), |router, kind| {
        router.route(
            &kind.route_path(),
            post(
                move |State(state): State<AppState>, Path((owner_id, other_id)): Path<(String, String)>| {
                    link_entities(kind, state, owner_id, other_id)
                },
            ),
        )
    })
}
