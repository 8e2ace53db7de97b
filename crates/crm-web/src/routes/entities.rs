//! Generic entity handlers.
//!
//! Each handler takes the [`EntityKind`] its route was registered for, so
//! the label is fixed by the router and never read from the request.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use crm_core::{CrmError, EntityKind, EntityPatch, EntityRecord, NewEntity};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

pub async fn create_entity(
    kind: EntityKind,
    state: AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<EntityRecord>> {
    let Json(body) = body?;
    let entity = NewEntity::from_json(kind, body)?;
    Ok(Json(state.graph.create(entity).await?))
}

pub async fn list_entities(kind: EntityKind, state: AppState) -> ApiResult<Json<Vec<EntityRecord>>> {
    Ok(Json(state.graph.list(kind).await?))
}

pub async fn get_entity(kind: EntityKind, state: AppState, id: String) -> ApiResult<Json<EntityRecord>> {
    Ok(Json(state.graph.get(kind, &id).await?))
}

pub async fn update_entity(
    kind: EntityKind,
    state: AppState,
    id: String,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<EntityRecord>> {
    let Json(body) = body?;
    let patch = EntityPatch::from_json(kind, body)?;
    Ok(Json(state.graph.update(&id, patch).await?))
}

pub async fn search_entities(
    kind: EntityKind,
    state: AppState,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<EntityRecord>>> {
    let Query(params) = params?;
    let name = params
        .name
        .ok_or_else(|| CrmError::validation("Query parameter 'name' is required"))?;
    Ok(Json(state.graph.search(kind, &name).await?))
}

/// Every route for one kind: `/{collection}[/]`, `/{collection}/{id}` and,
/// for kinds with a name, `/{collection}/search_name`.
pub fn router(kind: EntityKind) -> Router<AppState> {
    let collection = get(move |State(state): State<AppState>| list_entities(kind, state)).post(
        move |State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>| {
            create_entity(kind, state, body)
        },
    );

    let item = get(move |State(state): State<AppState>, Path(id): Path<String>| get_entity(kind, state, id)).patch(
        move |State(state): State<AppState>, Path(id): Path<String>, body: Result<Json<Value>, JsonRejection>| {
            update_entity(kind, state, id, body)
        },
    );

    let base = format!("/{}", kind.collection());
    let mut router = Router::new()
        .route(&base, collection.clone())
        .route(&format!("{base}/"), collection)
        .route(&format!("{base}/{{id}}"), item);

    if kind.is_searchable() {
        router = router.route(
            &format!("{base}/search_name"),
            get(
                move |State(state): State<AppState>, params: Result<Query<SearchParams>, QueryRejection>| {
                    search_entities(kind, state, params)
                },
            ),
        );
    }

    router
}
