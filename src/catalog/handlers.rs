//! HTTP handlers for the catalog, generic over the record type.
//!
//! [`super::endpoints`] instantiates them per entity, e.g. `list_entities::<Place>`.

use axum::extract::State;
use chrono::Utc;
use std::sync::Arc;

use super::error::CatalogError;
use super::merge::{MergeDto, edit_merge};
use super::models::Place;
use super::randomizer::{self, GenerateParams};
use super::repository::Entity;
use crate::gateway::state::{AppState, HasRepository};
use crate::gateway::types::{ApiResult, IdPath, JsonBody, QueryParams, ok};

const DELETED: &str = "Deleted Successfully";

/// `GET` list, under the plural key
pub async fn list_entities<E: Entity>(State(state): State<Arc<AppState>>) -> ApiResult<Vec<E>>
where
    AppState: HasRepository<E>,
{
    let records = HasRepository::<E>::repository(state.as_ref())
        .list_matching(&[])
        .await
        .map_err(CatalogError::from)?;
    ok(E::PLURAL, records)
}

/// `GET` by id, under the singular key
pub async fn get_entity<E: Entity>(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<E>
where
    AppState: HasRepository<E>,
{
    let record = HasRepository::<E>::repository(state.as_ref())
        .get_by_id(id)
        .await
        .map_err(CatalogError::from)?
        .ok_or(CatalogError::NotFound(E::KIND))?;
    ok(E::KIND, record)
}

/// `PUT|POST` insert-or-update
pub async fn edit_entity<D: MergeDto>(
    State(state): State<Arc<AppState>>,
    JsonBody(dto): JsonBody<D>,
) -> ApiResult<()>
where
    AppState: HasRepository<D::Target>,
{
    let repo = HasRepository::<D::Target>::repository(state.as_ref());
    edit_merge(repo.as_ref(), dto, Utc::now()).await?;
    ok("response", ())
}

/// `DELETE` by id; 404 when nothing was removed
pub async fn delete_entity<E: Entity>(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<&'static str>
where
    AppState: HasRepository<E>,
{
    let removed = HasRepository::<E>::repository(state.as_ref())
        .delete_by_id(id)
        .await
        .map_err(CatalogError::from)?;
    if removed == 0 {
        return Err(CatalogError::NotFound(E::KIND).into());
    }
    tracing::info!(kind = E::KIND, id, "Record deleted");
    ok("response", DELETED)
}

/// `POST` bulk delete from a JSON array of ids
pub async fn delete_entities<E: Entity>(
    State(state): State<Arc<AppState>>,
    JsonBody(ids): JsonBody<Vec<i64>>,
) -> ApiResult<&'static str>
where
    AppState: HasRepository<E>,
{
    if ids.is_empty() {
        return Err(CatalogError::EmptyIdList.into());
    }
    let removed = HasRepository::<E>::repository(state.as_ref())
        .delete_by_ids(&ids)
        .await
        .map_err(CatalogError::from)?;
    tracing::info!(kind = E::KIND, requested = ids.len(), removed, "Records deleted");
    ok("response", DELETED)
}

/// Pick a random place
///
/// GET /v1/generatePlace
#[utoipa::path(
    get,
    path = "/v1/generatePlace",
    params(GenerateParams),
    responses(
        (status = 200, description = "Random place under `place`", body = Place),
        (status = 400, description = "Unparsable flag"),
        (status = 404, description = "no places available")
    ),
    tag = "Places"
)]
pub async fn generate_place(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<GenerateParams>,
) -> ApiResult<Place> {
    let place = randomizer::generate_place(state.places.as_ref(), &params).await?;
    ok("place", place)
}
