//! Routed, documented catalog endpoints
//!
//! Each entity gets a module of thin wrappers over the generic handlers in
//! [`super::handlers`], carrying the route's `#[utoipa::path]` metadata.

use std::sync::Arc;

use axum::extract::State;

use super::handlers::{delete_entities, delete_entity, edit_entity, get_entity, list_entities};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResult, IdPath, JsonBody};

macro_rules! catalog_endpoints {
    (
        mod $module:ident {
            entity: $entity:ident,
            dto: $dto:ident,
            tag: $tag:literal,
            list: $list_path:literal,
            get: $get_path:literal,
            update: $update_path:literal,
            delete: $delete_path:literal,
            delete_many: $delete_many_path:literal,
            $(read_security: $read_scheme:literal,)?
        }
    ) => {
        pub mod $module {
            use super::*;
            use crate::catalog::models::{$dto, $entity};

            #[utoipa::path(
                get,
                path = $list_path,
                operation_id = concat!("list_", stringify!($module)),
                responses(
                    (status = 200, description = "All records under the plural key", body = Vec<$entity>)
                ),
                tag = $tag
                $(, security(($read_scheme = [])))?
            )]
            pub async fn list(state: State<Arc<AppState>>) -> ApiResult<Vec<$entity>> {
                list_entities::<$entity>(state).await
            }

            #[utoipa::path(
                get,
                path = $get_path,
                operation_id = concat!("get_", stringify!($module)),
                params(("id" = i64, Path, description = "Record id")),
                responses(
                    (status = 200, description = "One record under the singular key", body = $entity),
                    (status = 400, description = "Non-integer id"),
                    (status = 404, description = "No record with this id")
                ),
                tag = $tag
                $(, security(($read_scheme = [])))?
            )]
            pub async fn get(state: State<Arc<AppState>>, id: IdPath) -> ApiResult<$entity> {
                get_entity::<$entity>(state, id).await
            }

            /// Insert when `id` is 0, otherwise replace every mutable field
            #[utoipa::path(
                method(put, post),
                path = $update_path,
                operation_id = concat!("update_", stringify!($module)),
                request_body = $dto,
                responses(
                    (status = 200, description = "Stored; `{\"response\": null}`"),
                    (status = 400, description = "Invalid request body"),
                    (status = 404, description = "Edit names a missing record")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn update(
                state: State<Arc<AppState>>,
                body: JsonBody<$dto>,
            ) -> ApiResult<()> {
                edit_entity::<$dto>(state, body).await
            }

            #[utoipa::path(
                delete,
                path = $delete_path,
                operation_id = concat!("delete_", stringify!($module)),
                params(("id" = i64, Path, description = "Record id")),
                responses(
                    (status = 200, description = "`{\"response\": \"Deleted Successfully\"}`"),
                    (status = 404, description = "No record with this id")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn delete(
                state: State<Arc<AppState>>,
                id: IdPath,
            ) -> ApiResult<&'static str> {
                delete_entity::<$entity>(state, id).await
            }

            #[utoipa::path(
                post,
                path = $delete_many_path,
                operation_id = concat!("delete_many_", stringify!($module)),
                request_body(content = Vec<i64>, description = "Ids to delete"),
                responses(
                    (status = 200, description = "`{\"response\": \"Deleted Successfully\"}`"),
                    (status = 400, description = "the ID list is empty")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn delete_many(
                state: State<Arc<AppState>>,
                ids: JsonBody<Vec<i64>>,
            ) -> ApiResult<&'static str> {
                delete_entities::<$entity>(state, ids).await
            }
        }
    };
}

catalog_endpoints! {
    mod places {
        entity: Place,
        dto: PlaceDto,
        tag: "Places",
        list: "/v1/places",
        get: "/v1/places/{id}",
        update: "/v1/admin/updatePlace",
        delete: "/v1/admin/deletePlace/{id}",
        delete_many: "/v1/admin/deletePlaces",
    }
}

catalog_endpoints! {
    mod categories {
        entity: Category,
        dto: CategoryDto,
        tag: "Categories",
        list: "/v1/admin/categories",
        get: "/v1/admin/categories/{id}",
        update: "/v1/admin/updateCategory",
        delete: "/v1/admin/deleteCategory/{id}",
        delete_many: "/v1/admin/deleteCategories",
        read_security: "bearer_auth",
    }
}

catalog_endpoints! {
    mod locations {
        entity: Location,
        dto: LocationDto,
        tag: "Locations",
        list: "/v1/admin/locations",
        get: "/v1/admin/locations/{id}",
        update: "/v1/admin/updateLocation",
        delete: "/v1/admin/deleteLocation/{id}",
        delete_many: "/v1/admin/deleteLocations",
        read_security: "bearer_auth",
    }
}
