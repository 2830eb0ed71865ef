//! OpenAPI documentation
//!
//! - OpenAPI JSON: `http://localhost:4000/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::catalog::models::{Category, CategoryDto, Location, LocationDto, Place, PlaceDto};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::MessageData;
use crate::user_auth::models::{
    AccessRequestDto, LoginRequest, LoginResponse, LogoutRequest, RegisterRequest,
};

/// Access-token bearer scheme, enforced on /v1/admin/* when `auth.require_admin_token` is set
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Randomizer API",
        version = "1.0.0",
        description = "Food places, categories and locations, with a random place picker."
    ),
    servers(
        (url = "http://localhost:4000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::user_auth::handlers::login,
        crate::user_auth::handlers::logout,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::forget_password,
        crate::user_auth::handlers::request_access,
        crate::catalog::handlers::generate_place,
        crate::catalog::endpoints::places::list,
        crate::catalog::endpoints::places::get,
        crate::catalog::endpoints::places::update,
        crate::catalog::endpoints::places::delete,
        crate::catalog::endpoints::places::delete_many,
        crate::catalog::endpoints::categories::list,
        crate::catalog::endpoints::categories::get,
        crate::catalog::endpoints::categories::update,
        crate::catalog::endpoints::categories::delete,
        crate::catalog::endpoints::categories::delete_many,
        crate::catalog::endpoints::locations::list,
        crate::catalog::endpoints::locations::get,
        crate::catalog::endpoints::locations::update,
        crate::catalog::endpoints::locations::delete,
        crate::catalog::endpoints::locations::delete_many,
    ),
    components(
        schemas(
            HealthResponse,
            MessageData,
            LoginRequest,
            LoginResponse,
            LogoutRequest,
            RegisterRequest,
            AccessRequestDto,
            Place,
            PlaceDto,
            Category,
            CategoryDto,
            Location,
            LocationDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and access requests"),
        (name = "Places", description = "Food places"),
        (name = "Categories", description = "Place categories"),
        (name = "Locations", description = "Named locations"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
