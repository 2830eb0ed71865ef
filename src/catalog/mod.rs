//! Food catalog: places, categories and locations
//!
//! - [`repository`]: the [`Entity`] description and the generic [`EntityRepository`]
//! - [`merge`]: insert-or-update from an edit DTO
//! - [`randomizer`]: `generatePlace`
//! - [`handlers`]: HTTP handlers, generic over the entity
//! - [`endpoints`]: per-entity routes with their OpenAPI metadata

pub mod endpoints;
pub mod error;
pub mod handlers;
pub mod merge;
pub mod models;
pub mod randomizer;
pub mod repository;

pub use error::CatalogError;
pub use models::{Category, CategoryDto, Location, LocationDto, Place, PlaceDto};
pub use repository::{Entity, EntityRepository, PgEntityRepository};
