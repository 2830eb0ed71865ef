//! Insert-or-update of a catalog record from an edit DTO.
//!
//! A non-zero id loads the stored row and overlays every mutable field from
//! the DTO (full replace, not a patch). An id of 0 creates a new row. The
//! fetch and the write are separate statements; concurrent edits are
//! last-writer-wins.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use super::error::CatalogError;
use super::repository::{Entity, EntityRepository};

/// Policy when an edit names an id with no stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRow {
    /// Treat the edit as a new record
    Insert,
    /// Fail with "<kind> not found"
    Reject,
}

/// Edit payload for one entity type
pub trait MergeDto: DeserializeOwned + Send + 'static {
    type Target: Entity;

    /// 0 means "create"
    fn id(&self) -> i64;

    /// Replace every mutable field of `target` with this DTO's values.
    fn overlay(self, target: &mut Self::Target);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Written {
    Inserted(i64),
    Updated(i64),
}

pub async fn edit_merge<D: MergeDto>(
    repo: &dyn EntityRepository<D::Target>,
    dto: D,
    now: DateTime<Utc>,
) -> Result<Written, CatalogError> {
    let kind = <D::Target as Entity>::KIND;
    let mut record = D::Target::default();

    let id = dto.id();
    if id != 0 {
        match repo.get_by_id(id).await? {
            Some(existing) => record = existing,
            None => match <D::Target as Entity>::MISSING_ROW {
                MissingRow::Insert => {
                    tracing::debug!(kind, id, "Edit target missing, inserting instead");
                }
                MissingRow::Reject => return Err(CatalogError::NotFound(kind)),
            },
        }
    }

    let inserting = record.id() == 0;
    dto.overlay(&mut record);
    record.stamp(now, inserting);

    if inserting {
        let new_id = repo.insert(&record).await?;
        tracing::info!(kind, id = new_id, "Record inserted");
        Ok(Written::Inserted(new_id))
    } else {
        repo.update(&record).await?;
        tracing::info!(kind, id = record.id(), "Record updated");
        Ok(Written::Updated(record.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{Category, CategoryDto, Location, LocationDto, Place, PlaceDto};
    use crate::memory::InMemoryEntityRepository;
    use chrono::Duration;

    fn stored_place(id: i64, created_at: DateTime<Utc>) -> Place {
        Place {
            id,
            name: "A".to_string(),
            description: "old description".to_string(),
            category: "Chinese".to_string(),
            is_halal: true,
            is_vegetarian: true,
            location: "Clementi".to_string(),
            lat: "1.3".to_string(),
            lon: "103.7".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_overlay_is_full_replace() {
        let created = Utc::now() - Duration::days(30);
        let repo = InMemoryEntityRepository::with_rows(vec![stored_place(5, created)]);
        let dto: PlaceDto =
            serde_json::from_value(serde_json::json!({ "id": 5, "name": "B" })).unwrap();

        let now = Utc::now();
        let written = edit_merge(&repo, dto, now).await.unwrap();
        assert_eq!(written, Written::Updated(5));

        let place = repo.row(5).unwrap();
        assert_eq!(place.name, "B");
        assert_eq!(place.description, "");
        assert_eq!(place.category, "");
        assert!(!place.is_halal);
        assert!(!place.is_vegetarian);
        assert_eq!(place.location, "");
        assert_eq!(place.lat, "");
        assert_eq!(place.lon, "");
        assert_eq!(place.created_at, created);
        assert_eq!(place.updated_at, now);
        assert_eq!(repo.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_id_inserts_with_both_timestamps() {
        let repo = InMemoryEntityRepository::<Place>::new();
        let dto = PlaceDto {
            name: "Fresh".to_string(),
            is_halal: true,
            ..Default::default()
        };

        let now = Utc::now();
        let Written::Inserted(id) = edit_merge(&repo, dto, now).await.unwrap() else {
            panic!("expected insert");
        };
        let place = repo.row(id).unwrap();
        assert_eq!(place.created_at, now);
        assert_eq!(place.updated_at, now);
        assert!(place.is_halal);
        assert_eq!(repo.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_place_becomes_insert() {
        let repo = InMemoryEntityRepository::<Place>::new();
        let dto = PlaceDto {
            id: 99,
            name: "Ghost".to_string(),
            ..Default::default()
        };

        let written = edit_merge(&repo, dto, Utc::now()).await.unwrap();
        let Written::Inserted(id) = written else {
            panic!("expected insert, got {:?}", written);
        };
        assert_ne!(id, 99);
        assert_eq!(repo.row(id).unwrap().name, "Ghost");
        assert_eq!(repo.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_category_and_location_rejected() {
        let categories = InMemoryEntityRepository::<Category>::new();
        let err = edit_merge(
            &categories,
            CategoryDto {
                id: 3,
                category_name: "Thai".to_string(),
            },
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "category not found");
        assert_eq!(categories.insert_calls(), 0);

        let locations = InMemoryEntityRepository::<Location>::new();
        let err = edit_merge(
            &locations,
            LocationDto {
                id: 4,
                ..Default::default()
            },
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "location not found");
    }

    #[tokio::test]
    async fn test_category_update_keeps_created_at() {
        let created = Utc::now() - Duration::days(3);
        let repo = InMemoryEntityRepository::with_rows(vec![Category {
            id: 1,
            category_name: "Japanese".to_string(),
            created_at: created,
            updated_at: created,
        }]);

        edit_merge(
            &repo,
            CategoryDto {
                id: 1,
                category_name: "Korean".to_string(),
            },
            Utc::now(),
        )
        .await
        .unwrap();

        let category = repo.row(1).unwrap();
        assert_eq!(category.category_name, "Korean");
        assert_eq!(category.created_at, created);
        assert!(category.updated_at > created);
    }
}
