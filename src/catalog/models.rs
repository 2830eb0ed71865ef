//! Catalog records and their edit DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::merge::{MergeDto, MissingRow};
use super::repository::{Entity, PgQuery};

pub const IS_HALAL: &str = "is_halal";
pub const IS_VEGETARIAN: &str = "is_vegetarian";

// ============================================================================
// Place
// ============================================================================

/// A food place. `category` and `location` are free text, not references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_halal: bool,
    pub is_vegetarian: bool,
    pub location: String,
    pub lat: String,
    pub lon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Place {
    const KIND: &'static str = "place";
    const PLURAL: &'static str = "places";
    const TABLE: &'static str = "places";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "category",
        IS_HALAL,
        IS_VEGETARIAN,
        "location",
        "lat",
        "lon",
    ];
    const FLAG_COLUMNS: &'static [&'static str] = &[IS_HALAL, IS_VEGETARIAN];
    const ORDER_BY: &'static str = "name";
    const MISSING_ROW: MissingRow = MissingRow::Insert;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.category.clone())
            .bind(self.is_halal)
            .bind(self.is_vegetarian)
            .bind(self.location.clone())
            .bind(self.lat.clone())
            .bind(self.lon.clone())
    }

    fn flag(&self, column: &str) -> Option<bool> {
        match column {
            IS_HALAL => Some(self.is_halal),
            IS_VEGETARIAN => Some(self.is_vegetarian),
            _ => None,
        }
    }
}

/// Edit payload. Omitted fields are stored as empty/false.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PlaceDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_halal: bool,
    pub is_vegetarian: bool,
    pub location: String,
    pub lat: String,
    pub lon: String,
}

impl MergeDto for PlaceDto {
    type Target = Place;

    fn id(&self) -> i64 {
        self.id
    }

    fn overlay(self, place: &mut Place) {
        place.name = self.name;
        place.description = self.description;
        place.category = self.category;
        place.is_halal = self.is_halal;
        place.is_vegetarian = self.is_vegetarian;
        place.location = self.location;
        place.lat = self.lat;
        place.lon = self.lon;
    }
}

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Category {
    const KIND: &'static str = "category";
    const PLURAL: &'static str = "categories";
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["category_name"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.category_name.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CategoryDto {
    pub id: i64,
    pub category_name: String,
}

impl MergeDto for CategoryDto {
    type Target = Category;

    fn id(&self) -> i64 {
        self.id
    }

    fn overlay(self, category: &mut Category) {
        category.category_name = self.category_name;
    }
}

// ============================================================================
// Location
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Location {
    pub id: i64,
    pub location_name: String,
    pub street_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Location {
    const KIND: &'static str = "location";
    const PLURAL: &'static str = "locations";
    const TABLE: &'static str = "locations";
    const COLUMNS: &'static [&'static str] = &["location_name", "street_name", "lat", "lon"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.location_name.clone())
            .bind(self.street_name.clone())
            .bind(self.lat.clone())
            .bind(self.lon.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LocationDto {
    pub id: i64,
    pub location_name: String,
    pub street_name: String,
    pub lat: String,
    pub lon: String,
}

impl MergeDto for LocationDto {
    type Target = Location;

    fn id(&self) -> i64 {
        self.id
    }

    fn overlay(self, location: &mut Location) {
        location.location_name = self.location_name;
        location.street_name = self.street_name;
        location.lat = self.lat;
        location.lon = self.lon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_location_hide_timestamps() {
        let category = serde_json::to_value(Category {
            id: 2,
            category_name: "Thai".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(category, serde_json::json!({ "id": 2, "category_name": "Thai" }));

        let location = serde_json::to_value(Location::default()).unwrap();
        assert!(location.get("created_at").is_none());
        assert!(location.get("updated_at").is_none());
    }

    #[test]
    fn test_place_serializes_timestamps() {
        let place = serde_json::to_value(Place::default()).unwrap();
        assert!(place.get("created_at").is_some());
        assert_eq!(place["is_halal"], false);
    }

    #[test]
    fn test_place_flags() {
        let place = Place {
            is_halal: true,
            ..Default::default()
        };
        assert_eq!(place.flag(IS_HALAL), Some(true));
        assert_eq!(place.flag(IS_VEGETARIAN), Some(false));
        assert_eq!(place.flag("name"), None);
        assert_eq!(Category::default().flag(IS_HALAL), None);
    }

    #[test]
    fn test_stamp_sets_created_at_only_on_insert() {
        let created = Utc::now() - chrono::Duration::days(2);
        let now = Utc::now();

        let mut location = Location::default();
        location.stamp(created, true);
        assert_eq!(location.created_at(), created);
        assert_eq!(location.updated_at(), created);

        location.stamp(now, false);
        assert_eq!(location.created_at(), created);
        assert_eq!(location.updated_at(), now);

        location.set_created_at(now);
        assert_eq!(location.created_at, now);
    }

    #[test]
    fn test_dto_defaults_missing_fields() {
        let dto: LocationDto =
            serde_json::from_value(serde_json::json!({ "location_name": "Bugis" })).unwrap();
        assert_eq!(dto.id, 0);
        assert_eq!(dto.location_name, "Bugis");
        assert_eq!(dto.street_name, "");
    }
}
