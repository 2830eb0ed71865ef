//! Random place selection with optional dietary filters.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use utoipa::IntoParams;

use super::error::CatalogError;
use super::models::{IS_HALAL, IS_VEGETARIAN, Place};
use super::repository::EntityRepository;

/// Query flags for `GET /v1/generatePlace`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateParams {
    /// Only halal places when true
    pub is_halal: Option<String>,
    /// Only vegetarian places when true
    pub is_vegetarian: Option<String>,
}

impl GenerateParams {
    /// Columns that must be TRUE. Present-and-false flags add no filter.
    pub fn required_flags(&self) -> Result<Vec<&'static str>, CatalogError> {
        let mut flags = Vec::new();
        for (name, raw) in [(IS_HALAL, &self.is_halal), (IS_VEGETARIAN, &self.is_vegetarian)] {
            if let Some(raw) = raw {
                if parse_flag(name, raw)? {
                    flags.push(name);
                }
            }
        }
        Ok(flags)
    }
}

/// Boolean in the forms 1/t/T/TRUE/true/True and 0/f/F/FALSE/false/False.
pub fn parse_flag(name: &'static str, raw: &str) -> Result<bool, CatalogError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CatalogError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Uniform pick; an empty slice is [`CatalogError::NoPlacesAvailable`].
pub fn pick<'a, R: Rng + ?Sized>(
    candidates: &'a [Place],
    rng: &mut R,
) -> Result<&'a Place, CatalogError> {
    candidates.choose(rng).ok_or(CatalogError::NoPlacesAvailable)
}

pub async fn generate_place(
    repo: &dyn EntityRepository<Place>,
    params: &GenerateParams,
) -> Result<Place, CatalogError> {
    let flags = params.required_flags()?;
    let candidates = repo.list_matching(&flags).await?;
    let place = pick(&candidates, &mut rand::thread_rng())?.clone();
    tracing::debug!(candidates = candidates.len(), id = place.id, "Place generated");
    Ok(place)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEntityRepository;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params(is_halal: Option<&str>, is_vegetarian: Option<&str>) -> GenerateParams {
        GenerateParams {
            is_halal: is_halal.map(str::to_string),
            is_vegetarian: is_vegetarian.map(str::to_string),
        }
    }

    fn place(id: i64, is_halal: bool, is_vegetarian: bool) -> Place {
        Place {
            id,
            name: format!("place-{}", id),
            is_halal,
            is_vegetarian,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_flag_forms() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_flag(IS_HALAL, raw).unwrap(), "{}", raw);
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_flag(IS_HALAL, raw).unwrap(), "{}", raw);
        }
        for raw in ["", "yes", "tRuE", "2"] {
            assert!(parse_flag(IS_HALAL, raw).is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_required_flags() {
        assert!(params(None, None).required_flags().unwrap().is_empty());
        assert!(params(Some("false"), Some("0")).required_flags().unwrap().is_empty());
        assert_eq!(params(Some("true"), None).required_flags().unwrap(), vec![IS_HALAL]);
        assert_eq!(
            params(Some("1"), Some("T")).required_flags().unwrap(),
            vec![IS_HALAL, IS_VEGETARIAN]
        );
        assert!(matches!(
            params(None, Some("veggie")).required_flags(),
            Err(CatalogError::InvalidFlag { name: "is_vegetarian", .. })
        ));
    }

    #[test]
    fn test_pick_empty_is_error() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(pick(&[], &mut rng), Err(CatalogError::NoPlacesAvailable)));
    }

    #[test]
    fn test_pick_reaches_every_candidate() {
        let candidates: Vec<Place> = (1..=3).map(|id| place(id, false, false)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let chosen = pick(&candidates, &mut rng).unwrap();
            seen[(chosen.id - 1) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[tokio::test]
    async fn test_generate_respects_filters() {
        let repo = InMemoryEntityRepository::with_rows(vec![
            place(1, true, false),
            place(2, false, true),
            place(3, true, true),
        ]);

        for _ in 0..20 {
            let chosen = generate_place(&repo, &params(Some("true"), Some("true")))
                .await
                .unwrap();
            assert_eq!(chosen.id, 3);

            let chosen = generate_place(&repo, &params(Some("true"), None)).await.unwrap();
            assert!(chosen.is_halal);
        }
    }

    #[tokio::test]
    async fn test_generate_over_empty_filtered_set() {
        let repo = InMemoryEntityRepository::with_rows(vec![place(1, false, true)]);
        let err = generate_place(&repo, &params(Some("true"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NoPlacesAvailable));
        assert_eq!(err.to_string(), "no places available");
    }
}
