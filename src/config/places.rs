use crate::domain::model::Place;
use crate::utils::error::{NotifierError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Static catalog of destinations of interest. Loaded once at startup,
/// validated, then passed around immutably.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceCatalog {
    pub places: Vec<Place>,
}

impl PlaceCatalog {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog: PlaceCatalog =
            toml::from_str(&content).map_err(|e| NotifierError::ConfigError {
                message: format!("Invalid place catalog {}: {}", path.display(), e),
            })?;
        catalog.validate()?;
        Ok(catalog)
    }
}

impl Validate for PlaceCatalog {
    fn validate(&self) -> Result<()> {
        if self.places.is_empty() {
            return Err(NotifierError::ConfigError {
                message: "Place catalog has no places".to_string(),
            });
        }

        let mut ids: HashSet<&str> = HashSet::new();
        for place in &self.places {
            validate_non_empty_string("places.id", &place.id)?;
            validate_non_empty_string("places.address", &place.address)?;

            if !ids.insert(&place.id) {
                return Err(NotifierError::InvalidConfigValueError {
                    field: "places.id".to_string(),
                    value: place.id.clone(),
                    reason: "Duplicate place id".to_string(),
                });
            }
            if place.modes.is_empty() {
                return Err(NotifierError::InvalidConfigValueError {
                    field: "places.modes".to_string(),
                    value: place.id.clone(),
                    reason: "At least one travel mode is required".to_string(),
                });
            }
            if let Some(arrival) = &place.arrival {
                validate_range("arrival.hour", arrival.hour, 0, 23)?;
                validate_range("arrival.minute", arrival.minute, 0, 59)?;
            }
        }
        Ok(())
    }
}
