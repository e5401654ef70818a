use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::{info, warn};

use crate::config::ValidationConfig;
use crate::error::CdsError;
use crate::fraction::{GroundwaterClaims, SupplyFractionCalculator};
use crate::loader;
use crate::location::CuLocation;
use crate::parcel::Parcel;
use crate::parcel_validator::ParcelValidator;
use crate::schema::files;
use crate::supply::Supply;
use crate::supply_validator::SupplyValidator;
use crate::validation::ValidationResult;

/// Irrigated acreage of one crop at one location in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct CropPatternRow {
    pub location_id: String,
    pub year: i32,
    pub crop: String,
    pub area: f64,
}

/// Root of one loaded data set: every location, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    locations: Vec<CuLocation>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the standard CSV files from `base_path`.
    ///
    /// Parcels and supplies are required; locations, collections and
    /// directives are read when present.
    pub fn load_dir(base_path: impl AsRef<Path>) -> Result<Self, CdsError> {
        let base_path = base_path.as_ref();
        let mut dataset = Self::new();

        let locations = base_path.join(files::LOCATIONS);
        if locations.exists() {
            loader::load_locations(&mut dataset, &loader::read_csv_as_strings(&locations)?)?;
        }
        loader::load_parcels(
            &mut dataset,
            &loader::read_csv_as_strings(&base_path.join(files::PARCELS))?,
        )?;
        loader::load_supplies(
            &mut dataset,
            &loader::read_csv_as_strings(&base_path.join(files::SUPPLIES))?,
        )?;
        let collections = base_path.join(files::COLLECTIONS);
        if collections.exists() {
            loader::load_collections(&mut dataset, &loader::read_csv_as_strings(&collections)?)?;
        }
        let directives = base_path.join(files::DIRECTIVES);
        if directives.exists() {
            loader::load_directives(&mut dataset, &loader::read_csv_as_strings(&directives)?)?;
        }

        info!(
            path = %base_path.display(),
            locations = dataset.locations.len(),
            "loaded data set"
        );
        Ok(dataset)
    }

    pub fn locations(&self) -> &[CuLocation] {
        &self.locations
    }

    pub fn location(&self, id: &str) -> Option<&CuLocation> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    pub fn location_mut(&mut self, id: &str) -> Option<&mut CuLocation> {
        self.index.get(id).map(|&i| &mut self.locations[i])
    }

    /// Add a location, replacing any existing location with the same id.
    pub fn add_location(&mut self, location: CuLocation) {
        match self.index.get(&location.id) {
            Some(&i) => self.locations[i] = location,
            None => {
                self.index.insert(location.id.clone(), self.locations.len());
                self.locations.push(location);
            }
        }
    }

    pub fn location_or_insert(&mut self, id: &str) -> &mut CuLocation {
        let i = match self.index.get(id) {
            Some(&i) => i,
            None => {
                self.index.insert(id.to_string(), self.locations.len());
                self.locations.push(CuLocation::new(id));
                self.locations.len() - 1
            }
        };
        &mut self.locations[i]
    }

    pub fn parcel_mut(&mut self, location_id: &str, parcel_id: i64, year: i32) -> Option<&mut Parcel> {
        self.location_mut(location_id)?.parcel_mut(parcel_id, year)
    }

    pub fn groundwater_claims(&self) -> GroundwaterClaims {
        GroundwaterClaims::from_locations(&self.locations)
    }

    /// Recompute every supply fraction in the data set.
    ///
    /// Every parcel is checked before any is touched, so an error leaves the
    /// data set as it was.
    pub fn recompute_fractions(&mut self) -> Result<(), CdsError> {
        for location in &self.locations {
            for parcel in location.parcels() {
                SupplyFractionCalculator::surface_fraction(parcel)?;
            }
        }
        let claims = self.groundwater_claims();
        for location in &mut self.locations {
            location.recompute(&claims)?;
        }
        Ok(())
    }

    /// Division pass, then each location, then supply inclusion.
    pub fn validate(&self, config: &ValidationConfig) -> ValidationResult {
        let parcel_validator = ParcelValidator::from_config(config);
        let mut result = parcel_validator.validate_all_component_data(&self.locations);
        for location in &self.locations {
            result.extend(parcel_validator.validate_component(location));
        }
        result.extend(SupplyValidator::new().validate_all_component_data(&self.locations));

        info!(
            locations = self.locations.len(),
            problems = result.len(),
            errors = result.errors().count(),
            "validated data set"
        );
        result
    }

    /// Irrigated acreage per location, year and crop.
    ///
    /// Supplies marked `No` or `Error` are left out. A parcel contributes its
    /// surface irrigated area when it has included surface supply, otherwise
    /// its groundwater irrigated area.
    pub fn crop_pattern(&self) -> Vec<CropPatternRow> {
        let mut rows = Vec::new();
        for location in &self.locations {
            let groundwater_only = location.is_groundwater_only_supply_model_node();
            let mut totals: BTreeMap<(i32, String), f64> = BTreeMap::new();

            for parcel in location.parcels() {
                let Some(crop) = parcel.crop.as_ref() else {
                    warn!(
                        location_id = %location.id,
                        parcel_id = parcel.id,
                        year = parcel.year,
                        "parcel has no crop, left out of crop pattern"
                    );
                    continue;
                };
                if groundwater_only && parcel.has_surface_water_supply() {
                    continue;
                }

                let included = |s: &&Supply| !s.include_in_cds.is_excluded();
                let surface: Vec<&Supply> = parcel.surface_water_supplies().filter(included).collect();
                let area: f64 = if surface.is_empty() {
                    parcel
                        .ground_water_supplies()
                        .filter(included)
                        .map(Supply::area_irrig)
                        .sum()
                } else {
                    surface.iter().map(|s| s.area_irrig()).sum()
                };

                *totals.entry((parcel.year, crop.clone())).or_insert(0.0) += area;
            }

            rows.extend(totals.into_iter().map(|((year, crop), area)| CropPatternRow {
                location_id: location.id.clone(),
                year,
                crop,
                area,
            }));
        }
        rows
    }
}
