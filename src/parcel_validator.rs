use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::ValidationConfig;
use crate::location::CuLocation;
use crate::parcel::Parcel;
use crate::validation::{
    format_fixed, same_at_precision, ProblemKind, ProblemSource, ValidationProblem,
    ValidationResult,
};

/// Checks parcel division consistency and per-location supply accounting.
///
/// All area and fraction comparisons in a run use the same precision.
#[derive(Debug, Clone)]
pub struct ParcelValidator {
    precision: usize,
}

impl ParcelValidator {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.precision)
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Dataset-wide pass: every parcel should be in the same division.
    ///
    /// Snapshot years are defined per division, so mixing divisions is only a
    /// warning. Parcels that carry no division at all are an error.
    pub fn validate_all_component_data<'a>(
        &self,
        locations: impl IntoIterator<Item = &'a CuLocation>,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut parcel_count = 0usize;
        let mut without_division = 0usize;
        let mut divisions = BTreeSet::new();
        for location in locations {
            for parcel in location.parcels() {
                parcel_count += 1;
                match parcel.division {
                    Some(division) => {
                        divisions.insert(division);
                    }
                    None => without_division += 1,
                }
            }
        }

        if parcel_count == 0 {
            return result;
        }

        match divisions.len() {
            0 => result.push(ValidationProblem::error(
                ProblemKind::DivisionMissing,
                ProblemSource::Dataset,
                format!("{parcel_count} parcels were read but none has a division"),
                "Confirm that parcel data include the division.",
            )),
            1 => {}
            _ => {
                let listed = divisions
                    .iter()
                    .map(i32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                result.push(ValidationProblem::warning(
                    ProblemKind::DivisionMixed,
                    ProblemSource::Dataset,
                    format!("Parcels are in more than one division ({listed})"),
                    format!(
                        "Snapshot years are defined per division and may not align across \
                         divisions {listed}. Confirm that parcel years are consistent."
                    ),
                ));
            }
        }

        if !divisions.is_empty() && without_division > 0 {
            result.push(ValidationProblem::warning(
                ProblemKind::DivisionMissing,
                ProblemSource::Dataset,
                format!("{without_division} of {parcel_count} parcels have no division"),
                "Confirm that parcel data include the division for every parcel.",
            ));
        }

        info!(
            parcels = parcel_count,
            without_division,
            divisions = divisions.len(),
            "checked parcel divisions"
        );
        result
    }

    /// Per-location pass over supply counts and irrigated area sums.
    pub fn validate_component(&self, location: &CuLocation) -> ValidationResult {
        let mut result = ValidationResult::new();
        let groundwater_only = location.is_groundwater_only_supply_model_node();
        let mut total_surface = 0usize;
        let mut total_ground = 0usize;

        for parcel in location.parcels() {
            let surface_count = parcel.surface_water_supply_count();
            let ground_count = parcel.ground_water_supply_count();
            total_surface += surface_count;
            total_ground += ground_count;

            if groundwater_only && surface_count > 0 {
                // Groundwater-only nodes exclude parcels with surface supply.
                debug!(
                    location_id = %location.id,
                    parcel_id = parcel.id,
                    year = parcel.year,
                    "skipping parcel with surface supply on groundwater-only location"
                );
                continue;
            }

            if surface_count == 0 && ground_count == 0 {
                result.push(ValidationProblem::error(
                    ProblemKind::NoSupply,
                    parcel_source(location, parcel),
                    format!(
                        "Parcel {} ({}) has no surface or groundwater supply",
                        parcel.id, parcel.year
                    ),
                    "At least 1 supply is required. Check the parcel supply data.",
                ));
            }

            if surface_count > 0 {
                self.check_surface_area(location, parcel, surface_count, ground_count, &mut result);
            }
        }

        if !location.parcels().is_empty() && total_surface == 0 && total_ground == 0 {
            result.push(ValidationProblem::error(
                ProblemKind::LocationUnsupplied,
                ProblemSource::Location {
                    location_id: location.id.clone(),
                },
                format!(
                    "Location {} has parcels but no surface or groundwater supply in any year",
                    location.id
                ),
                "Check how parcels and supplies were assigned to the location.",
            ));
        }

        result
    }

    fn check_surface_area(
        &self,
        location: &CuLocation,
        parcel: &Parcel,
        surface_count: usize,
        ground_count: usize,
        result: &mut ValidationResult,
    ) {
        let precision = self.precision;
        let area_sum = parcel.surface_water_area_irrig();
        if !same_at_precision(area_sum, parcel.area, precision) {
            result.push(ValidationProblem::error(
                ProblemKind::AreaMismatch,
                parcel_source(location, parcel),
                format!(
                    "Location {} parcel {} ({}) surface water irrigated area {} does not equal \
                     parcel area {}",
                    location.id,
                    parcel.id,
                    parcel.year,
                    format_fixed(area_sum, precision),
                    format_fixed(parcel.area, precision)
                ),
                "Check the percent irrigated values of the ditches serving the parcel.",
            ));
            if ground_count > 0 {
                result.push(ValidationProblem::warning(
                    ProblemKind::CombinedSupply,
                    parcel_source(location, parcel),
                    format!(
                        "Parcel {} ({}) also has groundwater supply",
                        parcel.id, parcel.year
                    ),
                    "Total area accounting may be further confused by combined surface and \
                     groundwater sources.",
                ));
            }
        }

        let expected = 1.0 / surface_count as f64;
        for supply in parcel.surface_water_supplies() {
            let from_source = supply.area_irrig_fraction_from_source();
            let matches = from_source
                .map(|f| same_at_precision(f, expected, precision))
                .unwrap_or(false);
            if matches {
                continue;
            }
            let recorded = from_source
                .map(|f| format_fixed(f, precision))
                .unwrap_or_else(|| "missing".to_string());
            result.push(ValidationProblem::error(
                ProblemKind::SupplyFractionMismatch,
                ProblemSource::Supply {
                    location_id: location.id.clone(),
                    parcel_id: parcel.id,
                    year: parcel.year,
                    supply_id: supply.id.clone(),
                },
                format!(
                    "Ditch {} fraction for parcel {} ({}) is {} at the source but {} from \
                     {} ditches",
                    supply.id,
                    parcel.id,
                    parcel.year,
                    recorded,
                    format_fixed(expected, precision),
                    surface_count
                ),
                "Check the ditch to parcel relationship in the source data.",
            ));
        }
    }
}

impl Default for ParcelValidator {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

fn parcel_source(location: &CuLocation, parcel: &Parcel) -> ProblemSource {
    ProblemSource::Parcel {
        location_id: location.id.clone(),
        parcel_id: parcel.id,
        year: parcel.year,
    }
}
