use tracing::debug;

use crate::location::CuLocation;
use crate::supply::IncludeStatus;
use crate::validation::{ProblemKind, ProblemSource, ValidationProblem, ValidationResult};

/// Supply tallies for one location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InclusionCounts {
    pub supplies: usize,
    /// Unknown-status supplies on parcels with no set or fill directive for
    /// their year.
    pub unresolved: usize,
}

impl InclusionCounts {
    pub fn all_unresolved(&self) -> bool {
        self.supplies > 0 && self.unresolved == self.supplies
    }

    pub fn partially_unresolved(&self) -> bool {
        self.unresolved > 0 && self.unresolved < self.supplies
    }
}

/// Checks that supplies have a determinate crop pattern inclusion status.
#[derive(Debug, Clone, Default)]
pub struct SupplyValidator;

impl SupplyValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn count(location: &CuLocation) -> InclusionCounts {
        let mut counts = InclusionCounts::default();
        for parcel in location.parcels() {
            let directed = location.has_set_or_fill_directive(parcel.year);
            for supply in parcel.supplies() {
                counts.supplies += 1;
                if !directed && supply.include_in_cds == IncludeStatus::Unknown {
                    counts.unresolved += 1;
                }
            }
        }
        counts
    }

    /// Only locations where every supply is unresolved are reported.
    pub fn validate_component(&self, location: &CuLocation) -> ValidationResult {
        let mut result = ValidationResult::new();
        let counts = Self::count(location);

        if counts.all_unresolved() {
            result.push(ValidationProblem::error(
                ProblemKind::InclusionUnknown,
                ProblemSource::Location {
                    location_id: location.id.clone(),
                },
                format!(
                    "All {} supplies of location {} have unknown crop pattern inclusion",
                    counts.supplies, location.id
                ),
                "Set the supply inclusion status or add a set/fill crop pattern command for \
                 the location.",
            ));
        } else if counts.partially_unresolved() {
            debug!(
                location_id = %location.id,
                unresolved = counts.unresolved,
                supplies = counts.supplies,
                "location has some supplies with unknown inclusion"
            );
        }

        result
    }

    pub fn validate_all_component_data<'a>(
        &self,
        locations: impl IntoIterator<Item = &'a CuLocation>,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();
        for location in locations {
            result.extend(self.validate_component(location));
        }
        result
    }
}
