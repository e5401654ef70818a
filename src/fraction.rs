use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::CdsError;
use crate::location::CuLocation;
use crate::parcel::Parcel;

/// Identity of a parcel-year. Parcel numbers are only unique within a division.
pub type ParcelKey = (Option<i32>, i64, i32);

pub fn parcel_key(parcel: &Parcel) -> ParcelKey {
    (parcel.division, parcel.id, parcel.year)
}

/// For each parcel-year, the distinct locations that draw groundwater from it.
#[derive(Debug, Clone, Default)]
pub struct GroundwaterClaims {
    claims: HashMap<ParcelKey, BTreeSet<String>>,
}

impl GroundwaterClaims {
    /// Scan every location's parcels for groundwater supply.
    pub fn from_locations<'a>(locations: impl IntoIterator<Item = &'a CuLocation>) -> Self {
        let mut claims = Self::default();
        for location in locations {
            for parcel in location.parcels() {
                if parcel.has_ground_water_supply() {
                    claims.insert(&location.id, parcel_key(parcel));
                }
            }
        }
        claims
    }

    pub fn insert(&mut self, location_id: &str, key: ParcelKey) {
        self.claims
            .entry(key)
            .or_default()
            .insert(location_id.to_string());
    }

    pub fn count(&self, key: ParcelKey) -> usize {
        self.claims.get(&key).map(BTreeSet::len).unwrap_or(0)
    }

    pub fn locations(&self, key: ParcelKey) -> impl Iterator<Item = &str> {
        self.claims
            .get(&key)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

/// Computes each supply's share of a parcel's irrigated area.
pub struct SupplyFractionCalculator;

impl SupplyFractionCalculator {
    /// Sum of the source fractions of the parcel's surface supplies.
    ///
    /// Fails with `InsufficientData` when any surface supply lacks one.
    pub fn surface_fraction(parcel: &Parcel) -> Result<f64, CdsError> {
        let mut total = 0.0;
        for supply in parcel.surface_water_supplies() {
            total += supply.area_irrig_fraction_from_source().ok_or_else(|| {
                CdsError::InsufficientData(format!(
                    "Surface water supply {} for parcel {} ({}) has no percent irrigated value",
                    supply.id, parcel.id, parcel.year
                ))
            })?;
        }
        Ok(total)
    }

    /// Set `area_irrig` and `area_irrig_fraction` on every supply of `parcel`.
    ///
    /// Surface supplies take the fraction recorded at the source; each also gets
    /// a `1 / ditch count` cross-check value. Groundwater supplies get
    /// `1 / groundwater_claims`, scaled by the parcel's total surface fraction
    /// when the parcel is also served by surface water (D&W).
    ///
    /// The parcel is left untouched when an error is returned. An empty supply
    /// list is left alone.
    pub fn compute(parcel: &mut Parcel, groundwater_claims: usize) -> Result<(), CdsError> {
        if parcel.supplies().is_empty() {
            return Ok(());
        }

        let surface_fraction = Self::surface_fraction(parcel)?;
        let ditch_count = parcel.surface_water_supply_count();
        let ground_fraction = if parcel.has_ground_water_supply() {
            // The parcel's own location always counts, even if the caller's
            // claims predate this supply.
            let base = 1.0 / groundwater_claims.max(1) as f64;
            if ditch_count > 0 {
                surface_fraction * base
            } else {
                base
            }
        } else {
            0.0
        };

        let area = parcel.area;
        for supply in parcel.supplies_mut() {
            if supply.is_ground_water() {
                supply.set_area_irrig(ground_fraction, area);
                continue;
            }
            let fraction = supply.area_irrig_fraction_from_source().unwrap_or_default();
            supply.set_ditch_fraction(1.0 / ditch_count as f64);
            supply.set_area_irrig(fraction, area);
        }

        debug!(
            parcel_id = parcel.id,
            year = parcel.year,
            ditch_count,
            groundwater_claims,
            "recomputed supply fractions"
        );
        Ok(())
    }
}
