use crate::error::CdsError;
use crate::fraction::SupplyFractionCalculator;
use crate::supply::Supply;

/// One irrigated-land record for a specific year.
///
/// Several parcels of different years may share an `id`; the same parcel-year
/// may also appear under more than one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: i64,
    pub year: i32,
    pub division: Option<i32>,
    pub water_district: Option<i32>,
    pub crop: Option<String>,
    /// Total irrigated area.
    pub area: f64,
    pub area_units: Option<String>,
    pub irrigation_method: Option<String>,
    supplies: Vec<Supply>,
}

impl Parcel {
    pub fn new(id: i64, year: i32, area: f64) -> Self {
        Self {
            id,
            year,
            division: None,
            water_district: None,
            crop: None,
            area,
            area_units: None,
            irrigation_method: None,
            supplies: Vec::new(),
        }
    }

    pub fn with_division(mut self, division: i32) -> Self {
        self.division = Some(division);
        self
    }

    pub fn with_crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = Some(crop.into());
        self
    }

    pub fn with_supply(mut self, supply: Supply) -> Self {
        self.supplies.push(supply);
        self
    }

    pub fn add_supply(&mut self, supply: Supply) {
        self.supplies.push(supply);
    }

    pub fn supplies(&self) -> &[Supply] {
        &self.supplies
    }

    pub fn supplies_mut(&mut self) -> &mut [Supply] {
        &mut self.supplies
    }

    pub fn surface_water_supplies(&self) -> impl Iterator<Item = &Supply> {
        self.supplies.iter().filter(|s| s.is_surface_water())
    }

    pub fn ground_water_supplies(&self) -> impl Iterator<Item = &Supply> {
        self.supplies.iter().filter(|s| s.is_ground_water())
    }

    pub fn surface_water_supply_count(&self) -> usize {
        self.surface_water_supplies().count()
    }

    pub fn ground_water_supply_count(&self) -> usize {
        self.ground_water_supplies().count()
    }

    pub fn has_surface_water_supply(&self) -> bool {
        self.supplies.iter().any(Supply::is_surface_water)
    }

    pub fn has_ground_water_supply(&self) -> bool {
        self.supplies.iter().any(Supply::is_ground_water)
    }

    pub fn surface_water_area_irrig(&self) -> f64 {
        self.surface_water_supplies().map(Supply::area_irrig).sum()
    }

    pub fn ground_water_area_irrig(&self) -> f64 {
        self.ground_water_supplies().map(Supply::area_irrig).sum()
    }

    /// Recompute supply fractions after the supply set changed.
    ///
    /// `groundwater_claims` is the number of distinct locations drawing
    /// groundwater from this parcel in this year.
    pub fn recompute(&mut self, groundwater_claims: usize) -> Result<(), CdsError> {
        SupplyFractionCalculator::compute(self, groundwater_claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supply::PartIdType;

    #[test]
    fn counts_supplies_by_kind() {
        let parcel = Parcel::new(1001, 2010, 40.0)
            .with_supply(Supply::surface_water("0100501", Some(0.5)))
            .with_supply(Supply::surface_water("0100502", Some(0.5)))
            .with_supply(Supply::ground_water("0105001", PartIdType::Well));

        assert_eq!(parcel.surface_water_supply_count(), 2);
        assert_eq!(parcel.ground_water_supply_count(), 1);
        assert!(parcel.has_surface_water_supply());
        assert!(parcel.has_ground_water_supply());
    }

    #[test]
    fn recompute_fills_area_sums() {
        let mut parcel = Parcel::new(1001, 2010, 40.0)
            .with_supply(Supply::surface_water("0100501", Some(0.75)))
            .with_supply(Supply::surface_water("0100502", Some(0.25)));
        parcel.recompute(0).unwrap();
        assert_eq!(parcel.surface_water_area_irrig(), 40.0);
        assert_eq!(parcel.ground_water_area_irrig(), 0.0);
    }
}
