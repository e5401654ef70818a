use std::str::FromStr;

use crate::collection::LocationCollection;
use crate::error::CdsError;
use crate::fraction::{parcel_key, GroundwaterClaims};
use crate::parcel::Parcel;
use crate::schema::directive;

/// Crop pattern time series commands that set or fill a location's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Set,
    Fill,
}

impl FromStr for DirectiveKind {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            directive::SET => Ok(DirectiveKind::Set),
            directive::FILL => Ok(DirectiveKind::Fill),
            other => Err(CdsError::InvalidData(format!(
                "Invalid directive: '{other}'. Must be 'set' or 'fill'"
            ))),
        }
    }
}

/// A model location ("CU Location") and the parcels that feed it.
#[derive(Debug, Clone, PartialEq)]
pub struct CuLocation {
    pub id: String,
    pub name: Option<String>,
    collection: Option<LocationCollection>,
    parcels: Vec<Parcel>,
    groundwater_only: bool,
    directives: Vec<(DirectiveKind, i32)>,
}

impl CuLocation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            collection: None,
            parcels: Vec::new(),
            groundwater_only: false,
            directives: Vec::new(),
        }
    }

    pub fn with_parcel(mut self, parcel: Parcel) -> Self {
        self.parcels.push(parcel);
        self
    }

    pub fn with_groundwater_only(mut self, groundwater_only: bool) -> Self {
        self.groundwater_only = groundwater_only;
        self
    }

    pub fn collection(&self) -> Option<&LocationCollection> {
        self.collection.as_ref()
    }

    pub fn collection_mut(&mut self) -> Option<&mut LocationCollection> {
        self.collection.as_mut()
    }

    pub fn set_collection(&mut self, collection: LocationCollection) {
        self.collection = Some(collection);
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    pub fn add_parcel(&mut self, parcel: Parcel) {
        self.parcels.push(parcel);
    }

    pub fn parcel_mut(&mut self, parcel_id: i64, year: i32) -> Option<&mut Parcel> {
        self.parcels
            .iter_mut()
            .find(|p| p.id == parcel_id && p.year == year)
    }

    /// Groundwater-only nodes exclude parcels that also have surface supply.
    pub fn is_groundwater_only_supply_model_node(&self) -> bool {
        self.groundwater_only
    }

    pub fn set_groundwater_only(&mut self, groundwater_only: bool) {
        self.groundwater_only = groundwater_only;
    }

    pub fn add_directive(&mut self, kind: DirectiveKind, year: i32) {
        if !self.directives.contains(&(kind, year)) {
            self.directives.push((kind, year));
        }
    }

    pub fn has_set_directive(&self, year: i32) -> bool {
        self.directives.contains(&(DirectiveKind::Set, year))
    }

    pub fn has_fill_directive(&self, year: i32) -> bool {
        self.directives.contains(&(DirectiveKind::Fill, year))
    }

    pub fn has_set_or_fill_directive(&self, year: i32) -> bool {
        self.has_set_directive(year) || self.has_fill_directive(year)
    }

    /// Recompute supply fractions of every parcel.
    pub fn recompute(&mut self, claims: &GroundwaterClaims) -> Result<(), CdsError> {
        for parcel in &mut self.parcels {
            let count = claims.count(parcel_key(parcel));
            parcel.recompute(count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_are_per_year() {
        let mut loc = CuLocation::new("0100501");
        loc.add_directive(DirectiveKind::Set, 2005);
        loc.add_directive(DirectiveKind::Fill, 2010);
        loc.add_directive(DirectiveKind::Fill, 2010);

        assert!(loc.has_set_or_fill_directive(2005));
        assert!(loc.has_fill_directive(2010));
        assert!(!loc.has_set_directive(2010));
        assert!(!loc.has_set_or_fill_directive(1956));
    }

    #[test]
    fn parcel_lookup_by_id_and_year() {
        let mut loc = CuLocation::new("0100501")
            .with_parcel(Parcel::new(5, 2005, 10.0))
            .with_parcel(Parcel::new(5, 2010, 12.0));
        assert_eq!(loc.parcel_mut(5, 2010).unwrap().area, 12.0);
        assert!(loc.parcel_mut(5, 1956).is_none());
    }

    #[test]
    fn parses_directive_kind() {
        assert_eq!("Set".parse::<DirectiveKind>().unwrap(), DirectiveKind::Set);
        assert!("clear".parse::<DirectiveKind>().is_err());
    }
}
