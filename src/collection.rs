use std::fmt;
use std::str::FromStr;

use crate::error::CdsError;
use crate::supply::PartIdType;

/// How the parts of a collection are combined into one model location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    /// Water rights of the parts are merged.
    Aggregate,
    /// Parts stay distinct under one identifier.
    System,
}

impl CollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Aggregate => "Aggregate",
            CollectionType::System => "System",
        }
    }
}

impl FromStr for CollectionType {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggregate" => Ok(CollectionType::Aggregate),
            "system" => Ok(CollectionType::System),
            other => Err(CdsError::InvalidData(format!(
                "Invalid collection type: '{other}'. Must be 'aggregate' or 'system'"
            ))),
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionPartType {
    Ditch,
    Parcel,
    Well,
}

impl CollectionPartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionPartType::Ditch => "Ditch",
            CollectionPartType::Parcel => "Parcel",
            CollectionPartType::Well => "Well",
        }
    }

    /// Ditch membership does not change between snapshot years.
    pub fn is_year_keyed(&self) -> bool {
        !matches!(self, CollectionPartType::Ditch)
    }
}

impl FromStr for CollectionPartType {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ditch" => Ok(CollectionPartType::Ditch),
            "parcel" => Ok(CollectionPartType::Parcel),
            "well" => Ok(CollectionPartType::Well),
            other => Err(CdsError::InvalidData(format!(
                "Invalid collection part type: '{other}'. Must be 'ditch', 'parcel' or 'well'"
            ))),
        }
    }
}

impl fmt::Display for CollectionPartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ditches, wells or parcels that make up one model location.
///
/// Years are kept in insertion order, not sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCollection {
    collection_type: CollectionType,
    part_type: CollectionPartType,
    part_id_type: Option<PartIdType>,
    division: Option<i32>,
    ditch_parts: Vec<String>,
    yearly_parts: Vec<(i32, Vec<String>)>,
}

impl LocationCollection {
    pub fn new(collection_type: CollectionType, part_type: CollectionPartType) -> Self {
        Self {
            collection_type,
            part_type,
            part_id_type: None,
            division: None,
            ditch_parts: Vec::new(),
            yearly_parts: Vec::new(),
        }
    }

    pub fn collection_type(&self) -> CollectionType {
        self.collection_type
    }

    pub fn part_type(&self) -> CollectionPartType {
        self.part_type
    }

    /// Only meaningful for well collections.
    pub fn part_id_type(&self) -> Option<PartIdType> {
        match self.part_type {
            CollectionPartType::Well => self.part_id_type,
            _ => None,
        }
    }

    pub fn set_part_id_type(&mut self, part_id_type: PartIdType) {
        self.part_id_type = Some(part_id_type);
    }

    pub fn division(&self) -> Option<i32> {
        self.division
    }

    pub fn set_division(&mut self, division: i32) {
        self.division = Some(division);
    }

    /// Parts active in `year`.
    ///
    /// Ditch collections ignore the year. For parcel and well collections
    /// `None` means no entry exists for the year, which is different from an
    /// entry with no parts.
    pub fn parts_for_year(&self, year: i32) -> Option<&[String]> {
        if !self.part_type.is_year_keyed() {
            return Some(&self.ditch_parts);
        }
        self.yearly_parts
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, parts)| parts.as_slice())
    }

    /// Replace the parts for `year`, or append a new year slot.
    pub fn set_parts(&mut self, year: i32, parts: Vec<String>) {
        if !self.part_type.is_year_keyed() {
            self.ditch_parts = parts;
            return;
        }
        match self.yearly_parts.iter_mut().find(|(y, _)| *y == year) {
            Some((_, existing)) => *existing = parts,
            None => self.yearly_parts.push((year, parts)),
        }
    }

    /// Add one part to `year`, creating the year slot if needed.
    pub fn push_part(&mut self, year: i32, part_id: impl Into<String>) {
        let part_id = part_id.into();
        if !self.part_type.is_year_keyed() {
            self.ditch_parts.push(part_id);
            return;
        }
        match self.yearly_parts.iter_mut().find(|(y, _)| *y == year) {
            Some((_, existing)) => existing.push(part_id),
            None => self.yearly_parts.push((year, vec![part_id])),
        }
    }

    /// Years with an entry, in insertion order. Empty for ditch collections.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.yearly_parts.iter().map(|(y, _)| *y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ditch_parts_ignore_year() {
        let mut c = LocationCollection::new(CollectionType::Aggregate, CollectionPartType::Ditch);
        c.set_parts(1956, ids(&["0100501", "0100502"]));
        assert_eq!(c.parts_for_year(2010).unwrap(), ids(&["0100501", "0100502"]).as_slice());
        assert_eq!(c.parts_for_year(1800).unwrap().len(), 2);
        assert_eq!(c.years().count(), 0);
    }

    #[test]
    fn parcel_parts_are_year_keyed() {
        let mut c = LocationCollection::new(CollectionType::System, CollectionPartType::Parcel);
        c.set_parts(2010, ids(&["11", "12"]));
        c.set_parts(1956, vec![]);

        assert_eq!(c.parts_for_year(2010).unwrap(), ids(&["11", "12"]).as_slice());
        // present but empty, distinct from absent
        assert_eq!(c.parts_for_year(1956), Some(&[][..]));
        assert_eq!(c.parts_for_year(2001), None);
    }

    #[test]
    fn replace_keeps_slot_and_new_year_appends() {
        let mut c = LocationCollection::new(CollectionType::Aggregate, CollectionPartType::Well);
        c.set_parts(2010, ids(&["a"]));
        c.set_parts(1993, ids(&["b"]));
        c.set_parts(2010, ids(&["c", "d"]));
        c.set_parts(2001, ids(&["e"]));

        assert_eq!(c.years().collect::<Vec<_>>(), vec![2010, 1993, 2001]);
        assert_eq!(c.parts_for_year(2010).unwrap(), ids(&["c", "d"]).as_slice());
    }

    #[test]
    fn push_part_builds_lists_in_row_order() {
        let mut c = LocationCollection::new(CollectionType::Aggregate, CollectionPartType::Parcel);
        c.push_part(2005, "3");
        c.push_part(2010, "4");
        c.push_part(2005, "1");
        assert_eq!(c.parts_for_year(2005).unwrap(), ids(&["3", "1"]).as_slice());
        assert_eq!(c.years().collect::<Vec<_>>(), vec![2005, 2010]);
    }

    #[test]
    fn part_id_type_only_for_wells() {
        let mut wells = LocationCollection::new(CollectionType::Aggregate, CollectionPartType::Well);
        wells.set_part_id_type(PartIdType::Receipt);
        assert_eq!(wells.part_id_type(), Some(PartIdType::Receipt));

        let mut parcels =
            LocationCollection::new(CollectionType::Aggregate, CollectionPartType::Parcel);
        parcels.set_part_id_type(PartIdType::Receipt);
        assert_eq!(parcels.part_id_type(), None);
    }

    #[test]
    fn parses_types() {
        assert_eq!(
            "AGGREGATE".parse::<CollectionType>().unwrap(),
            CollectionType::Aggregate
        );
        assert_eq!(
            "well".parse::<CollectionPartType>().unwrap(),
            CollectionPartType::Well
        );
        assert!("canal".parse::<CollectionPartType>().is_err());
    }
}
