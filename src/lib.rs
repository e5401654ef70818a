pub mod collection;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fraction;
pub mod loader;
pub mod location;
pub mod parcel;
pub mod parcel_validator;
pub mod report;
pub mod schema;
pub mod supply;
pub mod supply_validator;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use collection::{CollectionPartType, CollectionType, LocationCollection};
pub use config::ValidationConfig;
pub use dataset::{CropPatternRow, Dataset};
pub use error::CdsError;
pub use fraction::{GroundwaterClaims, ParcelKey, SupplyFractionCalculator};
pub use location::{CuLocation, DirectiveKind};
pub use parcel::Parcel;
pub use parcel_validator::ParcelValidator;
pub use supply::{IncludeStatus, PartIdType, Supply, SupplyKind};
pub use supply_validator::SupplyValidator;
pub use validation::{ProblemKind, ProblemSource, Severity, ValidationProblem, ValidationResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyModule;

/// Export schema constants as Python submodules
#[cfg(feature = "python")]
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Parcel
    let parcel = PyModule::new(m.py(), "parcel")?;
    parcel.add("LOCATION_ID", schema::parcel::LOCATION_ID)?;
    parcel.add("PARCEL_ID", schema::parcel::PARCEL_ID)?;
    parcel.add("YEAR", schema::parcel::YEAR)?;
    parcel.add("DIVISION", schema::parcel::DIVISION)?;
    parcel.add("WATER_DISTRICT", schema::parcel::WATER_DISTRICT)?;
    parcel.add("CROP", schema::parcel::CROP)?;
    parcel.add("AREA", schema::parcel::AREA)?;
    parcel.add("AREA_UNITS", schema::parcel::AREA_UNITS)?;
    parcel.add("IRRIGATION_METHOD", schema::parcel::IRRIGATION_METHOD)?;
    m.add_submodule(&parcel)?;

    // Supply
    let supply = PyModule::new(m.py(), "supply")?;
    supply.add("SUPPLY_ID", schema::supply::SUPPLY_ID)?;
    supply.add("KIND", schema::supply::KIND)?;
    supply.add("PART_ID_TYPE", schema::supply::PART_ID_TYPE)?;
    supply.add("AMOUNT", schema::supply::AMOUNT)?;
    supply.add("PERCENT_IRRIG", schema::supply::PERCENT_IRRIG)?;
    supply.add("INCLUDE_IN_CDS", schema::supply::INCLUDE_IN_CDS)?;
    m.add_submodule(&supply)?;

    // Collection
    let collection = PyModule::new(m.py(), "collection")?;
    collection.add("COLLECTION_TYPE", schema::collection::COLLECTION_TYPE)?;
    collection.add("PART_TYPE", schema::collection::PART_TYPE)?;
    collection.add("PART_ID_TYPE", schema::collection::PART_ID_TYPE)?;
    collection.add("PART_ID", schema::collection::PART_ID)?;
    m.add_submodule(&collection)?;

    // Problem
    let problem = PyModule::new(m.py(), "problem")?;
    problem.add("SEVERITY", schema::problem::SEVERITY)?;
    problem.add("KIND", schema::problem::KIND)?;
    problem.add("MESSAGE", schema::problem::MESSAGE)?;
    problem.add("RECOMMENDATION", schema::problem::RECOMMENDATION)?;
    m.add_submodule(&problem)?;

    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::CdsDataset>()?;
    add_schema_exports(m)?;
    Ok(())
}
