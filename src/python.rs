use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::config::{ValidationConfig, DEFAULT_PRECISION};
use crate::dataset::Dataset;
use crate::error::CdsError;
use crate::loader;
use crate::report;
use crate::schema::files;

#[pyclass]
pub struct CdsDataset {
    base_path: PathBuf,
    dataset: Dataset,
}

#[pymethods]
impl CdsDataset {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            base_path: PathBuf::from(base_path),
            dataset: Dataset::new(),
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load locations CSV.
    ///
    /// Required columns: location_id
    /// Optional: name, groundwater_only
    #[pyo3(signature = (filename=None))]
    fn load_locations(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = self.read(filename.unwrap_or(files::LOCATIONS))?;
        loader::load_locations(&mut self.dataset, &df)?;
        Ok(PyDataFrame(df))
    }

    /// Load parcels CSV.
    ///
    /// Required columns: location_id, parcel_id, year
    /// Optional: division, water_district, crop, area, area_units, irrigation_method
    #[pyo3(signature = (filename=None))]
    fn load_parcels(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = self.read(filename.unwrap_or(files::PARCELS))?;
        loader::load_parcels(&mut self.dataset, &df)?;
        Ok(PyDataFrame(df))
    }

    /// Load supplies CSV. Parcels must be loaded first.
    ///
    /// Required columns: location_id, parcel_id, year, supply_id, kind
    /// Optional: part_id_type, amount, percent_irrig, include_in_cds
    #[pyo3(signature = (filename=None))]
    fn load_supplies(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = self.read(filename.unwrap_or(files::SUPPLIES))?;
        loader::load_supplies(&mut self.dataset, &df)?;
        Ok(PyDataFrame(df))
    }

    /// Load collection assignments CSV.
    ///
    /// Required columns: location_id, collection_type, part_type, part_id
    /// Optional: part_id_type, division, year (required for parcel and well parts)
    #[pyo3(signature = (filename=None))]
    fn load_collections(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = self.read(filename.unwrap_or(files::COLLECTIONS))?;
        loader::load_collections(&mut self.dataset, &df)?;
        Ok(PyDataFrame(df))
    }

    /// Load crop pattern set/fill directives CSV.
    #[pyo3(signature = (filename=None))]
    fn load_directives(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = self.read(filename.unwrap_or(files::DIRECTIVES))?;
        loader::load_directives(&mut self.dataset, &df)?;
        Ok(PyDataFrame(df))
    }

    // ── Accounting ──────────────────────────────────────────────────────────

    fn recompute_fractions(&mut self) -> PyResult<()> {
        self.dataset.recompute_fractions()?;
        Ok(())
    }

    /// Run every validation pass and return the problems found.
    #[pyo3(signature = (precision=DEFAULT_PRECISION))]
    fn validate(&self, precision: usize) -> PyResult<PyDataFrame> {
        let result = self
            .dataset
            .validate(&ValidationConfig::with_precision(precision));
        Ok(PyDataFrame(report::problems_frame(&result)?))
    }

    fn crop_pattern(&self) -> PyResult<PyDataFrame> {
        let rows = self.dataset.crop_pattern();
        Ok(PyDataFrame(report::crop_pattern_frame(&rows)?))
    }

    /// Parts of a location's collection active in `year`, or None.
    fn parts_for_year(&self, location_id: &str, year: i32) -> PyResult<Option<Vec<String>>> {
        let location = self
            .dataset
            .location(location_id)
            .ok_or_else(|| CdsError::NotLoaded(format!("location {location_id}")))?;
        Ok(location
            .collection()
            .and_then(|c| c.parts_for_year(year))
            .map(|parts| parts.to_vec()))
    }

    // ── Properties ──────────────────────────────────────────────────────────

    #[getter]
    fn location_ids(&self) -> Vec<String> {
        self.dataset
            .locations()
            .iter()
            .map(|l| l.id.clone())
            .collect()
    }
}

impl CdsDataset {
    fn read(&self, filename: &str) -> Result<polars::prelude::DataFrame, CdsError> {
        loader::read_csv_as_strings(&self.base_path.join(filename))
    }
}
